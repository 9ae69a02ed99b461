//! In-place first-order differencing and its inverse. See `spec.md` §4.3.
//!
//! Both passes run in the unsigned modular space of the sample's own width
//! via `num_traits::Wrapping{Add,Sub}` — the pair must invert exactly even
//! when the true mathematical differences overflow (signed wraparound is
//! required, not merely tolerated; see Testable Property 4 and scenarios S1
//! / S2 in `spec.md` §8).

use crate::Sample;

/// `a[i] <- a[i] - a[i-1]` for `i` from `N-1` down to `1`, in place.
pub fn delta_encode<T: Sample>(a: &mut [T]) {
    let mut last = T::default();
    for x in a.iter_mut() {
        let tmp = *x;
        *x = x.wrapping_sub(&last);
        last = tmp;
    }
}

/// Inverse of [`delta_encode`]: prefix sum in place.
pub fn delta_decode<T: Sample>(a: &mut [T]) {
    let mut last = T::default();
    for x in a.iter_mut() {
        *x = x.wrapping_add(&last);
        last = *x;
    }
}
