//! Elias-delta codec: a recursive Elias-gamma length code over the binary
//! representation of a zig-zag-shifted positive integer. See `spec.md` §4.5.
//!
//! Where gamma spends `L-1` unary bits announcing the length `L` of `u`'s
//! binary representation, delta instead spends a gamma code on `L` itself —
//! cheaper for large `u`, more overhead for small ones.

use crate::bits::{nbits, nbits128};
use crate::bitstream::Bitstream;
use crate::codecs::wide::{read_wide, write_wide, zigzag_plus_one};
use crate::sample::Sample;
use crate::Error;

pub fn encode<T: Sample>(samples: &[T]) -> Result<Vec<u8>, Error> {
    let initial_words = (samples.len() * T::width_bytes() as usize) * 2 + 12;
    let mut bs = Bitstream::new_owned(initial_words.max(1));
    for &x in samples {
        let u = zigzag_plus_one(x);
        let l = nbits128(u);
        let nb_nb = nbits(l as u64);
        bs.write_bits(0, nb_nb - 1)?;
        bs.write_bits(l as u64, nb_nb)?;
        // the leading bit of u is always 1 and is implied by l; only the
        // low l-1 bits need to be transmitted.
        write_wide(&mut bs, u, l - 1)?;
    }
    Ok(bs.into_bytes())
}

pub fn decode<T: Sample>(encoded: &[u8], count: usize) -> Result<Vec<T>, Error> {
    let mut bs = Bitstream::wrap_read(encoded);
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let mut nb_nb_minus_one = 0u32;
        while bs.ready() && !bs.read_bit()? {
            nb_nb_minus_one += 1;
        }
        let nb_nb = nb_nb_minus_one + 1;
        let l_tail = bs.read_bits(nb_nb_minus_one)?;
        let l = (l_tail | (1u64 << nb_nb_minus_one)) as u32;
        let tail = read_wide(&mut bs, l - 1)?;
        let u = tail | (1u128 << (l - 1));
        out.push(T::zigzag_decode((u - 1) as u64));
    }
    Ok(out)
}
