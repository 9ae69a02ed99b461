//! Small bit-twiddling helpers shared by the codecs: `nbits` (position of the
//! highest set bit) and the 64-bit word reversal used when turning a
//! root-to-leaf Huffman path into an LSB-first lookup code. spec.md §9 notes
//! that an 8-bit "magic multiply" reversal is an implementation-choice
//! detail, not an interface, so only the 64-bit reversal this crate actually
//! uses is exposed here.

/// One plus the position of the highest set bit of `x` (`nbits(1) == 1`,
/// `nbits(2) == 2`, `nbits(0) == 0`). Equivalent to `floor(log2(x)) + 1` for
/// `x > 0`.
pub fn nbits(x: u64) -> u32 {
    64 - x.leading_zeros()
}

/// `nbits` widened to `u128`. Needed because `ZZ(x)+1` for a 64-bit sample
/// can reach `2^64`, which requires 65 bits to represent — the Huffman
/// symbol alphabet in `spec.md` §3 is `[1, 65]` precisely for this reason.
pub fn nbits128(x: u128) -> u32 {
    128 - x.leading_zeros()
}

/// Reverse the bits of a 64-bit word.
pub fn reverse_bits_64(v: u64) -> u64 {
    v.reverse_bits()
}
