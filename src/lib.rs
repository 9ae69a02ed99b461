//! # tscompress
//!
//! Lossless compression of sequences of signed integer samples (8/16/32/64-bit)
//! representative of sensor / time-series data.
//!
//! The interesting engineering lives in the codec layer: a general-purpose
//! append/consume [`bitstream::Bitstream`] that packs values of arbitrary bit
//! widths into a backing byte buffer, and four integer codecs built on top of
//! it in [`codecs`] — delta, zig-zag, Elias-gamma, Elias-delta, and
//! log-Huffman — plus a thin shim over `flate2` used as a baseline. Each codec
//! round-trips exactly for every representable input; [`harness`] drives a
//! full encode/decode round trip and verifies byte-identity.
//!
//! ## Example
//!
//! ```rs
//! use tscompress::*;
//! let samples: Vec<i32> = vec![1, 2, 4, 5, 6, -3, 8];
//! let encoded = encode(CodecKind::EliasGamma, &samples).expect("encode failed");
//! let decoded: Vec<i32> = decode(CodecKind::EliasGamma, &encoded, samples.len()).expect("decode failed");
//! assert_eq!(samples, decoded);
//! ```

pub mod bits;
pub mod bitstream;
pub mod codecs;
pub mod harness;
pub mod sample;

pub use codecs::CodecKind;
pub use harness::{
    round_trip, round_trip_bytes, run_source, Clock, RoundTripReport, SampleBlock, SampleSource,
    SystemClock,
};
pub use sample::Sample;

/// Crate-wide error type.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Attempted to read past the recorded end of a [`bitstream::Bitstream`].
    #[error("attempted to read past the end of the bitstream")]
    PastEnd,
    /// Growth of the bitstream's backing storage failed, or was attempted on
    /// a non-owning (wrapped) backing that cannot be moved.
    #[error("failed to grow bitstream backing storage")]
    AllocationFailure,
    /// Sample width was not one of 1, 2, 4, or 8 bytes.
    #[error("unsupported sample width: {0} bytes")]
    UnsupportedWidth(u8),
    /// A codec detected an invariant violation, or an external coder
    /// (`flate2`) reported a non-success result.
    #[error("codec failure: {0}")]
    CodecFailure(String),
    /// The harness detected a decoded block that differs from the original.
    #[error("round trip mismatch for codec {codec} on block {block}")]
    RoundTripMismatch { codec: String, block: String },
}

/// Encode a full block of samples with the named codec, returning the
/// encoded bytes. `N` (the sample count) must be supplied again at decode
/// time — no length or checksum is embedded in the output.
pub fn encode<T: Sample>(codec: CodecKind, samples: &[T]) -> Result<Vec<u8>, Error> {
    codecs::encode(codec, samples)
}

/// Decode `count` samples previously produced by [`encode`] with the same
/// codec and width.
pub fn decode<T: Sample>(codec: CodecKind, encoded: &[u8], count: usize) -> Result<Vec<T>, Error> {
    codecs::decode(codec, encoded, count)
}
