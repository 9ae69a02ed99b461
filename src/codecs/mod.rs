//! The five codecs this crate benchmarks against one another, plus the
//! shared `Sample`-width dispatch that the harness and CLI drive through.
//! See `spec.md` §2, §6 (`list_codecs`).

pub mod deflate;
pub mod delta;
pub mod elias_delta;
pub mod elias_gamma;
pub mod log_huffman;
pub mod wide;
pub mod zigzag;

use crate::sample::Sample;
use crate::Error;

/// One of the codecs this crate implements. `LogHuffmanRle` from `spec.md`
/// §6's `list_codecs()` is deliberately absent — see `DESIGN.md`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecKind {
    EliasGamma,
    EliasDelta,
    LogHuffman,
    Zlib,
}

impl CodecKind {
    /// Short, lowercase, hyphenated name used by the benchmark CLI's
    /// `--codec` flag and CSV output.
    pub fn name(self) -> &'static str {
        match self {
            CodecKind::EliasGamma => "elias-gamma",
            CodecKind::EliasDelta => "elias-delta",
            CodecKind::LogHuffman => "log-huffman",
            CodecKind::Zlib => "zlib",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "elias-gamma" => Some(CodecKind::EliasGamma),
            "elias-delta" => Some(CodecKind::EliasDelta),
            "log-huffman" => Some(CodecKind::LogHuffman),
            "zlib" => Some(CodecKind::Zlib),
            _ => None,
        }
    }
}

/// All codecs this crate implements, in the order `list_codecs()` reports
/// them.
pub fn list_codecs() -> &'static [CodecKind] {
    &[
        CodecKind::EliasGamma,
        CodecKind::EliasDelta,
        CodecKind::LogHuffman,
        CodecKind::Zlib,
    ]
}

pub fn encode<T: Sample>(codec: CodecKind, samples: &[T]) -> Result<Vec<u8>, Error> {
    log::debug!("encoding {} samples with {}", samples.len(), codec.name());
    match codec {
        CodecKind::EliasGamma => elias_gamma::encode(samples),
        CodecKind::EliasDelta => elias_delta::encode(samples),
        CodecKind::LogHuffman => log_huffman::encode(samples),
        CodecKind::Zlib => deflate::encode(samples),
    }
}

pub fn decode<T: Sample>(codec: CodecKind, encoded: &[u8], count: usize) -> Result<Vec<T>, Error> {
    log::debug!("decoding {count} samples with {}", codec.name());
    match codec {
        CodecKind::EliasGamma => elias_gamma::decode(encoded, count),
        CodecKind::EliasDelta => elias_delta::decode(encoded, count),
        CodecKind::LogHuffman => log_huffman::decode(encoded, count),
        CodecKind::Zlib => deflate::decode(encoded, count),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_codecs_names_round_trip_through_parse() {
        for &codec in list_codecs() {
            assert_eq!(CodecKind::parse(codec.name()), Some(codec));
        }
        assert_eq!(CodecKind::parse("log-huffman-rle"), None);
    }

    #[test]
    fn dispatch_round_trips_for_every_codec() {
        let samples: Vec<i32> = vec![1, 2, 4, 5, 6, -3, 8, 0, -100, 100];
        for &codec in list_codecs() {
            let encoded = encode(codec, &samples).unwrap();
            let decoded: Vec<i32> = decode(codec, &encoded, samples.len()).unwrap();
            assert_eq!(decoded, samples, "codec {} failed to round-trip", codec.name());
        }
    }
}
