//! Thin shim over `flate2`'s zlib-wrapped deflate stream, used as the
//! general-purpose baseline codec. See `spec.md` §4.7.

use std::io::Write;

use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::sample::Sample;
use crate::Error;

pub fn encode<T: Sample>(samples: &[T]) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::with_capacity(samples.len() * T::width_bytes() as usize);
    for &x in samples {
        bytes.extend_from_slice(&x.to_le_bytes_vec());
    }
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&bytes)
        .map_err(|e| Error::CodecFailure(format!("deflate write failed: {e}")))?;
    encoder
        .finish()
        .map_err(|e| Error::CodecFailure(format!("deflate finish failed: {e}")))
}

pub fn decode<T: Sample>(encoded: &[u8], count: usize) -> Result<Vec<T>, Error> {
    use std::io::Read;
    let expected_bytes = count * T::width_bytes() as usize;
    let mut decoder = ZlibDecoder::new(encoded);
    let mut bytes = Vec::with_capacity(expected_bytes);
    decoder
        .read_to_end(&mut bytes)
        .map_err(|e| Error::CodecFailure(format!("inflate failed: {e}")))?;
    if bytes.len() != expected_bytes {
        return Err(Error::CodecFailure(format!(
            "inflate produced {} bytes, expected {expected_bytes}",
            bytes.len()
        )));
    }
    let width = T::width_bytes() as usize;
    Ok(bytes
        .chunks_exact(width)
        .map(T::from_le_bytes_slice)
        .collect())
}
