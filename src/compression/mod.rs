//! Gzip framing over raw bytes.
//!
//! Spec §3/§6 fix the compressed format to gzip: every stored byte string
//! is compressed exactly once and stored under its logical key suffixed
//! with `.gz`; reads always decompress. Empty input decompresses to empty
//! output, and round-tripping is total for any byte string.

use std::io::{Read, Write};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use thiserror::Error;

/// Errors that can occur while compressing or decompressing a blob.
#[derive(Debug, Error)]
pub enum CompressionError {
    /// The underlying gzip stream could not be read or written.
    #[error("gzip I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for compression operations.
pub type Result<T> = std::result::Result<T, CompressionError>;

/// Gzip-compress `data`.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Gzip-decompress `data`. Empty input yields empty output.
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    let mut decoder = GzDecoder::new(data);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_round_trips_to_empty() {
        assert_eq!(decompress(&[]).unwrap(), Vec::<u8>::new());
        let compressed = compress(&[]).unwrap();
        assert_eq!(decompress(&compressed).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn known_bytes_round_trip() {
        let data = b"the quick brown fox jumps over the lazy dog".to_vec();
        let compressed = compress(&data).unwrap();
        assert_ne!(compressed, data);
        assert_eq!(decompress(&compressed).unwrap(), data);
    }

    proptest! {
        #[test]
        fn round_trip_is_total(data: Vec<u8>) {
            let compressed = compress(&data).unwrap();
            let decompressed = decompress(&compressed).unwrap();
            prop_assert_eq!(decompressed, data);
        }
    }
}
