use anyhow::{Context, Result};
use flate2::write::{GzDecoder, GzEncoder};
use flate2::Compression;
use std::io::Write;
use tracing::debug;

/// Compress a raw response body with gzip.
pub fn compress_data(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .context("Failed to write data to compressor")?;

    let compressed = encoder.finish().context("Failed to finish compression")?;
    debug!(
        "Compressed {} bytes to {} bytes",
        data.len(),
        compressed.len()
    );

    Ok(compressed)
}

/// Decompress a gzip-compressed cache entry.
pub fn decompress_data(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = GzDecoder::new(Vec::new());
    decoder
        .write_all(data)
        .context("Failed to write compressed data to decoder")?;

    decoder.finish().context("Failed to finish decompression")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_decompress() {
        let original = br#"[{"number": 1, "title": "Issue", "state": "open"}]"#;

        let compressed = compress_data(original).unwrap();
        let decompressed = decompress_data(&compressed).unwrap();

        assert_eq!(decompressed, original);
    }

    #[test]
    fn test_compress_empty() {
        let compressed = compress_data(b"").unwrap();
        let decompressed = decompress_data(&compressed).unwrap();
        assert!(decompressed.is_empty());
    }

    #[test]
    fn test_repetitive_payload_shrinks() {
        let mut original = Vec::new();
        for number in 0..500 {
            original.extend_from_slice(
                format!(r#"{{"number": {}, "state": "open"}}"#, number).as_bytes(),
            );
        }

        let compressed = compress_data(&original).unwrap();
        assert!(compressed.len() < original.len() / 2);
    }
}
