//! Byte compressors used as compressibility estimators.
//!
//! A bit string that a general purpose compressor can shrink has structure;
//! one that it cannot is indistinguishable from noise to that compressor.
//! zstd, lz4 and lzma link native code and sit behind the
//! `native-compression` feature.

use crate::core::bits::BitString;
use crate::core::errors::{BitError, NotFoundError, Result};
use serde::Serialize;
use std::fmt;
use std::io::{Read, Write};
use std::str::FromStr;

/// Supported compression algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    Gzip,
    Zstd,
    Brotli,
    Lz4,
    Snappy,
    Lzma,
}

impl CompressionAlgorithm {
    pub const ALL: [CompressionAlgorithm; 6] = [
        CompressionAlgorithm::Gzip,
        CompressionAlgorithm::Zstd,
        CompressionAlgorithm::Brotli,
        CompressionAlgorithm::Lz4,
        CompressionAlgorithm::Snappy,
        CompressionAlgorithm::Lzma,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionAlgorithm::Gzip => "gzip",
            CompressionAlgorithm::Zstd => "zstd",
            CompressionAlgorithm::Brotli => "brotli",
            CompressionAlgorithm::Lz4 => "lz4",
            CompressionAlgorithm::Snappy => "snappy",
            CompressionAlgorithm::Lzma => "lzma",
        }
    }

    /// Whether this build can run the algorithm.
    pub fn is_available(&self) -> bool {
        match self {
            CompressionAlgorithm::Zstd | CompressionAlgorithm::Lz4 | CompressionAlgorithm::Lzma => {
                cfg!(feature = "native-compression")
            }
            _ => true,
        }
    }

    /// Algorithms usable in this build.
    pub fn available() -> Vec<CompressionAlgorithm> {
        Self::ALL.into_iter().filter(|a| a.is_available()).collect()
    }

    /// Level used when neither the caller nor the config names one.
    pub fn default_level(&self) -> u32 {
        match self {
            CompressionAlgorithm::Gzip
            | CompressionAlgorithm::Brotli
            | CompressionAlgorithm::Lzma => 6,
            CompressionAlgorithm::Zstd => 3,
            CompressionAlgorithm::Lz4 | CompressionAlgorithm::Snappy => 0,
        }
    }
}

impl fmt::Display for CompressionAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompressionAlgorithm {
    type Err = NotFoundError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gzip" | "gz" => Ok(CompressionAlgorithm::Gzip),
            "zstd" | "zst" => Ok(CompressionAlgorithm::Zstd),
            "brotli" | "br" => Ok(CompressionAlgorithm::Brotli),
            "lz4" => Ok(CompressionAlgorithm::Lz4),
            "snappy" | "snap" => Ok(CompressionAlgorithm::Snappy),
            "lzma" | "xz" => Ok(CompressionAlgorithm::Lzma),
            _ => {
                let names: Vec<&str> = Self::ALL.iter().map(|a| a.as_str()).collect();
                Err(NotFoundError::with_candidates("compression algorithm", s, &names))
            }
        }
    }
}

/// Result of compressing a bit string's packed bytes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompressionEstimate {
    pub algorithm: CompressionAlgorithm,
    pub original_bytes: usize,
    pub compressed_bytes: usize,
    /// `compressed_bytes / original_bytes`; below 1.0 means the input shrank
    pub ratio: f64,
}

/// Compress the packed bit string and report the size ratio.
pub fn estimate(
    bits: &BitString,
    algorithm: CompressionAlgorithm,
    level: u32,
) -> Result<CompressionEstimate> {
    if bits.is_empty() {
        return Err(BitError::EmptyInput);
    }
    let data = bits.to_bytes();
    let compressed = compress(&data, algorithm, level)?;
    Ok(CompressionEstimate {
        algorithm,
        original_bytes: data.len(),
        compressed_bytes: compressed.len(),
        ratio: compressed.len() as f64 / data.len() as f64,
    })
}

/// [`estimate`] for every available algorithm at its default level.
pub fn estimate_all(bits: &BitString) -> Result<Vec<CompressionEstimate>> {
    CompressionAlgorithm::available()
        .into_iter()
        .map(|algorithm| estimate(bits, algorithm, algorithm.default_level()))
        .collect()
}

/// Compress data using the specified algorithm and level.
pub fn compress(data: &[u8], algorithm: CompressionAlgorithm, level: u32) -> Result<Vec<u8>> {
    log::debug!("compressing {} bytes with {} level {}", data.len(), algorithm, level);
    match algorithm {
        CompressionAlgorithm::Gzip => compress_gzip(data, level),
        CompressionAlgorithm::Zstd => compress_zstd(data, level),
        CompressionAlgorithm::Brotli => compress_brotli(data, level),
        CompressionAlgorithm::Lz4 => compress_lz4(data, level),
        CompressionAlgorithm::Snappy => compress_snappy(data, level),
        CompressionAlgorithm::Lzma => compress_lzma(data, level),
    }
}

/// Decompress data using the specified algorithm.
pub fn decompress(data: &[u8], algorithm: CompressionAlgorithm) -> Result<Vec<u8>> {
    match algorithm {
        CompressionAlgorithm::Gzip => decompress_gzip(data),
        CompressionAlgorithm::Zstd => decompress_zstd(data),
        CompressionAlgorithm::Brotli => decompress_brotli(data),
        CompressionAlgorithm::Lz4 => decompress_lz4(data),
        CompressionAlgorithm::Snappy => decompress_snappy(data),
        CompressionAlgorithm::Lzma => decompress_lzma(data),
    }
}

#[cfg(not(feature = "native-compression"))]
fn unavailable(algorithm: CompressionAlgorithm) -> BitError {
    BitError::Compression(format!(
        "{} support requires the native-compression feature",
        algorithm
    ))
}

fn compress_gzip(data: &[u8], level: u32) -> Result<Vec<u8>> {
    use flate2::Compression;
    use flate2::write::GzEncoder;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level.min(9)));
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

fn decompress_gzip(data: &[u8]) -> Result<Vec<u8>> {
    use flate2::read::GzDecoder;

    let mut decoder = GzDecoder::new(data);
    let mut result = Vec::new();
    decoder.read_to_end(&mut result)?;
    Ok(result)
}

#[cfg(feature = "native-compression")]
fn compress_zstd(data: &[u8], level: u32) -> Result<Vec<u8>> {
    Ok(zstd::encode_all(data, level as i32)?)
}

#[cfg(not(feature = "native-compression"))]
fn compress_zstd(_data: &[u8], _level: u32) -> Result<Vec<u8>> {
    Err(unavailable(CompressionAlgorithm::Zstd))
}

#[cfg(feature = "native-compression")]
fn decompress_zstd(data: &[u8]) -> Result<Vec<u8>> {
    Ok(zstd::decode_all(data)?)
}

#[cfg(not(feature = "native-compression"))]
fn decompress_zstd(_data: &[u8]) -> Result<Vec<u8>> {
    Err(unavailable(CompressionAlgorithm::Zstd))
}

fn compress_brotli(data: &[u8], level: u32) -> Result<Vec<u8>> {
    let mut result = Vec::new();
    let mut reader = brotli::CompressorReader::new(data, 4096, level.min(11), 22);
    reader.read_to_end(&mut result)?;
    Ok(result)
}

fn decompress_brotli(data: &[u8]) -> Result<Vec<u8>> {
    let mut result = Vec::new();
    let mut reader = brotli::Decompressor::new(data, 4096);
    reader.read_to_end(&mut result)?;
    Ok(result)
}

// LZ4 block format has no levels; the size prefix lets decompress size its buffer.
#[cfg(feature = "native-compression")]
fn compress_lz4(data: &[u8], _level: u32) -> Result<Vec<u8>> {
    Ok(lz4::block::compress(data, None, true)?)
}

#[cfg(not(feature = "native-compression"))]
fn compress_lz4(_data: &[u8], _level: u32) -> Result<Vec<u8>> {
    Err(unavailable(CompressionAlgorithm::Lz4))
}

#[cfg(feature = "native-compression")]
fn decompress_lz4(data: &[u8]) -> Result<Vec<u8>> {
    Ok(lz4::block::decompress(data, None)?)
}

#[cfg(not(feature = "native-compression"))]
fn decompress_lz4(_data: &[u8]) -> Result<Vec<u8>> {
    Err(unavailable(CompressionAlgorithm::Lz4))
}

fn compress_snappy(data: &[u8], _level: u32) -> Result<Vec<u8>> {
    let mut encoder = snap::raw::Encoder::new();
    encoder
        .compress_vec(data)
        .map_err(|e| BitError::Compression(e.to_string()))
}

fn decompress_snappy(data: &[u8]) -> Result<Vec<u8>> {
    let mut decoder = snap::raw::Decoder::new();
    decoder
        .decompress_vec(data)
        .map_err(|e| BitError::Compression(e.to_string()))
}

#[cfg(feature = "native-compression")]
fn compress_lzma(data: &[u8], level: u32) -> Result<Vec<u8>> {
    use xz2::write::XzEncoder;

    let mut encoder = XzEncoder::new(Vec::new(), level.min(9));
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

#[cfg(not(feature = "native-compression"))]
fn compress_lzma(_data: &[u8], _level: u32) -> Result<Vec<u8>> {
    Err(unavailable(CompressionAlgorithm::Lzma))
}

#[cfg(feature = "native-compression")]
fn decompress_lzma(data: &[u8]) -> Result<Vec<u8>> {
    use xz2::read::XzDecoder;

    let mut decoder = XzDecoder::new(data);
    let mut result = Vec::new();
    decoder.read_to_end(&mut result)?;
    Ok(result)
}

#[cfg(not(feature = "native-compression"))]
fn decompress_lzma(_data: &[u8]) -> Result<Vec<u8>> {
    Err(unavailable(CompressionAlgorithm::Lzma))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_available_algorithms_round_trip() {
        let data = b"bitlab bitlab bitlab bitlab bitlab bitlab";
        for algorithm in CompressionAlgorithm::available() {
            let level = algorithm.default_level();
            let compressed = compress(data, algorithm, level).unwrap();
            let decompressed = decompress(&compressed, algorithm).unwrap();
            assert_eq!(decompressed, data, "{}", algorithm);
        }
    }

    #[test]
    fn test_constant_input_compresses_well() {
        let zeros = BitString::from(vec![false; 8 * 4096]);
        let estimate = estimate(&zeros, CompressionAlgorithm::Gzip, 6).unwrap();
        assert_eq!(estimate.original_bytes, 4096);
        assert!(estimate.ratio < 0.05, "ratio {}", estimate.ratio);
    }

    #[test]
    fn test_random_input_does_not_compress() {
        let noise = crate::generator::Generator::Random {
            len: 8 * 4096,
            seed: Some(11),
        }
        .generate()
        .unwrap();
        let estimate = estimate(&noise, CompressionAlgorithm::Gzip, 9).unwrap();
        assert!(estimate.ratio > 0.98, "ratio {}", estimate.ratio);
    }

    #[test]
    fn test_estimate_all_and_empty() {
        let bits = BitString::from_bytes(b"aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
        let estimates = estimate_all(&bits).unwrap();
        assert_eq!(estimates.len(), CompressionAlgorithm::available().len());
        assert!(matches!(
            estimate(&BitString::new(), CompressionAlgorithm::Gzip, 6),
            Err(BitError::EmptyInput)
        ));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("xz".parse::<CompressionAlgorithm>().unwrap(), CompressionAlgorithm::Lzma);
        let err = "gzp".parse::<CompressionAlgorithm>().unwrap_err();
        assert_eq!(err.suggestion.as_deref(), Some("gzip"));
    }
}
