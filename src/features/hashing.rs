//! Digests of packed bit strings.
//!
//! Bits are packed MSB first with the last byte zero padded, the same bytes
//! `bitlab compress` and binary output see.

use crate::core::bits::BitString;
use crate::core::errors::NotFoundError;
use blake2::Blake2b512;
use blake3::Hasher as Blake3Hasher;
use md5::Md5;
use sha2::{Digest, Sha256, Sha512};
use sha3::Sha3_256;
use std::fmt;
use std::hash::Hasher;
use std::str::FromStr;
use twox_hash::{XxHash3_64, XxHash64};

/// Digest algorithms offered by `bitlab digest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Md5,
    Sha256,
    Sha512,
    Sha3_256,
    Blake2b,
    Blake3,
    XxHash64,
    XxHash3,
    Crc32,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 9] = [
        HashAlgorithm::Md5,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha512,
        HashAlgorithm::Sha3_256,
        HashAlgorithm::Blake2b,
        HashAlgorithm::Blake3,
        HashAlgorithm::XxHash64,
        HashAlgorithm::XxHash3,
        HashAlgorithm::Crc32,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Md5 => "md5",
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Sha512 => "sha512",
            HashAlgorithm::Sha3_256 => "sha3-256",
            HashAlgorithm::Blake2b => "blake2b",
            HashAlgorithm::Blake3 => "blake3",
            HashAlgorithm::XxHash64 => "xxh64",
            HashAlgorithm::XxHash3 => "xxh3",
            HashAlgorithm::Crc32 => "crc32",
        }
    }

    /// Output size in bytes.
    pub fn output_size(&self) -> usize {
        match self {
            HashAlgorithm::Md5 => 16,
            HashAlgorithm::Sha256 | HashAlgorithm::Sha3_256 | HashAlgorithm::Blake3 => 32,
            HashAlgorithm::Sha512 | HashAlgorithm::Blake2b => 64,
            HashAlgorithm::XxHash64 | HashAlgorithm::XxHash3 => 8,
            HashAlgorithm::Crc32 => 4,
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = NotFoundError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md5" => Ok(HashAlgorithm::Md5),
            "sha256" | "sha-256" => Ok(HashAlgorithm::Sha256),
            "sha512" | "sha-512" => Ok(HashAlgorithm::Sha512),
            "sha3-256" | "sha3_256" => Ok(HashAlgorithm::Sha3_256),
            "blake2b" | "blake2b-512" => Ok(HashAlgorithm::Blake2b),
            "blake3" => Ok(HashAlgorithm::Blake3),
            "xxh64" | "xxhash64" => Ok(HashAlgorithm::XxHash64),
            "xxh3" | "xxhash3" | "xxh3-64" => Ok(HashAlgorithm::XxHash3),
            "crc32" => Ok(HashAlgorithm::Crc32),
            _ => {
                let names: Vec<&str> = Self::ALL.iter().map(|a| a.as_str()).collect();
                Err(NotFoundError::with_candidates("digest", s, &names))
            }
        }
    }
}

/// Hash raw bytes.
pub fn hash(data: &[u8], algorithm: HashAlgorithm) -> Vec<u8> {
    match algorithm {
        HashAlgorithm::Md5 => Md5::digest(data).to_vec(),
        HashAlgorithm::Sha256 => Sha256::digest(data).to_vec(),
        HashAlgorithm::Sha512 => Sha512::digest(data).to_vec(),
        HashAlgorithm::Sha3_256 => Sha3_256::digest(data).to_vec(),
        HashAlgorithm::Blake2b => Blake2b512::digest(data).to_vec(),
        HashAlgorithm::Blake3 => {
            let mut hasher = Blake3Hasher::new();
            hasher.update(data);
            hasher.finalize().as_bytes().to_vec()
        }
        HashAlgorithm::XxHash64 => {
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(data);
            hasher.finish().to_be_bytes().to_vec()
        }
        HashAlgorithm::XxHash3 => {
            let mut hasher = XxHash3_64::with_seed(0);
            hasher.write(data);
            hasher.finish().to_be_bytes().to_vec()
        }
        HashAlgorithm::Crc32 => {
            let crc = crc::Crc::<u32>::new(&crc::CRC_32_ISO_HDLC);
            crc.checksum(data).to_be_bytes().to_vec()
        }
    }
}

/// Hash a bit string's packed bytes.
pub fn digest(bits: &BitString, algorithm: HashAlgorithm) -> Vec<u8> {
    hash(&bits.to_bytes(), algorithm)
}

/// Content fingerprint: xxh3-64 over the packed bytes and the bit length.
///
/// The length is mixed in so `1` and `10` (both `0x80` packed) differ.
pub fn fingerprint(bits: &BitString) -> u64 {
    let mut hasher = XxHash3_64::with_seed(0);
    hasher.write(&bits.to_bytes());
    hasher.write(&(bits.len() as u64).to_le_bytes());
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_digests() {
        let data = b"hello world";
        assert_eq!(
            hex::encode(hash(data, HashAlgorithm::Md5)),
            "5eb63bbbe01eeed093cb22bb8f5acdc3"
        );
        assert_eq!(
            hex::encode(hash(data, HashAlgorithm::Sha256)),
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
        assert_eq!(
            hex::encode(hash(b"123456789", HashAlgorithm::Crc32)),
            "cbf43926"
        );
    }

    #[test]
    fn test_output_sizes() {
        for algorithm in HashAlgorithm::ALL {
            assert_eq!(
                hash(b"bits", algorithm).len(),
                algorithm.output_size(),
                "{}",
                algorithm
            );
        }
    }

    #[test]
    fn test_digest_uses_packed_bytes() {
        let bits = BitString::from_bytes(b"hello world");
        assert_eq!(
            digest(&bits, HashAlgorithm::Sha256),
            hash(b"hello world", HashAlgorithm::Sha256)
        );
    }

    #[test]
    fn test_fingerprint_includes_length() {
        let one = BitString::parse("1").unwrap();
        let one_zero = BitString::parse("10").unwrap();
        assert_eq!(one.to_bytes(), one_zero.to_bytes());
        assert_ne!(fingerprint(&one), fingerprint(&one_zero));
        assert_eq!(fingerprint(&one), fingerprint(&BitString::parse("1").unwrap()));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("SHA-256".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha256);
        assert_eq!("xxhash3".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::XxHash3);
        let err = "sha265".parse::<HashAlgorithm>().unwrap_err();
        assert_eq!(err.suggestion.as_deref(), Some("sha256"));
    }
}
