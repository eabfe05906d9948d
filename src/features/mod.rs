//! Byte-level views of bit strings.
//!
//! Compressibility estimates, digests and codec detection. These sit beside
//! the bit-level codecs in [`crate::encoders`] rather than inside them.

pub mod compression;
pub mod detection;
pub mod hashing;

pub use compression::{
    CompressionAlgorithm, CompressionEstimate, compress, decompress, estimate, estimate_all,
};
pub use detection::{CodecDetector, CodecMatch, detect_codec};
pub use hashing::{HashAlgorithm, digest, fingerprint, hash};
