//! Convenient re-exports for common usage.
//!
//! ```
//! use bitlab::prelude::*;
//!
//! let bits = Generator::Alternating { len: 8, start: false }.generate().unwrap();
//! assert_eq!(bits.to_string(), "01010101");
//! ```

pub use crate::{
    // Core
    BitError,
    BitString,
    // Codecs and operations
    Codec,
    // Detection
    CodecDetector,
    CompressionAlgorithm,
    Config,
    Generator,
    HashAlgorithm,
    // Files and playback
    LoadedFile,
    // Analysis
    Metric,
    MetricsCalculator,
    Operation,
    Player,
    Strategy,
    decode,
    detect_codec,
    digest,
    encode,
    metrics,
};
