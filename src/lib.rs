//! Bit string workbench.
//!
//! Generate bit strings, measure their statistics, run them through line
//! codes, error-correcting codes and bit-level compressors, and replay
//! scored transformation strategies step by step.
//!
//! # Example
//!
//! ```
//! use bitlab::prelude::*;
//!
//! let bits = BitString::parse("0110 1001").unwrap();
//! let encoded = encode(&bits, &Codec::Manchester).unwrap();
//! assert_eq!(decode(&encoded, &Codec::Manchester).unwrap(), bits);
//! assert_eq!(metrics::transitions(&bits), 5);
//! ```

pub mod analysis;
pub mod core;
pub mod encoders;
pub mod features;
pub mod generator;
pub mod ops;
pub mod prelude;
pub mod workspace;

pub use analysis::{IdealityReport, Metric, MetricsCalculator, MetricsReport, metrics};
pub use core::bits::{BitString, MAX_BITS};
pub use core::config::{AnalysisSettings, Config, IdealityWeights};
pub use core::errors::{BitError, NotFoundError, Result, find_closest};
pub use encoders::{CODEC_NAMES, Codec, decode, encode};
pub use features::{
    CodecDetector, CodecMatch, CompressionAlgorithm, CompressionEstimate, HashAlgorithm,
    detect_codec, digest, estimate, estimate_all, fingerprint,
};
pub use generator::{GENERATOR_NAMES, Generator, GeneratorParams};
pub use ops::{Operation, apply_all};
pub use workspace::{
    LoadedFile, Player, PlayerState, Preset, PresetManager, Strategy, StrategyManager,
    open_presets, open_strategies,
};
