pub mod analyze;
pub mod compress;
pub mod config;
pub mod decode;
pub mod detect;
pub mod digest;
pub mod encode;
pub mod generate;
pub mod partition;
pub mod preset;
pub mod radix;
pub mod strategy;
pub mod transform;
