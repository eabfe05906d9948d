//! Core types: bit strings, errors and configuration.

pub mod bits;
pub mod config;
pub mod errors;
