//! Statistics and randomness measures.

pub mod calculator;
pub mod ideality;
pub mod metrics;

pub use calculator::{Metric, MetricsCalculator, MetricsReport};
pub use ideality::IdealityReport;
