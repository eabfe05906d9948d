//! One-stop statistics for a bit string.

use crate::analysis::ideality::{IdealityReport, ideality};
use crate::analysis::metrics::{self, RunStats, RunsTest};
use crate::core::bits::BitString;
use crate::core::config::{AnalysisSettings, Config, IdealityWeights};
use crate::core::errors::{BitError, NotFoundError, Result};
use crate::features::compression::{self, CompressionAlgorithm, CompressionEstimate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Everything `bitlab analyze` prints.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub length: usize,
    pub ones: usize,
    pub zeros: usize,
    pub balance: f64,
    pub entropy: f64,
    pub block_size: usize,
    pub block_entropy: f64,
    pub transitions: usize,
    pub runs: RunStats,
    /// Autocorrelation for lags `1..=max_lag`
    pub autocorrelation: Vec<f64>,
    pub chi_square: f64,
    pub chi_square_blocks: f64,
    pub runs_test: Option<RunsTest>,
    /// Runs test p-value at or above the configured significance
    pub runs_test_passed: Option<bool>,
    pub lz_complexity: usize,
    pub normalized_lz_complexity: f64,
    pub ideality: IdealityReport,
    /// gzip estimate; absent for empty input
    pub compression: Option<CompressionEstimate>,
}

/// Computes reports and scalar metrics with fixed settings.
#[derive(Debug, Clone)]
pub struct MetricsCalculator {
    settings: AnalysisSettings,
    weights: IdealityWeights,
    gzip_level: u32,
}

impl MetricsCalculator {
    pub fn new(settings: AnalysisSettings, weights: IdealityWeights) -> Result<Self> {
        if !(1..=16).contains(&settings.block_size) {
            return Err(BitError::invalid_parameter(format!(
                "analysis.block_size must be 1..=16, got {}",
                settings.block_size
            )));
        }
        if !(0.0..1.0).contains(&settings.significance) {
            return Err(BitError::invalid_parameter(format!(
                "analysis.significance must be within 0..1, got {}",
                settings.significance
            )));
        }
        let total = weights.entropy + weights.balance + weights.runs + weights.autocorrelation;
        if weights.entropy < 0.0
            || weights.balance < 0.0
            || weights.runs < 0.0
            || weights.autocorrelation < 0.0
            || total <= 0.0
        {
            return Err(BitError::invalid_parameter(
                "ideality weights must be non-negative with a positive sum",
            ));
        }
        Ok(Self {
            settings,
            weights,
            gzip_level: CompressionAlgorithm::Gzip.default_level(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let mut calculator = Self::new(config.analysis.clone(), config.ideality.clone())?;
        if let Some(level) = config.compression_level("gzip") {
            calculator.gzip_level = level;
        }
        Ok(calculator)
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn report(&self, bits: &BitString) -> Result<MetricsReport> {
        let block_size = self.settings.block_size;
        let runs_test = metrics::runs_test(bits);
        let runs_test_passed = runs_test
            .as_ref()
            .map(|t| t.p_value >= self.settings.significance);
        let compression = if bits.is_empty() {
            None
        } else {
            Some(compression::estimate(
                bits,
                CompressionAlgorithm::Gzip,
                self.gzip_level,
            )?)
        };

        Ok(MetricsReport {
            length: bits.len(),
            ones: bits.ones(),
            zeros: bits.zeros(),
            balance: metrics::balance(bits),
            entropy: metrics::entropy(bits),
            block_size,
            block_entropy: metrics::block_entropy(bits, block_size)?,
            transitions: metrics::transitions(bits),
            runs: metrics::run_stats(bits),
            autocorrelation: metrics::autocorrelation_series(bits, self.settings.max_lag),
            chi_square: metrics::chi_square(bits),
            chi_square_blocks: metrics::chi_square_blocks(bits, block_size)?,
            runs_test,
            runs_test_passed,
            lz_complexity: metrics::lempel_ziv_complexity(bits),
            normalized_lz_complexity: metrics::normalized_lz_complexity(bits),
            ideality: self.ideality(bits)?,
            compression,
        })
    }

    pub fn ideality(&self, bits: &BitString) -> Result<IdealityReport> {
        ideality(bits, self.settings.max_lag, &self.weights)
    }

    /// gzip compressed size over packed size.
    pub fn compression_ratio(&self, bits: &BitString) -> Result<f64> {
        Ok(compression::estimate(bits, CompressionAlgorithm::Gzip, self.gzip_level)?.ratio)
    }
}

/// Scalar metrics usable for strategy scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Length,
    Ones,
    Entropy,
    BlockEntropy,
    Balance,
    Transitions,
    LongestRun,
    /// Lag-1 autocorrelation
    Autocorrelation,
    ChiSquare,
    /// Absolute runs test z-score
    RunsZ,
    /// Normalized Lempel-Ziv complexity
    LzComplexity,
    Ideality,
    CompressionRatio,
}

impl Metric {
    pub const ALL: [Metric; 13] = [
        Metric::Length,
        Metric::Ones,
        Metric::Entropy,
        Metric::BlockEntropy,
        Metric::Balance,
        Metric::Transitions,
        Metric::LongestRun,
        Metric::Autocorrelation,
        Metric::ChiSquare,
        Metric::RunsZ,
        Metric::LzComplexity,
        Metric::Ideality,
        Metric::CompressionRatio,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Length => "length",
            Metric::Ones => "ones",
            Metric::Entropy => "entropy",
            Metric::BlockEntropy => "block_entropy",
            Metric::Balance => "balance",
            Metric::Transitions => "transitions",
            Metric::LongestRun => "longest_run",
            Metric::Autocorrelation => "autocorrelation",
            Metric::ChiSquare => "chi_square",
            Metric::RunsZ => "runs_z",
            Metric::LzComplexity => "lz_complexity",
            Metric::Ideality => "ideality",
            Metric::CompressionRatio => "compression_ratio",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Metric::Length => "number of bits",
            Metric::Ones => "number of 1 bits",
            Metric::Entropy => "Shannon entropy per bit",
            Metric::BlockEntropy => "entropy per bit over analysis.block_size blocks",
            Metric::Balance => "fraction of 1 bits",
            Metric::Transitions => "adjacent unequal bit pairs",
            Metric::LongestRun => "longest run of equal bits",
            Metric::Autocorrelation => "lag-1 autocorrelation",
            Metric::ChiSquare => "monobit chi-square",
            Metric::RunsZ => "absolute Wald-Wolfowitz z-score",
            Metric::LzComplexity => "normalized Lempel-Ziv complexity",
            Metric::Ideality => "ideality score 0..100",
            Metric::CompressionRatio => "gzip compressed / packed size",
        }
    }

    /// Evaluate on `bits`. Fails where the metric is undefined (the runs
    /// test on constant input, compression ratio of nothing).
    pub fn evaluate(&self, bits: &BitString, calculator: &MetricsCalculator) -> Result<f64> {
        let value = match self {
            Metric::Length => bits.len() as f64,
            Metric::Ones => bits.ones() as f64,
            Metric::Entropy => metrics::entropy(bits),
            Metric::BlockEntropy => {
                metrics::normalized_block_entropy(bits, calculator.settings.block_size)?
            }
            Metric::Balance => metrics::balance(bits),
            Metric::Transitions => metrics::transitions(bits) as f64,
            Metric::LongestRun => {
                let stats = metrics::run_stats(bits);
                stats.longest_one.max(stats.longest_zero) as f64
            }
            Metric::Autocorrelation => metrics::autocorrelation(bits, 1),
            Metric::ChiSquare => metrics::chi_square(bits),
            Metric::RunsZ => {
                let test = metrics::runs_test(bits).ok_or_else(|| {
                    BitError::invalid_parameter(
                        "runs test is undefined for fewer than two bits or a single symbol",
                    )
                })?;
                test.z.abs()
            }
            Metric::LzComplexity => metrics::normalized_lz_complexity(bits),
            Metric::Ideality => calculator.ideality(bits)?.score,
            Metric::CompressionRatio => calculator.compression_ratio(bits)?,
        };
        Ok(value)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = NotFoundError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == normalized)
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|m| m.as_str()).collect();
                NotFoundError::with_candidates("metric", s, &names)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn calculator() -> MetricsCalculator {
        MetricsCalculator::new(AnalysisSettings::default(), IdealityWeights::default()).unwrap()
    }

    fn bits(s: &str) -> BitString {
        BitString::parse(s).unwrap()
    }

    #[test]
    fn test_report_fields() {
        let report = calculator().report(&bits("0011001100")).unwrap();
        assert_eq!(report.length, 10);
        assert_eq!(report.ones, 4);
        assert_eq!(report.zeros, 6);
        assert_eq!(report.transitions, 4);
        assert_eq!(report.runs.count, 5);
        assert_eq!(report.autocorrelation.len(), 16);
        assert!(report.runs_test.is_some());
        assert_eq!(report.runs_test_passed, Some(true));
        assert!(report.compression.is_some());
    }

    #[test]
    fn test_report_on_empty_input() {
        let report = calculator().report(&BitString::new()).unwrap();
        assert_eq!(report.length, 0);
        assert!(report.runs_test.is_none());
        assert!(report.compression.is_none());
    }

    #[test]
    fn test_report_serializes() {
        let report = calculator().report(&bits("0110100110010110")).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["length"], 16);
        assert!(json["ideality"]["score"].is_number());
    }

    #[test]
    fn test_invalid_settings() {
        let settings = AnalysisSettings {
            block_size: 0,
            ..Default::default()
        };
        assert!(MetricsCalculator::new(settings, IdealityWeights::default()).is_err());
    }

    #[test]
    fn test_metric_evaluate() {
        let calc = calculator();
        let input = bits("0101");
        assert_relative_eq!(Metric::Entropy.evaluate(&input, &calc).unwrap(), 1.0);
        assert_relative_eq!(Metric::Transitions.evaluate(&input, &calc).unwrap(), 3.0);
        assert_relative_eq!(Metric::Autocorrelation.evaluate(&input, &calc).unwrap(), -1.0);
        assert_relative_eq!(
            Metric::LongestRun.evaluate(&bits("0111001"), &calc).unwrap(),
            3.0
        );
        assert!(Metric::RunsZ.evaluate(&bits("1111"), &calc).is_err());
    }

    #[test]
    fn test_metric_names() {
        for metric in Metric::ALL {
            assert_eq!(metric.as_str().parse::<Metric>().unwrap(), metric);
        }
        assert_eq!("runs-z".parse::<Metric>().unwrap(), Metric::RunsZ);
        let err = "entropi".parse::<Metric>().unwrap_err();
        assert_eq!(err.suggestion.as_deref(), Some("entropy"));
    }
}
