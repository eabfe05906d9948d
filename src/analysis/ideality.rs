//! How closely a bit string matches an ideal random source.
//!
//! In an unbiased memoryless source a run has length `k` with probability
//! `2^-k`, the 0/1 balance is one half and autocorrelation vanishes at every
//! lag. Each component below is scaled to `0.0..=1.0`, where 1.0 is ideal.

use crate::analysis::metrics::{autocorrelation, balance, entropy, run_stats};
use crate::core::bits::BitString;
use crate::core::config::IdealityWeights;
use crate::core::errors::{BitError, Result};
use serde::Serialize;

/// Observed versus ideal share of runs of one length.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunIdeality {
    pub length: usize,
    pub observed: f64,
    pub expected: f64,
    pub deviation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdealityReport {
    /// Weighted mean of the components, 0..=100
    pub score: f64,
    pub entropy: f64,
    pub balance: f64,
    pub runs: f64,
    pub autocorrelation: f64,
    pub per_length: Vec<RunIdeality>,
}

/// Per-length run shares for lengths `1..=longest run`.
pub fn run_length_ideality(bits: &BitString) -> Vec<RunIdeality> {
    let stats = run_stats(bits);
    if stats.count == 0 {
        return Vec::new();
    }
    let longest = stats.longest_one.max(stats.longest_zero);
    (1..=longest)
        .map(|length| {
            let count = stats.histogram.get(&length).copied().unwrap_or(0);
            let observed = count as f64 / stats.count as f64;
            let expected = 0.5f64.powi(length as i32);
            RunIdeality {
                length,
                observed,
                expected,
                deviation: observed - expected,
            }
        })
        .collect()
}

/// `1 - total variation distance` between the observed run-length
/// distribution and the geometric ideal. The ideal mass beyond the longest
/// observed run counts as missing.
pub fn run_component(per_length: &[RunIdeality]) -> f64 {
    let Some(last) = per_length.last() else {
        return 0.0;
    };
    let tail = 0.5f64.powi(last.length as i32);
    let distance: f64 = per_length.iter().map(|r| r.deviation.abs()).sum::<f64>() + tail;
    (1.0 - distance / 2.0).clamp(0.0, 1.0)
}

pub fn balance_component(bits: &BitString) -> f64 {
    if bits.is_empty() {
        return 0.0;
    }
    1.0 - (2.0 * balance(bits) - 1.0).abs()
}

/// `1 - mean |r(lag)|` over lags `1..=max_lag` that fit in the string.
pub fn autocorrelation_component(bits: &BitString, max_lag: usize) -> f64 {
    let lags = max_lag.min(bits.len().saturating_sub(1));
    if lags == 0 {
        return 0.0;
    }
    let mean = (1..=lags)
        .map(|lag| autocorrelation(bits, lag).abs())
        .sum::<f64>()
        / lags as f64;
    (1.0 - mean).clamp(0.0, 1.0)
}

pub fn ideality(
    bits: &BitString,
    max_lag: usize,
    weights: &IdealityWeights,
) -> Result<IdealityReport> {
    let components = [
        weights.entropy,
        weights.balance,
        weights.runs,
        weights.autocorrelation,
    ];
    if components.iter().any(|w| *w < 0.0) {
        return Err(BitError::invalid_parameter("ideality weights must not be negative"));
    }
    let total_weight: f64 = components.iter().sum();
    if total_weight <= 0.0 {
        return Err(BitError::invalid_parameter(
            "at least one ideality weight must be positive",
        ));
    }

    let per_length = run_length_ideality(bits);
    let entropy = entropy(bits);
    let balance = balance_component(bits);
    let runs = run_component(&per_length);
    let autocorrelation = autocorrelation_component(bits, max_lag);

    let weighted = entropy * weights.entropy
        + balance * weights.balance
        + runs * weights.runs
        + autocorrelation * weights.autocorrelation;

    Ok(IdealityReport {
        score: 100.0 * weighted / total_weight,
        entropy,
        balance,
        runs,
        autocorrelation,
        per_length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::Generator;
    use approx::assert_relative_eq;

    fn bits(s: &str) -> BitString {
        BitString::parse(s).unwrap()
    }

    #[test]
    fn test_run_length_shares() {
        // runs: 0, 11, 0, 1 -> lengths 1,2,1,1
        let per_length = run_length_ideality(&bits("01101"));
        assert_eq!(per_length.len(), 2);
        assert_relative_eq!(per_length[0].observed, 0.75);
        assert_relative_eq!(per_length[0].expected, 0.5);
        assert_relative_eq!(per_length[1].observed, 0.25);
        // |0.75-0.5| + |0.25-0.25| + tail 0.25 = 0.5 -> 1 - 0.25
        assert_relative_eq!(run_component(&per_length), 0.75);
    }

    #[test]
    fn test_constant_input_scores_low() {
        let report = ideality(
            &BitString::from(vec![true; 256]),
            8,
            &IdealityWeights::default(),
        )
        .unwrap();
        assert_eq!(report.entropy, 0.0);
        assert_eq!(report.balance, 0.0);
        assert_eq!(report.autocorrelation, 0.0);
        assert!(report.score < 1.0);
    }

    #[test]
    fn test_alternating_input_has_perfect_balance_but_bad_runs() {
        let report = ideality(&bits(&"01".repeat(64)), 4, &IdealityWeights::default()).unwrap();
        assert_relative_eq!(report.balance, 1.0);
        assert_relative_eq!(report.entropy, 1.0);
        assert_eq!(report.autocorrelation, 0.0);
        assert_relative_eq!(report.runs, 0.5);
    }

    #[test]
    fn test_random_input_scores_high() {
        let data = Generator::Random {
            len: 1 << 14,
            seed: Some(7),
        }
        .generate()
        .unwrap();
        let report = ideality(&data, 16, &IdealityWeights::default()).unwrap();
        assert!(report.score > 90.0, "score {}", report.score);
    }

    #[test]
    fn test_weights_validated() {
        let zero = IdealityWeights {
            entropy: 0.0,
            balance: 0.0,
            runs: 0.0,
            autocorrelation: 0.0,
        };
        assert!(ideality(&bits("01"), 1, &zero).is_err());

        let entropy_only = IdealityWeights {
            entropy: 1.0,
            balance: 0.0,
            runs: 0.0,
            autocorrelation: 0.0,
        };
        let report = ideality(&bits("0101"), 1, &entropy_only).unwrap();
        assert_relative_eq!(report.score, 100.0);
    }
}
