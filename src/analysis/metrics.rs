//! Statistical measures over bit strings.
//!
//! All functions are pure and total: empty input yields zeros (or `None`
//! where a statistic is undefined) instead of NaN.

use crate::core::bits::BitString;
use crate::core::errors::{BitError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

fn binary_entropy(p: f64) -> f64 {
    if p <= 0.0 || p >= 1.0 {
        return 0.0;
    }
    -(p * p.log2() + (1.0 - p) * (1.0 - p).log2())
}

/// Shannon entropy of the 0/1 distribution, in bits per bit (0.0..=1.0).
pub fn entropy(bits: &BitString) -> f64 {
    if bits.is_empty() {
        return 0.0;
    }
    binary_entropy(balance(bits))
}

fn check_block_size(k: usize) -> Result<()> {
    if !(1..=16).contains(&k) {
        return Err(BitError::invalid_parameter(format!(
            "block size must be 1..=16 bits, got {}",
            k
        )));
    }
    Ok(())
}

fn block_counts(bits: &BitString, k: usize) -> Vec<usize> {
    let mut counts = vec![0usize; 1 << k];
    for chunk in bits.as_slice().chunks_exact(k) {
        let value = chunk.iter().fold(0usize, |acc, &b| (acc << 1) | b as usize);
        counts[value] += 1;
    }
    counts
}

/// Shannon entropy over non-overlapping `k`-bit blocks, in bits per block.
///
/// A trailing partial block is ignored.
pub fn block_entropy(bits: &BitString, k: usize) -> Result<f64> {
    check_block_size(k)?;
    let counts = block_counts(bits, k);
    let total: usize = counts.iter().sum();
    if total == 0 {
        return Ok(0.0);
    }
    let total = total as f64;
    Ok(counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum())
}

/// [`block_entropy`] divided by `k`, so 1.0 means uniform blocks.
pub fn normalized_block_entropy(bits: &BitString, k: usize) -> Result<f64> {
    Ok(block_entropy(bits, k)? / k as f64)
}

/// Fraction of ones.
pub fn balance(bits: &BitString) -> f64 {
    if bits.is_empty() {
        return 0.0;
    }
    bits.ones() as f64 / bits.len() as f64
}

/// Number of adjacent positions holding different bits.
pub fn transitions(bits: &BitString) -> usize {
    bits.as_slice().windows(2).filter(|w| w[0] != w[1]).count()
}

/// A maximal run of equal bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Run {
    pub bit: bool,
    pub start: usize,
    pub len: usize,
}

pub fn runs(bits: &BitString) -> Vec<Run> {
    let mut start = 0;
    bits.as_slice()
        .chunk_by(|a, b| a == b)
        .map(|chunk| {
            let run = Run {
                bit: chunk[0],
                start,
                len: chunk.len(),
            };
            start += chunk.len();
            run
        })
        .collect()
}

/// Summary of the run-length distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunStats {
    pub count: usize,
    pub longest_zero: usize,
    pub longest_one: usize,
    pub mean_length: f64,
    /// Run length → number of runs with that length
    pub histogram: BTreeMap<usize, usize>,
}

pub fn run_stats(bits: &BitString) -> RunStats {
    let all = runs(bits);
    let mut histogram = BTreeMap::new();
    let (mut longest_zero, mut longest_one) = (0, 0);
    for run in &all {
        *histogram.entry(run.len).or_insert(0) += 1;
        if run.bit {
            longest_one = longest_one.max(run.len);
        } else {
            longest_zero = longest_zero.max(run.len);
        }
    }
    let mean_length = if all.is_empty() {
        0.0
    } else {
        bits.len() as f64 / all.len() as f64
    };
    RunStats {
        count: all.len(),
        longest_zero,
        longest_one,
        mean_length,
        histogram,
    }
}

/// Autocorrelation at `lag` with bits mapped to ±1.
///
/// The mean of `x[i] * x[i + lag]` over the `n - lag` aligned pairs:
/// 1.0 for a string that repeats with period `lag`, -1.0 for one that
/// inverts. Returns 0.0 when there are no pairs.
pub fn autocorrelation(bits: &BitString, lag: usize) -> f64 {
    let n = bits.len();
    if lag >= n {
        return 0.0;
    }
    let s = bits.as_slice();
    let sum: i64 = (0..n - lag)
        .map(|i| if s[i] == s[i + lag] { 1 } else { -1 })
        .sum();
    sum as f64 / (n - lag) as f64
}

/// Autocorrelation for lags `1..=max_lag`.
pub fn autocorrelation_series(bits: &BitString, max_lag: usize) -> Vec<f64> {
    (1..=max_lag).map(|lag| autocorrelation(bits, lag)).collect()
}

/// Monobit chi-square statistic (one degree of freedom).
pub fn chi_square(bits: &BitString) -> f64 {
    if bits.is_empty() {
        return 0.0;
    }
    let diff = bits.ones() as f64 - bits.zeros() as f64;
    diff * diff / bits.len() as f64
}

/// Chi-square over the `2^k` patterns of non-overlapping `k`-bit blocks.
pub fn chi_square_blocks(bits: &BitString, k: usize) -> Result<f64> {
    check_block_size(k)?;
    let counts = block_counts(bits, k);
    let total: usize = counts.iter().sum();
    if total == 0 {
        return Ok(0.0);
    }
    let expected = total as f64 / counts.len() as f64;
    Ok(counts
        .iter()
        .map(|&c| {
            let d = c as f64 - expected;
            d * d / expected
        })
        .sum())
}

/// Wald-Wolfowitz runs test result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunsTest {
    pub runs: usize,
    pub expected: f64,
    pub variance: f64,
    pub z: f64,
    /// Two-sided p-value under the normal approximation
    pub p_value: f64,
}

/// Runs test. `None` when fewer than two bits or only one symbol is present.
pub fn runs_test(bits: &BitString) -> Option<RunsTest> {
    let n = bits.len();
    let n1 = bits.zeros() as f64;
    let n2 = bits.ones() as f64;
    if n < 2 || n1 == 0.0 || n2 == 0.0 {
        return None;
    }
    let n = n as f64;
    let observed = transitions(bits) + 1;
    let expected = 2.0 * n1 * n2 / n + 1.0;
    let variance = 2.0 * n1 * n2 * (2.0 * n1 * n2 - n) / (n * n * (n - 1.0));
    if variance <= 0.0 {
        return None;
    }
    let z = (observed as f64 - expected) / variance.sqrt();
    let p_value = libm::erfc(z.abs() / std::f64::consts::SQRT_2);
    Some(RunsTest {
        runs: observed,
        expected,
        variance,
        z,
        p_value,
    })
}

/// Lempel-Ziv (1976) complexity: the number of phrases in the exhaustive
/// parsing, computed with the Kaspar-Schuster scan.
pub fn lempel_ziv_complexity(bits: &BitString) -> usize {
    let s = bits.as_slice();
    let n = s.len();
    if n < 2 {
        return n;
    }

    let mut complexity = 1;
    let mut prefix_len = 1;
    let mut i = 0;
    let mut k = 1;
    let mut k_max = 1;
    loop {
        if s[i + k - 1] == s[prefix_len + k - 1] {
            k += 1;
            if prefix_len + k > n {
                complexity += 1;
                break;
            }
        } else {
            k_max = k_max.max(k);
            i += 1;
            if i == prefix_len {
                complexity += 1;
                prefix_len += k_max;
                if prefix_len + 1 > n {
                    break;
                }
                i = 0;
                k = 1;
                k_max = 1;
            } else {
                k = 1;
            }
        }
    }
    complexity
}

/// LZ complexity scaled by `log2(n) / n`; close to 1.0 for random input.
pub fn normalized_lz_complexity(bits: &BitString) -> f64 {
    let n = bits.len();
    if n < 2 {
        return 0.0;
    }
    let n = n as f64;
    lempel_ziv_complexity(bits) as f64 * n.log2() / n
}
