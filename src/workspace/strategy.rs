//! Declarative transformation strategies.
//!
//! A strategy walks its `algorithm` (a list of operations) `passes` times.
//! After every step the configured metric scores the candidate, and the
//! policy decides whether the candidate replaces the current bits.

use crate::analysis::{Metric, MetricsCalculator};
use crate::core::bits::BitString;
use crate::core::errors::{BitError, Result};
use crate::ops::Operation;
use crate::workspace::builtin::BUILTIN_STRATEGIES;
use crate::workspace::store::{Catalog, Named};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Goal {
    Maximize,
    Minimize,
}

impl fmt::Display for Goal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Goal::Maximize => "maximize",
            Goal::Minimize => "minimize",
        })
    }
}

impl Goal {
    /// Signed improvement of `after` over `before`; positive is better.
    pub fn gain(&self, before: f64, after: f64) -> f64 {
        match self {
            Goal::Maximize => after - before,
            Goal::Minimize => before - after,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoring {
    pub metric: Metric,
    pub goal: Goal,
}

/// When a scored candidate is kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Policy {
    /// Keep every successful step
    Always,
    /// Keep only strict improvements
    Improve,
    /// Keep unless the score regresses by more than `max_regression`
    Tolerance { max_regression: f64 },
}

impl Policy {
    pub fn accepts(&self, goal: Goal, before: f64, after: f64) -> bool {
        match self {
            Policy::Always => true,
            Policy::Improve => goal.gain(before, after) > 0.0,
            Policy::Tolerance { max_regression } => goal.gain(before, after) >= -max_regression,
        }
    }
}

fn default_passes() -> usize {
    1
}

fn default_policy() -> Policy {
    Policy::Always
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Strategy {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub algorithm: Vec<Operation>,
    pub scoring: Scoring,
    #[serde(default = "default_policy")]
    pub policy: Policy,
    /// How many times the algorithm is walked
    #[serde(default = "default_passes")]
    pub passes: usize,
}

impl Named for Strategy {
    fn name(&self) -> &str {
        &self.name
    }
}

/// One executed strategy step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Zero-based step index
    pub index: usize,
    pub label: String,
    pub score_before: f64,
    /// Candidate score; absent when the operation or scoring failed
    pub score_after: Option<f64>,
    pub accepted: bool,
    pub error: Option<String>,
    /// Bits after the step: the candidate when accepted, otherwise unchanged
    pub bits: BitString,
}

impl Frame {
    /// Score carried forward to the next step.
    pub fn score(&self) -> f64 {
        match (self.accepted, self.score_after) {
            (true, Some(after)) => after,
            _ => self.score_before,
        }
    }
}

/// Result of running a strategy to completion.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyRun {
    pub strategy: String,
    pub initial_score: f64,
    pub final_score: f64,
    pub accepted: usize,
    pub frames: Vec<Frame>,
}

impl StrategyRun {
    /// Final bits (the input when there were no steps).
    pub fn bits(&self) -> Option<&BitString> {
        self.frames.last().map(|f| &f.bits)
    }
}

/// Upper bound on `algorithm.len() * passes`; every step keeps a frame.
pub const MAX_STEPS: usize = 1 << 16;

impl Strategy {
    pub fn validate(&self) -> Result<()> {
        if self.algorithm.is_empty() {
            return Err(BitError::invalid_parameter(format!(
                "strategy '{}' has no operations",
                self.name
            )));
        }
        if self.passes == 0 {
            return Err(BitError::invalid_parameter("passes must be at least 1"));
        }
        match self.algorithm.len().checked_mul(self.passes) {
            Some(steps) if steps <= MAX_STEPS => {}
            _ => {
                return Err(BitError::invalid_parameter(format!(
                    "{} operations x {} passes exceeds the {} step limit",
                    self.algorithm.len(),
                    self.passes,
                    MAX_STEPS
                )));
            }
        }
        if let Policy::Tolerance { max_regression } = self.policy
            && !(max_regression.is_finite() && max_regression >= 0.0)
        {
            return Err(BitError::invalid_parameter(
                "max_regression must be a finite non-negative number",
            ));
        }
        Ok(())
    }

    pub fn total_steps(&self) -> usize {
        self.algorithm.len().saturating_mul(self.passes)
    }

    pub fn score(&self, bits: &BitString, calculator: &MetricsCalculator) -> Result<f64> {
        self.scoring.metric.evaluate(bits, calculator)
    }

    /// Execute step `index` against `current`, whose score is `score_before`.
    ///
    /// Failures never propagate: a failing operation or an undefined score
    /// yields a rejected frame carrying the error text.
    pub fn step(
        &self,
        index: usize,
        current: &BitString,
        score_before: f64,
        calculator: &MetricsCalculator,
    ) -> Frame {
        let op = &self.algorithm[index % self.algorithm.len()];
        let rejected = |error: String| Frame {
            index,
            label: op.label(),
            score_before,
            score_after: None,
            accepted: false,
            error: Some(error),
            bits: current.clone(),
        };

        let candidate = match op.apply(current) {
            Ok(candidate) => candidate,
            Err(e) => {
                log::debug!("step {} ({}) failed: {}", index, op.label(), e);
                return rejected(e.to_string());
            }
        };
        let score_after = match self.score(&candidate, calculator) {
            Ok(score) => score,
            Err(e) => return rejected(e.to_string()),
        };

        let accepted = self
            .policy
            .accepts(self.scoring.goal, score_before, score_after);
        log::debug!(
            "step {} ({}): {:.4} -> {:.4} {}",
            index,
            op.label(),
            score_before,
            score_after,
            if accepted { "kept" } else { "rejected" }
        );
        Frame {
            index,
            label: op.label(),
            score_before,
            score_after: Some(score_after),
            accepted,
            error: None,
            bits: if accepted { candidate } else { current.clone() },
        }
    }

    /// Run every step and collect the frames.
    pub fn run(&self, bits: &BitString, calculator: &MetricsCalculator) -> Result<StrategyRun> {
        self.validate()?;
        let initial_score = self.score(bits, calculator)?;

        let mut frames: Vec<Frame> = Vec::with_capacity(self.total_steps());
        let mut current = bits.clone();
        let mut score = initial_score;
        for index in 0..self.total_steps() {
            let frame = self.step(index, &current, score, calculator);
            score = frame.score();
            current = frame.bits.clone();
            frames.push(frame);
        }

        Ok(StrategyRun {
            strategy: self.name.clone(),
            initial_score,
            final_score: score,
            accepted: frames.iter().filter(|f| f.accepted).count(),
            frames,
        })
    }
}

pub type StrategyManager = Catalog<Strategy>;

/// Built-in strategies overlaid by `<data_dir>/strategies.json`.
pub fn open_strategies(data_dir: &Path) -> Result<StrategyManager> {
    Catalog::open("strategy", BUILTIN_STRATEGIES, data_dir, "strategies")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{AnalysisSettings, IdealityWeights};
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    fn calculator() -> MetricsCalculator {
        MetricsCalculator::new(AnalysisSettings::default(), IdealityWeights::default()).unwrap()
    }

    fn strategy(ops: &[&str], metric: Metric, goal: Goal, policy: Policy) -> Strategy {
        Strategy {
            name: "test".to_string(),
            description: String::new(),
            algorithm: ops.iter().map(|s| s.parse().unwrap()).collect(),
            scoring: Scoring { metric, goal },
            policy,
            passes: 1,
        }
    }

    #[test]
    fn test_policies() {
        assert!(Policy::Always.accepts(Goal::Maximize, 1.0, 0.0));
        assert!(Policy::Improve.accepts(Goal::Minimize, 1.0, 0.5));
        assert!(!Policy::Improve.accepts(Goal::Maximize, 1.0, 1.0));
        let tolerant = Policy::Tolerance {
            max_regression: 0.25,
        };
        assert!(tolerant.accepts(Goal::Maximize, 1.0, 0.75));
        assert!(!tolerant.accepts(Goal::Maximize, 1.0, 0.7));
    }

    #[test]
    fn test_improve_rejects_regressions() {
        // ones count: append adds, truncate removes
        let s = strategy(
            &["append:111", "truncate:2", "append:1"],
            Metric::Ones,
            Goal::Maximize,
            Policy::Improve,
        );
        let run = s.run(&BitString::parse("10").unwrap(), &calculator()).unwrap();
        let accepted: Vec<bool> = run.frames.iter().map(|f| f.accepted).collect();
        assert_eq!(accepted, vec![true, false, true]);
        assert_eq!(run.bits().unwrap().to_string(), "101111");
        assert_relative_eq!(run.initial_score, 1.0);
        assert_relative_eq!(run.final_score, 5.0);
        assert_eq!(run.accepted, 2);
    }

    #[test]
    fn test_failing_step_is_rejected_and_run_continues() {
        let s = strategy(
            &["decode:manchester", "not"],
            Metric::Length,
            Goal::Maximize,
            Policy::Always,
        );
        // "11" is not a valid Manchester pair
        let run = s.run(&BitString::parse("11").unwrap(), &calculator()).unwrap();
        assert!(!run.frames[0].accepted);
        assert!(run.frames[0].error.is_some());
        assert_eq!(run.frames[0].bits.to_string(), "11");
        assert!(run.frames[1].accepted);
        assert_eq!(run.bits().unwrap().to_string(), "00");
    }

    #[test]
    fn test_passes_repeat_algorithm() {
        let mut s = strategy(&["not"], Metric::Ones, Goal::Maximize, Policy::Always);
        s.passes = 3;
        let run = s.run(&BitString::parse("1").unwrap(), &calculator()).unwrap();
        assert_eq!(run.frames.len(), 3);
        assert_eq!(run.bits().unwrap().to_string(), "0");
    }

    #[test]
    fn test_validation() {
        let s = strategy(&[], Metric::Ones, Goal::Maximize, Policy::Always);
        assert!(s.run(&BitString::parse("1").unwrap(), &calculator()).is_err());

        let s = strategy(
            &["not"],
            Metric::Ones,
            Goal::Maximize,
            Policy::Tolerance {
                max_regression: -1.0,
            },
        );
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_validation_bounds_steps() {
        let mut s = strategy(&["not", "reverse"], Metric::Ones, Goal::Maximize, Policy::Always);
        s.passes = usize::MAX / 2 + 1;
        assert_eq!(s.total_steps(), usize::MAX);
        assert!(matches!(s.validate(), Err(BitError::InvalidParameter(_))));
        assert!(s.run(&BitString::parse("01").unwrap(), &calculator()).is_err());

        s.passes = MAX_STEPS / 2;
        assert!(s.validate().is_ok());
        s.passes += 1;
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_builtin_strategies_run() {
        let dir = TempDir::new().unwrap();
        let strategies = open_strategies(dir.path()).unwrap();
        let input = crate::generator::Generator::Biased {
            len: 512,
            p_one: 0.7,
            seed: Some(5),
        }
        .generate()
        .unwrap();
        assert!(!strategies.entries().is_empty());
        for (s, _) in strategies.entries() {
            let run = s.run(&input, &calculator()).unwrap();
            assert_eq!(run.frames.len(), s.total_steps(), "strategy {}", s.name);
        }
    }

    #[test]
    fn test_toml_form() {
        let s: Strategy = toml::from_str(
            r#"
name = "flip"
policy = { kind = "tolerance", max_regression = 0.5 }
scoring = { metric = "entropy", goal = "maximize" }

[[algorithm]]
op = "xor"
mask = "01"
"#,
        )
        .unwrap();
        assert_eq!(s.passes, 1);
        assert_eq!(s.algorithm[0].to_string(), "xor:01");
        assert_eq!(
            s.policy,
            Policy::Tolerance {
                max_regression: 0.5
            }
        );
    }
}
