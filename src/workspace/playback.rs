//! Step-by-step strategy playback.
//!
//! Every operation is deterministic, so frames computed once are cached and
//! replayed when stepping forward again after `step_back` or `reset`.

use crate::analysis::MetricsCalculator;
use crate::core::bits::BitString;
use crate::core::errors::{BitError, Result};
use crate::workspace::strategy::{Frame, Strategy};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerState {
    /// No step applied yet
    Ready,
    Playing,
    Paused,
    /// Every step applied
    Finished,
}

#[derive(Debug)]
pub struct Player {
    strategy: Strategy,
    calculator: MetricsCalculator,
    initial: BitString,
    initial_score: f64,
    frames: Vec<Frame>,
    position: usize,
    state: PlayerState,
}

impl Player {
    pub fn new(strategy: Strategy, bits: BitString, calculator: MetricsCalculator) -> Result<Self> {
        strategy.validate()?;
        let initial_score = strategy.score(&bits, &calculator)?;
        Ok(Self {
            frames: Vec::with_capacity(strategy.total_steps()),
            strategy,
            calculator,
            initial: bits,
            initial_score,
            position: 0,
            state: PlayerState::Ready,
        })
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// Number of applied steps.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn total_steps(&self) -> usize {
        self.strategy.total_steps()
    }

    pub fn initial_score(&self) -> f64 {
        self.initial_score
    }

    /// Applied frames, oldest first.
    pub fn frames(&self) -> &[Frame] {
        &self.frames[..self.position]
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.frames().last()
    }

    pub fn current_bits(&self) -> &BitString {
        self.current_frame().map_or(&self.initial, |f| &f.bits)
    }

    pub fn current_score(&self) -> f64 {
        self.current_frame().map_or(self.initial_score, Frame::score)
    }

    /// Apply the next step. `None` once finished.
    pub fn step(&mut self) -> Option<&Frame> {
        if self.position >= self.total_steps() {
            self.state = PlayerState::Finished;
            return None;
        }

        if self.position == self.frames.len() {
            let frame = self.strategy.step(
                self.position,
                self.current_bits(),
                self.current_score(),
                &self.calculator,
            );
            self.frames.push(frame);
        }
        self.position += 1;

        self.state = if self.position == self.total_steps() {
            PlayerState::Finished
        } else if self.state == PlayerState::Playing {
            PlayerState::Playing
        } else {
            PlayerState::Paused
        };
        self.frames.get(self.position - 1)
    }

    /// Undo the last step. Returns false at the start.
    pub fn step_back(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        self.state = if self.position == 0 {
            PlayerState::Ready
        } else {
            PlayerState::Paused
        };
        true
    }

    /// Move to exactly `position` applied steps.
    pub fn seek(&mut self, position: usize) -> Result<()> {
        if position > self.total_steps() {
            return Err(BitError::invalid_parameter(format!(
                "cannot seek to step {} of {}",
                position,
                self.total_steps()
            )));
        }
        while self.position > position {
            self.step_back();
        }
        while self.position < position {
            self.step();
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        self.position = 0;
        self.state = PlayerState::Ready;
    }

    /// Apply every remaining step.
    pub fn run_to_end(&mut self) -> &[Frame] {
        while self.step().is_some() {}
        self.frames()
    }

    /// Start or resume timed playback. False when already finished.
    pub fn play(&mut self) -> bool {
        if self.position >= self.total_steps() {
            self.state = PlayerState::Finished;
            return false;
        }
        self.state = PlayerState::Playing;
        true
    }

    pub fn pause(&mut self) {
        if self.state == PlayerState::Playing {
            self.state = PlayerState::Paused;
        }
    }

    /// Timer callback: advances one step only while playing.
    pub fn tick(&mut self) -> Option<&Frame> {
        if self.state != PlayerState::Playing {
            return None;
        }
        self.step()
    }
}
