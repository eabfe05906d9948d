//! Linear undo/redo over bit string snapshots.

use crate::core::bits::BitString;
use crate::core::errors::{BitError, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub label: String,
    pub bits: BitString,
}

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<HistoryEntry>,
    cursor: usize,
    limit: usize,
}

impl History {
    /// Start with a single entry. A `limit` of 0 is treated as 1.
    pub fn new(label: impl Into<String>, bits: BitString, limit: usize) -> Self {
        Self {
            entries: vec![HistoryEntry {
                label: label.into(),
                bits,
            }],
            cursor: 0,
            limit: limit.max(1),
        }
    }

    /// Push a new state, dropping anything that could have been redone.
    pub fn record(&mut self, label: impl Into<String>, bits: BitString) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(HistoryEntry {
            label: label.into(),
            bits,
        });
        if self.entries.len() > self.limit {
            let excess = self.entries.len() - self.limit;
            self.entries.drain(..excess);
            log::debug!("history: evicted {} oldest entries", excess);
        }
        self.cursor = self.entries.len() - 1;
    }

    pub fn undo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(self.current())
    }

    pub fn redo(&mut self) -> Option<&HistoryEntry> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(self.current())
    }

    pub fn jump(&mut self, index: usize) -> Result<&HistoryEntry> {
        if index >= self.entries.len() {
            return Err(BitError::invalid_parameter(format!(
                "history index {} out of range (0..{})",
                index,
                self.entries.len()
            )));
        }
        self.cursor = index;
        Ok(self.current())
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }
}
