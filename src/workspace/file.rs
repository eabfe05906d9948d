//! A bit string loaded from disk with its history and partitions.

use crate::core::bits::BitString;
use crate::core::errors::Result;
use crate::ops::Operation;
use crate::workspace::history::History;
use crate::workspace::partition::{Partition, PartitionSet, PartitionStats};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk representation of a bit string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// ASCII `0`/`1` with optional whitespace and `_` separators
    Text,
    /// Raw bytes, MSB first
    Binary,
}

/// Text when every byte is a bit character or separator.
pub fn detect_format(content: &[u8]) -> FileFormat {
    let is_text = content
        .iter()
        .all(|b| matches!(b, b'0' | b'1' | b'_') || b.is_ascii_whitespace());
    if is_text {
        FileFormat::Text
    } else {
        FileFormat::Binary
    }
}

/// Decode `content` as `format`, detecting it when `None`.
pub fn parse_content(
    content: &[u8],
    format: Option<FileFormat>,
) -> Result<(BitString, FileFormat)> {
    let format = format.unwrap_or_else(|| detect_format(content));
    let bits = match format {
        FileFormat::Text => BitString::parse(&String::from_utf8_lossy(content))?,
        FileFormat::Binary => BitString::from_bytes(content),
    };
    Ok((bits, format))
}

#[derive(Debug, Clone)]
pub struct LoadedFile {
    path: Option<PathBuf>,
    format: FileFormat,
    history: History,
    partitions: PartitionSet,
}

impl LoadedFile {
    /// Load `path`, detecting text or binary content.
    pub fn load(path: &Path, history_limit: usize) -> Result<Self> {
        Self::load_as(path, None, history_limit)
    }

    pub fn load_as(path: &Path, format: Option<FileFormat>, history_limit: usize) -> Result<Self> {
        let content = fs::read(path)?;
        let (bits, format) = parse_content(&content, format)?;
        log::debug!("loaded {:?} as {:?}: {} bits", path, format, bits.len());
        Ok(Self {
            path: Some(path.to_path_buf()),
            format,
            history: History::new(format!("load {}", path.display()), bits, history_limit),
            partitions: PartitionSet::new(),
        })
    }

    pub fn from_bits(label: impl Into<String>, bits: BitString, history_limit: usize) -> Self {
        Self {
            path: None,
            format: FileFormat::Text,
            history: History::new(label, bits, history_limit),
            partitions: PartitionSet::new(),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn bits(&self) -> &BitString {
        &self.history.current().bits
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn partitions(&self) -> &PartitionSet {
        &self.partitions
    }

    pub fn partitions_mut(&mut self) -> &mut PartitionSet {
        &mut self.partitions
    }

    /// Apply `op` to the current bits and record it. Returns the partitions
    /// dropped because they no longer fit.
    pub fn apply(&mut self, op: &Operation) -> Result<Vec<Partition>> {
        let next = op.apply(self.bits())?;
        self.history.record(op.label(), next);
        Ok(self.partitions.retain_within(self.bits().len()))
    }

    /// Apply every operation in order. Stops at the first error; earlier
    /// operations stay recorded.
    pub fn apply_all(&mut self, ops: &[Operation]) -> Result<Vec<Partition>> {
        let mut dropped = Vec::new();
        for op in ops {
            dropped.extend(self.apply(op)?);
        }
        Ok(dropped)
    }

    pub fn undo(&mut self) -> bool {
        let moved = self.history.undo().is_some();
        self.partitions.retain_within(self.bits().len());
        moved
    }

    pub fn redo(&mut self) -> bool {
        let moved = self.history.redo().is_some();
        self.partitions.retain_within(self.bits().len());
        moved
    }

    pub fn add_partition(
        &mut self,
        name: impl Into<String>,
        start: usize,
        end: usize,
    ) -> Result<()> {
        let len = self.bits().len();
        self.partitions.add(name, start, end, len)?;
        Ok(())
    }

    pub fn partition_stats(&mut self, name: &str) -> Result<PartitionStats> {
        let bits = self.history.current().bits.clone();
        self.partitions.stats(name, &bits)
    }

    pub fn save_text(&self, path: &Path) -> Result<()> {
        fs::write(path, format!("{}\n", self.bits()))?;
        Ok(())
    }

    /// Write packed bytes; a partial last byte is zero padded.
    pub fn save_binary(&self, path: &Path) -> Result<()> {
        if self.bits().len() % 8 != 0 {
            log::warn!(
                "{} bits is not a whole number of bytes; padding with zeros",
                self.bits().len()
            );
        }
        fs::write(path, self.bits().to_bytes())?;
        Ok(())
    }

    /// Save in the format the file was loaded with.
    pub fn save(&self, path: &Path) -> Result<()> {
        match self.format {
            FileFormat::Text => self.save_text(path),
            FileFormat::Binary => self.save_binary(path),
        }
    }
}
