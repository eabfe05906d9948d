//! Named sub-ranges of a bit string with cached statistics.

use crate::analysis::metrics;
use crate::core::bits::BitString;
use crate::core::errors::{BitError, NotFoundError, Result};
use crate::features::hashing::fingerprint;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Half-open range `[start, end)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partition {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn fits(&self, len: usize) -> bool {
        self.end <= len
    }

    pub fn overlaps(&self, other: &Partition) -> bool {
        self.start < other.end && other.start < self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionStats {
    pub length: usize,
    pub ones: usize,
    pub balance: f64,
    pub entropy: f64,
    pub transitions: usize,
    pub longest_run: usize,
    pub autocorrelation: f64,
    pub lz_complexity: f64,
}

impl PartitionStats {
    pub fn compute(bits: &BitString) -> Self {
        let runs = metrics::run_stats(bits);
        Self {
            length: bits.len(),
            ones: bits.ones(),
            balance: metrics::balance(bits),
            entropy: metrics::entropy(bits),
            transitions: metrics::transitions(bits),
            longest_run: runs.longest_one.max(runs.longest_zero),
            autocorrelation: metrics::autocorrelation(bits, 1),
            lz_complexity: metrics::normalized_lz_complexity(bits),
        }
    }
}

/// Partitions in insertion order. Ranges may overlap.
#[derive(Debug, Clone, Default)]
pub struct PartitionSet {
    partitions: Vec<Partition>,
    // name -> (content fingerprint, stats)
    cache: HashMap<String, (u64, PartitionStats)>,
}

impl PartitionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// `n` adjacent partitions covering `len` bits, named `part-1..`.
    /// Sizes differ by at most one bit, larger ones first.
    pub fn split_even(len: usize, n: usize) -> Result<Self> {
        if n == 0 || n > len {
            return Err(BitError::invalid_parameter(format!(
                "cannot split {} bits into {} partitions",
                len, n
            )));
        }
        let base = len / n;
        let extra = len % n;
        let mut set = Self::new();
        let mut start = 0;
        for i in 0..n {
            let size = base + usize::from(i < extra);
            set.add(format!("part-{}", i + 1), start, start + size, len)?;
            start += size;
        }
        Ok(set)
    }

    pub fn list(&self) -> &[Partition] {
        &self.partitions
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Partition> {
        self.partitions.iter().find(|p| p.name == name)
    }

    fn require(&self, name: &str) -> Result<&Partition> {
        self.get(name).ok_or_else(|| {
            let names: Vec<&str> = self.partitions.iter().map(|p| p.name.as_str()).collect();
            NotFoundError::with_candidates("partition", name, &names).into()
        })
    }

    /// Add `[start, end)` over a bit string of `len` bits.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        start: usize,
        end: usize,
        len: usize,
    ) -> Result<&Partition> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(BitError::invalid_parameter("partition name must not be empty"));
        }
        if self.get(&name).is_some() {
            return Err(BitError::invalid_parameter(format!(
                "partition '{}' already exists",
                name
            )));
        }
        if start >= end || end > len {
            return Err(BitError::RangeOutOfBounds { start, end, len });
        }
        self.partitions.push(Partition { name, start, end });
        Ok(&self.partitions[self.partitions.len() - 1])
    }

    pub fn remove(&mut self, name: &str) -> Result<Partition> {
        self.require(name)?;
        self.cache.remove(name);
        let index = self
            .partitions
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| BitError::invalid_parameter(format!("partition '{}' vanished", name)))?;
        Ok(self.partitions.remove(index))
    }

    pub fn rename(&mut self, from: &str, to: impl Into<String>) -> Result<()> {
        let to = to.into();
        self.require(from)?;
        if to.trim().is_empty() {
            return Err(BitError::invalid_parameter("partition name must not be empty"));
        }
        if from != to && self.get(&to).is_some() {
            return Err(BitError::invalid_parameter(format!(
                "partition '{}' already exists",
                to
            )));
        }
        if let Some(partition) = self.partitions.iter_mut().find(|p| p.name == from) {
            partition.name = to.clone();
        }
        if let Some(entry) = self.cache.remove(from) {
            self.cache.insert(to, entry);
        }
        Ok(())
    }

    /// Statistics of the partition's slice of `bits`, recomputed only when
    /// the slice content changed since the last call.
    pub fn stats(&mut self, name: &str, bits: &BitString) -> Result<PartitionStats> {
        let partition = self.require(name)?;
        let slice = bits.slice(partition.start, partition.end)?;
        let key = fingerprint(&slice);

        if let Some((cached_key, stats)) = self.cache.get(name)
            && *cached_key == key
        {
            log::debug!("partition '{}': stats cache hit", name);
            return Ok(stats.clone());
        }

        let stats = PartitionStats::compute(&slice);
        self.cache.insert(name.to_string(), (key, stats.clone()));
        Ok(stats)
    }

    /// Drop partitions that no longer fit in `len` bits and return them.
    pub fn retain_within(&mut self, len: usize) -> Vec<Partition> {
        let (kept, dropped): (Vec<Partition>, Vec<Partition>) =
            self.partitions.drain(..).partition(|p| p.fits(len));
        self.partitions = kept;
        for p in &dropped {
            self.cache.remove(&p.name);
            log::debug!("partition '{}' dropped: no longer fits {} bits", p.name, len);
        }
        dropped
    }
}
