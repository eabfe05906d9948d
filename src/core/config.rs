use crate::core::errors::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Parameters for the statistics in [`crate::analysis`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Block width in bits for block entropy and block chi-square
    pub block_size: usize,
    /// Largest lag reported by the autocorrelation series
    pub max_lag: usize,
    /// Significance level used to flag the runs test as non-random
    pub significance: f64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            block_size: 8,
            max_lag: 16,
            significance: 0.01,
        }
    }
}

/// Relative weights of the ideality components.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct IdealityWeights {
    pub entropy: f64,
    pub balance: f64,
    pub runs: f64,
    pub autocorrelation: f64,
}

impl Default for IdealityWeights {
    fn default() -> Self {
        Self {
            entropy: 1.0,
            balance: 1.0,
            runs: 1.0,
            autocorrelation: 1.0,
        }
    }
}

/// Configuration for a compression algorithm.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CompressionConfig {
    /// Default compression level
    pub default_level: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Delay between automatic playback steps
    pub interval_ms: u64,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self { interval_ms: 500 }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct HistorySettings {
    /// Maximum number of undo entries kept per file
    pub limit: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self { limit: 100 }
    }
}

/// Global settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Where presets and strategies are stored (supports `~`)
    pub data_dir: Option<String>,
    /// Preset used by `generate` when none is named
    pub default_preset: Option<String>,
}

/// Complete bitlab configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub analysis: AnalysisSettings,
    pub ideality: IdealityWeights,
    pub compression: HashMap<String, CompressionConfig>,
    pub playback: PlaybackSettings,
    pub history: HistorySettings,
    pub settings: Settings,
}

const BUILTIN_CONFIG: &str = include_str!("../../config.toml");

impl Config {
    /// Parses a configuration from TOML content.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Loads the built-in defaults bundled with the library.
    pub fn load_default() -> Result<Self> {
        Self::from_toml(BUILTIN_CONFIG)
    }

    /// Loads configuration with user overrides from standard locations.
    ///
    /// Layers in priority order:
    /// 1. Built-in defaults
    /// 2. `~/.config/bitlab/config.toml`
    /// 3. `./bitlab.toml`
    /// 4. `extra`, when given (e.g. `--config`)
    ///
    /// Later layers override individual keys of earlier ones. Broken user or
    /// local files are skipped with a warning; a broken `extra` file is an error.
    pub fn load_with_overrides(extra: Option<&Path>) -> Result<Self> {
        let mut merged: toml::Table = toml::from_str(BUILTIN_CONFIG)?;

        if let Some(config_dir) = dirs::config_dir() {
            let user_config_path = config_dir.join("bitlab").join("config.toml");
            merge_optional_layer(&mut merged, &user_config_path);
        }

        merge_optional_layer(&mut merged, Path::new("bitlab.toml"));

        if let Some(path) = extra {
            let layer: toml::Table = toml::from_str(&std::fs::read_to_string(path)?)?;
            log::debug!("Merging config from {:?}", path);
            merge_tables(&mut merged, layer);
        }

        Ok(toml::Value::Table(merged).try_into()?)
    }

    /// Resolved data directory for the preset and strategy stores.
    pub fn data_dir(&self) -> PathBuf {
        match &self.settings.data_dir {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).as_ref()),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("bitlab"),
        }
    }

    /// Compression level from config, falling back to per-algorithm defaults.
    pub fn compression_level(&self, algorithm: &str) -> Option<u32> {
        self.compression.get(algorithm).map(|c| c.default_level)
    }
}

fn merge_optional_layer(base: &mut toml::Table, path: &Path) {
    if !path.exists() {
        return;
    }
    let layer = std::fs::read_to_string(path)
        .map_err(|e| e.to_string())
        .and_then(|content| toml::from_str::<toml::Table>(&content).map_err(|e| e.to_string()));
    match layer {
        Ok(layer) => {
            log::debug!("Merging config from {:?}", path);
            merge_tables(base, layer);
        }
        Err(e) => log::warn!("Failed to load config from {:?}: {}", path, e),
    }
}

/// Deep-merge `overlay` into `base`. Tables merge key by key, everything
/// else is replaced.
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(toml::Value::Table(existing)), toml::Value::Table(incoming)) => {
                merge_tables(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
