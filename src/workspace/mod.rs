//! Stateful layer over the pure library: persisted presets and strategies,
//! playback, undo history, partitions and loaded files.

mod builtin;
pub mod file;
pub mod history;
pub mod partition;
pub mod playback;
pub mod presets;
pub mod store;
pub mod strategy;

pub use file::{FileFormat, LoadedFile, detect_format, parse_content};
pub use history::{History, HistoryEntry};
pub use partition::{Partition, PartitionSet, PartitionStats};
pub use playback::{Player, PlayerState};
pub use presets::{Preset, PresetManager, open_presets};
pub use store::{Catalog, Named, Source, Store};
pub use strategy::{
    Frame, Goal, Policy, Scoring, Strategy, StrategyManager, StrategyRun, open_strategies,
};
