//! Named starting points: a generator plus optional operations.

use crate::core::bits::BitString;
use crate::core::errors::Result;
use crate::generator::Generator;
use crate::ops::{Operation, apply_all};
use crate::workspace::builtin::BUILTIN_PRESETS;
use crate::workspace::store::{Catalog, Named};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub generator: Generator,
    #[serde(default)]
    pub operations: Vec<Operation>,
}

impl Preset {
    /// Run the generator, then every operation in order.
    pub fn generate(&self) -> Result<BitString> {
        let bits = self.generator.generate()?;
        apply_all(&bits, &self.operations)
    }
}

impl Named for Preset {
    fn name(&self) -> &str {
        &self.name
    }
}

pub type PresetManager = Catalog<Preset>;

/// Built-in presets overlaid by `<data_dir>/presets.json`.
pub fn open_presets(data_dir: &Path) -> Result<PresetManager> {
    Catalog::open("preset", BUILTIN_PRESETS, data_dir, "presets")
}
