//! Presets and strategies embedded from `presets/` and `strategies/`.

include!(concat!(env!("OUT_DIR"), "/registry.rs"));
