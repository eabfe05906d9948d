use crate::cli::{args::PresetAction, global::GlobalArgs};
use bitlab::workspace::Preset;
use bitlab::{Config, open_presets};
use std::fs;

pub fn handle(
    action: PresetAction,
    global: &GlobalArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut presets = open_presets(&config.data_dir())?;

    match action {
        PresetAction::List { json } => {
            let entries = presets.entries();
            if json {
                let output: Vec<_> = entries
                    .iter()
                    .map(|(p, source)| {
                        serde_json::json!({
                            "name": p.name,
                            "source": source,
                            "generator": p.generator.name(),
                            "operations": p.operations.len(),
                            "description": p.description,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                for (p, source) in entries {
                    println!("  {:<20} {:<8} {}", p.name, source.as_str(), p.description);
                }
            }
        }
        PresetAction::Show { name } => {
            let preset = presets.get(&name)?;
            print!("{}", toml::to_string_pretty(preset)?);
        }
        PresetAction::Save { file } => {
            let preset: Preset = toml::from_str(&fs::read_to_string(&file)?)?;
            // Refuse presets that cannot generate
            preset
                .generate()
                .map_err(|e| format!("Preset '{}' is invalid: {}", preset.name, e))?;
            let name = preset.name.clone();
            let replaced = presets.save(preset)?;
            if !global.quiet {
                let verb = if replaced { "Updated" } else { "Saved" };
                eprintln!("{} preset '{}'", verb, name);
            }
        }
        PresetAction::Delete { name } => {
            presets.delete(&name)?;
            if !global.quiet {
                eprintln!("Deleted preset '{}'", name);
            }
        }
    }
    Ok(())
}
