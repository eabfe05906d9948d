use crate::cli::{
    args::GenerateArgs,
    config::{parse_u32, write_bits},
    global::GlobalArgs,
};
use bitlab::{BitString, Config, Generator, GeneratorParams, open_presets};

pub fn handle(
    args: GenerateArgs,
    global: &GlobalArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let bits = if let Some(kind) = &args.kind {
        let params = GeneratorParams {
            len: args.len,
            seed: args.seed,
            p_one: args.p_one,
            pattern: args.pattern.as_deref().map(BitString::parse).transpose()?,
            taps: args.taps.as_deref().map(parse_u32).transpose()?,
            width: args.width,
        };
        Generator::from_name(kind, &params)?.generate()?
    } else {
        // Named preset, then the configured default
        let name = args
            .preset
            .clone()
            .or_else(|| config.settings.default_preset.clone())
            .ok_or("No generator or --preset given and no settings.default_preset configured")?;
        let presets = open_presets(&config.data_dir())?;
        let preset = presets.get(&name)?;
        log::debug!("generating from preset '{}'", preset.name);
        preset.generate()?
    };

    write_bits(&bits, args.output.as_deref(), global, args.group)
}
