use crate::cli::{
    args::{ConfigAction, ConfigCategory},
    global::GlobalArgs,
};
use bitlab::ops::operation::OPERATION_NAMES;
use bitlab::{
    CODEC_NAMES, CompressionAlgorithm, Config, GENERATOR_NAMES, HashAlgorithm, Metric,
};

pub fn handle(
    action: ConfigAction,
    _global: &GlobalArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::List { category, json } => handle_list(category, json),
        ConfigAction::Show => handle_show(config),
    }
}

fn handle_list(
    category: Option<ConfigCategory>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Collect all data
    let codecs = CODEC_NAMES.to_vec();
    let operations = OPERATION_NAMES.to_vec();
    let metrics: Vec<&str> = Metric::ALL.iter().map(|m| m.as_str()).collect();
    let generators = GENERATOR_NAMES.to_vec();
    let digests: Vec<&str> = HashAlgorithm::ALL.iter().map(|h| h.as_str()).collect();
    let compression: Vec<&str> = CompressionAlgorithm::available()
        .iter()
        .map(|c| c.as_str())
        .collect();

    // JSON output
    if json {
        let output = match category {
            Some(ConfigCategory::Codecs) => serde_json::json!({ "codecs": codecs }),
            Some(ConfigCategory::Operations) => serde_json::json!({ "operations": operations }),
            Some(ConfigCategory::Metrics) => serde_json::json!({ "metrics": metrics }),
            Some(ConfigCategory::Generators) => serde_json::json!({ "generators": generators }),
            Some(ConfigCategory::Digests) => serde_json::json!({ "digests": digests }),
            Some(ConfigCategory::Compression) => serde_json::json!({ "compression": compression }),
            None => serde_json::json!({
                "codecs": codecs,
                "operations": operations,
                "metrics": metrics,
                "generators": generators,
                "digests": digests,
                "compression": compression,
            }),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    // Comma-separated output for specific categories
    match category {
        Some(ConfigCategory::Codecs) => println!("{}", codecs.join(",")),
        Some(ConfigCategory::Operations) => println!("{}", operations.join(",")),
        Some(ConfigCategory::Metrics) => println!("{}", metrics.join(",")),
        Some(ConfigCategory::Generators) => println!("{}", generators.join(",")),
        Some(ConfigCategory::Digests) => println!("{}", digests.join(",")),
        Some(ConfigCategory::Compression) => println!("{}", compression.join(",")),
        None => {
            // Human-readable format for all
            println!("Codecs: {}", codecs.join(", "));
            println!("Operations: {}", operations.join(", "));
            println!("Metrics: {}", metrics.join(", "));
            println!("Generators: {}", generators.join(", "));
            println!("Digests: {}", digests.join(", "));
            println!("Compression algorithms: {}", compression.join(", "));
            println!(
                "\nUse 'config list codecs|operations|metrics|generators|digests|compression' for machine-readable output"
            );
            println!("Use --json for structured output");
        }
    }

    Ok(())
}

fn handle_show(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("# data directory: {}", config.data_dir().display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
