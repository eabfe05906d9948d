use crate::cli::{args::CompressArgs, config::read_bits, global::GlobalArgs};
use bitlab::{CompressionAlgorithm, Config, estimate};

pub fn handle(
    args: CompressArgs,
    global: &GlobalArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let algorithms = match &args.algorithm {
        Some(name) => vec![name.parse::<CompressionAlgorithm>()?],
        None => CompressionAlgorithm::available(),
    };

    let bits = read_bits(args.file.as_deref(), global)?;
    let estimates = algorithms
        .into_iter()
        .map(|algo| {
            // CLI level, then config, then the algorithm default
            let level = args
                .level
                .or_else(|| config.compression_level(algo.as_str()))
                .unwrap_or_else(|| algo.default_level());
            estimate(&bits, algo, level)
        })
        .collect::<Result<Vec<_>, _>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&estimates)?);
        return Ok(());
    }

    for e in &estimates {
        println!(
            "{:<8} {:>10} -> {:>10} bytes  ratio {:.3}",
            e.algorithm.as_str(),
            e.original_bytes,
            e.compressed_bytes,
            e.ratio
        );
    }
    Ok(())
}
