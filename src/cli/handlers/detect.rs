use crate::cli::{
    args::DetectArgs,
    config::{read_bits, write_bits},
    global::GlobalArgs,
};
use bitlab::{Config, decode, detect_codec};

pub fn handle(
    args: DetectArgs,
    global: &GlobalArgs,
    _config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let bits = read_bits(args.file.as_deref(), global)?;
    let matches = detect_codec(&bits);

    if matches.is_empty() {
        return Err("Could not detect codec - the input does not decode with any codec".into());
    }

    if args.decode {
        let best = &matches[0];
        if !global.quiet {
            eprintln!(
                "Detected: {} (confidence: {:.1}%)",
                best.codec,
                best.confidence * 100.0
            );
        }
        let decoded = decode(&bits, &best.codec)?;
        return write_bits(&decoded, None, global, None);
    }

    let top: Vec<_> = matches.iter().take(args.show_candidates.max(1)).collect();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&top)?);
        return Ok(());
    }

    println!("Top {} candidate codecs:\n", top.len());
    for (i, m) in top.iter().enumerate() {
        println!(
            "{}. {} (confidence: {:.1}%)",
            i + 1,
            m.codec,
            m.confidence * 100.0
        );
    }
    Ok(())
}
