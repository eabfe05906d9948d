use crate::cli::{args::DigestArgs, config::read_bits, global::GlobalArgs};
use bitlab::{Config, HashAlgorithm, digest, fingerprint};
use std::io::{self, Write};

pub fn handle(
    args: DigestArgs,
    global: &GlobalArgs,
    _config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let bits = read_bits(args.file.as_deref(), global)?;

    if args.fingerprint {
        println!("{:016x}", fingerprint(&bits));
        return Ok(());
    }

    match &args.algorithm {
        Some(name) => {
            let algorithm: HashAlgorithm = name.parse()?;
            let output = digest(&bits, algorithm);
            if global.raw {
                // Raw binary output
                io::stdout().write_all(&output)?;
            } else {
                // Default: hex encoding
                println!("{}", hex::encode(&output));
            }
        }
        None => {
            for algorithm in HashAlgorithm::ALL {
                println!(
                    "{:<9} {}",
                    algorithm.as_str(),
                    hex::encode(digest(&bits, algorithm))
                );
            }
        }
    }
    Ok(())
}
