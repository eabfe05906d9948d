use crate::cli::{
    args::CodecArgs,
    config::{read_bits, write_bits},
    global::GlobalArgs,
    handlers::encode::resolve_codec,
};
use bitlab::encoders::line;
use bitlab::{Codec, Config, decode};

pub fn handle(
    args: CodecArgs,
    global: &GlobalArgs,
    _config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let codec = resolve_codec(&args)?;
    let bits = read_bits(args.file.as_deref(), global)?;

    // Error-correcting codes report what they found
    let decoded = match &codec {
        Codec::Hamming74 => {
            let result = line::hamming74_decode(&bits)?;
            if !result.corrected.is_empty() && !global.quiet {
                eprintln!(
                    "Corrected single-bit errors in {} block(s): {:?}",
                    result.corrected.len(),
                    result.corrected
                );
            }
            result.bits
        }
        Codec::Parity { block, even } => {
            let result = line::parity_check(&bits, *block, *even)?;
            if !result.failed.is_empty() && !global.quiet {
                eprintln!(
                    "Parity check failed in {} block(s): {:?}",
                    result.failed.len(),
                    result.failed
                );
            }
            result.bits
        }
        _ => decode(&bits, &codec)?,
    };

    write_bits(&decoded, args.output.as_deref(), global, None)
}
