use crate::cli::{
    args::CodecArgs,
    config::{read_bits, write_bits},
    global::GlobalArgs,
};
use bitlab::{Codec, Config, encode};

/// Parse the codec spec (`mtf/4`, `parity/8/odd`) and apply flag overrides.
pub fn resolve_codec(args: &CodecArgs) -> Result<Codec, Box<dyn std::error::Error>> {
    let mut codec = Codec::from_spec(&args.codec)?;
    match &mut codec {
        Codec::Parity { block, even } => {
            if let Some(b) = args.block {
                *block = b;
            }
            if args.odd {
                *even = false;
            }
        }
        Codec::Mtf { symbol_bits } | Codec::Bwt { symbol_bits } => {
            if let Some(k) = args.symbol_bits {
                *symbol_bits = k;
            }
        }
        Codec::Lz77 {
            window_bits,
            length_bits,
        } => {
            if let Some(w) = args.window_bits {
                *window_bits = w;
            }
            if let Some(l) = args.length_bits {
                *length_bits = l;
            }
        }
        _ => {}
    }
    Ok(codec)
}

pub fn handle(
    args: CodecArgs,
    global: &GlobalArgs,
    _config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let codec = resolve_codec(&args)?;
    let bits = read_bits(args.file.as_deref(), global)?;
    let encoded = encode(&bits, &codec)?;
    log::debug!("{}: {} -> {} bits", codec, bits.len(), encoded.len());
    write_bits(&encoded, args.output.as_deref(), global, None)
}
