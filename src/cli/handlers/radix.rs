use crate::cli::{
    args::RadixArgs,
    config::{read_bits, write_bits},
    global::GlobalArgs,
};
use bitlab::Config;
use bitlab::encoders::radix::{from_radix, to_radix};

pub fn handle(
    args: RadixArgs,
    global: &GlobalArgs,
    _config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(number) = &args.from {
        let bits = from_radix(number, args.radix, args.width)?;
        return write_bits(&bits, None, global, None);
    }

    let bits = read_bits(args.file.as_deref(), global)?;
    println!("{}", to_radix(&bits, args.radix)?);
    Ok(())
}
