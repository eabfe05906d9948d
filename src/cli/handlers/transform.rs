use crate::cli::{
    args::TransformArgs,
    config::{read_bits, write_bits},
    global::GlobalArgs,
};
use bitlab::{Config, LoadedFile, Operation};

pub fn handle(
    args: TransformArgs,
    global: &GlobalArgs,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let ops = args
        .ops
        .iter()
        .map(|s| s.parse::<Operation>())
        .collect::<Result<Vec<_>, _>>()?;

    let bits = read_bits(args.file.as_deref(), global)?;
    let mut file = LoadedFile::from_bits("input", bits, config.history.limit);

    for op in &ops {
        file.apply(op)
            .map_err(|e| format!("{} failed: {}", op.label(), e))?;
        if args.steps {
            eprintln!("{:<24} {}", op.label(), file.bits());
        }
    }

    write_bits(file.bits(), args.output.as_deref(), global, None)
}
