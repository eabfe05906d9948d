mod args;
mod commands;
mod config;
mod global;
mod handlers;

use clap::{Parser, Subcommand};

use args::{
    AnalyzeArgs, CodecArgs, CompressArgs, ConfigAction, DetectArgs, DigestArgs, GenerateArgs,
    PartitionArgs, PresetAction, RadixArgs, StrategyAction, TransformArgs,
};
use global::GlobalArgs;

#[derive(Parser)]
#[command(name = "bitlab")]
#[command(version)]
#[command(about = "Bit string workbench: generate, inspect, transform and replay strategies over binary data", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate bits from a generator or preset
    Generate(GenerateArgs),

    /// Print statistics
    Analyze(AnalyzeArgs),

    /// Apply bitwise operations and codecs in sequence
    Transform(TransformArgs),

    /// Encode with a line code, ECC or bit-level compressor
    Encode(CodecArgs),

    /// Decode with a line code, ECC or bit-level compressor
    Decode(CodecArgs),

    /// Guess which codec produced the input
    Detect(DetectArgs),

    /// Estimate compressibility with byte compressors
    Compress(CompressArgs),

    /// Digest the packed bytes
    Digest(DigestArgs),

    /// Show the bits as a number, or a number as bits
    Radix(RadixArgs),

    /// Statistics over sub-ranges
    Partition(PartitionArgs),

    /// Manage presets
    Preset {
        #[command(subcommand)]
        action: PresetAction,
    },

    /// Manage and run strategies
    Strategy {
        #[command(subcommand)]
        action: StrategyAction,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG overrides -v/-q
    env_logger::Builder::new()
        .filter_level(cli.global.log_level())
        .parse_default_env()
        .format_timestamp(None)
        .init();

    let config = config::load_config(&cli.global)?;
    let global = &cli.global;

    match cli.command {
        Commands::Generate(args) => handlers::generate::handle(args, global, &config),
        Commands::Analyze(args) => handlers::analyze::handle(args, global, &config),
        Commands::Transform(args) => handlers::transform::handle(args, global, &config),
        Commands::Encode(args) => handlers::encode::handle(args, global, &config),
        Commands::Decode(args) => handlers::decode::handle(args, global, &config),
        Commands::Detect(args) => handlers::detect::handle(args, global, &config),
        Commands::Compress(args) => handlers::compress::handle(args, global, &config),
        Commands::Digest(args) => handlers::digest::handle(args, global, &config),
        Commands::Radix(args) => handlers::radix::handle(args, global, &config),
        Commands::Partition(args) => handlers::partition::handle(args, global, &config),
        Commands::Preset { action } => handlers::preset::handle(action, global, &config),
        Commands::Strategy { action } => handlers::strategy::handle(action, global, &config),
        Commands::Config { action } => handlers::config::handle(action, global, &config),
    }
}
