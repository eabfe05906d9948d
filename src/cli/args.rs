use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Arguments for generating bits
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Generator: random, biased, zeros, ones, alternating, pattern, lfsr, counter
    pub kind: Option<String>,

    /// Generate from a named preset instead
    #[arg(short = 'p', long, conflicts_with = "kind")]
    pub preset: Option<String>,

    /// Length in bits (value count for counter)
    #[arg(short = 'n', long, default_value_t = 1024)]
    pub len: usize,

    /// Seed for random, biased and lfsr
    #[arg(long)]
    pub seed: Option<u64>,

    /// Probability of a 1 for biased
    #[arg(long)]
    pub p_one: Option<f64>,

    /// Pattern to repeat for pattern
    #[arg(long)]
    pub pattern: Option<String>,

    /// LFSR tap mask (decimal or 0x hex)
    #[arg(long)]
    pub taps: Option<String>,

    /// Counter width in bits
    #[arg(long)]
    pub width: Option<usize>,

    /// Insert a space every N bits
    #[arg(long, value_name = "N")]
    pub group: Option<usize>,

    /// Output file (writes to stdout if not provided)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments for analyzing bits
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Input file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Print a single metric value
    #[arg(short = 'm', long)]
    pub metric: Option<String>,

    /// Block size for block entropy and block chi-square
    #[arg(long)]
    pub block_size: Option<usize>,

    /// Largest autocorrelation lag
    #[arg(long)]
    pub max_lag: Option<usize>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for applying operations
#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Operation, repeatable (e.g. not, xor:1010, shl:3, encode:gray)
    #[arg(short = 'x', long = "op", value_name = "OP", required = true)]
    pub ops: Vec<String>,

    /// Input file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Print every intermediate state to stderr
    #[arg(long)]
    pub steps: bool,

    /// Output file (writes to stdout if not provided)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Codec name plus parameter overrides
#[derive(Args, Debug)]
pub struct CodecArgs {
    /// Codec: gray, nrzi, manchester, diff-manchester, hamming74, bit-stuffing,
    /// parity, rle, mtf, bwt, lz77. Parameters may follow a slash (mtf/4, parity/8/odd)
    pub codec: String,

    /// Input file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Symbol width for mtf and bwt
    #[arg(long)]
    pub symbol_bits: Option<u8>,

    /// Data bits per parity block
    #[arg(long)]
    pub block: Option<usize>,

    /// Odd parity
    #[arg(long)]
    pub odd: bool,

    /// LZ77 offset field width
    #[arg(long)]
    pub window_bits: Option<u8>,

    /// LZ77 length field width
    #[arg(long)]
    pub length_bits: Option<u8>,

    /// Output file (writes to stdout if not provided)
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments for detecting the codec
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// Input file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Show top N candidate codecs
    #[arg(long, value_name = "N", default_value_t = 5)]
    pub show_candidates: usize,

    /// Decode with the best match and print the result
    #[arg(short = 'd', long)]
    pub decode: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for compressibility estimates
#[derive(Args, Debug)]
pub struct CompressArgs {
    /// Input file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Only this algorithm (gzip, zstd, brotli, lz4, snappy, lzma)
    #[arg(short = 'a', long)]
    pub algorithm: Option<String>,

    /// Compression level
    #[arg(long)]
    pub level: Option<u32>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for digests
#[derive(Args, Debug)]
pub struct DigestArgs {
    /// Digest algorithm (every algorithm when omitted)
    #[arg(short = 'a', long)]
    pub algorithm: Option<String>,

    /// Input file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Print the 64-bit fingerprint used for partition caching
    #[arg(long, conflicts_with = "algorithm")]
    pub fingerprint: bool,
}

/// Arguments for numeric views
#[derive(Args, Debug)]
pub struct RadixArgs {
    /// Input file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Radix 2..=36
    #[arg(short = 'b', long, default_value_t = 16)]
    pub radix: u32,

    /// Convert this number to bits instead
    #[arg(long, value_name = "NUMBER")]
    pub from: Option<String>,

    /// Left-pad the result of --from to this many bits
    #[arg(long)]
    pub width: Option<usize>,
}

/// Arguments for partition statistics
#[derive(Args, Debug)]
pub struct PartitionArgs {
    /// Input file (reads from stdin if not provided)
    pub file: Option<PathBuf>,

    /// Split into N even partitions
    #[arg(long, value_name = "N")]
    pub split: Option<usize>,

    /// Named range NAME=START..END, repeatable
    #[arg(long = "range", value_name = "NAME=START..END")]
    pub ranges: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Preset subcommand actions
#[derive(Subcommand, Debug)]
pub enum PresetAction {
    /// List presets
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a preset as TOML
    Show {
        /// Preset name
        name: String,
    },

    /// Save a preset from a TOML file
    Save {
        /// Preset definition
        file: PathBuf,
    },

    /// Delete a user preset
    Delete {
        /// Preset name
        name: String,
    },
}

/// Strategy subcommand actions
#[derive(Subcommand, Debug)]
pub enum StrategyAction {
    /// List strategies
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a strategy as TOML
    Show {
        /// Strategy name
        name: String,
    },

    /// Save a strategy from a TOML file
    Save {
        /// Strategy definition
        file: PathBuf,
    },

    /// Delete a user strategy
    Delete {
        /// Strategy name
        name: String,
    },

    /// Run a strategy over a bit string
    Run(StrategyRunArgs),
}

/// Arguments for running a strategy
#[derive(Args, Debug)]
pub struct StrategyRunArgs {
    /// Strategy name
    pub name: String,

    /// Input file (reads from stdin if neither this nor --preset is given)
    pub file: Option<PathBuf>,

    /// Start from a preset instead of a file
    #[arg(short = 'p', long, conflicts_with = "file")]
    pub preset: Option<String>,

    /// Interactive playback (space pause/resume, arrows step, q quit)
    #[arg(long)]
    pub play: bool,

    /// Playback interval (e.g. "500ms", "2s")
    #[arg(long, value_name = "INTERVAL", requires = "play")]
    pub interval: Option<String>,

    /// Print the frames as JSON
    #[arg(long, conflicts_with = "play")]
    pub json: bool,

    /// Write the final bits here
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Config subcommand actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// List available names
    List {
        /// What to list
        #[arg(value_name = "TYPE")]
        category: Option<ConfigCategory>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the effective configuration as TOML
    Show,
}

/// Categories for config list command
#[derive(Clone, ValueEnum, Debug)]
pub enum ConfigCategory {
    Codecs,
    Operations,
    Metrics,
    Generators,
    Digests,
    Compression,
}
