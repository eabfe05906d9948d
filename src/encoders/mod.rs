//! Reversible bit string codecs.
//!
//! [`Codec`] names one codec together with its parameters. [`encode`] and
//! [`decode`] dispatch to the implementations in [`line`] and [`compress`].

pub mod compress;
pub mod line;
pub mod radix;

use crate::core::bits::BitString;
use crate::core::errors::{BitError, NotFoundError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A codec and its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "codec", rename_all = "snake_case")]
pub enum Codec {
    Gray,
    Nrzi,
    Manchester,
    DifferentialManchester,
    Hamming74,
    BitStuffing,
    Parity {
        #[serde(default = "default_parity_block")]
        block: usize,
        #[serde(default = "default_true")]
        even: bool,
    },
    Rle,
    Mtf {
        #[serde(default = "default_symbol_bits")]
        symbol_bits: u8,
    },
    Bwt {
        #[serde(default = "default_symbol_bits")]
        symbol_bits: u8,
    },
    Lz77 {
        #[serde(default = "default_window_bits")]
        window_bits: u8,
        #[serde(default = "default_length_bits")]
        length_bits: u8,
    },
}

fn default_parity_block() -> usize {
    8
}

fn default_true() -> bool {
    true
}

fn default_symbol_bits() -> u8 {
    8
}

fn default_window_bits() -> u8 {
    8
}

fn default_length_bits() -> u8 {
    4
}

/// Canonical codec names accepted by [`Codec::from_str`].
pub const CODEC_NAMES: &[&str] = &[
    "gray",
    "nrzi",
    "manchester",
    "diff-manchester",
    "hamming74",
    "bit-stuffing",
    "parity",
    "rle",
    "mtf",
    "bwt",
    "lz77",
];

impl Codec {
    /// Every codec with its default parameters.
    pub fn all() -> Vec<Codec> {
        CODEC_NAMES
            .iter()
            .filter_map(|name| name.parse().ok())
            .collect()
    }

    pub fn name(&self) -> &'static str {
        match self {
            Codec::Gray => "gray",
            Codec::Nrzi => "nrzi",
            Codec::Manchester => "manchester",
            Codec::DifferentialManchester => "diff-manchester",
            Codec::Hamming74 => "hamming74",
            Codec::BitStuffing => "bit-stuffing",
            Codec::Parity { .. } => "parity",
            Codec::Rle => "rle",
            Codec::Mtf { .. } => "mtf",
            Codec::Bwt { .. } => "bwt",
            Codec::Lz77 { .. } => "lz77",
        }
    }

    /// Compact text form with parameters after `/`, e.g. `parity/4/odd`,
    /// `mtf/4` or `lz77/10/5`. Parameterless codecs are just their name.
    pub fn spec(&self) -> String {
        match self {
            Codec::Parity { block, even } => {
                format!("parity/{}/{}", block, if *even { "even" } else { "odd" })
            }
            Codec::Mtf { symbol_bits } | Codec::Bwt { symbol_bits } => {
                format!("{}/{}", self.name(), symbol_bits)
            }
            Codec::Lz77 {
                window_bits,
                length_bits,
            } => format!("lz77/{}/{}", window_bits, length_bits),
            _ => self.name().to_string(),
        }
    }

    /// Parses the [`Codec::spec`] form. Trailing parameters may be left
    /// out and keep their defaults.
    pub fn from_spec(text: &str) -> Result<Codec> {
        let mut parts = text.split('/').map(str::trim);
        let mut codec: Codec = parts.next().unwrap_or_default().parse()?;
        let params: Vec<&str> = parts.collect();
        let name = codec.name();

        match (&mut codec, params.as_slice()) {
            (_, []) => {}
            (Codec::Parity { block, even }, [b, rest @ ..]) if rest.len() <= 1 => {
                *block = parse_param(b, "parity block")?;
                if let Some(kind) = rest.first() {
                    *even = match kind.to_lowercase().as_str() {
                        "even" => true,
                        "odd" => false,
                        other => {
                            return Err(BitError::invalid_parameter(format!(
                                "parity must be even or odd, got '{}'",
                                other
                            )));
                        }
                    };
                }
            }
            (Codec::Mtf { symbol_bits } | Codec::Bwt { symbol_bits }, [k]) => {
                *symbol_bits = parse_param(k, "symbol width")?;
            }
            (
                Codec::Lz77 {
                    window_bits,
                    length_bits,
                },
                [w, rest @ ..],
            ) if rest.len() <= 1 => {
                *window_bits = parse_param(w, "window bits")?;
                if let Some(l) = rest.first() {
                    *length_bits = parse_param(l, "length bits")?;
                }
            }
            _ => {
                return Err(BitError::invalid_parameter(format!(
                    "codec '{}' does not take parameters '{}'",
                    name,
                    params.join("/")
                )));
            }
        }
        Ok(codec)
    }

    /// True for codecs whose output length is unrelated to the input length.
    pub fn is_compressor(&self) -> bool {
        matches!(
            self,
            Codec::Rle | Codec::Mtf { .. } | Codec::Bwt { .. } | Codec::Lz77 { .. }
        )
    }
}

impl fmt::Display for Codec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Codec::Parity { block, even } => write!(
                f,
                "parity({}, {})",
                block,
                if *even { "even" } else { "odd" }
            ),
            Codec::Mtf { symbol_bits } | Codec::Bwt { symbol_bits } => {
                write!(f, "{}({})", self.name(), symbol_bits)
            }
            Codec::Lz77 {
                window_bits,
                length_bits,
            } => write!(f, "lz77({}, {})", window_bits, length_bits),
            _ => f.write_str(self.name()),
        }
    }
}

impl FromStr for Codec {
    type Err = NotFoundError;

    /// Parse a codec name with default parameters.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let codec = match s.to_lowercase().replace('_', "-").as_str() {
            "gray" | "grey" => Codec::Gray,
            "nrzi" => Codec::Nrzi,
            "manchester" => Codec::Manchester,
            "diff-manchester" | "differential-manchester" => Codec::DifferentialManchester,
            "hamming74" | "hamming" | "hamming-7-4" => Codec::Hamming74,
            "bit-stuffing" | "stuffing" | "hdlc" => Codec::BitStuffing,
            "parity" => Codec::Parity {
                block: default_parity_block(),
                even: true,
            },
            "rle" => Codec::Rle,
            "mtf" => Codec::Mtf {
                symbol_bits: default_symbol_bits(),
            },
            "bwt" => Codec::Bwt {
                symbol_bits: default_symbol_bits(),
            },
            "lz77" | "lz" => Codec::Lz77 {
                window_bits: default_window_bits(),
                length_bits: default_length_bits(),
            },
            _ => return Err(NotFoundError::with_candidates("codec", s, CODEC_NAMES)),
        };
        Ok(codec)
    }
}

fn parse_param<T: FromStr>(value: &str, what: &str) -> Result<T> {
    value
        .parse()
        .map_err(|_| BitError::invalid_parameter(format!("invalid {} '{}'", what, value)))
}

/// Encode `bits` with `codec`.
pub fn encode(bits: &BitString, codec: &Codec) -> Result<BitString> {
    match codec {
        Codec::Gray => Ok(line::gray_encode(bits)),
        Codec::Nrzi => Ok(line::nrzi_encode(bits)),
        Codec::Manchester => Ok(line::manchester_encode(bits)),
        Codec::DifferentialManchester => Ok(line::differential_manchester_encode(bits)),
        Codec::Hamming74 => Ok(line::hamming74_encode(bits)),
        Codec::BitStuffing => Ok(line::bit_stuff(bits)),
        Codec::Parity { block, even } => line::parity_encode(bits, *block, *even),
        Codec::Rle => Ok(compress::rle_encode(bits)),
        Codec::Mtf { symbol_bits } => compress::mtf_encode(bits, *symbol_bits),
        Codec::Bwt { symbol_bits } => compress::bwt_encode(bits, *symbol_bits),
        Codec::Lz77 {
            window_bits,
            length_bits,
        } => compress::lz77_encode(bits, *window_bits, *length_bits),
    }
}

/// Decode `bits` with `codec`.
///
/// Error-correcting codecs return the corrected payload; use
/// [`line::hamming74_decode`] or [`line::parity_check`] directly to see
/// which blocks were repaired or failed.
pub fn decode(bits: &BitString, codec: &Codec) -> Result<BitString> {
    match codec {
        Codec::Gray => Ok(line::gray_decode(bits)),
        Codec::Nrzi => Ok(line::nrzi_decode(bits)),
        Codec::Manchester => line::manchester_decode(bits),
        Codec::DifferentialManchester => line::differential_manchester_decode(bits),
        Codec::Hamming74 => Ok(line::hamming74_decode(bits)?.bits),
        Codec::BitStuffing => line::bit_unstuff(bits),
        Codec::Parity { block, even } => Ok(line::parity_check(bits, *block, *even)?.bits),
        Codec::Rle => compress::rle_decode(bits),
        Codec::Mtf { symbol_bits } => compress::mtf_decode(bits, *symbol_bits),
        Codec::Bwt { symbol_bits } => compress::bwt_decode(bits, *symbol_bits),
        Codec::Lz77 {
            window_bits,
            length_bits,
        } => compress::lz77_decode(bits, *window_bits, *length_bits),
    }
}
