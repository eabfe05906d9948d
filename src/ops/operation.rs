//! A single named transformation step.
//!
//! Operations are what presets, strategies and the `transform` command are
//! built from. Each has a compact text form:
//!
//! ```text
//! not  reverse  xor:1010  shl:3  rotr:1  invert:0..8  slice:0..64
//! insert:4:101  append:101  truncate:64  repeat:3  encode:manchester
//! encode:mtf/4  decode:parity/8/odd  encode:lz77/10/5
//! ```

use crate::core::bits::{BitString, MAX_BITS};
use crate::core::errors::{BitError, Result};
use crate::encoders::{self, Codec};
use crate::ops::bitwise;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operation keywords accepted by [`Operation::from_str`].
pub const OPERATION_NAMES: &[&str] = &[
    "not", "reverse", "and", "or", "xor", "nand", "nor", "xnor", "shl", "shr", "rotl", "rotr",
    "invert", "set", "clear", "slice", "delete", "insert", "append", "truncate", "repeat",
    "encode", "decode",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operation {
    Not,
    Reverse,
    And { mask: BitString },
    Or { mask: BitString },
    Xor { mask: BitString },
    Nand { mask: BitString },
    Nor { mask: BitString },
    Xnor { mask: BitString },
    ShiftLeft { amount: usize },
    ShiftRight { amount: usize },
    RotateLeft { amount: usize },
    RotateRight { amount: usize },
    Invert { start: usize, end: usize },
    Set { start: usize, end: usize },
    Clear { start: usize, end: usize },
    /// Keep only `[start, end)`
    Slice { start: usize, end: usize },
    Delete { start: usize, end: usize },
    Insert { position: usize, bits: BitString },
    Append { bits: BitString },
    Truncate { len: usize },
    Repeat { times: usize },
    Encode { codec: Codec },
    Decode { codec: Codec },
}

impl Operation {
    pub fn apply(&self, bits: &BitString) -> Result<BitString> {
        match self {
            Operation::Not => Ok(bitwise::not(bits)),
            Operation::Reverse => Ok(bitwise::reverse(bits)),
            Operation::And { mask } => bitwise::and(bits, mask),
            Operation::Or { mask } => bitwise::or(bits, mask),
            Operation::Xor { mask } => bitwise::xor(bits, mask),
            Operation::Nand { mask } => bitwise::nand(bits, mask),
            Operation::Nor { mask } => bitwise::nor(bits, mask),
            Operation::Xnor { mask } => bitwise::xnor(bits, mask),
            Operation::ShiftLeft { amount } => Ok(bitwise::shift_left(bits, *amount)),
            Operation::ShiftRight { amount } => Ok(bitwise::shift_right(bits, *amount)),
            Operation::RotateLeft { amount } => Ok(bitwise::rotate_left(bits, *amount)),
            Operation::RotateRight { amount } => Ok(bitwise::rotate_right(bits, *amount)),
            Operation::Invert { start, end } => bitwise::invert_range(bits, *start, *end),
            Operation::Set { start, end } => bitwise::set_range(bits, *start, *end),
            Operation::Clear { start, end } => bitwise::clear_range(bits, *start, *end),
            Operation::Slice { start, end } => bits.slice(*start, *end),
            Operation::Delete { start, end } => bitwise::delete(bits, *start, *end),
            Operation::Insert {
                position,
                bits: insertion,
            } => bitwise::insert(bits, *position, insertion),
            Operation::Append { bits: tail } => Ok(bits.concat(tail)),
            Operation::Truncate { len } => Ok(bitwise::truncate(bits, *len)),
            Operation::Repeat { times } => {
                if bits.len().saturating_mul(*times) > MAX_BITS {
                    return Err(BitError::invalid_parameter(format!(
                        "repeating {} bits {} times is too large",
                        bits.len(),
                        times
                    )));
                }
                Ok(bitwise::repeat(bits, *times))
            }
            Operation::Encode { codec } => encoders::encode(bits, codec),
            Operation::Decode { codec } => encoders::decode(bits, codec),
        }
    }

    /// Short human label, e.g. `xor 1010` or `encode manchester`.
    pub fn label(&self) -> String {
        match self {
            Operation::Not => "not".to_string(),
            Operation::Reverse => "reverse".to_string(),
            Operation::And { mask } => format!("and {}", mask),
            Operation::Or { mask } => format!("or {}", mask),
            Operation::Xor { mask } => format!("xor {}", mask),
            Operation::Nand { mask } => format!("nand {}", mask),
            Operation::Nor { mask } => format!("nor {}", mask),
            Operation::Xnor { mask } => format!("xnor {}", mask),
            Operation::ShiftLeft { amount } => format!("shift left {}", amount),
            Operation::ShiftRight { amount } => format!("shift right {}", amount),
            Operation::RotateLeft { amount } => format!("rotate left {}", amount),
            Operation::RotateRight { amount } => format!("rotate right {}", amount),
            Operation::Invert { start, end } => format!("invert {}..{}", start, end),
            Operation::Set { start, end } => format!("set {}..{}", start, end),
            Operation::Clear { start, end } => format!("clear {}..{}", start, end),
            Operation::Slice { start, end } => format!("slice {}..{}", start, end),
            Operation::Delete { start, end } => format!("delete {}..{}", start, end),
            Operation::Insert { position, bits } => format!("insert {} at {}", bits, position),
            Operation::Append { bits } => format!("append {}", bits),
            Operation::Truncate { len } => format!("truncate {}", len),
            Operation::Repeat { times } => format!("repeat x{}", times),
            Operation::Encode { codec } => format!("encode {}", codec),
            Operation::Decode { codec } => format!("decode {}", codec),
        }
    }
}

impl fmt::Display for Operation {
    /// The text form accepted by [`Operation::from_str`].
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Not => f.write_str("not"),
            Operation::Reverse => f.write_str("reverse"),
            Operation::And { mask } => write!(f, "and:{}", mask),
            Operation::Or { mask } => write!(f, "or:{}", mask),
            Operation::Xor { mask } => write!(f, "xor:{}", mask),
            Operation::Nand { mask } => write!(f, "nand:{}", mask),
            Operation::Nor { mask } => write!(f, "nor:{}", mask),
            Operation::Xnor { mask } => write!(f, "xnor:{}", mask),
            Operation::ShiftLeft { amount } => write!(f, "shl:{}", amount),
            Operation::ShiftRight { amount } => write!(f, "shr:{}", amount),
            Operation::RotateLeft { amount } => write!(f, "rotl:{}", amount),
            Operation::RotateRight { amount } => write!(f, "rotr:{}", amount),
            Operation::Invert { start, end } => write!(f, "invert:{}..{}", start, end),
            Operation::Set { start, end } => write!(f, "set:{}..{}", start, end),
            Operation::Clear { start, end } => write!(f, "clear:{}..{}", start, end),
            Operation::Slice { start, end } => write!(f, "slice:{}..{}", start, end),
            Operation::Delete { start, end } => write!(f, "delete:{}..{}", start, end),
            Operation::Insert { position, bits } => write!(f, "insert:{}:{}", position, bits),
            Operation::Append { bits } => write!(f, "append:{}", bits),
            Operation::Truncate { len } => write!(f, "truncate:{}", len),
            Operation::Repeat { times } => write!(f, "repeat:{}", times),
            Operation::Encode { codec } => write!(f, "encode:{}", codec.spec()),
            Operation::Decode { codec } => write!(f, "decode:{}", codec.spec()),
        }
    }
}

fn parse_usize(value: &str, what: &str) -> Result<usize> {
    value.trim().parse().map_err(|_| {
        BitError::invalid_parameter(format!(
            "{} must be a non-negative integer, got '{}'",
            what, value
        ))
    })
}

/// Parses `start..end`.
fn parse_range(value: &str) -> Result<(usize, usize)> {
    let (start, end) = value.split_once("..").ok_or_else(|| {
        BitError::invalid_parameter(format!("expected a range like 0..8, got '{}'", value))
    })?;
    let start = parse_usize(start, "range start")?;
    let end = parse_usize(end, "range end")?;
    if start > end {
        return Err(BitError::invalid_parameter(format!(
            "range start {} is after end {}",
            start, end
        )));
    }
    Ok((start, end))
}

fn parse_bits_arg(value: &str) -> Result<BitString> {
    let bits = BitString::parse(value)?;
    if bits.is_empty() {
        return Err(BitError::invalid_parameter("bit argument must not be empty"));
    }
    Ok(bits)
}

impl FromStr for Operation {
    type Err = BitError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (keyword, arg) = match s.split_once(':') {
            Some((keyword, arg)) => (keyword, Some(arg)),
            None => (s, None),
        };
        let keyword = keyword.to_lowercase();

        let need = |arg: Option<&str>| -> Result<String> {
            arg.map(str::to_string).ok_or_else(|| {
                BitError::invalid_parameter(format!("operation '{}' needs an argument", keyword))
            })
        };

        let op = match keyword.as_str() {
            "not" => Operation::Not,
            "reverse" | "rev" => Operation::Reverse,
            "and" => Operation::And {
                mask: parse_bits_arg(&need(arg)?)?,
            },
            "or" => Operation::Or {
                mask: parse_bits_arg(&need(arg)?)?,
            },
            "xor" => Operation::Xor {
                mask: parse_bits_arg(&need(arg)?)?,
            },
            "nand" => Operation::Nand {
                mask: parse_bits_arg(&need(arg)?)?,
            },
            "nor" => Operation::Nor {
                mask: parse_bits_arg(&need(arg)?)?,
            },
            "xnor" => Operation::Xnor {
                mask: parse_bits_arg(&need(arg)?)?,
            },
            "shl" => Operation::ShiftLeft {
                amount: parse_usize(&need(arg)?, "shift")?,
            },
            "shr" => Operation::ShiftRight {
                amount: parse_usize(&need(arg)?, "shift")?,
            },
            "rotl" => Operation::RotateLeft {
                amount: parse_usize(&need(arg)?, "rotation")?,
            },
            "rotr" => Operation::RotateRight {
                amount: parse_usize(&need(arg)?, "rotation")?,
            },
            "invert" | "set" | "clear" | "slice" | "delete" => {
                let (start, end) = parse_range(&need(arg)?)?;
                match keyword.as_str() {
                    "invert" => Operation::Invert { start, end },
                    "set" => Operation::Set { start, end },
                    "clear" => Operation::Clear { start, end },
                    "slice" => Operation::Slice { start, end },
                    _ => Operation::Delete { start, end },
                }
            }
            "insert" => {
                let arg = need(arg)?;
                let (position, bits) = arg.split_once(':').ok_or_else(|| {
                    BitError::invalid_parameter(format!(
                        "expected insert:<position>:<bits>, got 'insert:{}'",
                        arg
                    ))
                })?;
                Operation::Insert {
                    position: parse_usize(position, "insert position")?,
                    bits: parse_bits_arg(bits)?,
                }
            }
            "append" => Operation::Append {
                bits: parse_bits_arg(&need(arg)?)?,
            },
            "truncate" => Operation::Truncate {
                len: parse_usize(&need(arg)?, "length")?,
            },
            "repeat" => Operation::Repeat {
                times: parse_usize(&need(arg)?, "repeat count")?,
            },
            "encode" => Operation::Encode {
                codec: Codec::from_spec(&need(arg)?)?,
            },
            "decode" => Operation::Decode {
                codec: Codec::from_spec(&need(arg)?)?,
            },
            _ => {
                return Err(crate::core::errors::NotFoundError::with_candidates(
                    "operation",
                    keyword.as_str(),
                    OPERATION_NAMES,
                )
                .into());
            }
        };
        Ok(op)
    }
}

/// Apply `operations` in order.
pub fn apply_all(bits: &BitString, operations: &[Operation]) -> Result<BitString> {
    operations.iter().try_fold(bits.clone(), |acc, op| {
        log::debug!("applying {}", op.label());
        op.apply(&acc)
    })
}
