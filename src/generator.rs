//! Bit string generators.
//!
//! Seeded generators are deterministic across runs and platforms
//! ([`StdRng::seed_from_u64`]); unseeded ones draw from the OS.

use crate::core::bits::{BitString, MAX_BITS};
use crate::core::errors::{BitError, NotFoundError, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Generator names accepted on the command line.
pub const GENERATOR_NAMES: &[&str] = &[
    "random",
    "biased",
    "zeros",
    "ones",
    "alternating",
    "pattern",
    "lfsr",
    "counter",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Generator {
    /// Uniform random bits
    Random {
        len: usize,
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Independent bits that are `1` with probability `p_one`
    Biased {
        len: usize,
        p_one: f64,
        #[serde(default)]
        seed: Option<u64>,
    },
    Zeros {
        len: usize,
    },
    Ones {
        len: usize,
    },
    Alternating {
        len: usize,
        #[serde(default)]
        start: bool,
    },
    /// `pattern` repeated and cut to `len`
    Pattern {
        pattern: BitString,
        len: usize,
    },
    /// Galois LFSR. `taps` is the feedback mask; its highest set bit gives
    /// the register width.
    Lfsr {
        len: usize,
        taps: u32,
        #[serde(default = "default_lfsr_seed")]
        seed: u32,
    },
    /// `0, 1, 2, ... count-1` written as `width`-bit fields
    Counter {
        width: usize,
        count: u64,
    },
}

fn default_lfsr_seed() -> u32 {
    1
}

fn rng_for(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn check_len(len: usize) -> Result<()> {
    if len > MAX_BITS {
        return Err(BitError::invalid_parameter(format!(
            "length {} exceeds the {} bit limit",
            len, MAX_BITS
        )));
    }
    Ok(())
}

impl Generator {
    pub fn name(&self) -> &'static str {
        match self {
            Generator::Random { .. } => "random",
            Generator::Biased { .. } => "biased",
            Generator::Zeros { .. } => "zeros",
            Generator::Ones { .. } => "ones",
            Generator::Alternating { .. } => "alternating",
            Generator::Pattern { .. } => "pattern",
            Generator::Lfsr { .. } => "lfsr",
            Generator::Counter { .. } => "counter",
        }
    }

    /// Number of bits this generator will produce.
    pub fn output_len(&self) -> usize {
        match self {
            Generator::Random { len, .. }
            | Generator::Biased { len, .. }
            | Generator::Zeros { len }
            | Generator::Ones { len }
            | Generator::Alternating { len, .. }
            | Generator::Pattern { len, .. }
            | Generator::Lfsr { len, .. } => *len,
            Generator::Counter { width, count } => {
                width.saturating_mul(usize::try_from(*count).unwrap_or(usize::MAX))
            }
        }
    }

    pub fn generate(&self) -> Result<BitString> {
        check_len(self.output_len())?;
        log::debug!("generating {} bits with {}", self.output_len(), self.name());

        let bits = match self {
            Generator::Random { len, seed } => {
                let mut rng = rng_for(*seed);
                (0..*len).map(|_| rng.random::<bool>()).collect()
            }
            Generator::Biased { len, p_one, seed } => {
                if !(0.0..=1.0).contains(p_one) {
                    return Err(BitError::invalid_parameter(format!(
                        "p_one must be within 0..=1, got {}",
                        p_one
                    )));
                }
                let mut rng = rng_for(*seed);
                (0..*len).map(|_| rng.random_bool(*p_one)).collect()
            }
            Generator::Zeros { len } => BitString::from(vec![false; *len]),
            Generator::Ones { len } => BitString::from(vec![true; *len]),
            Generator::Alternating { len, start } => {
                (0..*len).map(|i| (i % 2 == 1) ^ *start).collect()
            }
            Generator::Pattern { pattern, len } => {
                if pattern.is_empty() {
                    return Err(BitError::invalid_parameter("pattern must not be empty"));
                }
                pattern.iter().cycle().take(*len).collect()
            }
            Generator::Lfsr { len, taps, seed } => lfsr(*len, *taps, *seed)?,
            Generator::Counter { width, count } => {
                if !(1..=64).contains(width) {
                    return Err(BitError::invalid_parameter(format!(
                        "counter width must be 1..=64, got {}",
                        width
                    )));
                }
                if *width < 64 && *count > (1u64 << width) {
                    return Err(BitError::invalid_parameter(format!(
                        "{} values do not fit in {} bits",
                        count, width
                    )));
                }
                let mut out = BitString::with_capacity(self.output_len());
                for value in 0..*count {
                    out.push_uint(value, *width);
                }
                out
            }
        };
        Ok(bits)
    }

    /// Build a generator from a command-line name and loose parameters.
    pub fn from_name(name: &str, params: &GeneratorParams) -> Result<Generator> {
        let len = params.len;
        let generator = match name.to_lowercase().as_str() {
            "random" => Generator::Random {
                len,
                seed: params.seed,
            },
            "biased" => Generator::Biased {
                len,
                p_one: params.p_one.unwrap_or(0.5),
                seed: params.seed,
            },
            "zeros" => Generator::Zeros { len },
            "ones" => Generator::Ones { len },
            "alternating" => Generator::Alternating { len, start: false },
            "pattern" => Generator::Pattern {
                pattern: params.pattern.clone().ok_or_else(|| {
                    BitError::invalid_parameter("pattern generator needs --pattern")
                })?,
                len,
            },
            "lfsr" => Generator::Lfsr {
                len,
                taps: params.taps.unwrap_or(0xB8),
                seed: params.seed.map(|s| s as u32).unwrap_or(1),
            },
            "counter" => Generator::Counter {
                width: params.width.unwrap_or(8),
                count: len as u64,
            },
            _ => {
                return Err(
                    NotFoundError::with_candidates("generator", name, GENERATOR_NAMES).into(),
                );
            }
        };
        Ok(generator)
    }
}

/// Loose parameters for [`Generator::from_name`].
#[derive(Debug, Clone, Default)]
pub struct GeneratorParams {
    /// Length in bits (value count for `counter`)
    pub len: usize,
    pub seed: Option<u64>,
    pub p_one: Option<f64>,
    pub pattern: Option<BitString>,
    pub taps: Option<u32>,
    pub width: Option<usize>,
}

fn lfsr(len: usize, taps: u32, seed: u32) -> Result<BitString> {
    if taps == 0 {
        return Err(BitError::invalid_parameter("LFSR taps must not be zero"));
    }
    let width = 32 - taps.leading_zeros();
    let mask = if width == 32 { u32::MAX } else { (1u32 << width) - 1 };
    let mut state = seed & mask;
    if state == 0 {
        return Err(BitError::invalid_parameter(
            "LFSR seed must have a set bit within the register width",
        ));
    }
    let mut out = BitString::with_capacity(len);
    for _ in 0..len {
        let bit = state & 1 == 1;
        out.push(bit);
        state >>= 1;
        if bit {
            state ^= taps;
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_random_is_deterministic() {
        let a = Generator::Random {
            len: 256,
            seed: Some(42),
        };
        assert_eq!(a.generate().unwrap(), a.generate().unwrap());
        let b = Generator::Random {
            len: 256,
            seed: Some(43),
        };
        assert_ne!(a.generate().unwrap(), b.generate().unwrap());
    }

    #[test]
    fn test_biased_extremes() {
        let ones = Generator::Biased {
            len: 64,
            p_one: 1.0,
            seed: Some(1),
        };
        assert_eq!(ones.generate().unwrap().ones(), 64);

        let bad = Generator::Biased {
            len: 8,
            p_one: 1.5,
            seed: None,
        };
        assert!(bad.generate().is_err());
    }

    #[test]
    fn test_simple_generators() {
        assert_eq!(
            Generator::Alternating { len: 5, start: false }
                .generate()
                .unwrap()
                .to_string(),
            "01010"
        );
        assert_eq!(
            Generator::Alternating { len: 4, start: true }
                .generate()
                .unwrap()
                .to_string(),
            "1010"
        );
        assert_eq!(Generator::Zeros { len: 3 }.generate().unwrap().to_string(), "000");
        assert_eq!(Generator::Ones { len: 2 }.generate().unwrap().to_string(), "11");
    }

    #[test]
    fn test_pattern() {
        let generator = Generator::Pattern {
            pattern: BitString::parse("110").unwrap(),
            len: 7,
        };
        assert_eq!(generator.generate().unwrap().to_string(), "1101101");

        let empty = Generator::Pattern {
            pattern: BitString::new(),
            len: 4,
        };
        assert!(empty.generate().is_err());
    }

    #[test]
    fn test_lfsr_maximal_period() {
        // x^4 + x^3 + 1 has period 15
        let bits = lfsr(45, 0b1100, 1).unwrap();
        assert_eq!(bits.slice(0, 15).unwrap().to_string(), "100110101111000");
        assert_eq!(bits.slice(0, 15).unwrap(), bits.slice(15, 30).unwrap());
        assert!(lfsr(8, 0, 1).is_err());
        assert!(lfsr(8, 0b1100, 0b10000).is_err());
    }

    #[test]
    fn test_counter() {
        let bits = Generator::Counter { width: 2, count: 4 }.generate().unwrap();
        assert_eq!(bits.to_string(), "00011011");
        assert!(Generator::Counter { width: 2, count: 5 }.generate().is_err());
        assert!(Generator::Counter { width: 0, count: 1 }.generate().is_err());
    }

    #[test]
    fn test_from_name() {
        let params = GeneratorParams {
            len: 16,
            seed: Some(3),
            ..Default::default()
        };
        let generator = Generator::from_name("random", &params).unwrap();
        assert_eq!(generator.generate().unwrap().len(), 16);
        assert!(Generator::from_name("pattern", &params).is_err());
        assert!(matches!(
            Generator::from_name("randon", &params),
            Err(BitError::NotFound(_))
        ));
    }

    #[test]
    fn test_serde_form() {
        let generator: Generator =
            toml::from_str("kind = \"pattern\"\npattern = \"10\"\nlen = 4\n").unwrap();
        assert_eq!(generator.generate().unwrap().to_string(), "1010");
    }
}
