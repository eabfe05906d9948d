use crate::core::bits::BitString;
use crate::encoders::{self, Codec, line};
use serde::Serialize;

/// A match result from codec detection.
#[derive(Debug, Clone, Serialize)]
pub struct CodecMatch {
    pub codec: Codec,
    /// Confidence score (0.0 to 1.0)
    pub confidence: f64,
}

/// Detector for identifying which codec most plausibly produced a bit string.
pub struct CodecDetector {
    codecs: Vec<Codec>,
}

impl Default for CodecDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl CodecDetector {
    /// Every codec with its default parameters plus common parity and
    /// symbol-width variants.
    pub fn new() -> Self {
        let mut codecs = Codec::all();
        codecs.extend([
            Codec::Parity {
                block: 8,
                even: false,
            },
            Codec::Parity {
                block: 7,
                even: true,
            },
            Codec::Parity {
                block: 7,
                even: false,
            },
            Codec::Mtf { symbol_bits: 4 },
            Codec::Bwt { symbol_bits: 4 },
        ]);
        Self { codecs }
    }

    pub fn with_codecs(codecs: Vec<Codec>) -> Self {
        Self { codecs }
    }

    /// Detect which codec was likely used to produce `bits`.
    /// Returns matches sorted by confidence (highest first).
    pub fn detect(&self, bits: &BitString) -> Vec<CodecMatch> {
        if bits.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<CodecMatch> = self
            .codecs
            .iter()
            .filter_map(|codec| {
                score_codec(bits, codec).map(|confidence| CodecMatch {
                    codec: codec.clone(),
                    confidence,
                })
            })
            .collect();

        matches.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        log::debug!("detect: {} of {} codecs decode", matches.len(), self.codecs.len());
        matches
    }
}

/// Score how plausible `codec` is for `bits`.
/// `None` when the input does not decode at all.
fn score_codec(bits: &BitString, codec: &Codec) -> Option<f64> {
    const ROUNDTRIP_WEIGHT: f64 = 0.25;
    const STRUCTURE_WEIGHT: f64 = 0.55;
    const LENGTH_WEIGHT: f64 = 0.20;

    // 1. Must decode
    let decoded = encoders::decode(bits, codec).ok()?;

    // 2. Re-encoding reproduces the input exactly
    let roundtrip = match encoders::encode(&decoded, codec) {
        Ok(encoded) if encoded == *bits => 1.0,
        _ => 0.0,
    };

    // 3. Evidence that cannot occur by chance in unstructured input
    let structure = score_structure(bits, &decoded, codec);

    // 4. Framing alignment
    let length = score_length(bits, codec);

    Some(roundtrip * ROUNDTRIP_WEIGHT + structure * STRUCTURE_WEIGHT + length * LENGTH_WEIGHT)
}

fn score_structure(bits: &BitString, decoded: &BitString, codec: &Codec) -> f64 {
    match codec {
        // Every input decodes; no evidence either way
        Codec::Gray | Codec::Nrzi | Codec::Mtf { .. } => 0.0,

        // A random pair has a mid-bit transition half the time
        Codec::Manchester | Codec::DifferentialManchester => {
            1.0 - 0.5f64.powi((bits.len() / 2).min(1024) as i32)
        }

        Codec::Hamming74 => {
            let Ok(result) = line::hamming74_decode(bits) else {
                return 0.0;
            };
            let blocks = bits.len() / 7;
            let clean = 1.0 - result.corrected.len() as f64 / blocks as f64;
            // A random block has a zero syndrome one time in eight
            let chance = 1.0 / 8.0;
            ((clean - chance) / (1.0 - chance)).max(0.0)
                * (1.0 - chance.powi(blocks.min(1024) as i32))
        }

        Codec::Parity { block, even } => {
            let Ok(result) = line::parity_check(bits, *block, *even) else {
                return 0.0;
            };
            let blocks = bits.len().div_ceil(block + 1);
            let pass = 1.0 - result.failed.len() as f64 / blocks as f64;
            (2.0 * pass - 1.0).max(0.0) * (1.0 - 0.5f64.powi(blocks.min(1024) as i32))
        }

        Codec::BitStuffing => {
            // Each stuffed zero is a five-ones run followed by a zero
            let stuffed = bits.len() - decoded.len();
            1.0 - 0.5f64.powi(stuffed.min(1024) as i32)
        }

        // Compressors: credit only real expansion on decode
        Codec::Rle | Codec::Bwt { .. } | Codec::Lz77 { .. } => {
            if decoded.len() > bits.len() {
                0.5 * (1.0 - bits.len() as f64 / decoded.len() as f64)
            } else {
                0.0
            }
        }
    }
}

fn score_length(bits: &BitString, codec: &Codec) -> f64 {
    let frame = match codec {
        Codec::Manchester | Codec::DifferentialManchester => 2,
        Codec::Hamming74 => 7,
        Codec::Parity { block, .. } => block + 1,
        Codec::Mtf { symbol_bits } => *symbol_bits as usize,
        Codec::Bwt { symbol_bits } => {
            return if bits.len() > 32 && (bits.len() - 32) % *symbol_bits as usize == 0 {
                1.0
            } else {
                0.5
            };
        }
        _ => return 0.5,
    };
    if frame > 0 && bits.len() % frame == 0 {
        1.0
    } else {
        0.5
    }
}

/// Detect with the default candidate set.
pub fn detect_codec(bits: &BitString) -> Vec<CodecMatch> {
    CodecDetector::new().detect(bits)
}
