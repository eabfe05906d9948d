//! Line codes and simple error-correcting codes.

use crate::core::bits::BitString;
use crate::core::errors::{BitError, Result};

/// Binary-reflected Gray code of the whole string read as one number.
pub fn gray_encode(bits: &BitString) -> BitString {
    let mut prev = false;
    bits.iter()
        .map(|b| {
            let g = b ^ prev;
            prev = b;
            g
        })
        .collect()
}

pub fn gray_decode(bits: &BitString) -> BitString {
    let mut acc = false;
    bits.iter()
        .map(|g| {
            acc ^= g;
            acc
        })
        .collect()
}

/// NRZI: a `1` toggles the line level, a `0` holds it. The line idles low.
pub fn nrzi_encode(bits: &BitString) -> BitString {
    let mut level = false;
    bits.iter()
        .map(|b| {
            level ^= b;
            level
        })
        .collect()
}

pub fn nrzi_decode(bits: &BitString) -> BitString {
    let mut prev = false;
    bits.iter()
        .map(|level| {
            let b = level != prev;
            prev = level;
            b
        })
        .collect()
}

/// Manchester per IEEE 802.3: `0` is high-to-low (`10`), `1` is low-to-high (`01`).
pub fn manchester_encode(bits: &BitString) -> BitString {
    let mut out = BitString::with_capacity(bits.len() * 2);
    for b in bits.iter() {
        out.push(!b);
        out.push(b);
    }
    out
}

pub fn manchester_decode(bits: &BitString) -> Result<BitString> {
    if bits.len() % 2 != 0 {
        return Err(BitError::invalid_length(bits.len(), "an even number of half-bits"));
    }
    bits.as_slice()
        .chunks(2)
        .enumerate()
        .map(|(i, pair)| match (pair[0], pair[1]) {
            (true, false) => Ok(false),
            (false, true) => Ok(true),
            _ => Err(BitError::corrupt(i * 2, "missing mid-bit transition")),
        })
        .collect()
}

/// Differential Manchester: every bit has a mid-bit transition, a `0` also
/// transitions at the start of the bit cell.
pub fn differential_manchester_encode(bits: &BitString) -> BitString {
    let mut out = BitString::with_capacity(bits.len() * 2);
    let mut level = false;
    for b in bits.iter() {
        let first = if b { level } else { !level };
        let second = !first;
        out.push(first);
        out.push(second);
        level = second;
    }
    out
}

pub fn differential_manchester_decode(bits: &BitString) -> Result<BitString> {
    if bits.len() % 2 != 0 {
        return Err(BitError::invalid_length(bits.len(), "an even number of half-bits"));
    }
    let mut level = false;
    let mut out = BitString::with_capacity(bits.len() / 2);
    for (i, pair) in bits.as_slice().chunks(2).enumerate() {
        let (first, second) = (pair[0], pair[1]);
        if first == second {
            return Err(BitError::corrupt(i * 2, "missing mid-bit transition"));
        }
        out.push(first == level);
        level = second;
    }
    Ok(out)
}

/// Result of Hamming(7,4) decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HammingDecoded {
    pub bits: BitString,
    /// Indices of the 7-bit blocks in which a single-bit error was corrected
    pub corrected: Vec<usize>,
}

/// Hamming(7,4). Codewords are laid out `p1 p2 d1 p4 d2 d3 d4`; the input is
/// zero padded to a multiple of four bits.
pub fn hamming74_encode(bits: &BitString) -> BitString {
    let mut out = BitString::with_capacity(bits.len().div_ceil(4) * 7);
    for chunk in bits.as_slice().chunks(4) {
        let d = |i: usize| chunk.get(i).copied().unwrap_or(false);
        let (d1, d2, d3, d4) = (d(0), d(1), d(2), d(3));
        let p1 = d1 ^ d2 ^ d4;
        let p2 = d1 ^ d3 ^ d4;
        let p4 = d2 ^ d3 ^ d4;
        for bit in [p1, p2, d1, p4, d2, d3, d4] {
            out.push(bit);
        }
    }
    out
}

pub fn hamming74_decode(bits: &BitString) -> Result<HammingDecoded> {
    if bits.len() % 7 != 0 {
        return Err(BitError::invalid_length(bits.len(), "a multiple of 7"));
    }
    let mut out = BitString::with_capacity(bits.len() / 7 * 4);
    let mut corrected = Vec::new();
    for (block, chunk) in bits.as_slice().chunks(7).enumerate() {
        let mut c = [false; 7];
        c.copy_from_slice(chunk);
        let s1 = c[0] ^ c[2] ^ c[4] ^ c[6];
        let s2 = c[1] ^ c[2] ^ c[5] ^ c[6];
        let s4 = c[3] ^ c[4] ^ c[5] ^ c[6];
        let syndrome = (s1 as usize) | ((s2 as usize) << 1) | ((s4 as usize) << 2);
        if syndrome != 0 {
            c[syndrome - 1] = !c[syndrome - 1];
            corrected.push(block);
        }
        for bit in [c[2], c[4], c[5], c[6]] {
            out.push(bit);
        }
    }
    if !corrected.is_empty() {
        log::debug!("hamming74: corrected {} block(s)", corrected.len());
    }
    Ok(HammingDecoded {
        bits: out,
        corrected,
    })
}

/// HDLC bit stuffing: a `0` follows every run of five `1`s.
pub fn bit_stuff(bits: &BitString) -> BitString {
    let mut out = BitString::with_capacity(bits.len() + bits.len() / 5);
    let mut ones = 0;
    for b in bits.iter() {
        out.push(b);
        if b {
            ones += 1;
            if ones == 5 {
                out.push(false);
                ones = 0;
            }
        } else {
            ones = 0;
        }
    }
    out
}

pub fn bit_unstuff(bits: &BitString) -> Result<BitString> {
    let mut out = BitString::with_capacity(bits.len());
    let mut ones = 0;
    let mut iter = bits.iter().enumerate();
    while let Some((_, b)) = iter.next() {
        out.push(b);
        if !b {
            ones = 0;
            continue;
        }
        ones += 1;
        if ones == 5 {
            match iter.next() {
                Some((_, false)) | None => {}
                Some((pos, true)) => {
                    return Err(BitError::corrupt(pos, "six consecutive ones (flag or abort)"));
                }
            }
            ones = 0;
        }
    }
    Ok(out)
}

/// Result of a parity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParityChecked {
    pub bits: BitString,
    /// Indices of blocks whose parity bit does not match
    pub failed: Vec<usize>,
}

fn parity_bit(data: &[bool], even: bool) -> bool {
    let odd_ones = data.iter().filter(|&&b| b).count() % 2 == 1;
    if even { odd_ones } else { !odd_ones }
}

/// Append a parity bit after every `block` data bits (the final block may be short).
pub fn parity_encode(bits: &BitString, block: usize, even: bool) -> Result<BitString> {
    if block == 0 {
        return Err(BitError::invalid_parameter("parity block size must be at least 1"));
    }
    let mut out = BitString::with_capacity(bits.len() + bits.len().div_ceil(block));
    for chunk in bits.as_slice().chunks(block) {
        for &b in chunk {
            out.push(b);
        }
        out.push(parity_bit(chunk, even));
    }
    Ok(out)
}

pub fn parity_check(bits: &BitString, block: usize, even: bool) -> Result<ParityChecked> {
    if block == 0 {
        return Err(BitError::invalid_parameter("parity block size must be at least 1"));
    }
    let framed = block + 1;
    if bits.len() % framed == 1 {
        return Err(BitError::corrupt(
            bits.len() - 1,
            "trailing parity bit without data",
        ));
    }
    let mut out = BitString::with_capacity(bits.len());
    let mut failed = Vec::new();
    for (i, chunk) in bits.as_slice().chunks(framed).enumerate() {
        let (data, parity) = chunk.split_at(chunk.len() - 1);
        for &b in data {
            out.push(b);
        }
        if parity_bit(data, even) != parity[0] {
            failed.push(i);
        }
    }
    Ok(ParityChecked { bits: out, failed })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> BitString {
        BitString::parse(s).unwrap()
    }

    #[test]
    fn test_gray_known_values() {
        // 0..8 as 3-bit numbers map to the reflected sequence
        let expected = ["000", "001", "011", "010", "110", "111", "101", "100"];
        for (n, gray) in expected.iter().enumerate() {
            let binary = BitString::from_uint(n as u64, 3);
            assert_eq!(gray_encode(&binary).to_string(), *gray);
            assert_eq!(gray_decode(&bits(gray)), binary);
        }
    }

    #[test]
    fn test_nrzi() {
        let encoded = nrzi_encode(&bits("1011000"));
        assert_eq!(encoded.to_string(), "1101111");
        assert_eq!(nrzi_decode(&encoded).to_string(), "1011000");
    }

    #[test]
    fn test_manchester() {
        let encoded = manchester_encode(&bits("10"));
        assert_eq!(encoded.to_string(), "0110");
        assert_eq!(manchester_decode(&encoded).unwrap().to_string(), "10");
    }

    #[test]
    fn test_manchester_rejects_bad_pairs() {
        assert!(matches!(
            manchester_decode(&bits("0111")),
            Err(BitError::CorruptStream { position: 2, .. })
        ));
        assert!(matches!(
            manchester_decode(&bits("011")),
            Err(BitError::InvalidLength { .. })
        ));
    }

    #[test]
    fn test_differential_manchester() {
        let data = bits("0011010");
        let encoded = differential_manchester_encode(&data);
        assert_eq!(encoded.to_string(), "10100110100101");
        assert_eq!(differential_manchester_decode(&encoded).unwrap(), data);
        assert!(differential_manchester_decode(&bits("1100")).is_err());
    }

    #[test]
    fn test_hamming_corrects_single_error() {
        let data = bits("1011");
        let encoded = hamming74_encode(&data);
        assert_eq!(encoded.to_string(), "0110011");

        for flip in 0..7 {
            let mut damaged = encoded.as_slice().to_vec();
            damaged[flip] = !damaged[flip];
            let decoded = hamming74_decode(&BitString::from(damaged)).unwrap();
            assert_eq!(decoded.bits, data);
            assert_eq!(decoded.corrected, vec![0]);
        }
    }

    #[test]
    fn test_hamming_pads_to_nibble() {
        let encoded = hamming74_encode(&bits("11"));
        assert_eq!(encoded.len(), 7);
        let decoded = hamming74_decode(&encoded).unwrap();
        assert_eq!(decoded.bits.to_string(), "1100");
        assert!(decoded.corrected.is_empty());
        assert!(hamming74_decode(&bits("101")).is_err());
    }

    #[test]
    fn test_bit_stuffing() {
        let data = bits("0111111101111100");
        let stuffed = bit_stuff(&data);
        assert_eq!(stuffed.to_string(), "011111011011111000");
        assert_eq!(bit_unstuff(&stuffed).unwrap(), data);
        assert!(bit_unstuff(&bits("01111110")).is_err());
    }

    #[test]
    fn test_parity() {
        let encoded = parity_encode(&bits("1101001"), 4, true).unwrap();
        assert_eq!(encoded.to_string(), "110110011");

        let checked = parity_check(&encoded, 4, true).unwrap();
        assert_eq!(checked.bits.to_string(), "1101001");
        assert!(checked.failed.is_empty());

        let mut damaged = encoded.as_slice().to_vec();
        damaged[6] = !damaged[6];
        let checked = parity_check(&BitString::from(damaged), 4, true).unwrap();
        assert_eq!(checked.failed, vec![1]);
    }

    #[test]
    fn test_odd_parity() {
        let encoded = parity_encode(&bits("0000"), 4, false).unwrap();
        assert_eq!(encoded.to_string(), "00001");
        assert!(parity_encode(&bits("01"), 0, true).is_err());
    }
}
