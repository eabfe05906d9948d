//! The [`BitString`] type shared by every module.
//!
//! Bits are stored unpacked, one `bool` per bit, which keeps indexing and
//! slicing trivial for the analysis code. Packing only happens at the edges
//! (file I/O, byte compressors, digests).

use crate::core::errors::{BitError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Upper bound on the length of any bit string built by a generator or
/// decoder, so a corrupt header cannot exhaust memory.
pub const MAX_BITS: usize = 1 << 30;

/// An owned sequence of bits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitString {
    bits: Vec<bool>,
}

impl BitString {
    pub fn new() -> Self {
        Self { bits: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: Vec::with_capacity(capacity),
        }
    }

    /// Parse a textual bit string.
    ///
    /// Whitespace and `_` act as visual separators and are skipped. Any other
    /// character that is not `0` or `1` is rejected with its character index.
    pub fn parse(text: &str) -> Result<Self> {
        let mut bits = Vec::with_capacity(text.len());
        for (position, ch) in text.chars().enumerate() {
            match ch {
                '0' => bits.push(false),
                '1' => bits.push(true),
                c if c.is_whitespace() || c == '_' => {}
                c => return Err(BitError::InvalidBit { ch: c, position }),
            }
        }
        Ok(Self { bits })
    }

    /// Unpack bytes, most significant bit first.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut bits = Vec::with_capacity(bytes.len() * 8);
        for byte in bytes {
            for shift in (0..8).rev() {
                bits.push((byte >> shift) & 1 == 1);
            }
        }
        Self { bits }
    }

    /// Pack into bytes, most significant bit first. The last byte is padded
    /// with zero bits.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits
            .chunks(8)
            .map(|chunk| {
                chunk
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, &bit)| acc | ((bit as u8) << (7 - i)))
            })
            .collect()
    }

    /// Write `value` as a fixed-width big-endian field.
    pub fn from_uint(value: u64, width: usize) -> Self {
        let mut out = Self::with_capacity(width);
        out.push_uint(value, width);
        out
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<bool> {
        self.bits.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + Clone + '_ {
        self.bits.iter().copied()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    pub fn into_vec(self) -> Vec<bool> {
        self.bits
    }

    pub fn ones(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    pub fn zeros(&self) -> usize {
        self.len() - self.ones()
    }

    pub fn push(&mut self, bit: bool) {
        self.bits.push(bit);
    }

    /// Append `value` as a `width`-bit big-endian field.
    pub fn push_uint(&mut self, value: u64, width: usize) {
        for shift in (0..width).rev() {
            self.bits.push(shift < 64 && (value >> shift) & 1 == 1);
        }
    }

    pub fn extend_from(&mut self, other: &BitString) {
        self.bits.extend_from_slice(&other.bits);
    }

    pub fn concat(&self, other: &BitString) -> BitString {
        let mut out = self.clone();
        out.extend_from(other);
        out
    }

    /// Copy out `[start, end)`.
    pub fn slice(&self, start: usize, end: usize) -> Result<BitString> {
        self.check_range(start, end)?;
        Ok(Self::from(&self.bits[start..end]))
    }

    pub fn check_range(&self, start: usize, end: usize) -> Result<()> {
        if start > end || end > self.len() {
            return Err(BitError::RangeOutOfBounds {
                start,
                end,
                len: self.len(),
            });
        }
        Ok(())
    }

    /// Text form with a space every `group` bits.
    pub fn grouped(&self, group: usize) -> String {
        if group == 0 {
            return self.to_string();
        }
        let mut out = String::with_capacity(self.len() + self.len() / group);
        for (i, bit) in self.bits.iter().enumerate() {
            if i > 0 && i % group == 0 {
                out.push(' ');
            }
            out.push(if *bit { '1' } else { '0' });
        }
        out
    }
}

impl From<Vec<bool>> for BitString {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl From<&[bool]> for BitString {
    fn from(bits: &[bool]) -> Self {
        Self {
            bits: bits.to_vec(),
        }
    }
}

impl FromIterator<bool> for BitString {
    fn from_iter<I: IntoIterator<Item = bool>>(iter: I) -> Self {
        Self {
            bits: iter.into_iter().collect(),
        }
    }
}

impl FromStr for BitString {
    type Err = BitError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: String = self
            .bits
            .iter()
            .map(|&b| if b { '1' } else { '0' })
            .collect();
        f.write_str(&text)
    }
}

impl Serialize for BitString {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for BitString {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        BitString::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Sequential reader over a bit string, used by the decoders.
pub(crate) struct BitReader<'a> {
    bits: &'a [bool],
    pos: usize,
}

impl<'a> BitReader<'a> {
    pub(crate) fn new(bits: &'a BitString) -> Self {
        Self {
            bits: bits.as_slice(),
            pos: 0,
        }
    }

    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    pub(crate) fn remaining(&self) -> usize {
        self.bits.len() - self.pos
    }

    pub(crate) fn read_bit(&mut self) -> Result<bool> {
        let bit = self
            .bits
            .get(self.pos)
            .copied()
            .ok_or_else(|| BitError::corrupt(self.pos, "unexpected end of stream"))?;
        self.pos += 1;
        Ok(bit)
    }

    pub(crate) fn read_uint(&mut self, width: usize) -> Result<u64> {
        if width > 64 {
            return Err(BitError::invalid_parameter(format!(
                "field width {} exceeds 64 bits",
                width
            )));
        }
        if self.remaining() < width {
            return Err(BitError::corrupt(
                self.pos,
                format!("need {} bits, {} left", width, self.remaining()),
            ));
        }
        let mut value = 0u64;
        for _ in 0..width {
            value = (value << 1) | self.bits[self.pos] as u64;
            self.pos += 1;
        }
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_skips_separators() {
        let bits = BitString::parse("1010_0011\n 01").unwrap();
        assert_eq!(bits.to_string(), "1010001101");
        assert_eq!(bits.len(), 10);
    }

    #[test]
    fn test_parse_reports_position() {
        match BitString::parse("10 2") {
            Err(BitError::InvalidBit { ch, position }) => {
                assert_eq!(ch, '2');
                assert_eq!(position, 3);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_bytes_msb_first() {
        let bits = BitString::from_bytes(&[0b1000_0001, 0xFF]);
        assert_eq!(bits.to_string(), "1000000111111111");
        assert_eq!(bits.to_bytes(), vec![0b1000_0001, 0xFF]);
    }

    #[test]
    fn test_to_bytes_pads_last_byte() {
        let bits = BitString::parse("101").unwrap();
        assert_eq!(bits.to_bytes(), vec![0b1010_0000]);
    }

    #[test]
    fn test_ones_and_zeros() {
        let bits = BitString::parse("1101000").unwrap();
        assert_eq!(bits.ones(), 3);
        assert_eq!(bits.zeros(), 4);
    }

    #[test]
    fn test_slice_bounds() {
        let bits = BitString::parse("110100").unwrap();
        assert_eq!(bits.slice(1, 4).unwrap().to_string(), "101");
        assert!(bits.slice(4, 2).is_err());
        assert!(bits.slice(0, 7).is_err());
        assert!(bits.slice(6, 6).unwrap().is_empty());
    }

    #[test]
    fn test_grouped() {
        let bits = BitString::parse("11110000101").unwrap();
        assert_eq!(bits.grouped(4), "1111 0000 101");
    }

    #[test]
    fn test_uint_fields() {
        let mut bits = BitString::from_uint(5, 4);
        bits.push_uint(1, 2);
        assert_eq!(bits.to_string(), "010101");

        let mut reader = BitReader::new(&bits);
        assert_eq!(reader.read_uint(4).unwrap(), 5);
        assert_eq!(reader.read_uint(2).unwrap(), 1);
        assert!(reader.read_bit().is_err());
    }

    #[test]
    fn test_serde_text_form() {
        let bits = BitString::parse("0110").unwrap();
        let json = serde_json::to_string(&bits).unwrap();
        assert_eq!(json, "\"0110\"");
        let back: BitString = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bits);
        assert!(serde_json::from_str::<BitString>("\"01a\"").is_err());
    }

    #[test]
    fn test_iter_cycles() {
        let mask = BitString::parse("01").unwrap();
        let cycled: String = mask
            .iter()
            .cycle()
            .take(5)
            .map(|b| if b { '1' } else { '0' })
            .collect();
        assert_eq!(cycled, "01010");
    }
}
