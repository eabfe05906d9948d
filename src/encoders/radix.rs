//! Numeric views of a bit string.

use crate::core::bits::{BitString, MAX_BITS};
use crate::core::errors::{BitError, Result};
use num_bigint::BigUint;
use num_traits::{Num, Zero};

fn check_radix(radix: u32) -> Result<()> {
    if !(2..=36).contains(&radix) {
        return Err(BitError::invalid_parameter(format!(
            "radix must be between 2 and 36, got {}",
            radix
        )));
    }
    Ok(())
}

fn to_biguint(bits: &BitString) -> BigUint {
    bits.iter().fold(BigUint::zero(), |acc, bit| {
        (acc << 1u32) + if bit { 1u32 } else { 0u32 }
    })
}

/// The bit string read as an unsigned big-endian integer, rendered in `radix`.
pub fn to_radix(bits: &BitString, radix: u32) -> Result<String> {
    check_radix(radix)?;
    if bits.is_empty() {
        return Err(BitError::EmptyInput);
    }
    Ok(to_biguint(bits).to_str_radix(radix))
}

/// Parse an unsigned integer in `radix` and left pad it to `width` bits.
///
/// With `width == None` the minimal width is used (at least one bit).
pub fn from_radix(text: &str, radix: u32, width: Option<usize>) -> Result<BitString> {
    check_radix(radix)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(BitError::EmptyInput);
    }
    let value = BigUint::from_str_radix(text, radix).map_err(|e| {
        BitError::invalid_parameter(format!("'{}' is not a base-{} number: {}", text, radix, e))
    })?;

    let needed = (value.bits() as usize).max(1);
    let width = width.unwrap_or(needed);
    if width > MAX_BITS {
        return Err(BitError::invalid_parameter(format!(
            "width {} exceeds the {} bit limit",
            width, MAX_BITS
        )));
    }
    if needed > width {
        return Err(BitError::invalid_parameter(format!(
            "value needs {} bits but width is {}",
            needed, width
        )));
    }

    let mut out = BitString::with_capacity(width);
    for i in (0..width as u64).rev() {
        out.push(value.bit(i));
    }
    Ok(out)
}

/// Lowercase hex of the packed bytes (last byte zero padded).
pub fn to_hex(bits: &BitString) -> String {
    hex::encode(bits.to_bytes())
}

pub fn from_hex(text: &str) -> Result<BitString> {
    let bytes = hex::decode(text.trim())
        .map_err(|e| BitError::invalid_parameter(format!("invalid hex: {}", e)))?;
    Ok(BitString::from_bytes(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> BitString {
        BitString::parse(s).unwrap()
    }

    #[test]
    fn test_to_radix() {
        assert_eq!(to_radix(&bits("11111111"), 10).unwrap(), "255");
        assert_eq!(to_radix(&bits("11111111"), 16).unwrap(), "ff");
        assert_eq!(to_radix(&bits("000101"), 8).unwrap(), "5");
        assert_eq!(to_radix(&bits("0"), 2).unwrap(), "0");
        assert!(to_radix(&BitString::new(), 10).is_err());
        assert!(to_radix(&bits("1"), 37).is_err());
    }

    #[test]
    fn test_large_values() {
        let ones = BitString::from(vec![true; 128]);
        assert_eq!(
            to_radix(&ones, 10).unwrap(),
            "340282366920938463463374607431768211455"
        );
    }

    #[test]
    fn test_from_radix_width() {
        assert_eq!(from_radix("5", 10, Some(8)).unwrap().to_string(), "00000101");
        assert_eq!(from_radix("ff", 16, None).unwrap().to_string(), "11111111");
        assert_eq!(from_radix("0", 10, None).unwrap().to_string(), "0");
        assert!(from_radix("256", 10, Some(8)).is_err());
        assert!(from_radix("12z", 10, None).is_err());
    }

    #[test]
    fn test_from_radix_rejects_huge_width() {
        assert!(matches!(
            from_radix("5", 10, Some(usize::MAX)),
            Err(BitError::InvalidParameter(_))
        ));
        assert!(from_radix("5", 10, Some(MAX_BITS + 1)).is_err());
    }

    #[test]
    fn test_hex_view() {
        assert_eq!(to_hex(&bits("1010101111")), "abc0");
        assert_eq!(from_hex("0f").unwrap().to_string(), "00001111");
        assert!(from_hex("zz").is_err());
    }
}
