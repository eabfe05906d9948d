//! Bitwise transformations over [`BitString`].
//!
//! Binary operators take a mask that is repeated cyclically across the
//! input, so `xor(bits, "1")` flips every bit and `xor(bits, "01")` flips
//! every second one.

use crate::core::bits::BitString;
use crate::core::errors::{BitError, Result};

pub fn not(bits: &BitString) -> BitString {
    bits.iter().map(|b| !b).collect()
}

fn with_mask(
    bits: &BitString,
    mask: &BitString,
    f: impl Fn(bool, bool) -> bool,
) -> Result<BitString> {
    if mask.is_empty() {
        return Err(BitError::invalid_parameter("mask must not be empty"));
    }
    Ok(bits
        .iter()
        .zip(mask.iter().cycle())
        .map(|(b, m)| f(b, m))
        .collect())
}

pub fn and(bits: &BitString, mask: &BitString) -> Result<BitString> {
    with_mask(bits, mask, |b, m| b & m)
}

pub fn or(bits: &BitString, mask: &BitString) -> Result<BitString> {
    with_mask(bits, mask, |b, m| b | m)
}

pub fn xor(bits: &BitString, mask: &BitString) -> Result<BitString> {
    with_mask(bits, mask, |b, m| b ^ m)
}

pub fn nand(bits: &BitString, mask: &BitString) -> Result<BitString> {
    with_mask(bits, mask, |b, m| !(b & m))
}

pub fn nor(bits: &BitString, mask: &BitString) -> Result<BitString> {
    with_mask(bits, mask, |b, m| !(b | m))
}

pub fn xnor(bits: &BitString, mask: &BitString) -> Result<BitString> {
    with_mask(bits, mask, |b, m| !(b ^ m))
}

/// Logical shift towards index 0, zero filled. Length is preserved.
pub fn shift_left(bits: &BitString, amount: usize) -> BitString {
    let len = bits.len();
    let amount = amount.min(len);
    let slice = bits.as_slice();
    slice[amount..]
        .iter()
        .copied()
        .chain(std::iter::repeat_n(false, amount))
        .collect()
}

/// Logical shift away from index 0, zero filled. Length is preserved.
pub fn shift_right(bits: &BitString, amount: usize) -> BitString {
    let len = bits.len();
    let amount = amount.min(len);
    let slice = bits.as_slice();
    std::iter::repeat_n(false, amount)
        .chain(slice[..len - amount].iter().copied())
        .collect()
}

pub fn rotate_left(bits: &BitString, amount: usize) -> BitString {
    if bits.is_empty() {
        return BitString::new();
    }
    let mut v = bits.as_slice().to_vec();
    v.rotate_left(amount % bits.len());
    BitString::from(v)
}

pub fn rotate_right(bits: &BitString, amount: usize) -> BitString {
    if bits.is_empty() {
        return BitString::new();
    }
    let mut v = bits.as_slice().to_vec();
    v.rotate_right(amount % bits.len());
    BitString::from(v)
}

pub fn reverse(bits: &BitString) -> BitString {
    bits.as_slice().iter().rev().copied().collect()
}

fn map_range(
    bits: &BitString,
    start: usize,
    end: usize,
    f: impl Fn(bool) -> bool,
) -> Result<BitString> {
    bits.check_range(start, end)?;
    Ok(bits
        .iter()
        .enumerate()
        .map(|(i, b)| if (start..end).contains(&i) { f(b) } else { b })
        .collect())
}

pub fn invert_range(bits: &BitString, start: usize, end: usize) -> Result<BitString> {
    map_range(bits, start, end, |b| !b)
}

pub fn set_range(bits: &BitString, start: usize, end: usize) -> Result<BitString> {
    map_range(bits, start, end, |_| true)
}

pub fn clear_range(bits: &BitString, start: usize, end: usize) -> Result<BitString> {
    map_range(bits, start, end, |_| false)
}

/// Remove `[start, end)`.
pub fn delete(bits: &BitString, start: usize, end: usize) -> Result<BitString> {
    bits.check_range(start, end)?;
    let slice = bits.as_slice();
    Ok(slice[..start].iter().chain(&slice[end..]).copied().collect())
}

/// Insert `insertion` before index `position` (`position == len` appends).
pub fn insert(bits: &BitString, position: usize, insertion: &BitString) -> Result<BitString> {
    bits.check_range(position, position)?;
    let slice = bits.as_slice();
    Ok(slice[..position]
        .iter()
        .chain(insertion.as_slice())
        .chain(&slice[position..])
        .copied()
        .collect())
}

pub fn truncate(bits: &BitString, len: usize) -> BitString {
    BitString::from(&bits.as_slice()[..len.min(bits.len())])
}

pub fn repeat(bits: &BitString, times: usize) -> BitString {
    bits.as_slice().repeat(times).into()
}

/// Number of positions where `a` and `b` differ.
pub fn hamming_distance(a: &BitString, b: &BitString) -> Result<usize> {
    if a.len() != b.len() {
        return Err(BitError::invalid_length(
            b.len(),
            format!("{} bits to match the first operand", a.len()),
        ));
    }
    Ok(a.iter().zip(b.iter()).filter(|(x, y)| x != y).count())
}
