//! Bit-level compressors and their inverses.
//!
//! These operate on the unpacked bit string rather than on bytes so that the
//! effect of each stage stays visible in the analysis views. Framed outputs
//! (BWT, LZ77) carry a 32-bit big-endian header.

use crate::core::bits::{BitReader, BitString, MAX_BITS};
use crate::core::errors::{BitError, Result};

const HEADER_BITS: usize = 32;

fn push_gamma(out: &mut BitString, value: u64) {
    debug_assert!(value >= 1);
    let width = 64 - value.leading_zeros() as usize;
    for _ in 1..width {
        out.push(false);
    }
    out.push_uint(value, width);
}

fn read_gamma(reader: &mut BitReader<'_>) -> Result<u64> {
    let start = reader.position();
    let mut zeros = 0;
    while !reader.read_bit()? {
        zeros += 1;
        if zeros > 63 {
            return Err(BitError::corrupt(start, "Elias-gamma prefix too long"));
        }
    }
    let tail = reader.read_uint(zeros)?;
    Ok((1u64 << zeros) | tail)
}

/// Run-length encoding: the first bit, then every run length as an
/// Elias-gamma code. Runs alternate, so their bit values are implied.
pub fn rle_encode(bits: &BitString) -> BitString {
    let mut out = BitString::new();
    let slice = bits.as_slice();
    let Some(&first) = slice.first() else {
        return out;
    };
    out.push(first);
    for run in slice.chunk_by(|a, b| a == b) {
        push_gamma(&mut out, run.len() as u64);
    }
    out
}

pub fn rle_decode(bits: &BitString) -> Result<BitString> {
    let mut reader = BitReader::new(bits);
    let mut out = BitString::new();
    if reader.remaining() == 0 {
        return Ok(out);
    }
    let mut current = reader.read_bit()?;
    if reader.remaining() == 0 {
        return Err(BitError::corrupt(1, "missing run lengths"));
    }
    while reader.remaining() > 0 {
        let start = reader.position();
        let run = read_gamma(&mut reader)?;
        if run > (MAX_BITS - out.len()) as u64 {
            return Err(BitError::corrupt(start, "run length exceeds the bit limit"));
        }
        for _ in 0..run {
            out.push(current);
        }
        current = !current;
    }
    Ok(out)
}

fn check_symbol_bits(symbol_bits: u8) -> Result<usize> {
    if !(1..=8).contains(&symbol_bits) {
        return Err(BitError::invalid_parameter(format!(
            "symbol width must be 1..=8 bits, got {}",
            symbol_bits
        )));
    }
    Ok(symbol_bits as usize)
}

fn to_symbols(bits: &BitString, width: usize) -> Result<Vec<u8>> {
    if bits.len() % width != 0 {
        return Err(BitError::invalid_length(
            bits.len(),
            format!("a multiple of the {}-bit symbol width", width),
        ));
    }
    Ok(bits
        .as_slice()
        .chunks(width)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &b| (acc << 1) | b as u8))
        .collect())
}

fn from_symbols(symbols: &[u8], width: usize) -> BitString {
    let mut out = BitString::with_capacity(symbols.len() * width);
    for &symbol in symbols {
        out.push_uint(symbol as u64, width);
    }
    out
}

/// Move-to-front over `symbol_bits`-wide symbols. Output length equals input length.
pub fn mtf_encode(bits: &BitString, symbol_bits: u8) -> Result<BitString> {
    let width = check_symbol_bits(symbol_bits)?;
    let symbols = to_symbols(bits, width)?;
    let mut table: Vec<u8> = (0..1u16 << width).map(|s| s as u8).collect();
    let mut out = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let index = table
            .iter()
            .position(|&s| s == symbol)
            .ok_or_else(|| BitError::invalid_parameter("symbol outside alphabet"))?;
        out.push(index as u8);
        table.remove(index);
        table.insert(0, symbol);
    }
    Ok(from_symbols(&out, width))
}

pub fn mtf_decode(bits: &BitString, symbol_bits: u8) -> Result<BitString> {
    let width = check_symbol_bits(symbol_bits)?;
    let indices = to_symbols(bits, width)?;
    let mut table: Vec<u8> = (0..1u16 << width).map(|s| s as u8).collect();
    let mut out = Vec::with_capacity(indices.len());
    for index in indices {
        let symbol = table.remove(index as usize);
        out.push(symbol);
        table.insert(0, symbol);
    }
    Ok(from_symbols(&out, width))
}

/// Start indices of the cyclic rotations of `symbols` in sorted order.
///
/// Prefix doubling: each round ranks rotations by their first `2k` symbols
/// from the ranks of the first `k`. Equal rotations keep index order.
fn sorted_rotations(symbols: &[u8]) -> Vec<usize> {
    let n = symbols.len();
    let mut rank: Vec<usize> = symbols.iter().map(|&s| s as usize).collect();
    let mut next_rank = vec![0usize; n];
    let mut order: Vec<usize> = (0..n).collect();
    let mut k = 1;
    loop {
        let key = |i: usize| (rank[i], rank[(i + k) % n]);
        order.sort_unstable_by_key(|&i| key(i));
        next_rank[order[0]] = 0;
        for w in 1..n {
            let bump = usize::from(key(order[w - 1]) != key(order[w]));
            next_rank[order[w]] = next_rank[order[w - 1]] + bump;
        }
        std::mem::swap(&mut rank, &mut next_rank);
        if rank[order[n - 1]] == n - 1 || 2 * k >= n {
            break;
        }
        k *= 2;
    }
    order.sort_unstable_by_key(|&i| (rank[i], i));
    order
}

/// Burrows-Wheeler transform over `symbol_bits`-wide symbols.
///
/// Output is a 32-bit primary index followed by the last column.
pub fn bwt_encode(bits: &BitString, symbol_bits: u8) -> Result<BitString> {
    let width = check_symbol_bits(symbol_bits)?;
    let symbols = to_symbols(bits, width)?;
    let n = symbols.len();
    if n == 0 {
        return Ok(BitString::new());
    }
    if n > u32::MAX as usize {
        return Err(BitError::invalid_length(n, "at most 2^32-1 symbols"));
    }

    let rotations = sorted_rotations(&symbols);

    let primary = rotations
        .iter()
        .position(|&r| r == 0)
        .ok_or_else(|| BitError::invalid_parameter("rotation table lost the input"))?;
    let last: Vec<u8> = rotations.iter().map(|&r| symbols[(r + n - 1) % n]).collect();

    let mut out = BitString::from_uint(primary as u64, HEADER_BITS);
    out.extend_from(&from_symbols(&last, width));
    Ok(out)
}

pub fn bwt_decode(bits: &BitString, symbol_bits: u8) -> Result<BitString> {
    let width = check_symbol_bits(symbol_bits)?;
    if bits.is_empty() {
        return Ok(BitString::new());
    }
    let mut reader = BitReader::new(bits);
    let primary = reader.read_uint(HEADER_BITS)? as usize;
    let body = bits.slice(HEADER_BITS, bits.len())?;
    let last = to_symbols(&body, width)?;
    let n = last.len();
    if primary >= n {
        return Err(BitError::corrupt(
            0,
            format!("primary index {} out of range for {} symbols", primary, n),
        ));
    }

    // Stable sort of the last column gives the first column together with
    // the LF mapping back into the last column.
    let mut next: Vec<usize> = (0..n).collect();
    next.sort_by_key(|&i| last[i]);

    let mut out = Vec::with_capacity(n);
    let mut row = next[primary];
    for _ in 0..n {
        out.push(last[row]);
        row = next[row];
    }
    Ok(from_symbols(&out, width))
}

fn check_lz77_params(window_bits: u8, length_bits: u8) -> Result<()> {
    for (name, value) in [("window", window_bits), ("length", length_bits)] {
        if !(1..=16).contains(&value) {
            return Err(BitError::invalid_parameter(format!(
                "{} field width must be 1..=16 bits, got {}",
                name, value
            )));
        }
    }
    Ok(())
}

/// LZ77 with `(offset, length, next bit)` tokens.
///
/// The header holds the original length. An offset of 0 marks a literal.
/// Matches may run past the cursor (overlapping copy).
pub fn lz77_encode(bits: &BitString, window_bits: u8, length_bits: u8) -> Result<BitString> {
    check_lz77_params(window_bits, length_bits)?;
    let n = bits.len();
    if n > u32::MAX as usize {
        return Err(BitError::invalid_length(n, "at most 2^32-1 bits"));
    }
    let s = bits.as_slice();
    let window = (1usize << window_bits) - 1;
    let max_match = (1usize << length_bits) - 1;

    let mut out = BitString::from_uint(n as u64, HEADER_BITS);
    let mut tokens = 0usize;
    let mut i = 0;
    while i < n {
        let limit = max_match.min(n - i - 1);
        let (mut best_offset, mut best_len) = (0usize, 0usize);
        for offset in 1..=window.min(i) {
            let mut len = 0;
            while len < limit && s[i - offset + len] == s[i + len] {
                len += 1;
            }
            if len > best_len {
                best_len = len;
                best_offset = offset;
                if len == limit {
                    break;
                }
            }
        }
        out.push_uint(best_offset as u64, window_bits as usize);
        out.push_uint(best_len as u64, length_bits as usize);
        out.push(s[i + best_len]);
        i += best_len + 1;
        tokens += 1;
    }
    log::debug!("lz77: {} bits -> {} tokens", n, tokens);
    Ok(out)
}

pub fn lz77_decode(bits: &BitString, window_bits: u8, length_bits: u8) -> Result<BitString> {
    check_lz77_params(window_bits, length_bits)?;
    let mut reader = BitReader::new(bits);
    let n = reader.read_uint(HEADER_BITS)? as usize;
    if n > MAX_BITS {
        return Err(BitError::corrupt(0, format!("declared length {} exceeds the bit limit", n)));
    }
    let mut out: Vec<bool> = Vec::with_capacity(n.min(bits.len() << length_bits));

    while out.len() < n {
        let token_start = reader.position();
        let offset = reader.read_uint(window_bits as usize)? as usize;
        let len = reader.read_uint(length_bits as usize)? as usize;
        let next = reader.read_bit()?;

        if offset == 0 && len > 0 {
            return Err(BitError::corrupt(token_start, "match length without offset"));
        }
        if offset > out.len() {
            return Err(BitError::corrupt(
                token_start,
                format!("offset {} reaches before start of output", offset),
            ));
        }
        if out.len() + len + 1 > n {
            return Err(BitError::corrupt(token_start, "token overruns declared length"));
        }
        let from = out.len() - offset;
        for k in 0..len {
            out.push(out[from + k]);
        }
        out.push(next);
    }

    if reader.remaining() > 0 {
        return Err(BitError::corrupt(reader.position(), "trailing bits after last token"));
    }
    Ok(BitString::from(out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> BitString {
        BitString::parse(s).unwrap()
    }

    #[test]
    fn test_gamma_codes() {
        let mut out = BitString::new();
        for v in [1, 2, 3, 4] {
            push_gamma(&mut out, v);
        }
        assert_eq!(out.to_string(), "101001100100");

        let mut reader = BitReader::new(&out);
        for v in [1, 2, 3, 4] {
            assert_eq!(read_gamma(&mut reader).unwrap(), v);
        }
    }

    #[test]
    fn test_rle_layout() {
        // first bit 0, runs of 3 and 1
        assert_eq!(rle_encode(&bits("0001")).to_string(), "00111");
        assert_eq!(rle_decode(&bits("00111")).unwrap().to_string(), "0001");
    }

    #[test]
    fn test_rle_long_runs_shrink() {
        let data = BitString::from(vec![true; 200]);
        let encoded = rle_encode(&data);
        assert!(encoded.len() < 20);
        assert_eq!(rle_decode(&encoded).unwrap(), data);
        assert!(rle_encode(&BitString::new()).is_empty());
    }

    #[test]
    fn test_rle_rejects_truncated_stream() {
        assert!(rle_decode(&bits("1")).is_err());
        assert!(rle_decode(&bits("1001")).is_err());
    }

    #[test]
    fn test_mtf_two_bit_symbols() {
        // symbols 3,3,0,3 -> indices 3,0,1,1
        let encoded = mtf_encode(&bits("11110011"), 2).unwrap();
        assert_eq!(encoded.to_string(), "11000101");
        assert_eq!(mtf_decode(&encoded, 2).unwrap().to_string(), "11110011");
    }

    #[test]
    fn test_mtf_rejects_misaligned_input() {
        assert!(mtf_encode(&bits("101"), 2).is_err());
        assert!(mtf_encode(&bits("10"), 0).is_err());
        assert!(mtf_encode(&bits("10"), 9).is_err());
    }

    #[test]
    fn test_bwt_banana_bits() {
        let data = BitString::from_bytes(b"banana");
        let encoded = bwt_encode(&data, 8).unwrap();
        let mut reader = BitReader::new(&encoded);
        assert_eq!(reader.read_uint(32).unwrap(), 3);
        let last = encoded.slice(32, encoded.len()).unwrap().to_bytes();
        assert_eq!(last, b"nnbaaa");
        assert_eq!(bwt_decode(&encoded, 8).unwrap(), data);
    }

    #[test]
    fn test_bwt_single_bits_and_periodic_input() {
        for text in ["1011001110", "010101", "1", "0000"] {
            let data = bits(text);
            let encoded = bwt_encode(&data, 1).unwrap();
            assert_eq!(bwt_decode(&encoded, 1).unwrap(), data, "input {}", text);
        }
    }

    #[test]
    fn test_bwt_constant_and_periodic_input_is_fast() {
        let zeros = BitString::from(vec![false; 1 << 18]);
        let encoded = bwt_encode(&zeros, 8).unwrap();
        assert_eq!(BitReader::new(&encoded).read_uint(32).unwrap(), 0);
        assert_eq!(bwt_decode(&encoded, 8).unwrap(), zeros);

        let periodic = bits(&"0110".repeat(1 << 14));
        let encoded = bwt_encode(&periodic, 4).unwrap();
        assert_eq!(bwt_decode(&encoded, 4).unwrap(), periodic);
    }

    #[test]
    fn test_bwt_rejects_bad_primary_index() {
        let mut encoded = BitString::from_uint(9, 32);
        encoded.extend_from(&bits("0101"));
        assert!(bwt_decode(&encoded, 1).is_err());
    }

    #[test]
    fn test_lz77_repetitive_input() {
        let data = bits(&"1100".repeat(32));
        let encoded = lz77_encode(&data, 4, 5).unwrap();
        assert!(encoded.len() < data.len());
        assert_eq!(lz77_decode(&encoded, 4, 5).unwrap(), data);
    }

    #[test]
    fn test_lz77_literals_and_edges() {
        for text in ["", "1", "10", "0110100110010110"] {
            let data = bits(text);
            let encoded = lz77_encode(&data, 3, 3).unwrap();
            assert_eq!(lz77_decode(&encoded, 3, 3).unwrap(), data, "input {:?}", text);
        }
    }

    #[test]
    fn test_lz77_rejects_bad_offset() {
        // header says 2 bits; first token points back 1 bit into nothing
        let mut stream = BitString::from_uint(2, 32);
        stream.push_uint(1, 3);
        stream.push_uint(1, 3);
        stream.push(true);
        assert!(matches!(
            lz77_decode(&stream, 3, 3),
            Err(BitError::CorruptStream { position: 32, .. })
        ));
        assert!(lz77_encode(&bits("1"), 0, 3).is_err());
    }
}
