// SPDX-License-Identifier: MIT OR Apache-2.0

//! The self-describing compressed file header: padding length, Markov order, the occurrence
//! table, and the original bit-sequence length the decoder needs before it can decode the body.
//!
//! The length field is not cosmetic: the coder's `tag == lower` convergence is not a unique
//! terminal marker (a near-symmetric model can revisit `lower`'s initial value mid-stream), so
//! the decoder is told exactly how many bits to produce rather than guessing from convergence.

use crate::errors::{Error, Result};
use crate::model::OccurrenceTable;

const PADDING_BITS: usize = 3;
const ORDER_BITS: usize = 5;
const COUNT_BITS: usize = 32;
const LENGTH_BITS: usize = 64;

/// Serializes `padding_number` (must fit in 3 bits), the original bit-sequence length, and
/// `table` into the header's bit sequence.
pub fn write_header(padding_number: u8, sequence_bit_length: u64, table: &OccurrenceTable) -> Vec<bool> {
    debug_assert!(padding_number < 8, "padding_number must fit in 3 bits");

    let mut out = Vec::with_capacity(
        PADDING_BITS + ORDER_BITS + table.num_keys() * COUNT_BITS + LENGTH_BITS,
    );
    push_uint(&mut out, padding_number as u64, PADDING_BITS);
    push_uint(&mut out, table.order() as u64, ORDER_BITS);
    for &count in table.counts() {
        push_uint(&mut out, count as u64, COUNT_BITS);
    }
    push_uint(&mut out, sequence_bit_length, LENGTH_BITS);
    out
}

/// Parses a header from the front of `bits`, returning the padding length, the original
/// bit-sequence length, the reconstructed table, and the bit offset at which the coded body
/// begins.
pub fn parse_header(bits: &[bool]) -> Result<(u8, u64, OccurrenceTable, usize)> {
    if bits.len() < PADDING_BITS + ORDER_BITS {
        return Err(Error::HeaderParseError("input too short to contain a padding/order prefix"));
    }

    let padding_number = read_uint(&bits[0..PADDING_BITS]) as u8;
    let order = read_uint(&bits[PADDING_BITS..PADDING_BITS + ORDER_BITS]) as u32;

    let num_keys = 1usize << (order as usize + 1);
    let table_bits = num_keys
        .checked_mul(COUNT_BITS)
        .ok_or(Error::HeaderParseError("markov order implies an unrepresentable table size"))?;
    let table_start = PADDING_BITS + ORDER_BITS;
    let table_end = table_start + table_bits;
    let body_start = table_end + LENGTH_BITS;

    if bits.len() < body_start {
        return Err(Error::HeaderParseError("input too short to contain the full occurrence table"));
    }

    let counts = bits[table_start..table_end].chunks_exact(COUNT_BITS).map(read_uint32).collect();
    let table = OccurrenceTable::from_counts(order, counts)?;
    let sequence_bit_length = read_uint(&bits[table_end..body_start]);

    Ok((padding_number, sequence_bit_length, table, body_start))
}

fn push_uint(out: &mut Vec<bool>, value: u64, width: usize) {
    for i in (0..width).rev() {
        out.push((value >> i) & 1 != 0);
    }
}

fn read_uint(bits: &[bool]) -> u64 {
    bits.iter().fold(0u64, |acc, &bit| (acc << 1) | (bit as u64))
}

fn read_uint32(bits: &[bool]) -> u32 {
    read_uint(bits) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_a_small_table() {
        let table = OccurrenceTable::build(&[true, false, true, true, false], 1).unwrap();
        let header = write_header(5, 5, &table);

        let (padding, length, parsed, body_start) = parse_header(&header).unwrap();
        assert_eq!(padding, 5);
        assert_eq!(length, 5);
        assert_eq!(parsed.order(), table.order());
        assert_eq!(parsed.counts(), table.counts());
        assert_eq!(body_start, header.len());
    }

    #[test]
    fn rejects_truncated_prefix() {
        let bits = vec![true, false];
        let err = parse_header(&bits).unwrap_err();
        assert!(matches!(err, Error::HeaderParseError(_)));
    }

    #[test]
    fn rejects_order_too_large_for_available_bits() {
        // order = 31 (binary 11111) implies a table far larger than this short input can hold.
        let mut bits = vec![false, false, false];
        bits.extend([true, true, true, true, true]);
        let err = parse_header(&bits).unwrap_err();
        assert!(matches!(err, Error::HeaderParseError(_)));
    }
}
