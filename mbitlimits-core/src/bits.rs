// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bit/byte packing utilities.
//!
//! These functions convert between a bit sequence (`Vec<bool>`, most-significant bit first
//! within each byte) and the byte/integer representations the rest of the crate works with.
//! They are total, pure, and hold no state.

use crate::errors::{Error, Result};

/// Converts a byte slice into its bit sequence, most-significant bit first per byte.
pub fn bits_of_bytes(bytes: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for byte in bytes {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1 != 0);
        }
    }
    bits
}

/// Packs a bit sequence into bytes, most-significant bit first per byte.
///
/// Fails if `bits.len()` is not a multiple of 8.
pub fn bytes_of_bits(bits: &[bool]) -> Result<Vec<u8>> {
    if bits.len() % 8 != 0 {
        return Err(Error::InputSizeError { bit_len: bits.len() });
    }

    let mut bytes = Vec::with_capacity(bits.len() / 8);
    for chunk in bits.chunks_exact(8) {
        let mut byte = 0u8;
        for &bit in chunk {
            byte = (byte << 1) | (bit as u8);
        }
        bytes.push(byte);
    }
    Ok(bytes)
}

/// Interprets a bit sequence as a big-endian unsigned integer. Empty input yields 0.
///
/// Reserved for header fields and coder registers, both of which fit well under 64 bits since
/// the word width `W` is bounded by 32 (see `coder::word_width`).
pub fn int_of_bits(bits: &[bool]) -> u64 {
    bits.iter().fold(0u64, |acc, &bit| (acc << 1) | (bit as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_bytes_through_bits() {
        let original = [0x00, 0xff, 0xaa, 0x55, 0x10];
        let bits = bits_of_bytes(&original);
        assert_eq!(bits.len(), original.len() * 8);
        let packed = bytes_of_bits(&bits).unwrap();
        assert_eq!(packed, original);
    }

    #[test]
    fn bits_of_bytes_is_most_significant_bit_first() {
        let bits = bits_of_bytes(&[0b1010_0001]);
        assert_eq!(bits, vec![true, false, true, false, false, false, false, true]);
    }

    #[test]
    fn bytes_of_bits_rejects_misaligned_length() {
        let bits = vec![true, false, true];
        assert!(matches!(bytes_of_bits(&bits), Err(Error::InputSizeError { bit_len: 3 })));
    }

    #[test]
    fn int_of_bits_is_big_endian_and_empty_is_zero() {
        assert_eq!(int_of_bits(&[]), 0);
        assert_eq!(int_of_bits(&[true]), 1);
        assert_eq!(int_of_bits(&[true, false, true]), 0b101);
        assert_eq!(int_of_bits(&[false, false, false, true]), 1);
    }
}
