// SPDX-License-Identifier: MIT OR Apache-2.0

//! The finite-precision arithmetic coder/decoder: a state machine over two integer limits and
//! (on decode) a tag, with three renormalization mappings (E1/E2/E3) that keep the interval
//! representable in a bounded word width.

use crate::bits::int_of_bits;
use crate::errors::{Error, Result};
use crate::model::OccurrenceTable;

/// Computes the coder's word width `W = 2 + ceil(log2(sum))` for a table whose counts sum to
/// `sum`. Requires `3 <= W <= 32`; the internal registers are widened to `u64`/`u128` so that any
/// `W` in that range can be handled without native overflow.
pub fn word_width(sum: u64) -> Result<u32> {
    debug_assert!(sum >= 1, "an occurrence table always has a strictly positive sum");
    let ceil_log2 = 64 - (sum - 1).leading_zeros();
    let width = 2 + ceil_log2;
    if !(3..=32).contains(&width) {
        return Err(Error::LimitError("word width out of range (expected 3..=32)"));
    }
    Ok(width)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mapping {
    None,
    E1,
    E2,
    E3,
}

/// A single coder state machine. The same type drives both directions: construct it over a
/// frozen [`OccurrenceTable`], then consume it with [`Coder::encode`] or [`Coder::decode`].
pub struct Coder<'t> {
    table: &'t OccurrenceTable,
    word_width: u32,
    mask: u64,
    lower: u64,
    upper: u64,
    tag: Option<u64>,
    window: u32,
    window_mask: u32,
    e3_counter: u64,
}

impl<'t> Coder<'t> {
    pub fn new(table: &'t OccurrenceTable) -> Result<Self> {
        let word_width = word_width(table.sum())?;
        let mask = (1u64 << word_width) - 1;
        let window_width = table.window_width();
        let window_mask = if window_width >= 32 { u32::MAX } else { (1u32 << window_width) - 1 };

        Ok(Coder {
            table,
            word_width,
            mask,
            lower: 0,
            upper: mask,
            tag: None,
            window: 0,
            window_mask,
            e3_counter: 0,
        })
    }

    pub fn word_width(&self) -> u32 {
        self.word_width
    }

    /// Encodes `sequence` and returns the coded body (with trailing zero padding applied) along
    /// with the padding length in `0..=7`.
    pub fn encode(mut self, sequence: &[bool]) -> (Vec<bool>, u8) {
        let mut out = Vec::new();
        for &bit in sequence {
            self.slide_window(bit);
            self.update_limits();
            self.drain_encode(&mut out);
        }
        self.flush_encode(&mut out);

        let padding = ((8 - out.len() % 8) % 8) as u8;
        out.extend(std::iter::repeat(false).take(padding as usize));
        (out, padding)
    }

    /// Decodes exactly `length` bits from `coded_bits`. The second tuple element is `true` when
    /// the stream ran out during a mapping drain before `length` bits were recovered; the caller
    /// is expected to build an [`crate::errors::Error::CoderInputExhausted`] from the partial
    /// output it already has (see `decode_file`), since that case is not fatal here.
    ///
    /// `length` is carried out-of-band (in the file header) rather than inferred from
    /// `tag == lower`: for a model whose probabilities keep splitting the interval evenly,
    /// `lower` returns to its initial value after *every* symbol, not only at the true end, so
    /// that convergence is not a trustworthy stopping signal on its own.
    pub fn decode(mut self, coded_bits: &[bool], length: usize) -> (Vec<bool>, bool) {
        let ww = self.word_width as usize;
        if coded_bits.len() < ww {
            return (Vec::new(), true);
        }

        self.tag = Some(int_of_bits(&coded_bits[..ww]));
        let mut cursor = ww;
        let mut decoded = Vec::with_capacity(length);

        for _ in 0..length {
            let bit = self.decode_one_bit();
            decoded.push(bit);
            if self.drain_decode(coded_bits, &mut cursor) {
                return (decoded, true);
            }
        }

        (decoded, false)
    }

    fn slide_window(&mut self, bit: bool) {
        self.window = ((self.window << 1) | bit as u32) & self.window_mask;
    }

    fn decode_one_bit(&mut self) -> bool {
        let order = self.table.order();
        let ctx_mask = if order == 0 { 0 } else { (1u32 << order) - 1 };
        let ctx = self.window & ctx_mask;
        let denom = self.table.total_count((ctx << 1) | 1);
        let threshold = self.table.counts()[(ctx << 1) as usize] as u64;

        let span = self.upper - self.lower + 1;
        let tag_factor = self.tag.expect("tag initialized before decode_one_bit is called") - self.lower + 1;
        let numerator = (tag_factor as u128) * (denom as u128) - 1;
        let value = (numerator / span as u128) as u64;
        let bit = value >= threshold;

        self.slide_window(bit);
        self.update_limits();
        bit
    }

    /// Shared interval update: rescales `[lower, upper]` against the cumulative frequencies of
    /// the current `order+1`-bit window.
    fn update_limits(&mut self) {
        let span = (self.upper - self.lower + 1) as u128;
        let (cum_low, cum_high) = self.table.cum_pair(self.window);
        let denom = self.table.total_count(self.window) as u128;

        self.upper = self.lower + (span * cum_high as u128 / denom) as u64 - 1;
        self.lower += (span * cum_low as u128 / denom) as u64;
    }

    fn decide_mapping(&self) -> Mapping {
        let lower_msb = (self.lower >> (self.word_width - 1)) & 1;
        let upper_msb = (self.upper >> (self.word_width - 1)) & 1;

        if lower_msb == upper_msb {
            return if lower_msb == 0 { Mapping::E1 } else { Mapping::E2 };
        }

        let lower_2nd = (self.lower >> (self.word_width - 2)) & 1;
        let upper_2nd = (self.upper >> (self.word_width - 2)) & 1;
        if lower_2nd == 1 && upper_2nd == 0 {
            Mapping::E3
        } else {
            Mapping::None
        }
    }

    fn shift_limits(&mut self) {
        self.lower = (self.lower << 1) & self.mask;
        self.upper = ((self.upper << 1) & self.mask) | 1;
    }

    fn shift_tag(&mut self, bit: bool) {
        if let Some(tag) = &mut self.tag {
            *tag = ((*tag << 1) & self.mask) | bit as u64;
        }
    }

    fn complement_msbs(&mut self, include_tag: bool) {
        let msb_mask = 1u64 << (self.word_width - 1);
        self.lower ^= msb_mask;
        self.upper ^= msb_mask;
        if include_tag {
            if let Some(tag) = &mut self.tag {
                *tag ^= msb_mask;
            }
        }
    }

    fn drain_encode(&mut self, out: &mut Vec<bool>) {
        loop {
            match self.decide_mapping() {
                Mapping::E1 => {
                    out.push(false);
                    out.extend(std::iter::repeat(true).take(self.e3_counter as usize));
                    self.e3_counter = 0;
                    self.shift_limits();
                }
                Mapping::E2 => {
                    out.push(true);
                    out.extend(std::iter::repeat(false).take(self.e3_counter as usize));
                    self.e3_counter = 0;
                    self.shift_limits();
                }
                Mapping::E3 => {
                    self.shift_limits();
                    self.complement_msbs(false);
                    self.e3_counter += 1;
                }
                Mapping::None => break,
            }
        }
    }

    /// Returns `true` if the coded stream ran out while trying to pull the next bit into `tag`.
    fn drain_decode(&mut self, coded_bits: &[bool], cursor: &mut usize) -> bool {
        loop {
            match self.decide_mapping() {
                Mapping::E1 | Mapping::E2 => {
                    self.shift_limits();
                    if *cursor >= coded_bits.len() {
                        return true;
                    }
                    let next_bit = coded_bits[*cursor];
                    *cursor += 1;
                    self.shift_tag(next_bit);
                }
                Mapping::E3 => {
                    self.shift_limits();
                    if *cursor >= coded_bits.len() {
                        return true;
                    }
                    let next_bit = coded_bits[*cursor];
                    *cursor += 1;
                    self.shift_tag(next_bit);
                    self.complement_msbs(true);
                }
                Mapping::None => return false,
            }
        }
    }

    fn flush_encode(&mut self, out: &mut Vec<bool>) {
        let ww = self.word_width;
        let msb = (self.lower >> (ww - 1)) & 1 == 1;
        out.push(msb);

        // The corrected complement of the flush bit, per the specification's deviation note:
        // the complement of the *leading bit*, not the parity of the whole `lower` register.
        let complement = !msb;
        out.extend(std::iter::repeat(complement).take(self.e3_counter as usize));

        for i in (0..ww - 1).rev() {
            out.push((self.lower >> i) & 1 == 1);
        }
    }
}
