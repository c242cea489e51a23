// SPDX-License-Identifier: MIT OR Apache-2.0

//! `mbitlimits-core` implements a lossless bit-stream compressor built on an order-M Markov
//! occurrence model and a finite-precision arithmetic coder.
//!
//! The pipeline is: read a file into bits, build (or, on decode, parse) an [`model::OccurrenceTable`],
//! run it through a [`coder::Coder`], and write the header-prefixed result back out as bytes.

pub mod bits;
pub mod coder;
pub mod errors;
pub mod header;
pub mod model;

use std::path::Path;

pub use errors::{Error, Result};

use coder::Coder;
use model::OccurrenceTable;

/// Reads `input_path`, builds an order-`order` occurrence table over its bits, arithmetic-codes
/// the file, and writes the header-prefixed result to `output_path`.
pub fn encode_file(order: u32, input_path: &Path, output_path: &Path) -> Result<()> {
    log::info!("encoding {} at order {}", input_path.display(), order);

    let input_bytes = std::fs::read(input_path)?;
    let sequence = bits::bits_of_bytes(&input_bytes);
    log::debug!("read {} input bits", sequence.len());

    let table = OccurrenceTable::build(&sequence, order)?;
    log::debug!("occurrence table has {} keys, sum {}", table.num_keys(), table.sum());

    let coder = Coder::new(&table)?;
    log::debug!("coder word width is {} bits", coder.word_width());
    let sequence_bit_length = sequence.len() as u64;
    let (coded_body, padding_number) = coder.encode(&sequence);

    let mut out_bits = header::write_header(padding_number, sequence_bit_length, &table);
    out_bits.extend(coded_body);

    let out_bytes = bits::bytes_of_bits(&out_bits)?;
    std::fs::write(output_path, &out_bytes)?;
    log::info!("wrote {} bytes to {}", out_bytes.len(), output_path.display());
    Ok(())
}

/// Reads a header-prefixed file produced by [`encode_file`], reconstructs its occurrence table,
/// decodes the coded body, and writes the recovered bytes to `output_path`.
pub fn decode_file(input_path: &Path, output_path: &Path) -> Result<()> {
    log::info!("decoding {}", input_path.display());

    let input_bytes = std::fs::read(input_path)?;
    let all_bits = bits::bits_of_bytes(&input_bytes);

    let (padding_number, sequence_bit_length, table, body_start) = header::parse_header(&all_bits)?;
    log::debug!(
        "header declares order {}, padding {}, sequence length {}",
        table.order(),
        padding_number,
        sequence_bit_length
    );

    let body_end = all_bits.len() - padding_number as usize;
    let coded_body = &all_bits[body_start..body_end];

    let coder = Coder::new(&table)?;
    let (decoded, exhausted) = coder.decode(coded_body, sequence_bit_length as usize);
    if exhausted {
        let err = Error::CoderInputExhausted { produced_bits: decoded.len() };
        log::warn!("{}", err);
    }

    let out_bytes = bits::bytes_of_bits(&decoded)?;
    std::fs::write(output_path, &out_bytes)?;
    log::info!("wrote {} bytes to {}", out_bytes.len(), output_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_decode_recovers_the_original_file() {
        let dir = std::env::temp_dir().join(format!("mbitlimits-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input_path = dir.join("input.bin");
        let coded_path = dir.join("coded.mbl");
        let output_path = dir.join("output.bin");

        std::fs::write(&input_path, [0x00u8, 0xff, 0x3c, 0x81, 0xaa, 0x55]).unwrap();

        encode_file(2, &input_path, &coded_path).unwrap();
        decode_file(&coded_path, &output_path).unwrap();

        let original = std::fs::read(&input_path).unwrap();
        let recovered = std::fs::read(&output_path).unwrap();
        assert_eq!(original, recovered);

        let _ = std::fs::remove_dir_all(&dir);
    }
}
