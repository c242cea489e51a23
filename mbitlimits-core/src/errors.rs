// SPDX-License-Identifier: MIT OR Apache-2.0

//! The `errors` module defines the common error type shared by every component of the crate.

use std::fmt;

/// `Error` is an enumeration of all possible errors reported by `mbitlimits-core`.
#[derive(Debug)]
pub enum Error {
    /// An IO error occurred while reading or writing a file.
    Io(std::io::Error),
    /// A bit sequence could not be packed into bytes because its length was not a multiple of 8.
    InputSizeError { bit_len: usize },
    /// The compressed stream's header could not be parsed.
    HeaderParseError(&'static str),
    /// The coded body ended during a mapping drain before the decoder produced the
    /// header-declared number of bits. Carries whatever bits had already been decoded.
    CoderInputExhausted { produced_bits: usize },
    /// A table-derived limit (e.g. the coder word width) fell outside the values this
    /// implementation can represent.
    LimitError(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "io error: {}", err),
            Error::InputSizeError { bit_len } => {
                write!(f, "bit sequence of length {} is not a multiple of 8", bit_len)
            }
            Error::HeaderParseError(msg) => write!(f, "malformed header: {}", msg),
            Error::CoderInputExhausted { produced_bits } => {
                write!(f, "coded body exhausted after producing {} bits", produced_bits)
            }
            Error::LimitError(constraint) => write!(f, "limit reached: {}", constraint),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

/// A specialized `Result` type for `mbitlimits-core` operations.
pub type Result<T> = std::result::Result<T, Error>;
