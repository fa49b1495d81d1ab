//! igbinary encoder/decoder error type.

use igbinary_buffers::BufferError;
use thiserror::Error;

use crate::constants::{FORMAT_VERSION, LEGACY_FORMAT_VERSION};

/// Error type for igbinary encoding and decoding.
///
/// Every variant is terminal for the call that produced it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IgbinaryError {
    #[error("unexpected end of buffer")]
    EndOfBuffer,
    #[error(
        "unsupported format version {0}, expected {current} or {legacy}",
        current = FORMAT_VERSION,
        legacy = LEGACY_FORMAT_VERSION
    )]
    UnsupportedVersion(u32),
    #[error("length {len} exceeds the {remaining} bytes remaining")]
    CorruptLength { len: u32, remaining: usize },
    #[error("back-reference {index} out of bounds ({len} entries)")]
    InvalidBackReference { index: u32, len: usize },
    #[error("invalid array key type 0x{0:02x}")]
    InvalidKeyType(u8),
    #[error("unsupported value kind: {0}")]
    UnsupportedValueKind(&'static str),
    #[error("length {0} exceeds the maximum representable width")]
    LengthOverflow(usize),
    #[error("custom serialization of class `{0}` must produce a string or null")]
    InvalidCustomSerialization(String),
    #[error("unknown type tag 0x{tag:02x} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },
    #[error("64-bit integer magnitude {0} out of range")]
    IntegerOverflow(u64),
    #[error("{0} trailing bytes after the value")]
    TrailingData(usize),
    #[error("nesting depth exceeds the limit of {0}")]
    DepthLimitExceeded(usize),
}

impl From<BufferError> for IgbinaryError {
    fn from(err: BufferError) -> Self {
        match err {
            BufferError::EndOfBuffer => IgbinaryError::EndOfBuffer,
        }
    }
}

pub type Result<T> = std::result::Result<T, IgbinaryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            IgbinaryError::UnsupportedVersion(7).to_string(),
            "unsupported format version 7, expected 2 or 1"
        );
        assert_eq!(
            IgbinaryError::InvalidKeyType(0x14).to_string(),
            "invalid array key type 0x14"
        );
        assert_eq!(
            IgbinaryError::UnknownTag { tag: 0xfe, offset: 5 }.to_string(),
            "unknown type tag 0xfe at offset 5"
        );
    }

    #[test]
    fn buffer_error_converts() {
        let err: IgbinaryError = BufferError::EndOfBuffer.into();
        assert_eq!(err, IgbinaryError::EndOfBuffer);
    }
}
