//! Big-endian byte cursor for the igbinary codec.
//!
//! # Overview
//!
//! - [`Reader`] - Reads big-endian integers and byte ranges from a slice,
//!   failing with [`BufferError::EndOfBuffer`] instead of reading past the end
//! - [`Writer`] - Appends big-endian integers and byte ranges to a growable buffer
//!
//! # Example
//!
//! ```
//! use igbinary_buffers::{BufferError, Reader, Writer};
//!
//! let mut writer = Writer::new();
//! writer.u8(0x01);
//! writer.u16(0x0203);
//! writer.buf(b"hello");
//! let data = writer.flush();
//!
//! let mut reader = Reader::new(&data);
//! assert_eq!(reader.u8(), Ok(0x01));
//! assert_eq!(reader.u16(), Ok(0x0203));
//! assert_eq!(reader.buf(5), Ok(&b"hello"[..]));
//! assert_eq!(reader.u8(), Err(BufferError::EndOfBuffer));
//! ```

mod reader;
mod writer;

pub use reader::Reader;
pub use writer::Writer;

/// Error type for buffer operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// Attempted to read past the end of the buffer.
    EndOfBuffer,
}

impl std::fmt::Display for BufferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BufferError::EndOfBuffer => write!(f, "end of buffer"),
        }
    }
}

impl std::error::Error for BufferError {}
