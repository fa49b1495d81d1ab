//! Growable big-endian binary writer.

/// A binary writer appending to an auto-growing buffer.
///
/// Bytes written since the last [`flush`](Writer::flush) form the current
/// chunk; `flush` returns that chunk and starts a new one.
///
/// # Example
///
/// ```
/// use igbinary_buffers::Writer;
///
/// let mut writer = Writer::new();
/// writer.u8u16(0x08, 1000);
/// assert_eq!(writer.flush(), vec![0x08, 0x03, 0xe8]);
/// ```
#[derive(Debug, Clone)]
pub struct Writer {
    /// The underlying buffer.
    pub uint8: Vec<u8>,
    /// Start of the current chunk.
    pub x0: usize,
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer {
    /// Creates a new writer with a 64 KiB initial allocation.
    pub fn new() -> Self {
        Self {
            uint8: Vec::with_capacity(64 * 1024),
            x0: 0,
        }
    }

    /// Current write position.
    #[inline]
    pub fn x(&self) -> usize {
        self.uint8.len()
    }

    /// Number of bytes in the current chunk.
    #[inline]
    pub fn size(&self) -> usize {
        self.uint8.len() - self.x0
    }

    /// Discards everything written so far, keeping the allocation.
    pub fn reset(&mut self) {
        self.uint8.clear();
        self.x0 = 0;
    }

    /// Returns the current chunk and starts a new one.
    pub fn flush(&mut self) -> Vec<u8> {
        let chunk = self.uint8[self.x0..].to_vec();
        self.x0 = self.uint8.len();
        chunk
    }

    /// Writes an unsigned 8-bit integer.
    #[inline]
    pub fn u8(&mut self, val: u8) {
        self.uint8.push(val);
    }

    /// Writes an unsigned 16-bit integer (big-endian).
    #[inline]
    pub fn u16(&mut self, val: u16) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes an unsigned 32-bit integer (big-endian).
    #[inline]
    pub fn u32(&mut self, val: u32) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes an unsigned 64-bit integer (big-endian).
    #[inline]
    pub fn u64(&mut self, val: u64) {
        self.uint8.extend_from_slice(&val.to_be_bytes());
    }

    /// Writes a byte followed by an unsigned 8-bit integer.
    #[inline]
    pub fn u8u8(&mut self, tag: u8, val: u8) {
        self.uint8.extend_from_slice(&[tag, val]);
    }

    /// Writes a byte followed by a big-endian unsigned 16-bit integer.
    #[inline]
    pub fn u8u16(&mut self, tag: u8, val: u16) {
        self.u8(tag);
        self.u16(val);
    }

    /// Writes a byte followed by a big-endian unsigned 32-bit integer.
    #[inline]
    pub fn u8u32(&mut self, tag: u8, val: u32) {
        self.u8(tag);
        self.u32(val);
    }

    /// Writes a byte followed by a big-endian unsigned 64-bit integer.
    #[inline]
    pub fn u8u64(&mut self, tag: u8, val: u64) {
        self.u8(tag);
        self.u64(val);
    }

    /// Writes raw bytes.
    #[inline]
    pub fn buf(&mut self, data: &[u8]) {
        self.uint8.extend_from_slice(data);
    }
}
