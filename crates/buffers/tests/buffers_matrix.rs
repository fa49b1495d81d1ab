//! Writer/Reader roundtrip matrix and end-of-buffer behaviour.

use igbinary_buffers::{BufferError, Reader, Writer};

// ---------------------------------------------------------------------------
// Writer/Reader roundtrip matrix
// ---------------------------------------------------------------------------

#[test]
fn roundtrip_u8() {
    let mut w = Writer::new();
    w.u8(0x00);
    w.u8(0x7F);
    w.u8(0xFF);
    let data = w.flush();
    let mut r = Reader::new(&data);
    assert_eq!(r.u8(), Ok(0x00));
    assert_eq!(r.u8(), Ok(0x7F));
    assert_eq!(r.u8(), Ok(0xFF));
}

#[test]
fn roundtrip_u16() {
    let mut w = Writer::new();
    w.u16(0);
    w.u16(0x0102);
    w.u16(u16::MAX);
    let data = w.flush();
    let mut r = Reader::new(&data);
    assert_eq!(r.u16(), Ok(0));
    assert_eq!(r.u16(), Ok(0x0102));
    assert_eq!(r.u16(), Ok(u16::MAX));
}

#[test]
fn roundtrip_u32() {
    let mut w = Writer::new();
    w.u32(0);
    w.u32(0x01020304);
    w.u32(u32::MAX);
    let data = w.flush();
    let mut r = Reader::new(&data);
    assert_eq!(r.u32(), Ok(0));
    assert_eq!(r.u32(), Ok(0x01020304));
    assert_eq!(r.u32(), Ok(u32::MAX));
}

#[test]
fn roundtrip_u64() {
    let mut w = Writer::new();
    w.u64(0);
    w.u64(0x0102030405060708);
    w.u64(u64::MAX);
    let data = w.flush();
    let mut r = Reader::new(&data);
    assert_eq!(r.u64(), Ok(0));
    assert_eq!(r.u64(), Ok(0x0102030405060708));
    assert_eq!(r.u64(), Ok(u64::MAX));
}

#[test]
fn roundtrip_f64_bits() {
    let values = [0.0, -0.0, 1.5, f64::INFINITY, f64::NEG_INFINITY, f64::NAN];
    let mut w = Writer::new();
    for v in values {
        w.u64(v.to_bits());
    }
    let data = w.flush();
    let mut r = Reader::new(&data);
    for v in values {
        assert_eq!(r.u64().map(f64::from_bits).unwrap().to_bits(), v.to_bits());
    }
}

#[test]
fn roundtrip_buf() {
    let mut w = Writer::new();
    w.buf(&[1, 2, 3]);
    w.buf(&[]);
    w.buf(&[4]);
    let data = w.flush();
    let mut r = Reader::new(&data);
    assert_eq!(r.buf(3), Ok(&[1u8, 2, 3][..]));
    assert_eq!(r.buf(0), Ok(&[][..]));
    assert_eq!(r.buf(1), Ok(&[4u8][..]));
    assert_eq!(r.size(), 0);
}

#[test]
fn roundtrip_u8u8() {
    let mut w = Writer::new();
    w.u8u8(0x11, 0xfe);
    let data = w.flush();
    let mut r = Reader::new(&data);
    assert_eq!(r.u8(), Ok(0x11));
    assert_eq!(r.u8(), Ok(0xfe));
}

#[test]
fn roundtrip_u8u16() {
    let mut w = Writer::new();
    w.u8u16(0x12, 0xabcd);
    let data = w.flush();
    let mut r = Reader::new(&data);
    assert_eq!(r.u8(), Ok(0x12));
    assert_eq!(r.u16(), Ok(0xabcd));
}

#[test]
fn roundtrip_u8u32() {
    let mut w = Writer::new();
    w.u8u32(0x13, 0xdeadbeef);
    let data = w.flush();
    let mut r = Reader::new(&data);
    assert_eq!(r.u8(), Ok(0x13));
    assert_eq!(r.u32(), Ok(0xdeadbeef));
}

#[test]
fn roundtrip_u8u64() {
    let mut w = Writer::new();
    w.u8u64(0x20, 0x8000_0000_0000_0000);
    let data = w.flush();
    let mut r = Reader::new(&data);
    assert_eq!(r.u8(), Ok(0x20));
    assert_eq!(r.u64(), Ok(0x8000_0000_0000_0000));
}

#[test]
fn writer_flush_resets_window() {
    let mut w = Writer::new();
    w.u8(1);
    w.u8(2);
    let first = w.flush();
    w.u8(3);
    let second = w.flush();
    assert_eq!(first, vec![1, 2]);
    assert_eq!(second, vec![3]);
}

// ---------------------------------------------------------------------------
// End of buffer
// ---------------------------------------------------------------------------

#[test]
fn every_width_fails_on_short_input() {
    let data = [0u8; 7];
    assert_eq!(Reader::new(&data[..0]).u8(), Err(BufferError::EndOfBuffer));
    assert_eq!(Reader::new(&data[..1]).u16(), Err(BufferError::EndOfBuffer));
    assert_eq!(Reader::new(&data[..3]).u32(), Err(BufferError::EndOfBuffer));
    assert_eq!(Reader::new(&data[..7]).u64(), Err(BufferError::EndOfBuffer));
    assert_eq!(Reader::new(&data[..2]).buf(3), Err(BufferError::EndOfBuffer));
    assert_eq!(Reader::new(&data[..0]).peek(), Err(BufferError::EndOfBuffer));
}

#[test]
fn exact_fit_reads_succeed() {
    let data = [0xff; 8];
    let mut r = Reader::new(&data);
    assert_eq!(r.u64(), Ok(u64::MAX));
    assert_eq!(r.size(), 0);
}

#[test]
fn peek_does_not_advance() {
    let data = [0x25, 0x06, 0x01];
    let mut r = Reader::new(&data);
    assert_eq!(r.peek(), Ok(0x25));
    assert_eq!(r.x, 0);
    assert_eq!(r.u8(), Ok(0x25));
    assert_eq!(r.peek(), Ok(0x06));
}

#[test]
fn buffer_error_display() {
    assert_eq!(BufferError::EndOfBuffer.to_string(), "end of buffer");
}
