//! Format version and type tag bytes.

/// Format version written by the encoder.
pub const FORMAT_VERSION: u32 = 0x0000_0002;

/// Older format version still accepted by the decoder.
pub const LEGACY_FORMAT_VERSION: u32 = 0x0000_0001;

pub const NULL: u8 = 0x00;

pub const REF8: u8 = 0x01;
pub const REF16: u8 = 0x02;
pub const REF32: u8 = 0x03;

pub const BOOL_FALSE: u8 = 0x04;
pub const BOOL_TRUE: u8 = 0x05;

pub const LONG8P: u8 = 0x06;
pub const LONG8N: u8 = 0x07;
pub const LONG16P: u8 = 0x08;
pub const LONG16N: u8 = 0x09;
pub const LONG32P: u8 = 0x0a;
pub const LONG32N: u8 = 0x0b;

pub const DOUBLE: u8 = 0x0c;

pub const STRING_EMPTY: u8 = 0x0d;

pub const STRING_ID8: u8 = 0x0e;
pub const STRING_ID16: u8 = 0x0f;
pub const STRING_ID32: u8 = 0x10;

pub const STRING8: u8 = 0x11;
pub const STRING16: u8 = 0x12;
pub const STRING32: u8 = 0x13;

pub const ARRAY8: u8 = 0x14;
pub const ARRAY16: u8 = 0x15;
pub const ARRAY32: u8 = 0x16;

pub const OBJECT8: u8 = 0x17;
pub const OBJECT16: u8 = 0x18;
pub const OBJECT32: u8 = 0x19;

pub const OBJECT_ID8: u8 = 0x1a;
pub const OBJECT_ID16: u8 = 0x1b;
pub const OBJECT_ID32: u8 = 0x1c;

pub const OBJECT_SER8: u8 = 0x1d;
pub const OBJECT_SER16: u8 = 0x1e;
pub const OBJECT_SER32: u8 = 0x1f;

pub const LONG64P: u8 = 0x20;
pub const LONG64N: u8 = 0x21;

pub const OBJREF8: u8 = 0x22;
pub const OBJREF16: u8 = 0x23;
pub const OBJREF32: u8 = 0x24;

pub const SIMPLE_REF: u8 = 0x25;
