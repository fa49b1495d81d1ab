//! Logical view of the tag byte.
//!
//! The wire format spells every sized concept three times (8/16/32-bit
//! payload) and integers eight times (four widths by two signs). The codec
//! works with one variant per concept and keeps width selection here.

use igbinary_buffers::{Reader, Writer};

use crate::constants::*;
use crate::error::IgbinaryError;

/// Width of a length, count or index payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Width {
    W8,
    W16,
    W32,
}

impl Width {
    /// Reads an unsigned payload of this width.
    pub(crate) fn read(self, reader: &mut Reader<'_>) -> Result<u32, IgbinaryError> {
        Ok(match self {
            Width::W8 => u32::from(reader.u8()?),
            Width::W16 => u32::from(reader.u16()?),
            Width::W32 => reader.u32()?,
        })
    }
}

/// Width of an integer magnitude payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum IntWidth {
    W8,
    W16,
    W32,
    W64,
}

/// A decoded tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Tag {
    Null,
    Bool(bool),
    Long { width: IntWidth, negative: bool },
    Double,
    StringEmpty,
    StringId(Width),
    String(Width),
    Array(Width),
    Object(Width),
    ObjectId(Width),
    ObjectSer(Width),
    Ref(Width),
    ObjRef(Width),
    SimpleRef,
}

impl Tag {
    pub(crate) fn from_u8(byte: u8) -> Option<Tag> {
        use IntWidth as I;
        use Width::*;
        let tag = match byte {
            NULL => Tag::Null,
            REF8 => Tag::Ref(W8),
            REF16 => Tag::Ref(W16),
            REF32 => Tag::Ref(W32),
            BOOL_FALSE => Tag::Bool(false),
            BOOL_TRUE => Tag::Bool(true),
            LONG8P => Tag::Long { width: I::W8, negative: false },
            LONG8N => Tag::Long { width: I::W8, negative: true },
            LONG16P => Tag::Long { width: I::W16, negative: false },
            LONG16N => Tag::Long { width: I::W16, negative: true },
            LONG32P => Tag::Long { width: I::W32, negative: false },
            LONG32N => Tag::Long { width: I::W32, negative: true },
            DOUBLE => Tag::Double,
            STRING_EMPTY => Tag::StringEmpty,
            STRING_ID8 => Tag::StringId(W8),
            STRING_ID16 => Tag::StringId(W16),
            STRING_ID32 => Tag::StringId(W32),
            STRING8 => Tag::String(W8),
            STRING16 => Tag::String(W16),
            STRING32 => Tag::String(W32),
            ARRAY8 => Tag::Array(W8),
            ARRAY16 => Tag::Array(W16),
            ARRAY32 => Tag::Array(W32),
            OBJECT8 => Tag::Object(W8),
            OBJECT16 => Tag::Object(W16),
            OBJECT32 => Tag::Object(W32),
            OBJECT_ID8 => Tag::ObjectId(W8),
            OBJECT_ID16 => Tag::ObjectId(W16),
            OBJECT_ID32 => Tag::ObjectId(W32),
            OBJECT_SER8 => Tag::ObjectSer(W8),
            OBJECT_SER16 => Tag::ObjectSer(W16),
            OBJECT_SER32 => Tag::ObjectSer(W32),
            LONG64P => Tag::Long { width: I::W64, negative: false },
            LONG64N => Tag::Long { width: I::W64, negative: true },
            OBJREF8 => Tag::ObjRef(W8),
            OBJREF16 => Tag::ObjRef(W16),
            OBJREF32 => Tag::ObjRef(W32),
            SIMPLE_REF => Tag::SimpleRef,
            _ => return None,
        };
        Some(tag)
    }
}

/// The three tag bytes of one sized concept, smallest width first.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Family(pub [u8; 3]);

pub(crate) const STRING: Family = Family([STRING8, STRING16, STRING32]);
pub(crate) const STRING_ID: Family = Family([STRING_ID8, STRING_ID16, STRING_ID32]);
pub(crate) const ARRAY: Family = Family([ARRAY8, ARRAY16, ARRAY32]);
pub(crate) const OBJECT: Family = Family([OBJECT8, OBJECT16, OBJECT32]);
pub(crate) const OBJECT_ID: Family = Family([OBJECT_ID8, OBJECT_ID16, OBJECT_ID32]);
pub(crate) const OBJECT_SER: Family = Family([OBJECT_SER8, OBJECT_SER16, OBJECT_SER32]);
pub(crate) const REF: Family = Family([REF8, REF16, REF32]);
pub(crate) const OBJREF: Family = Family([OBJREF8, OBJREF16, OBJREF32]);

impl Family {
    /// Writes the narrowest tag of this family that holds `n`, then `n`.
    pub(crate) fn write(self, writer: &mut Writer, n: usize) -> Result<(), IgbinaryError> {
        let [t8, t16, t32] = self.0;
        if let Ok(n) = u8::try_from(n) {
            writer.u8u8(t8, n);
        } else if let Ok(n) = u16::try_from(n) {
            writer.u8u16(t16, n);
        } else if let Ok(n) = u32::try_from(n) {
            writer.u8u32(t32, n);
        } else {
            return Err(IgbinaryError::LengthOverflow(n));
        }
        Ok(())
    }
}

/// Writes a signed integer as sign plus the narrowest magnitude.
pub(crate) fn write_long(writer: &mut Writer, n: i64) {
    // unsigned_abs keeps i64::MIN at magnitude 2^63
    let magnitude = n.unsigned_abs();
    let negative = n < 0;
    if let Ok(m) = u8::try_from(magnitude) {
        writer.u8u8(if negative { LONG8N } else { LONG8P }, m);
    } else if let Ok(m) = u16::try_from(magnitude) {
        writer.u8u16(if negative { LONG16N } else { LONG16P }, m);
    } else if let Ok(m) = u32::try_from(magnitude) {
        writer.u8u32(if negative { LONG32N } else { LONG32P }, m);
    } else {
        writer.u8u64(if negative { LONG64N } else { LONG64P }, magnitude);
    }
}

/// Reads an integer magnitude of `width` and applies the sign.
pub(crate) fn read_long(
    reader: &mut Reader<'_>,
    width: IntWidth,
    negative: bool,
) -> Result<i64, IgbinaryError> {
    let magnitude = match width {
        IntWidth::W8 => u64::from(reader.u8()?),
        IntWidth::W16 => u64::from(reader.u16()?),
        IntWidth::W32 => u64::from(reader.u32()?),
        IntWidth::W64 => reader.u64()?,
    };
    const MIN_MAGNITUDE: u64 = i64::MIN.unsigned_abs();
    if negative {
        if magnitude > MIN_MAGNITUDE {
            return Err(IgbinaryError::IntegerOverflow(magnitude));
        }
        Ok(0i64.wrapping_sub_unsigned(magnitude))
    } else {
        i64::try_from(magnitude).map_err(|_| IgbinaryError::IntegerOverflow(magnitude))
    }
}
