//! igbinary decoder.
//!
//! Containers take their reference slot before any child is decoded, so a
//! back-reference inside a container to that same container resolves to the
//! instance still being filled. Post-construction notifications are queued
//! and only fired once the whole input decoded without error.

use igbinary_buffers::Reader;
use tracing::{debug, trace};

use crate::constants::{FORMAT_VERSION, LEGACY_FORMAT_VERSION};
use crate::error::{IgbinaryError, Result};
use crate::hooks::{NoHooks, ObjectHooks};
use crate::options::DecodeOptions;
use crate::tags::{read_long, Tag, Width};
use crate::value::{Array, ArrayRef, Key, Object, ObjectRef, SharedCell, Value};

/// Tables for one top-level [`IgbinaryDecoder::decode`] call.
struct DecodeState<'a> {
    reader: Reader<'a>,
    /// Literal strings and class names in emission order.
    strings: Vec<Vec<u8>>,
    /// Arrays, objects and scalar shared cells in slot order.
    references: Vec<Value>,
    /// Objects awaiting post-construction notification.
    wakeups: Vec<ObjectRef>,
    depth: usize,
}

impl<'a> DecodeState<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            reader: Reader::new(data),
            strings: Vec::new(),
            references: Vec::new(),
            wakeups: Vec::new(),
            depth: 0,
        }
    }

    fn enter(&mut self, max_depth: Option<usize>) -> Result<()> {
        if let Some(max) = max_depth {
            if self.depth >= max {
                return Err(IgbinaryError::DepthLimitExceeded(max));
            }
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    /// Reads an element count and checks it against the bytes left.
    ///
    /// Every entry takes at least one byte, so a larger count is corrupt.
    fn read_count(&mut self, width: Width) -> Result<usize> {
        let count = width.read(&mut self.reader)?;
        let remaining = self.reader.size();
        match usize::try_from(count) {
            Ok(n) if n <= remaining => Ok(n),
            _ => Err(IgbinaryError::CorruptLength {
                len: count,
                remaining,
            }),
        }
    }

    fn read_chararray(&mut self, width: Width) -> Result<Vec<u8>> {
        let len = width.read(&mut self.reader)?;
        let len = usize::try_from(len).map_err(|_| IgbinaryError::EndOfBuffer)?;
        let data = self.reader.buf(len)?.to_vec();
        self.strings.push(data.clone());
        Ok(data)
    }

    fn read_string_id(&mut self, width: Width) -> Result<Vec<u8>> {
        let index = width.read(&mut self.reader)?;
        usize::try_from(index)
            .ok()
            .and_then(|i| self.strings.get(i))
            .cloned()
            .ok_or(IgbinaryError::InvalidBackReference {
                index,
                len: self.strings.len(),
            })
    }

    /// Empties every container decoded so far.
    ///
    /// A failed decode never hands its partial graph to the caller, so any
    /// back-reference cycle in it has to be broken here or it is never freed.
    fn release(&mut self) {
        self.wakeups.clear();
        for value in self.references.drain(..) {
            match value {
                Value::Array(array) => {
                    array.borrow_mut().clear();
                }
                Value::Object(object) => {
                    let mut object = object.borrow_mut();
                    object.props.clear();
                    object.opaque = None;
                }
                Value::Shared(cell) => {
                    cell.replace(Value::Null);
                }
                _ => {}
            }
        }
    }

    fn read_reference(&mut self, width: Width) -> Result<Value> {
        let index = width.read(&mut self.reader)?;
        usize::try_from(index)
            .ok()
            .and_then(|i| self.references.get(i))
            .cloned()
            .ok_or(IgbinaryError::InvalidBackReference {
                index,
                len: self.references.len(),
            })
    }
}

/// igbinary decoder.
pub struct IgbinaryDecoder<'h> {
    options: DecodeOptions,
    hooks: &'h dyn ObjectHooks,
}

impl Default for IgbinaryDecoder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl IgbinaryDecoder<'static> {
    /// Decoder with default options and no class hooks.
    pub fn new() -> Self {
        Self::with_hooks(&NoHooks, DecodeOptions::default())
    }
}

impl<'h> IgbinaryDecoder<'h> {
    /// Decoder that resolves classes and custom forms through `hooks`.
    pub fn with_hooks(hooks: &'h dyn ObjectHooks, options: DecodeOptions) -> Self {
        Self { options, hooks }
    }

    /// Decodes a header and exactly one value.
    ///
    /// Queued post-construction notifications run after the value is complete,
    /// in construction order. On error none of them run, and the partially
    /// decoded graph is emptied so that its cycles are freed.
    pub fn decode(&self, data: &[u8]) -> Result<Value> {
        let mut state = DecodeState::new(data);
        let value = match self.read_document(&mut state) {
            Ok(value) => value,
            Err(err) => {
                debug!(offset = state.reader.x, error = %err, "igbinary decode failed");
                state.release();
                return Err(err);
            }
        };
        trace!(
            strings = state.strings.len(),
            references = state.references.len(),
            wakeups = state.wakeups.len(),
            "igbinary value decoded"
        );
        for object in &state.wakeups {
            self.hooks.notify_post_construct(object);
        }
        Ok(value)
    }

    fn read_document(&self, state: &mut DecodeState<'_>) -> Result<Value> {
        self.read_header(state)?;
        let value = self.read_any(state)?;
        match state.reader.size() {
            0 => Ok(value),
            n => Err(IgbinaryError::TrailingData(n)),
        }
    }

    fn read_header(&self, state: &mut DecodeState<'_>) -> Result<()> {
        match state.reader.u32()? {
            FORMAT_VERSION => Ok(()),
            LEGACY_FORMAT_VERSION => {
                debug!(version = LEGACY_FORMAT_VERSION, "accepting legacy igbinary header");
                Ok(())
            }
            version => Err(IgbinaryError::UnsupportedVersion(version)),
        }
    }

    fn read_any(&self, state: &mut DecodeState<'_>) -> Result<Value> {
        let offset = state.reader.x;
        let byte = state.reader.u8()?;
        let tag = Tag::from_u8(byte).ok_or(IgbinaryError::UnknownTag { tag: byte, offset })?;
        let value = match tag {
            Tag::Null => Value::Null,
            Tag::Bool(b) => Value::Bool(b),
            Tag::Long { width, negative } => {
                Value::Int(read_long(&mut state.reader, width, negative)?)
            }
            Tag::Double => Value::Float(f64::from_bits(state.reader.u64()?)),
            Tag::StringEmpty => Value::Str(Vec::new()),
            Tag::String(width) => Value::Str(state.read_chararray(width)?),
            Tag::StringId(width) => Value::Str(state.read_string_id(width)?),
            Tag::Array(width) => self.read_arr(state, width)?,
            Tag::Object(width) => {
                let class_name = state.read_chararray(width)?;
                self.read_obj(state, class_name)?
            }
            Tag::ObjectId(width) => {
                let class_name = state.read_string_id(width)?;
                self.read_obj(state, class_name)?
            }
            Tag::Ref(width) | Tag::ObjRef(width) => state.read_reference(width)?,
            Tag::SimpleRef => self.read_shared(state)?,
            // Custom form only appears as an object body.
            Tag::ObjectSer(_) => return Err(IgbinaryError::UnknownTag { tag: byte, offset }),
        };
        Ok(value)
    }

    fn read_key(&self, state: &mut DecodeState<'_>) -> Result<Key> {
        let byte = state.reader.u8()?;
        let key = match Tag::from_u8(byte) {
            Some(Tag::Long { width, negative }) => {
                Key::Int(read_long(&mut state.reader, width, negative)?)
            }
            Some(Tag::String(width)) => Key::Str(state.read_chararray(width)?),
            Some(Tag::StringId(width)) => Key::Str(state.read_string_id(width)?),
            Some(Tag::StringEmpty) => Key::Str(Vec::new()),
            _ => return Err(IgbinaryError::InvalidKeyType(byte)),
        };
        Ok(key)
    }

    /// Decodes `count` key/value pairs, handing each to `insert`.
    fn read_entries(
        &self,
        state: &mut DecodeState<'_>,
        count: usize,
        mut insert: impl FnMut(Key, Value),
    ) -> Result<()> {
        state.enter(self.options.max_depth)?;
        for _ in 0..count {
            let key = self.read_key(state)?;
            let value = self.read_any(state)?;
            insert(key, value);
        }
        state.leave();
        Ok(())
    }

    fn read_arr(&self, state: &mut DecodeState<'_>, width: Width) -> Result<Value> {
        let count = state.read_count(width)?;
        let array = ArrayRef::new(Array::with_capacity(count));
        state.references.push(Value::Array(array.clone()));
        self.read_entries(state, count, |key, value| {
            array.borrow_mut().insert(key, value);
        })?;
        Ok(Value::Array(array))
    }

    fn read_obj(&self, state: &mut DecodeState<'_>, class_name: Vec<u8>) -> Result<Value> {
        let class = self.hooks.resolve_class(&class_name);
        if class.is_none() {
            trace!(
                class = %String::from_utf8_lossy(&class_name),
                "unresolved class, decoding placeholder"
            );
        }
        let mut placeholder = Object::new(class_name);
        placeholder.class = class;
        let object = ObjectRef::new(placeholder);
        state.references.push(Value::Object(object.clone()));

        let offset = state.reader.x;
        let byte = state.reader.u8()?;
        match Tag::from_u8(byte) {
            Some(Tag::Array(width)) => {
                let count = state.read_count(width)?;
                self.read_entries(state, count, |key, value| {
                    object.borrow_mut().props.insert(key, value);
                })?;
            }
            Some(Tag::ObjectSer(width)) => {
                let len = width.read(&mut state.reader)?;
                let len = usize::try_from(len).map_err(|_| IgbinaryError::EndOfBuffer)?;
                let data = state.reader.buf(len)?;
                match class.and_then(|c| self.hooks.custom_deserialize(c, data)) {
                    Some(mut rebuilt) => {
                        rebuilt.class = rebuilt.class.or(class);
                        object.replace(rebuilt);
                    }
                    None => object.borrow_mut().opaque = Some(data.to_vec()),
                }
            }
            _ => return Err(IgbinaryError::UnknownTag { tag: byte, offset }),
        }

        if let Some(class) = class {
            if self.hooks.wants_post_construct_notify(class) {
                state.wakeups.push(object.clone());
            }
        }
        Ok(Value::Object(object))
    }

    fn read_shared(&self, state: &mut DecodeState<'_>) -> Result<Value> {
        state.enter(self.options.max_depth)?;
        let inner = self.read_any(state)?;
        state.leave();
        match inner {
            // Containers already own a slot and alias through their handle.
            Value::Array(_) | Value::Object(_) | Value::Shared(_) => Ok(inner),
            scalar => {
                let cell = SharedCell::new(scalar);
                state.references.push(Value::Shared(cell.clone()));
                Ok(Value::Shared(cell))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &[u8]) -> Vec<u8> {
        let mut data = vec![0, 0, 0, 2];
        data.extend_from_slice(body);
        data
    }

    fn decode(body: &[u8]) -> Result<Value> {
        IgbinaryDecoder::new().decode(&doc(body))
    }

    #[test]
    fn scalars() {
        assert_eq!(decode(&[0x00]), Ok(Value::Null));
        assert_eq!(decode(&[0x05]), Ok(Value::Bool(true)));
        assert_eq!(decode(&[0x09, 0x01, 0x2c]), Ok(Value::Int(-300)));
        assert_eq!(decode(&[0x11, 0x01, b'a']), Ok(Value::from("a")));
        assert_eq!(decode(&[0x0d]), Ok(Value::from("")));
    }

    #[test]
    fn wide_encodings_are_accepted() {
        assert_eq!(decode(&[0x0a, 0, 0, 0, 5]), Ok(Value::Int(5)));
        assert_eq!(decode(&[0x20, 0, 0, 0, 0, 0, 0, 0, 5]), Ok(Value::Int(5)));
        assert_eq!(decode(&[0x13, 0, 0, 0, 1, b'z']), Ok(Value::from("z")));
        let arr = decode(&[0x16, 0, 0, 0, 1, 0x06, 0, 0x00]).unwrap();
        assert_eq!(arr, Value::array(Array::list([Value::Null])));
    }

    #[test]
    fn legacy_header_is_accepted() {
        let data = [0, 0, 0, 1, 0x04];
        assert_eq!(IgbinaryDecoder::new().decode(&data), Ok(Value::Bool(false)));
    }

    #[test]
    fn duplicate_keys_last_write_wins() {
        let body = [0x14, 2, 0x06, 0, 0x06, 1, 0x06, 0, 0x06, 2];
        let value = decode(&body).unwrap();
        let array = value.as_array().unwrap().borrow();
        assert_eq!(array.len(), 1);
        assert_eq!(array.get(&Key::Int(0)), Some(&Value::Int(2)));
    }

    #[test]
    fn object_ser_outside_object_is_rejected() {
        assert_eq!(
            decode(&[0x1d, 0x01, b'x']),
            Err(IgbinaryError::UnknownTag { tag: 0x1d, offset: 4 })
        );
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        assert_eq!(decode(&[0x00, 0x00]), Err(IgbinaryError::TrailingData(1)));
    }

    #[test]
    fn depth_limit() {
        let decoder = IgbinaryDecoder::with_hooks(&NoHooks, DecodeOptions { max_depth: Some(1) });
        let flat = doc(&[0x14, 1, 0x06, 0, 0x00]);
        assert!(decoder.decode(&flat).is_ok());
        let nested = doc(&[0x14, 1, 0x06, 0, 0x14, 0]);
        assert_eq!(
            decoder.decode(&nested),
            Err(IgbinaryError::DepthLimitExceeded(1))
        );
    }

    #[test]
    fn release_empties_the_partial_graph() {
        // [0 => itself, 1 => <truncated>]
        let data = doc(&[0x14, 0x02, 0x06, 0x00, 0x01, 0x00, 0x06, 0x01]);
        let decoder = IgbinaryDecoder::new();
        let mut state = DecodeState::new(&data);
        assert_eq!(
            decoder.read_document(&mut state),
            Err(IgbinaryError::EndOfBuffer)
        );
        let partial = state.references[0].clone();
        assert_eq!(partial.as_array().unwrap().borrow().len(), 1);
        state.release();
        assert!(state.references.is_empty());
        assert!(partial.as_array().unwrap().borrow().is_empty());
    }
}
