//! igbinary encoder.
//!
//! Writes the format header followed by one value. Arrays, objects and
//! scalar shared cells get a reference id in first-occurrence order; later
//! occurrences are written as back-references to that id. The id is taken
//! before any child is written, which is what lets a container refer to
//! itself.

use std::collections::HashMap;

use igbinary_buffers::Writer;
use tracing::{debug, trace};

use crate::constants::*;
use crate::error::{IgbinaryError, Result};
use crate::hooks::{NoHooks, ObjectHooks};
use crate::options::EncodeOptions;
use crate::tags::{self, write_long};
use crate::value::{Array, ArrayRef, Identity, Key, ObjectRef, SharedCell, Value};

/// Tables for one top-level [`IgbinaryEncoder::encode`] call.
#[derive(Default)]
struct EncodeState {
    /// Interned string -> string table index.
    strings: HashMap<Vec<u8>, usize>,
    /// Literal strings and class names emitted so far.
    string_count: usize,
    /// Container identity -> reference id.
    references: HashMap<Identity, usize>,
    next_reference: usize,
    depth: usize,
}

impl EncodeState {
    fn reserve(&mut self, id: Identity) {
        self.references.insert(id, self.next_reference);
        self.next_reference += 1;
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
}

/// igbinary encoder.
pub struct IgbinaryEncoder<'h> {
    pub writer: Writer,
    options: EncodeOptions,
    hooks: &'h dyn ObjectHooks,
}

impl Default for IgbinaryEncoder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl IgbinaryEncoder<'static> {
    /// Encoder with default options and no class hooks.
    pub fn new() -> Self {
        Self::with_hooks(&NoHooks, EncodeOptions::default())
    }
}

impl<'h> IgbinaryEncoder<'h> {
    /// Encoder that asks `hooks` for custom object forms.
    pub fn with_hooks(hooks: &'h dyn ObjectHooks, options: EncodeOptions) -> Self {
        Self {
            writer: Writer::new(),
            options,
            hooks,
        }
    }

    /// Encodes `value` with a header and returns the bytes.
    ///
    /// On error nothing is returned and the writer is left empty.
    pub fn encode(&mut self, value: &Value) -> Result<Vec<u8>> {
        self.writer.reset();
        self.writer.u32(FORMAT_VERSION);
        let mut state = EncodeState::default();
        match self.write_any(&mut state, value) {
            Ok(()) => {
                let bytes = self.writer.flush();
                trace!(
                    size = bytes.len(),
                    strings = state.string_count,
                    references = state.next_reference,
                    "igbinary value encoded"
                );
                Ok(bytes)
            }
            Err(err) => {
                self.writer.reset();
                debug!(error = %err, "igbinary encode failed");
                Err(err)
            }
        }
    }

    fn write_any(&mut self, state: &mut EncodeState, value: &Value) -> Result<()> {
        match value {
            Value::Null => self.writer.u8(NULL),
            Value::Bool(b) => self.writer.u8(if *b { BOOL_TRUE } else { BOOL_FALSE }),
            Value::Int(n) => write_long(&mut self.writer, *n),
            Value::Float(f) => self.writer.u8u64(DOUBLE, f.to_bits()),
            Value::Str(s) => self.write_str(state, s)?,
            Value::Array(array) => self.write_arr(state, array)?,
            Value::Object(object) => self.write_obj(state, object)?,
            Value::Shared(cell) => self.write_shared(state, cell)?,
            Value::Resource(_) => return Err(IgbinaryError::UnsupportedValueKind(value.kind())),
        }
        Ok(())
    }

    fn write_str(&mut self, state: &mut EncodeState, s: &[u8]) -> Result<()> {
        if s.is_empty() {
            self.writer.u8(STRING_EMPTY);
            return Ok(());
        }
        if self.options.compact_strings {
            if let Some(&index) = state.strings.get(s) {
                return tags::STRING_ID.write(&mut self.writer, index);
            }
            state.strings.insert(s.to_vec(), state.string_count);
        }
        // Counted even when not interned: the decoder tables every literal.
        state.string_count += 1;
        tags::STRING.write(&mut self.writer, s.len())?;
        self.writer.buf(s);
        Ok(())
    }

    fn write_class_name(&mut self, state: &mut EncodeState, name: &[u8]) -> Result<()> {
        if let Some(&index) = state.strings.get(name) {
            return tags::OBJECT_ID.write(&mut self.writer, index);
        }
        state.strings.insert(name.to_vec(), state.string_count);
        state.string_count += 1;
        tags::OBJECT.write(&mut self.writer, name.len())?;
        self.writer.buf(name);
        Ok(())
    }

    fn write_arr(&mut self, state: &mut EncodeState, array: &ArrayRef) -> Result<()> {
        if let Some(&index) = state.references.get(&array.id()) {
            return tags::REF.write(&mut self.writer, index);
        }
        state.reserve(array.id());
        let array = array.borrow();
        self.write_entries(state, &array)
    }

    /// Writes an array body: count, then key/value pairs.
    fn write_entries(&mut self, state: &mut EncodeState, array: &Array) -> Result<()> {
        state.enter(self.options.max_depth)?;
        tags::ARRAY.write(&mut self.writer, array.len())?;
        for (key, value) in array.iter() {
            match key {
                Key::Int(n) => write_long(&mut self.writer, *n),
                Key::Str(s) => self.write_str(state, s)?,
            }
            self.write_any(state, value)?;
        }
        state.leave();
        Ok(())
    }

    fn write_obj(&mut self, state: &mut EncodeState, object: &ObjectRef) -> Result<()> {
        if let Some(&index) = state.references.get(&object.id()) {
            return tags::OBJREF.write(&mut self.writer, index);
        }
        state.reserve(object.id());
        let custom = self.hooks.custom_serialize(object);
        let object = object.borrow();
        self.write_class_name(state, &object.class_name)?;
        match custom {
            Some(Value::Str(data)) => self.write_opaque(&data),
            None | Some(Value::Null) => match &object.opaque {
                Some(data) => self.write_opaque(data),
                None => self.write_entries(state, &object.props),
            },
            Some(_) => Err(IgbinaryError::InvalidCustomSerialization(
                object.class_name_lossy(),
            )),
        }
    }

    fn write_opaque(&mut self, data: &[u8]) -> Result<()> {
        tags::OBJECT_SER.write(&mut self.writer, data.len())?;
        self.writer.buf(data);
        Ok(())
    }

    fn write_shared(&mut self, state: &mut EncodeState, cell: &SharedCell) -> Result<()> {
        // A cell holding another cell aliases the innermost one.
        let mut cell = cell.clone();
        let mut inner = cell.get();
        let mut chain = vec![cell.id()];
        while let Value::Shared(next) = inner {
            if chain.contains(&next.id()) {
                return Err(IgbinaryError::UnsupportedValueKind("reference cycle"));
            }
            chain.push(next.id());
            inner = next.get();
            cell = next;
        }
        match &inner {
            // The container handle already aliases; only its first
            // occurrence is marked.
            Value::Array(_) | Value::Object(_) => {
                let seen = inner
                    .identity()
                    .is_some_and(|id| state.references.contains_key(&id));
                if !seen {
                    self.writer.u8(SIMPLE_REF);
                }
                self.write_any(state, &inner)
            }
            _ => {
                if let Some(&index) = state.references.get(&cell.id()) {
                    return tags::REF.write(&mut self.writer, index);
                }
                state.reserve(cell.id());
                self.writer.u8(SIMPLE_REF);
                self.write_any(state, &inner)
            }
        }
    }
}
