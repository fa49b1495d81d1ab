//! igbinary binary serialization for dynamic value graphs.
//!
//! Values are arrays, class-tagged objects and scalars. Arrays, objects and
//! explicit [`SharedCell`]s are reference-counted handles, so a graph can
//! alias a container from several positions or contain itself; both survive
//! a round trip. Repeated strings and class names are written once and then
//! back-referenced.
//!
//! # Example
//!
//! ```
//! use igbinary::{decode, encode, Array, ArrayRef, Value};
//!
//! let list = ArrayRef::new(Array::list(["a", "a"]));
//! list.borrow_mut().push(Value::Array(list.clone()));
//!
//! let bytes = encode(&Value::Array(list.clone())).unwrap();
//! let back = decode(&bytes).unwrap();
//! let back = back.as_array().unwrap();
//! let inner = back.borrow().get(&2.into()).cloned().unwrap();
//! assert!(inner.as_array().unwrap().ptr_eq(back));
//!
//! // Break the cycles so both graphs are released.
//! list.borrow_mut().clear();
//! back.borrow_mut().clear();
//! ```

pub mod constants;
mod decoder;
mod encoder;
mod error;
mod hooks;
mod json;
mod options;
mod registry;
mod tags;
pub mod value;

pub use decoder::IgbinaryDecoder;
pub use encoder::IgbinaryEncoder;
pub use error::{IgbinaryError, Result};
pub use hooks::{ClassId, NoHooks, ObjectHooks};
pub use json::{from_json, to_json, JsonBridgeError};
pub use options::{DecodeOptions, EncodeOptions};
pub use registry::ClassRegistry;
pub use value::{Array, ArrayRef, Handle, Identity, Key, Object, ObjectRef, SharedCell, Value};

/// Encodes `value` with default options and no class hooks.
pub fn encode(value: &Value) -> Result<Vec<u8>> {
    IgbinaryEncoder::new().encode(value)
}

/// Decodes one value with default options and no class hooks.
pub fn decode(data: &[u8]) -> Result<Value> {
    IgbinaryDecoder::new().decode(data)
}

/// Encodes `value` with the given options, asking `hooks` for custom object
/// forms.
pub fn encode_with(
    value: &Value,
    hooks: &dyn ObjectHooks,
    options: EncodeOptions,
) -> Result<Vec<u8>> {
    IgbinaryEncoder::with_hooks(hooks, options).encode(value)
}

/// Decodes one value with the given options, resolving classes, custom forms
/// and post-construction notifications through `hooks`.
pub fn decode_with(data: &[u8], hooks: &dyn ObjectHooks, options: DecodeOptions) -> Result<Value> {
    IgbinaryDecoder::with_hooks(hooks, options).decode(data)
}
