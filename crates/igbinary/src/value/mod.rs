//! Dynamic value graph read by the encoder and built by the decoder.

mod array;
mod handle;
mod object;

pub use array::Array;
pub use handle::{Handle, Identity};
pub use object::Object;

/// Shared handle to an [`Array`].
pub type ArrayRef = Handle<Array>;
/// Shared handle to an [`Object`].
pub type ObjectRef = Handle<Object>;
/// A single storage cell aliased by several graph positions.
pub type SharedCell = Handle<Value>;

/// Array key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Int(i64),
    Str(Vec<u8>),
}

/// A node of the value graph.
///
/// Arrays, objects and shared cells are handles: cloning the value aliases
/// the container, which is how shared and cyclic structure is expressed.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Byte string; not necessarily UTF-8.
    Str(Vec<u8>),
    Array(ArrayRef),
    Object(ObjectRef),
    /// Cell aliased by several positions.
    ///
    /// Only a cell holding a scalar survives a round trip as a cell. A cell
    /// holding an array or object encodes as that container and decodes as
    /// the plain `Array`/`Object`, which still aliases through its handle.
    /// Such a value therefore does not compare equal to its decoded copy.
    Shared(SharedCell),
    /// Host resource handle (file, socket, ...). Has no wire form.
    Resource(i64),
}

impl Value {
    pub fn string(s: impl Into<Vec<u8>>) -> Self {
        Value::Str(s.into())
    }

    pub fn array(array: Array) -> Self {
        Value::Array(ArrayRef::new(array))
    }

    pub fn object(object: Object) -> Self {
        Value::Object(ObjectRef::new(object))
    }

    /// Wraps `value` in a new shared cell.
    pub fn shared(value: impl Into<Value>) -> Self {
        Value::Shared(SharedCell::new(value.into()))
    }

    /// Name of the value kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Shared(_) => "reference",
            Value::Resource(_) => "resource",
        }
    }

    /// Identity of the container behind this value, if it is one.
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Value::Array(a) => Some(a.id()),
            Value::Object(o) => Some(o.id()),
            Value::Shared(c) => Some(c.id()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_shared(&self) -> Option<&SharedCell> {
        match self {
            Value::Shared(c) => Some(c),
            _ => None,
        }
    }
}

// Floats compare by bit pattern: NaN equals itself and 0.0 differs from -0.0.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Shared(a), Value::Shared(b)) => a == b,
            (Value::Resource(a), Value::Resource(b)) => a == b,
            _ => false,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.as_bytes().to_vec())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into_bytes())
    }
}

impl From<Vec<u8>> for Value {
    fn from(s: Vec<u8>) -> Self {
        Value::Str(s)
    }
}

impl From<&[u8]> for Value {
    fn from(s: &[u8]) -> Self {
        Value::Str(s.to_vec())
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::array(a)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::object(o)
    }
}

impl From<ArrayRef> for Value {
    fn from(a: ArrayRef) -> Self {
        Value::Array(a)
    }
}

impl From<ObjectRef> for Value {
    fn from(o: ObjectRef) -> Self {
        Value::Object(o)
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Int(n.into())
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.as_bytes().to_vec())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s.into_bytes())
    }
}

impl From<Vec<u8>> for Key {
    fn from(s: Vec<u8>) -> Self {
        Key::Str(s)
    }
}

impl From<&[u8]> for Key {
    fn from(s: &[u8]) -> Self {
        Key::Str(s.to_vec())
    }
}
