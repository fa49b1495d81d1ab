//! Class-tagged object.

use super::{Array, Key, Value};
use crate::hooks::ClassId;

/// An instance of a named class.
#[derive(Debug, Clone)]
pub struct Object {
    /// Class name as written on the wire.
    pub class_name: Vec<u8>,
    /// Resolved class, or `None` when the name could not be resolved.
    pub class: Option<ClassId>,
    /// Property set, in declaration order.
    pub props: Array,
    /// Custom-form payload kept verbatim when nothing could deserialize it.
    /// Re-encoding emits it unchanged.
    pub opaque: Option<Vec<u8>>,
}

impl Object {
    /// Creates an object of an unresolved class.
    pub fn new(class_name: impl Into<Vec<u8>>) -> Self {
        Self {
            class_name: class_name.into(),
            class: None,
            props: Array::new(),
            opaque: None,
        }
    }

    pub fn with_class(class_name: impl Into<Vec<u8>>, class: ClassId) -> Self {
        Self {
            class: Some(class),
            ..Self::new(class_name)
        }
    }

    pub fn with_props(mut self, props: Array) -> Self {
        self.props = props;
        self
    }

    pub fn is_resolved(&self) -> bool {
        self.class.is_some()
    }

    pub fn get(&self, key: impl Into<Key>) -> Option<&Value> {
        self.props.get(&key.into())
    }

    pub fn set(&mut self, key: impl Into<Key>, value: impl Into<Value>) -> Option<Value> {
        self.props.insert(key, value)
    }

    /// Class name as UTF-8, replacing invalid sequences.
    pub fn class_name_lossy(&self) -> String {
        String::from_utf8_lossy(&self.class_name).into_owned()
    }
}

// The resolved class is host bookkeeping and does not take part in equality.
impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.class_name == other.class_name
            && self.props == other.props
            && self.opaque == other.opaque
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_ignores_resolved_class() {
        let mut a = Object::new("Obj");
        a.set("a", 1);
        let mut b = Object::with_class("Obj", ClassId::new(3));
        b.set("a", 1);
        assert_eq!(a, b);
        assert!(!a.is_resolved());
        assert!(b.is_resolved());
    }

    #[test]
    fn props_by_key() {
        let obj = Object::new("Point").with_props([("x", 1), ("y", 2)].into_iter().collect());
        assert_eq!(obj.get("y"), Some(&Value::Int(2)));
        assert_eq!(obj.get("z"), None);
        assert_eq!(obj.class_name_lossy(), "Point");
    }
}
