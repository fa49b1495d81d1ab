//! Interface to the host object system.

use crate::value::{Object, ObjectRef, Value};

/// Host-assigned identity of a resolved class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

/// Callbacks the codec makes into the host object system.
///
/// Every method has a default, so an implementation only overrides what its
/// classes need. [`NoHooks`] overrides nothing: no class resolves, every
/// object is encoded structurally and decodes as a placeholder.
pub trait ObjectHooks {
    /// Maps a class name read from the wire to a class.
    fn resolve_class(&self, _name: &[u8]) -> Option<ClassId> {
        None
    }

    /// Produces the custom form of an object.
    ///
    /// `Some(Value::Str(..))` selects the opaque form. `None` or
    /// `Some(Value::Null)` selects the structural form. Anything else makes
    /// the encoder fail with
    /// [`InvalidCustomSerialization`](crate::IgbinaryError::InvalidCustomSerialization).
    fn custom_serialize(&self, _object: &ObjectRef) -> Option<Value> {
        None
    }

    /// Rebuilds an object from its custom form.
    ///
    /// Returning `None` keeps the payload on the object untouched.
    fn custom_deserialize(&self, _class: ClassId, _data: &[u8]) -> Option<Object> {
        None
    }

    /// Whether objects of `class` want [`notify_post_construct`](Self::notify_post_construct).
    fn wants_post_construct_notify(&self, _class: ClassId) -> bool {
        false
    }

    /// Called once per queued object after the whole decode succeeded.
    fn notify_post_construct(&self, _object: &ObjectRef) {}
}

/// Hooks that resolve nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHooks;

impl ObjectHooks for NoHooks {}
