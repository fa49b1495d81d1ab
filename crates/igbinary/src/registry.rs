//! Name-keyed class registry.

use std::collections::HashMap;
use std::fmt;

use crate::hooks::{ClassId, ObjectHooks};
use crate::value::{Array, Object, ObjectRef, Value};

type SerializeFn = Box<dyn Fn(&ObjectRef) -> Option<Value>>;
type DeserializeFn = Box<dyn Fn(&[u8]) -> Option<Array>>;
type WakeupFn = Box<dyn Fn(&ObjectRef)>;

struct ClassEntry {
    name: Vec<u8>,
    serialize: Option<SerializeFn>,
    deserialize: Option<DeserializeFn>,
    wakeup: Option<WakeupFn>,
}

/// [`ObjectHooks`] backed by a table of registered classes.
///
/// Class names match ASCII case-insensitively. Objects rebuilt from a custom
/// form carry the name the class was first registered with.
///
/// ```
/// use igbinary::{Array, ClassRegistry};
///
/// let mut registry = ClassRegistry::new();
/// registry.on_deserialize("Point", |data| {
///     let mut props = Array::new();
///     props.insert("raw", data);
///     Some(props)
/// });
/// assert!(registry.lookup(b"point").is_some());
/// ```
#[derive(Default)]
pub struct ClassRegistry {
    classes: Vec<ClassEntry>,
    by_name: HashMap<Vec<u8>, ClassId>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name`, returning the existing id if it is already known.
    ///
    /// # Panics
    ///
    /// Panics if `u32::MAX` classes are already registered.
    pub fn register(&mut self, name: impl AsRef<[u8]>) -> ClassId {
        let name = name.as_ref();
        let folded = name.to_ascii_lowercase();
        if let Some(&id) = self.by_name.get(&folded) {
            return id;
        }
        let Ok(raw) = u32::try_from(self.classes.len()) else {
            panic!("class registry is full ({} classes)", self.classes.len());
        };
        let id = ClassId::new(raw);
        self.classes.push(ClassEntry {
            name: name.to_vec(),
            serialize: None,
            deserialize: None,
            wakeup: None,
        });
        self.by_name.insert(folded, id);
        id
    }

    pub fn lookup(&self, name: &[u8]) -> Option<ClassId> {
        self.by_name.get(&name.to_ascii_lowercase()).copied()
    }

    /// Canonical name of a registered class.
    pub fn name(&self, class: ClassId) -> Option<&[u8]> {
        self.entry(class).map(|e| e.name.as_slice())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Sets the custom-form producer of `name`, registering it if needed.
    ///
    /// The callback follows [`ObjectHooks::custom_serialize`]: a string selects
    /// the opaque form, `None` or null the structural form.
    pub fn on_serialize(
        &mut self,
        name: impl AsRef<[u8]>,
        f: impl Fn(&ObjectRef) -> Option<Value> + 'static,
    ) -> ClassId {
        let id = self.register(name);
        self.entry_mut(id).serialize = Some(Box::new(f));
        id
    }

    /// Sets the custom-form reader of `name`, registering it if needed.
    ///
    /// The callback returns the properties of the rebuilt object, or `None` to
    /// keep the payload opaque.
    pub fn on_deserialize(
        &mut self,
        name: impl AsRef<[u8]>,
        f: impl Fn(&[u8]) -> Option<Array> + 'static,
    ) -> ClassId {
        let id = self.register(name);
        self.entry_mut(id).deserialize = Some(Box::new(f));
        id
    }

    /// Sets the post-construction callback of `name`, registering it if needed.
    pub fn on_wakeup(
        &mut self,
        name: impl AsRef<[u8]>,
        f: impl Fn(&ObjectRef) + 'static,
    ) -> ClassId {
        let id = self.register(name);
        self.entry_mut(id).wakeup = Some(Box::new(f));
        id
    }

    fn entry(&self, class: ClassId) -> Option<&ClassEntry> {
        self.classes.get(class.get() as usize)
    }

    fn entry_mut(&mut self, class: ClassId) -> &mut ClassEntry {
        &mut self.classes[class.get() as usize]
    }

    fn class_of(&self, object: &ObjectRef) -> Option<ClassId> {
        let object = object.borrow();
        object.class.or_else(|| self.lookup(&object.class_name))
    }
}

impl ObjectHooks for ClassRegistry {
    fn resolve_class(&self, name: &[u8]) -> Option<ClassId> {
        self.lookup(name)
    }

    fn custom_serialize(&self, object: &ObjectRef) -> Option<Value> {
        let class = self.class_of(object)?;
        let f = self.entry(class)?.serialize.as_ref()?;
        f(object)
    }

    fn custom_deserialize(&self, class: ClassId, data: &[u8]) -> Option<Object> {
        let entry = self.entry(class)?;
        let f = entry.deserialize.as_ref()?;
        let props = f(data)?;
        Some(Object::with_class(entry.name.clone(), class).with_props(props))
    }

    fn wants_post_construct_notify(&self, class: ClassId) -> bool {
        self.entry(class).is_some_and(|e| e.wakeup.is_some())
    }

    fn notify_post_construct(&self, object: &ObjectRef) {
        let Some(class) = self.class_of(object) else {
            return;
        };
        if let Some(f) = self.entry(class).and_then(|e| e.wakeup.as_ref()) {
            f(object);
        }
    }
}

impl fmt::Debug for ClassRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(
                self.classes
                    .iter()
                    .map(|e| String::from_utf8_lossy(&e.name)),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_match_case_insensitively() {
        let mut registry = ClassRegistry::new();
        let id = registry.register("UserProfile");
        assert_eq!(registry.register("userprofile"), id);
        assert_eq!(registry.lookup(b"USERPROFILE"), Some(id));
        assert_eq!(registry.name(id), Some(&b"UserProfile"[..]));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup(b"Other"), None);
    }

    #[test]
    fn rebuilt_objects_carry_the_canonical_name() {
        let mut registry = ClassRegistry::new();
        let id = registry.on_deserialize("Money", |data| {
            let mut props = Array::new();
            props.insert("amount", data);
            Some(props)
        });
        let object = registry.custom_deserialize(id, b"12.50").unwrap();
        assert_eq!(object.class_name, b"Money");
        assert_eq!(object.class, Some(id));
        assert_eq!(object.get("amount"), Some(&Value::from("12.50")));
    }

    #[test]
    fn missing_callbacks_fall_back() {
        let mut registry = ClassRegistry::new();
        let id = registry.register("Plain");
        assert!(registry.custom_deserialize(id, b"x").is_none());
        assert!(!registry.wants_post_construct_notify(id));
        let object = ObjectRef::new(Object::new("plain"));
        assert!(registry.custom_serialize(&object).is_none());
    }

    #[test]
    fn debug_lists_names() {
        let mut registry = ClassRegistry::new();
        registry.register("A");
        registry.register("B");
        assert_eq!(format!("{registry:?}"), r#"["A", "B"]"#);
    }
}
