//! Shared, interior-mutable containers with a stable identity.

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Stable token naming one container for its whole lifetime.
///
/// Identities come from a process-wide counter and are never reused, so two
/// handles share an identity exactly when they point at the same container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(u64);

impl Identity {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Identity(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Node<T> {
    id: Identity,
    cell: RefCell<T>,
}

/// Reference-counted handle to a mutable container.
///
/// Cloning a handle aliases the container. Graphs that contain cycles keep
/// themselves alive; break a cycle (for example with
/// [`Array::clear`](crate::Array::clear)) to release it.
pub struct Handle<T> {
    node: Rc<Node<T>>,
}

impl<T> Handle<T> {
    pub fn new(value: T) -> Self {
        Self {
            node: Rc::new(Node {
                id: Identity::next(),
                cell: RefCell::new(value),
            }),
        }
    }

    pub fn id(&self) -> Identity {
        self.node.id
    }

    /// Immutably borrows the contents.
    ///
    /// # Panics
    ///
    /// Panics if the contents are currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.node.cell.borrow()
    }

    /// Mutably borrows the contents.
    ///
    /// # Panics
    ///
    /// Panics if the contents are currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.node.cell.borrow_mut()
    }

    /// Replaces the contents, keeping the identity.
    pub fn replace(&self, value: T) -> T {
        self.node.cell.replace(value)
    }

    /// Returns `true` when both handles point at the same container.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.node, &other.node)
    }
}

impl<T: Clone> Handle<T> {
    /// Returns a copy of the contents.
    pub fn get(&self) -> T {
        self.borrow().clone()
    }
}

impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            node: Rc::clone(&self.node),
        }
    }
}

// Contents are left out so that cyclic graphs can be printed.
impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Handle").field(&self.node.id.0).finish()
    }
}

thread_local! {
    /// Handle pairs currently being compared on this thread.
    static COMPARING: RefCell<HashSet<(Identity, Identity)>> = RefCell::new(HashSet::new());
}

/// Removes a pair from [`COMPARING`] when its comparison ends, even by panic.
struct ComparingGuard((Identity, Identity));

impl Drop for ComparingGuard {
    fn drop(&mut self) {
        COMPARING.with(|pairs| pairs.borrow_mut().remove(&self.0));
    }
}

// A pair met again while it is still being compared is assumed equal, so two
// distinct cyclic graphs compare by shape instead of recursing forever.
impl<T: PartialEq> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        let pair = (self.id(), other.id());
        if !COMPARING.with(|pairs| pairs.borrow_mut().insert(pair)) {
            return true;
        }
        let _guard = ComparingGuard(pair);
        *self.borrow() == *other.borrow()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identities_are_unique() {
        let a = Handle::new(1);
        let b = Handle::new(1);
        assert_ne!(a.id(), b.id());
        assert_eq!(a, b);
        assert!(!a.ptr_eq(&b));
    }

    #[test]
    fn clones_alias() {
        let a = Handle::new(vec![1]);
        let b = a.clone();
        b.borrow_mut().push(2);
        assert_eq!(a.get(), vec![1, 2]);
        assert_eq!(a.id(), b.id());
        assert!(a.ptr_eq(&b));
    }

    #[test]
    fn replace_keeps_identity() {
        let a = Handle::new(1);
        let id = a.id();
        assert_eq!(a.replace(2), 1);
        assert_eq!(a.get(), 2);
        assert_eq!(a.id(), id);
    }

    #[test]
    fn distinct_cycles_compare_by_shape() {
        let a = Handle::new(Vec::new());
        a.borrow_mut().push(Wrap(a.clone()));
        let b = Handle::new(Vec::new());
        b.borrow_mut().push(Wrap(b.clone()));
        assert_eq!(a, b);
        let c = Handle::new(Vec::new());
        c.borrow_mut().push(Wrap(c.clone()));
        c.borrow_mut().push(Wrap(a.clone()));
        assert_ne!(a, c);
        COMPARING.with(|pairs| assert!(pairs.borrow().is_empty()));
        for h in [a, b, c] {
            h.borrow_mut().clear();
        }
    }

    #[derive(PartialEq)]
    struct Wrap(Handle<Vec<Wrap>>);
}
