//! Type aliases for shared ownership.
//!
//! The operation tree is single-threaded: parents own their children through
//! `Rc<RefCell<T>>` handles and children point back through `Weak` handles.
//! These aliases keep the signatures readable across crates.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use printplan_core::types::*;
//!
//! // Instead of: Rc<RefCell<Node>>
//! let node: Shared<Node> = shared(Node::default());
//! let parent: WeakShared<Node> = Rc::downgrade(&node);
//! ```

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// A reference-counted, interior-mutable wrapper for single-threaded sharing.
pub type Shared<T> = Rc<RefCell<T>>;

/// A non-owning back-reference to a [`Shared`] value.
pub type WeakShared<T> = Weak<RefCell<T>>;

/// Create a new `Shared<T>` from a value.
#[inline]
pub fn shared<T>(value: T) -> Shared<T> {
    Rc::new(RefCell::new(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared() {
        let value: Shared<i32> = shared(42);
        assert_eq!(*value.borrow(), 42);
        *value.borrow_mut() = 100;
        assert_eq!(*value.borrow(), 100);
    }

    #[test]
    fn test_weak_shared_does_not_keep_value_alive() {
        let value: Shared<Vec<i32>> = shared(vec![1, 2, 3]);
        let weak: WeakShared<Vec<i32>> = Rc::downgrade(&value);
        assert_eq!(weak.upgrade().map(|v| v.borrow().len()), Some(3));

        drop(value);
        assert!(weak.upgrade().is_none());
    }
}
