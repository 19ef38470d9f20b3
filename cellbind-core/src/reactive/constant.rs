//! Cells that never change.

use std::fmt::{self, Debug};
use std::rc::Rc;

use serde::{Serialize, Serializer};

use super::{Listener, Observable, Subscription};

/// A cell holding a fixed value.
///
/// Subscribing delivers the value once. There is nothing to detach, so the
/// returned handle is [`Subscription::empty`].
pub struct Constant<T> {
    value: Rc<T>,
}

impl<T> Constant<T> {
    /// Create a constant cell.
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(value),
        }
    }

    /// Borrow the value.
    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T> Observable for Constant<T> {
    type Item = T;

    fn subscribe(&self, listener: Listener<T>) -> Subscription {
        listener(&self.value);
        Subscription::empty()
    }
}

impl<T> Clone for Constant<T> {
    fn clone(&self) -> Self {
        Self {
            value: Rc::clone(&self.value),
        }
    }
}

impl<T: Debug> Debug for Constant<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Constant").field(&self.value).finish()
    }
}

impl<T: Serialize> Serialize for Constant<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value.serialize(serializer)
    }
}
