//! Writable Cell Implementation
//!
//! A [`Writable`] is the leaf of every cell graph: the only kind of cell that
//! external code mutates directly. Derived cells built by the combinators
//! hold no values of their own; every value they deliver originates in some
//! writable.
//!
//! # How Writables Work
//!
//! 1. `subscribe` registers the listener and immediately calls it with the
//!    current value.
//!
//! 2. `set` stores the new value and calls every registered listener, in
//!    registration order, before returning.
//!
//! 3. Dropping the returned [`Subscription`] removes the listener.
//!
//! # Re-entrancy
//!
//! A listener may call `set` on the cell that is notifying it. The new value
//! is stored immediately but its delivery is queued until the current round
//! has reached every listener. Listeners therefore always see values in the
//! order they were set, and never an older value after a newer one.
//!
//! A queued value goes to the listeners registered when it was set. A
//! listener that subscribes later already receives that value from
//! `subscribe`, so it is not delivered to it a second time.
//!
//! No `RefCell` borrow is held while a listener runs, so listeners may also
//! subscribe to, unsubscribe from and read the cell freely.
//!
//! # Memory Layout
//!
//! Values are stored behind `Rc` so a delivery round can keep the value it
//! is delivering alive while a re-entrant `set` replaces the stored one.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt::{self, Debug};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use smallvec::SmallVec;
use tracing::trace;

use super::{Listener, Observable, SubscriberId, Subscription};

/// Counter for generating unique cell IDs.
static CELL_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Generate a new unique cell ID.
fn next_cell_id() -> u64 {
    CELL_ID_COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// Listeners a queued value is addressed to.
type Recipients = SmallVec<[SubscriberId; 8]>;

/// State shared by every handle to one writable cell.
struct Shared<T> {
    id: u64,

    /// The current value.
    value: RefCell<Rc<T>>,

    /// Registered listeners, in registration order.
    listeners: RefCell<IndexMap<SubscriberId, Listener<T>>>,

    /// Values awaiting delivery, each with its recipients at `set` time.
    pending: RefCell<VecDeque<(Rc<T>, Recipients)>>,

    /// Whether a delivery round is running.
    delivering: Cell<bool>,
}

impl<T: 'static> Shared<T> {
    fn new(value: T) -> Self {
        Self {
            id: next_cell_id(),
            value: RefCell::new(Rc::new(value)),
            listeners: RefCell::new(IndexMap::new()),
            pending: RefCell::new(VecDeque::new()),
            delivering: Cell::new(false),
        }
    }

    fn current(&self) -> Rc<T> {
        Rc::clone(&self.value.borrow())
    }

    fn set(&self, value: T) {
        let value = Rc::new(value);
        *self.value.borrow_mut() = Rc::clone(&value);
        let recipients: Recipients = self.listeners.borrow().keys().copied().collect();
        self.pending.borrow_mut().push_back((value, recipients));
        self.deliver();
    }

    fn deliver(&self) {
        if self.delivering.replace(true) {
            trace!(cell = self.id, "set during delivery, queued");
            return;
        }
        let _round = DeliveryRound { shared: self };

        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some((value, recipients)) = next else {
                break;
            };
            trace!(cell = self.id, subscribers = recipients.len(), "notifying");

            for id in recipients {
                // Skip listeners revoked earlier in this round.
                let listener = self.listeners.borrow().get(&id).cloned();
                if let Some(listener) = listener {
                    listener(&value);
                }
            }
        }
    }

    fn subscribe(self: &Rc<Self>, listener: Listener<T>) -> Subscription {
        let id = SubscriberId::new();
        self.listeners.borrow_mut().insert(id, Rc::clone(&listener));
        trace!(cell = self.id, subscriber = %id, "subscribed");

        let weak = Rc::downgrade(self);
        let subscription = Subscription::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.unsubscribe(id);
            }
        });

        // A panic here drops `subscription`, which removes the registration.
        let current = self.current();
        listener(&current);

        subscription
    }

    fn unsubscribe(&self, id: SubscriberId) {
        let removed = self.listeners.borrow_mut().shift_remove(&id);
        if removed.is_some() {
            trace!(cell = self.id, subscriber = %id, "unsubscribed");
        }
        // The listener may own nested subscriptions; release it unborrowed.
        drop(removed);
    }

    fn subscriber_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

/// Resets the delivery state when a round ends, including by panic.
struct DeliveryRound<'a, T> {
    shared: &'a Shared<T>,
}

impl<T> Drop for DeliveryRound<'_, T> {
    fn drop(&mut self) {
        self.shared.pending.borrow_mut().clear();
        self.shared.delivering.set(false);
    }
}

/// A mutable leaf cell holding a value of type `T`.
///
/// Cloning a `Writable` creates a new handle to the same cell.
///
/// # Example
///
/// ```rust
/// use cellbind_core::reactive::{Observable, Writable};
///
/// let count = Writable::new(0);
/// let subscription = count.subscribe_fn(|value| println!("count = {value}"));
///
/// count.set(5);
/// count.update(|value| value + 1);
/// assert_eq!(count.get(), 6);
///
/// subscription.unsubscribe();
/// assert_eq!(count.subscriber_count(), 0);
/// ```
pub struct Writable<T> {
    shared: Rc<Shared<T>>,
}

impl<T: 'static> Writable<T> {
    /// Create a new cell with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            shared: Rc::new(Shared::new(value)),
        }
    }

    /// Get the cell's unique ID.
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    /// Store a new value and notify every listener.
    ///
    /// Listeners are notified even when the value is equal to the previous
    /// one; use [`Writable::set_if_changed`] to skip those.
    pub fn set(&self, value: T) {
        self.shared.set(value);
    }

    /// Compute the next value from the current one and store it.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.shared.current());
        self.set(next);
    }

    /// Access the current value by reference.
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.shared.current())
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscriber_count()
    }

    /// A handle that can subscribe and read but not write.
    pub fn read_only(&self) -> Readable<T> {
        Readable {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: Clone + 'static> Writable<T> {
    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        (*self.shared.current()).clone()
    }

    /// Edit a copy of the current value in place and store it.
    pub fn modify<F>(&self, f: F)
    where
        F: FnOnce(&mut T),
    {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }
}

impl<T: PartialEq + 'static> Writable<T> {
    /// Store a new value only if it differs from the current one.
    ///
    /// Returns whether listeners were notified.
    pub fn set_if_changed(&self, value: T) -> bool {
        if *self.shared.current() == value {
            return false;
        }
        self.set(value);
        true
    }
}

impl<T: 'static> Observable for Writable<T> {
    type Item = T;

    fn subscribe(&self, listener: Listener<T>) -> Subscription {
        self.shared.subscribe(listener)
    }
}

impl<T> Clone for Writable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: Debug> Debug for Writable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Writable")
            .field("id", &self.shared.id)
            .field("value", &self.shared.value.borrow())
            .field("subscriber_count", &self.shared.listeners.borrow().len())
            .finish()
    }
}

impl<T: Serialize> Serialize for Writable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let current = Rc::clone(&self.shared.value.borrow());
        current.serialize(serializer)
    }
}

/// A read-only view of a [`Writable`].
pub struct Readable<T> {
    shared: Rc<Shared<T>>,
}

impl<T: 'static> Readable<T> {
    /// Get the underlying cell's unique ID.
    pub fn id(&self) -> u64 {
        self.shared.id
    }

    /// Access the current value by reference.
    pub fn with<R, F>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.shared.current())
    }

    /// Number of registered listeners on the underlying cell.
    pub fn subscriber_count(&self) -> usize {
        self.shared.subscriber_count()
    }
}

impl<T: Clone + 'static> Readable<T> {
    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        (*self.shared.current()).clone()
    }
}

impl<T: 'static> Observable for Readable<T> {
    type Item = T;

    fn subscribe(&self, listener: Listener<T>) -> Subscription {
        self.shared.subscribe(listener)
    }
}

impl<T> Clone for Readable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: Debug> Debug for Readable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Readable")
            .field("id", &self.shared.id)
            .field("value", &self.shared.value.borrow())
            .finish()
    }
}

impl<T: Serialize> Serialize for Readable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let current = Rc::clone(&self.shared.value.borrow());
        current.serialize(serializer)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
