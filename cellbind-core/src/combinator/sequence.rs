//! Sequence
//!
//! [`Sequence`] turns a fixed list of cells into one cell holding the list
//! of their latest values (combine-latest).
//!
//! # Readiness
//!
//! Subscribing attaches to every member in index order. Each member delivers
//! its first value during its own `subscribe` call, but the sequence stays
//! silent until the last member is attached and every slot holds a value.
//! Only then is the listener called, once, with the complete list. After
//! that every member change produces exactly one notification carrying the
//! whole list.
//!
//! A member that breaks the contract by not delivering on subscribe keeps
//! the sequence silent until its first value arrives. A member that
//! delivers several times before the sequence is ready only overwrites its
//! slot.
//!
//! An empty sequence delivers an empty list once and never again.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::reactive::{Listener, Observable, Subscription};

/// Per-subscription value buffer.
enum Slots<T> {
    /// Waiting for first values. `armed` is set once every member is attached.
    Filling { values: Vec<Option<T>>, armed: bool },

    /// Every member has delivered; the listener has been called.
    Ready(Vec<T>),
}

impl<T: Clone> Slots<T> {
    /// Switch to `Ready` if armed and complete, returning the first snapshot.
    fn settle(&mut self) -> Option<Vec<T>> {
        let ready: Vec<T> = match self {
            Slots::Filling {
                values,
                armed: true,
            } if values.iter().all(Option::is_some) => values.drain(..).flatten().collect(),
            _ => return None,
        };
        *self = Slots::Ready(ready.clone());
        Some(ready)
    }
}

struct Buffer<T> {
    slots: RefCell<Slots<T>>,
    listener: Listener<Vec<T>>,
}

impl<T: Clone> Buffer<T> {
    fn new(len: usize, listener: Listener<Vec<T>>) -> Self {
        Self {
            slots: RefCell::new(Slots::Filling {
                values: vec![None; len],
                armed: false,
            }),
            listener,
        }
    }

    /// Record a member value and notify if the buffer is ready.
    fn store(&self, index: usize, value: &T) {
        let snapshot = {
            let mut slots = self.slots.borrow_mut();
            let updated = match &mut *slots {
                Slots::Ready(values) => {
                    values[index] = value.clone();
                    Some(values.clone())
                }
                Slots::Filling { values, .. } => {
                    values[index] = Some(value.clone());
                    None
                }
            };
            match updated {
                Some(values) => Some(values),
                None => slots.settle(),
            }
        };

        if let Some(values) = snapshot {
            (self.listener)(&values);
        }
    }

    /// Mark every member as attached and deliver the first value if complete.
    fn arm(&self) {
        let snapshot = {
            let mut slots = self.slots.borrow_mut();
            if let Slots::Filling { armed, .. } = &mut *slots {
                *armed = true;
            }
            slots.settle()
        };

        match snapshot {
            Some(values) => {
                debug!(members = values.len(), "sequence ready");
                (self.listener)(&values);
            }
            None => trace!("sequence armed, waiting on members"),
        }
    }
}

/// A cell holding the latest values of a fixed list of cells, in order.
pub struct Sequence<C> {
    members: Vec<C>,
}

impl<C> Sequence<C> {
    /// Combine `members` into one cell.
    pub fn new(members: Vec<C>) -> Self {
        Self { members }
    }

    /// Number of member cells.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether there are no member cells.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Combine `cells` into one cell holding their latest values.
///
/// # Example
///
/// ```rust
/// use cellbind_core::combinator::sequence;
/// use cellbind_core::reactive::{get, Writable};
///
/// let cells = vec![Writable::new(3), Writable::new(1), Writable::new(2)];
/// let combined = sequence(cells.clone());
/// assert_eq!(get(&combined), Ok(vec![3, 1, 2]));
///
/// cells[1].set(9);
/// assert_eq!(get(&combined), Ok(vec![3, 9, 2]));
/// ```
pub fn sequence<I>(cells: I) -> Sequence<I::Item>
where
    I: IntoIterator,
    I::Item: Observable,
{
    Sequence::new(cells.into_iter().collect())
}

impl<C, T> Observable for Sequence<C>
where
    C: Observable<Item = T>,
    T: Clone + 'static,
{
    type Item = Vec<T>;

    fn subscribe(&self, listener: Listener<Vec<T>>) -> Subscription {
        let buffer = Rc::new(Buffer::new(self.members.len(), listener));

        let members: Vec<Subscription> = self
            .members
            .iter()
            .enumerate()
            .map(|(index, member)| {
                let buffer = Rc::clone(&buffer);
                member.subscribe(Rc::new(move |value: &T| buffer.store(index, value)))
            })
            .collect();
        trace!(members = members.len(), "sequence attached");

        // A panic here drops `members`, revoking every member subscription.
        buffer.arm();

        Subscription::new(move || drop(members))
    }
}

impl<C: Clone> Clone for Sequence<C> {
    fn clone(&self) -> Self {
        Self {
            members: self.members.clone(),
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for Sequence<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("members", &self.members)
            .finish()
    }
}
