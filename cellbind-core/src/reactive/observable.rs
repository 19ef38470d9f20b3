//! The observable cell contract.
//!
//! Every cell in this crate, leaf or derived, is consumed through the
//! [`Observable`] trait and nothing else. The combinators in
//! [`crate::combinator`] are written against this trait only, so any type that
//! honours the contract can take part in a graph.
//!
//! # Contract
//!
//! 1. `subscribe` invokes the listener synchronously, exactly once, with the
//!    current value before returning.
//! 2. The listener is invoked synchronously on every later change while the
//!    subscription is active.
//! 3. Revoking the returned [`Subscription`] detaches the listener from all
//!    future notifications.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::{Error, Result};

use super::Subscription;

/// Callback attached to a cell.
///
/// Listeners are reference counted so combinators can hand the same listener
/// to each downstream cell they re-point to.
pub type Listener<T> = Rc<dyn Fn(&T)>;

/// Type-erased cell.
pub type DynObservable<T> = Rc<dyn Observable<Item = T>>;

/// A push-based reactive value.
pub trait Observable {
    /// The type of value delivered to listeners.
    type Item;

    /// Attach a listener. See the module docs for the delivery guarantees.
    fn subscribe(&self, listener: Listener<Self::Item>) -> Subscription;

    /// Attach a closure as a listener.
    fn subscribe_fn<F>(&self, listener: F) -> Subscription
    where
        Self: Sized,
        F: Fn(&Self::Item) + 'static,
    {
        self.subscribe(Rc::new(listener))
    }
}

impl<O> Observable for Rc<O>
where
    O: Observable + ?Sized,
{
    type Item = O::Item;

    fn subscribe(&self, listener: Listener<Self::Item>) -> Subscription {
        (**self).subscribe(listener)
    }
}

impl<O> Observable for &O
where
    O: Observable + ?Sized,
{
    type Item = O::Item;

    fn subscribe(&self, listener: Listener<Self::Item>) -> Subscription {
        (**self).subscribe(listener)
    }
}

/// Read the current value of any cell.
///
/// Subscribes, captures the synchronously delivered value and unsubscribes
/// again. Fails only if the cell broke the contract by not delivering.
pub fn get<O>(cell: &O) -> Result<O::Item>
where
    O: Observable + ?Sized,
    O::Item: Clone + 'static,
{
    let captured: Rc<RefCell<Option<O::Item>>> = Rc::new(RefCell::new(None));
    let sink = Rc::clone(&captured);
    let subscription = cell.subscribe(Rc::new(move |value: &O::Item| {
        *sink.borrow_mut() = Some(value.clone());
    }));
    subscription.unsubscribe();

    let value = captured.borrow_mut().take();
    value.ok_or(Error::NoInitialValue)
}
