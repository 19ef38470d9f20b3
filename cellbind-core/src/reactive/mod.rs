//! Reactive Cells
//!
//! This module defines the observable cell contract and the leaf cells that
//! implement it. Everything in [`crate::combinator`] is built on top of it.
//!
//! # Concepts
//!
//! ## Observable
//!
//! [`Observable`] is the whole interface between cells. A cell delivers its
//! current value to a listener synchronously on `subscribe`, then again on
//! every change until the returned [`Subscription`] is revoked.
//!
//! ## Writable
//!
//! A [`Writable`] is a leaf cell: a value that external code sets directly.
//! [`Readable`] is a read-only view of one and [`Constant`] is a cell that
//! never changes.
//!
//! ## Subscription
//!
//! A [`Subscription`] owns the teardown of everything one `subscribe` call
//! attached. Dropping it unsubscribes.
//!
//! # Implementation Notes
//!
//! Propagation is synchronous and single-threaded: a `set` call walks the
//! whole dependent graph on its own call stack before returning. Cells are
//! therefore built on `Rc` and `RefCell` and are not `Send`.

mod constant;
mod observable;
mod subscriber;
mod writable;

pub use constant::Constant;
pub use observable::{get, DynObservable, Listener, Observable};
pub use subscriber::{SubscriberId, Subscription};
pub use writable::{Readable, Writable};
