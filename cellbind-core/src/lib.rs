//! Cellbind Core
//!
//! This crate provides combinators for composing push-based reactive cells
//! into derived cells whose dependencies can change at runtime.
//! It implements:
//!
//! - The observable cell contract and leaf cells that satisfy it
//! - Bind: monadic flatMap over cells with dynamic re-subscription
//! - Sequence: combine-latest over a fixed list of cells
//! - Map and a chaining facade over both
//!
//! Propagation is synchronous and single-threaded. A `set` on a leaf cell
//! walks every dependent on its own call stack, depth first, before it
//! returns.
//!
//! # Architecture
//!
//! The crate is organized into two modules:
//!
//! - `reactive`: the [`Observable`](reactive::Observable) trait,
//!   subscription handles and leaf cells
//! - `combinator`: derived cells built only on the trait
//!
//! # Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use cellbind_core::combinator::{bind, sequence};
//! use cellbind_core::reactive::{Observable, Writable};
//!
//! let counters = vec![Writable::new(0), Writable::new(0), Writable::new(0)];
//! let index = Writable::new(0usize);
//!
//! // Follow whichever counter the index points at.
//! let lookup = counters.clone();
//! let current = bind(index.clone(), move |i: &usize| lookup[*i].clone());
//!
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! let subscription = current.subscribe_fn(move |value: &i32| sink.borrow_mut().push(*value));
//!
//! index.set(1);
//! counters[1].update(|n| n + 1);
//! counters[0].update(|n| n + 1); // not followed, nothing delivered
//! assert_eq!(*seen.borrow(), vec![0, 0, 1]);
//!
//! subscription.unsubscribe();
//! assert!(counters.iter().all(|c| c.subscriber_count() == 0));
//!
//! // Combine all three into one cell.
//! let all = sequence(counters.clone());
//! let snapshot = cellbind_core::reactive::get(&all);
//! assert_eq!(snapshot, Ok(vec![1, 1, 0]));
//! ```

pub mod combinator;
pub mod error;
pub mod reactive;

pub use error::{Error, Result};
