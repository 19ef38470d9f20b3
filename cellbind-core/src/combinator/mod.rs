//! Combinators
//!
//! Derived cells built from other cells. None of them stores a value: each
//! `subscribe` call creates fresh bookkeeping owned by the returned
//! [`Subscription`](crate::reactive::Subscription), and revoking it tears the
//! whole subtree down.
//!
//! - [`Bind`]: follow the cell chosen by a function of an upstream value,
//!   re-subscribing whenever the upstream value changes.
//! - [`Sequence`]: combine a fixed list of cells into a cell of their latest
//!   values.
//! - [`Map`]: apply a plain function to every value.
//! - [`Chain`] and [`ObservableExt`]: the same operations as methods.

mod bind;
mod chain;
mod map;
mod sequence;

pub use bind::{bind, try_bind, Bind, TryBind};
pub use chain::{Chain, ObservableExt};
pub use map::{map, Map};
pub use sequence::{sequence, Sequence};
