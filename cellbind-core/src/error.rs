//! Error types for the cell runtime.
//!
//! Propagation itself is infallible: a panicking mapping function unwinds
//! straight back to the `set` or `subscribe` call that triggered it. The
//! errors here cover contract violations that can be detected without
//! unwinding.

use thiserror::Error;

/// Errors reported by the cell runtime.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A cell returned from `subscribe` without delivering its current value.
    #[error("cell did not deliver a value synchronously on subscribe")]
    NoInitialValue,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
