//! Subscriber identity and subscription handles.
//!
//! Every `subscribe` call hands back a [`Subscription`]. The handle owns the
//! teardown for everything that call attached: for a leaf cell that is one
//! listener registration, for a combinator it is the whole tree of upstream
//! and downstream subscriptions it created.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a listener registration on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// Handle to an active subscription.
///
/// Dropping the handle unsubscribes. [`Subscription::unsubscribe`] does the
/// same thing explicitly. The teardown runs at most once: it is taken out of
/// the handle the first time it is invoked, so a handle cannot be revoked
/// twice.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wrap a teardown action.
    pub fn new<F>(teardown: F) -> Self
    where
        F: FnOnce() + 'static,
    {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A handle with nothing to tear down.
    ///
    /// Used by cells that never change and therefore keep no listener.
    pub fn empty() -> Self {
        Self { teardown: None }
    }

    /// Revoke the subscription now.
    pub fn unsubscribe(mut self) {
        self.revoke();
    }

    /// Give up the handle without revoking it.
    ///
    /// The subscription stays attached for as long as the cells involved
    /// live. The teardown action is leaked rather than dropped, since
    /// dropping it would drop any nested handles it captured.
    pub fn detach(mut self) {
        if let Some(teardown) = self.teardown.take() {
            std::mem::forget(teardown);
        }
    }

    /// Whether the teardown is still pending.
    pub fn is_active(&self) -> bool {
        self.teardown.is_some()
    }

    fn revoke(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.revoke();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
