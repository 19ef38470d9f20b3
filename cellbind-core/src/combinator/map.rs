//! Value-level mapping over a cell.

use std::fmt;
use std::rc::Rc;

use crate::reactive::{Listener, Observable, Subscription};

/// A cell delivering `g(value)` for every upstream value.
///
/// Unlike [`crate::combinator::Bind`], `g` returns a plain value, so there is
/// no downstream cell to re-point and the subscription is just the upstream
/// one with the listener wrapped.
pub struct Map<U, G> {
    upstream: U,
    g: Rc<G>,
}

impl<U, G> Map<U, G> {
    /// Map `g` over `upstream`.
    pub fn new(upstream: U, g: G) -> Self {
        Self {
            upstream,
            g: Rc::new(g),
        }
    }
}

/// Map `g` over `upstream`.
pub fn map<U, G, B>(upstream: U, g: G) -> Map<U, G>
where
    U: Observable,
    G: Fn(&U::Item) -> B + 'static,
{
    Map::new(upstream, g)
}

impl<U, G, B> Observable for Map<U, G>
where
    U: Observable,
    U::Item: 'static,
    G: Fn(&U::Item) -> B + 'static,
    B: 'static,
{
    type Item = B;

    fn subscribe(&self, listener: Listener<B>) -> Subscription {
        let g = Rc::clone(&self.g);
        self.upstream
            .subscribe(Rc::new(move |value: &U::Item| listener(&g(value))))
    }
}

impl<U: Clone, G> Clone for Map<U, G> {
    fn clone(&self) -> Self {
        Self {
            upstream: self.upstream.clone(),
            g: Rc::clone(&self.g),
        }
    }
}

impl<U: fmt::Debug, G> fmt::Debug for Map<U, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map")
            .field("upstream", &self.upstream)
            .finish_non_exhaustive()
    }
}
