//! Bind
//!
//! [`Bind`] is monadic bind (flatMap) over cells. Given an upstream cell and
//! a function from its value to another cell, the bound cell always reflects
//! the cell produced from the latest upstream value.
//!
//! # How Rewiring Works
//!
//! Each subscription owns a [`Rewire`]: a slot for the one live downstream
//! subscription. On every upstream value:
//!
//! 1. The function runs first. If it panics nothing has been touched yet and
//!    the current downstream subscription stays in place.
//! 2. The previous downstream subscription is taken out of the slot and
//!    revoked.
//! 3. The listener is subscribed to the new cell and the handle is stored.
//!
//! Step 3 delivers the new cell's value synchronously, so re-pointing shows
//! up as an ordinary notification.
//!
//! A listener reached during step 3 may cause another upstream value to
//! arrive before step 3 returns. That nested rewire bumps the generation
//! counter, and the outer call then revokes the handle it was about to store
//! instead of overwriting the newer one.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::reactive::{Listener, Observable, Subscription};

/// The downstream slot owned by one bind subscription.
pub(crate) struct Rewire {
    current: RefCell<Option<Subscription>>,
    generation: Cell<u64>,
}

impl Rewire {
    pub(crate) fn new() -> Self {
        Self {
            current: RefCell::new(None),
            generation: Cell::new(0),
        }
    }

    /// Revoke the current downstream subscription and attach `listener` to
    /// `next` in its place.
    pub(crate) fn point_to<D>(&self, next: &D, listener: Listener<D::Item>)
    where
        D: Observable + ?Sized,
    {
        let generation = self.bump();

        let previous = self.current.borrow_mut().take();
        if let Some(previous) = previous {
            debug!(generation, "rewiring to new downstream cell");
            previous.unsubscribe();
        }

        let subscription = next.subscribe(listener);

        if self.generation.get() == generation {
            *self.current.borrow_mut() = Some(subscription);
        } else {
            trace!(generation, "downstream superseded during attach");
            subscription.unsubscribe();
        }
    }

    /// Revoke the current downstream subscription, if any.
    pub(crate) fn release(&self) {
        self.bump();
        let current = self.current.borrow_mut().take();
        drop(current);
    }

    fn bump(&self) -> u64 {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        generation
    }
}

/// A cell tracking `f(latest upstream value)`.
///
/// Created by [`bind`] or [`crate::combinator::ObservableExt::bind`].
pub struct Bind<U, F> {
    upstream: U,
    f: Rc<F>,
}

impl<U, F> Bind<U, F> {
    /// Bind `f` over `upstream`.
    pub fn new(upstream: U, f: F) -> Self {
        Self {
            upstream,
            f: Rc::new(f),
        }
    }
}

/// Bind `f` over `upstream`.
///
/// # Example
///
/// ```rust
/// use cellbind_core::combinator::bind;
/// use cellbind_core::reactive::{get, Writable};
///
/// let counters = vec![Writable::new(10), Writable::new(20)];
/// let index = Writable::new(0usize);
///
/// let selected = bind(index.clone(), move |i: &usize| counters[*i].clone());
/// assert_eq!(get(&selected), Ok(10));
///
/// index.set(1);
/// assert_eq!(get(&selected), Ok(20));
/// ```
pub fn bind<U, F, D>(upstream: U, f: F) -> Bind<U, F>
where
    U: Observable,
    F: Fn(&U::Item) -> D + 'static,
    D: Observable,
{
    Bind::new(upstream, f)
}

impl<U, F, D> Observable for Bind<U, F>
where
    U: Observable,
    U::Item: 'static,
    F: Fn(&U::Item) -> D + 'static,
    D: Observable,
    D::Item: 'static,
{
    type Item = D::Item;

    fn subscribe(&self, listener: Listener<D::Item>) -> Subscription {
        let rewire = Rc::new(Rewire::new());

        let f = Rc::clone(&self.f);
        let state = Rc::clone(&rewire);
        let upstream = self.upstream.subscribe(Rc::new(move |value: &U::Item| {
            let next = f(value);
            state.point_to(&next, Rc::clone(&listener));
        }));
        trace!("bind subscribed");

        Subscription::new(move || {
            upstream.unsubscribe();
            rewire.release();
        })
    }
}

impl<U: Clone, F> Clone for Bind<U, F> {
    fn clone(&self) -> Self {
        Self {
            upstream: self.upstream.clone(),
            f: Rc::clone(&self.f),
        }
    }
}

impl<U: fmt::Debug, F> fmt::Debug for Bind<U, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bind")
            .field("upstream", &self.upstream)
            .finish_non_exhaustive()
    }
}

/// A bind whose function may fail.
///
/// Delivers `Ok(value)` from the current downstream cell, or `Err(error)`
/// when the function rejects an upstream value. An error revokes the
/// previous downstream subscription, so nothing from the old cell arrives
/// until a later upstream value succeeds.
pub struct TryBind<U, F> {
    upstream: U,
    f: Rc<F>,
}

impl<U, F> TryBind<U, F> {
    /// Bind the fallible `f` over `upstream`.
    pub fn new(upstream: U, f: F) -> Self {
        Self {
            upstream,
            f: Rc::new(f),
        }
    }
}

/// Bind the fallible `f` over `upstream`.
pub fn try_bind<U, F, D, E>(upstream: U, f: F) -> TryBind<U, F>
where
    U: Observable,
    F: Fn(&U::Item) -> Result<D, E> + 'static,
    D: Observable,
{
    TryBind::new(upstream, f)
}

impl<U, F, D, E> Observable for TryBind<U, F>
where
    U: Observable,
    U::Item: 'static,
    F: Fn(&U::Item) -> Result<D, E> + 'static,
    D: Observable,
    D::Item: Clone + 'static,
    E: 'static,
{
    type Item = Result<D::Item, E>;

    fn subscribe(&self, listener: Listener<Result<D::Item, E>>) -> Subscription {
        let rewire = Rc::new(Rewire::new());

        let f = Rc::clone(&self.f);
        let state = Rc::clone(&rewire);
        let upstream = self.upstream.subscribe(Rc::new(move |value: &U::Item| match f(value) {
            Ok(next) => {
                let listener = Rc::clone(&listener);
                state.point_to(
                    &next,
                    Rc::new(move |item: &D::Item| listener(&Ok(item.clone()))),
                );
            }
            Err(error) => {
                debug!("bind function rejected upstream value");
                state.release();
                listener(&Err(error));
            }
        }));
        trace!("try_bind subscribed");

        Subscription::new(move || {
            upstream.unsubscribe();
            rewire.release();
        })
    }
}

impl<U: Clone, F> Clone for TryBind<U, F> {
    fn clone(&self) -> Self {
        Self {
            upstream: self.upstream.clone(),
            f: Rc::clone(&self.f),
        }
    }
}

impl<U: fmt::Debug, F> fmt::Debug for TryBind<U, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TryBind")
            .field("upstream", &self.upstream)
            .finish_non_exhaustive()
    }
}
