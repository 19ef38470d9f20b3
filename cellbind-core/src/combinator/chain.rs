//! Method-chaining facade over the combinators.
//!
//! Nested lookups (id → entity → nested entity) read inside-out when written
//! with the free functions. [`Chain`] and [`ObservableExt`] let them be
//! written left to right instead. Neither adds behaviour: every method is a
//! direct call to [`bind`], [`try_bind`] or [`map`].

use std::rc::Rc;

use super::{bind, map, try_bind, Bind, Map, TryBind};
use crate::reactive::{DynObservable, Listener, Observable, Subscription};

/// A cell wrapped for chaining.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
///
/// use cellbind_core::combinator::Chain;
/// use cellbind_core::reactive::{get, Writable};
///
/// let names = HashMap::from([(1, Writable::new("ada")), (2, Writable::new("grace"))]);
/// let selected = Writable::new(1);
///
/// let greeting = Chain::new(selected.clone())
///     .bind(move |id: &i32| names[id].clone())
///     .map(|name: &&str| format!("hello, {name}"));
///
/// assert_eq!(get(&greeting), Ok("hello, ada".to_string()));
/// selected.set(2);
/// assert_eq!(get(&greeting), Ok("hello, grace".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct Chain<C> {
    inner: C,
}

impl<C> Chain<C> {
    /// Wrap a cell.
    pub fn new(inner: C) -> Self {
        Self { inner }
    }

    /// Unwrap the cell.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

impl<C: Observable> Chain<C> {
    /// Continue with a cell chosen from this cell's value.
    pub fn bind<F, D>(self, f: F) -> Chain<Bind<C, F>>
    where
        F: Fn(&C::Item) -> D + 'static,
        D: Observable,
    {
        Chain::new(bind(self.inner, f))
    }

    /// Continue with a cell chosen by a fallible function.
    pub fn try_bind<F, D, E>(self, f: F) -> Chain<TryBind<C, F>>
    where
        F: Fn(&C::Item) -> Result<D, E> + 'static,
        D: Observable,
    {
        Chain::new(try_bind(self.inner, f))
    }

    /// Continue with a plain function of this cell's value.
    pub fn map<G, B>(self, g: G) -> Chain<Map<C, G>>
    where
        G: Fn(&C::Item) -> B + 'static,
    {
        Chain::new(map(self.inner, g))
    }

    /// Erase the wrapped cell's type.
    pub fn boxed(self) -> Chain<DynObservable<C::Item>>
    where
        C: 'static,
    {
        let inner: DynObservable<C::Item> = Rc::new(self.inner);
        Chain::new(inner)
    }
}

impl<C: Observable> Observable for Chain<C> {
    type Item = C::Item;

    fn subscribe(&self, listener: Listener<C::Item>) -> Subscription {
        self.inner.subscribe(listener)
    }
}

/// Combinator methods for every [`Observable`].
pub trait ObservableExt: Observable + Sized {
    /// See [`bind`].
    fn bind<F, D>(self, f: F) -> Bind<Self, F>
    where
        F: Fn(&Self::Item) -> D + 'static,
        D: Observable,
    {
        bind(self, f)
    }

    /// See [`try_bind`].
    fn try_bind<F, D, E>(self, f: F) -> TryBind<Self, F>
    where
        F: Fn(&Self::Item) -> Result<D, E> + 'static,
        D: Observable,
    {
        try_bind(self, f)
    }

    /// See [`map`].
    fn map<G, B>(self, g: G) -> Map<Self, G>
    where
        G: Fn(&Self::Item) -> B + 'static,
    {
        map(self, g)
    }

    /// Wrap in a [`Chain`].
    fn chain(self) -> Chain<Self> {
        Chain::new(self)
    }

    /// Erase the cell's type.
    fn boxed(self) -> DynObservable<Self::Item>
    where
        Self: 'static,
    {
        Rc::new(self)
    }
}

impl<O: Observable> ObservableExt for O {}
