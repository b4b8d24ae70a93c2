//! Type-erased signals.
//!
//! [`BoxSignal`] lets heterogeneous signals with the same `Item` and `Err` be
//! stored together or returned from branches of different shape.

use std::{borrow::Cow, sync::Arc};

use crate::{disposable::BoxDisposable, signal::Signal, subscriber::Subscriber};

// ============================================================================
// DynSignal Trait
// ============================================================================

/// Object-safe mirror of [`Signal`].
pub trait DynSignal<Item, Err>: Send + Sync {
  fn dyn_subscribe(&self, subscriber: Subscriber<Item, Err>) -> BoxDisposable;

  fn dyn_name(&self) -> Cow<'static, str>;
}

impl<S> DynSignal<S::Item, S::Err> for S
where
  S: Signal,
{
  fn dyn_subscribe(&self, subscriber: Subscriber<S::Item, S::Err>) -> BoxDisposable {
    BoxDisposable::new(self.actual_subscribe(subscriber))
  }

  fn dyn_name(&self) -> Cow<'static, str> { self.name() }
}

// ============================================================================
// BoxSignal
// ============================================================================

/// A cloneable, type-erased signal.
pub struct BoxSignal<Item, Err>(Arc<dyn DynSignal<Item, Err>>);

impl<Item, Err> BoxSignal<Item, Err> {
  pub fn new<S>(signal: S) -> Self
  where
    S: Signal<Item = Item, Err = Err>,
  {
    BoxSignal(Arc::new(signal))
  }
}

impl<Item, Err> Clone for BoxSignal<Item, Err> {
  fn clone(&self) -> Self { BoxSignal(self.0.clone()) }
}

impl<Item, Err> Signal for BoxSignal<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
{
  type Item = Item;
  type Err = Err;
  type Unsub = BoxDisposable;

  fn actual_subscribe(&self, subscriber: Subscriber<Item, Err>) -> BoxDisposable {
    self.0.dyn_subscribe(subscriber)
  }

  fn name(&self) -> Cow<'static, str> { self.0.dyn_name() }

  fn box_it(self) -> BoxSignal<Item, Err> { self }
}
