//! Cancellation tokens.
//!
//! Every subscription is represented by a [`Disposable`]. Disposing it stops
//! delivery from the producer and releases whatever state the subscription
//! holds. Tokens compose into trees through [`CompoundDisposable`] and
//! [`SerialDisposable`]; disposing a node disposes every reachable child
//! exactly once.

use std::{
  fmt::{Debug, Formatter},
  sync::Arc,
};

use crate::rc::{MutArc, RcDeref, RcDerefMut};

mod boxed;
mod compound;
mod serial;

pub use boxed::*;
pub use compound::*;
pub use serial::*;

/// A handle that can cancel the work it represents.
///
/// `dispose` must be idempotent and callable from any thread.
pub trait Disposable {
  /// Cancel the underlying work. Calling it more than once has no further
  /// effect.
  fn dispose(&self);

  fn is_disposed(&self) -> bool;

  /// Activates RAII behavior: the returned guard disposes `self` when it
  /// goes out of scope.
  ///
  /// **Attention:** if the guard is not bound to a variable it is dropped
  /// immediately, which disposes right away.
  fn dispose_when_dropped(self) -> DisposeGuard<Self>
  where
    Self: Sized,
  {
    DisposeGuard(self)
  }
}

impl Disposable for () {
  #[inline]
  fn dispose(&self) {}

  #[inline]
  fn is_disposed(&self) -> bool { true }
}

impl<T: Disposable + ?Sized> Disposable for Box<T> {
  #[inline]
  fn dispose(&self) { (**self).dispose() }

  #[inline]
  fn is_disposed(&self) -> bool { (**self).is_disposed() }
}

impl<T: Disposable + ?Sized> Disposable for Arc<T> {
  #[inline]
  fn dispose(&self) { (**self).dispose() }

  #[inline]
  fn is_disposed(&self) -> bool { (**self).is_disposed() }
}

impl<T: Disposable> Disposable for Option<T> {
  fn dispose(&self) {
    if let Some(inner) = self {
      inner.dispose();
    }
  }

  fn is_disposed(&self) -> bool { self.as_ref().is_none_or(Disposable::is_disposed) }
}

type Action = Box<dyn FnOnce() + Send>;

/// Runs a closure the first time it is disposed.
#[derive(Clone)]
pub struct ActionDisposable(MutArc<Option<Action>>);

impl ActionDisposable {
  pub fn new(action: impl FnOnce() + Send + 'static) -> Self {
    Self(MutArc::own(Some(Box::new(action))))
  }
}

impl Disposable for ActionDisposable {
  fn dispose(&self) {
    // Take under the lock, run outside it: the action may dispose other
    // tokens that lead back here.
    let action = self.0.rc_deref_mut().take();
    if let Some(action) = action {
      action();
    }
  }

  fn is_disposed(&self) -> bool { self.0.rc_deref().is_none() }
}

impl Debug for ActionDisposable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ActionDisposable")
      .field("is_disposed", &self.is_disposed())
      .finish()
  }
}

/// An RAII guard around a disposable, see
/// [`Disposable::dispose_when_dropped`].
#[derive(Debug)]
#[must_use]
pub struct DisposeGuard<T: Disposable>(T);

impl<T: Disposable> DisposeGuard<T> {
  pub fn new(disposable: T) -> Self { DisposeGuard(disposable) }

  pub fn inner(&self) -> &T { &self.0 }
}

impl<T: Disposable> Drop for DisposeGuard<T> {
  #[inline]
  fn drop(&mut self) { self.0.dispose() }
}
