use std::fmt::{Debug, Formatter};

use super::{BoxDisposable, Disposable};
use crate::rc::{MutArc, RcDeref, RcDerefMut};

/// A disposable holding exactly one swappable child.
///
/// Operators use it as a slot registered in a compound *before* the
/// subscription it will hold exists: a synchronous source may finish, and
/// have the slot disposed, before `subscribe` returns. Whatever is put into
/// a disposed slot is disposed on the spot.
#[derive(Clone, Default)]
pub struct SerialDisposable(MutArc<Inner>);

#[derive(Default)]
struct Inner {
  disposed: bool,
  current: Option<BoxDisposable>,
}

impl SerialDisposable {
  pub fn new() -> Self { Self::default() }

  /// Swap in `next` and dispose the previous child.
  pub fn set(&self, next: impl Disposable + Send + Sync + 'static) {
    if let Some(prev) = self.replace(next) {
      prev.dispose();
    }
  }

  /// Swap in `next` and hand back the previous child undisposed.
  pub fn replace(&self, next: impl Disposable + Send + Sync + 'static) -> Option<BoxDisposable> {
    let next = BoxDisposable::new(next);
    let mut inner = self.0.rc_deref_mut();
    if inner.disposed {
      drop(inner);
      next.dispose();
      None
    } else {
      inner.current.replace(next)
    }
  }

  /// Remove the current child without disposing it.
  pub fn take(&self) -> Option<BoxDisposable> { self.0.rc_deref_mut().current.take() }
}

impl Disposable for SerialDisposable {
  fn dispose(&self) {
    let current = {
      let mut inner = self.0.rc_deref_mut();
      if inner.disposed {
        return;
      }
      inner.disposed = true;
      inner.current.take()
    };
    current.dispose();
  }

  #[inline]
  fn is_disposed(&self) -> bool { self.0.rc_deref().disposed }
}

impl Debug for SerialDisposable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.0.rc_deref();
    f.debug_struct("SerialDisposable")
      .field("disposed", &inner.disposed)
      .field("has_current", &inner.current.is_some())
      .finish()
  }
}
