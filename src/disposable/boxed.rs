use std::fmt::{Debug, Formatter};

use super::Disposable;

/// A type-erased, thread-safe disposable.
///
/// Compound and serial nodes store their children in this form so that
/// heterogeneous subscriptions can live in one collection.
pub struct BoxDisposable(Box<dyn Disposable + Send + Sync>);

impl BoxDisposable {
  #[inline]
  pub fn new(disposable: impl Disposable + Send + Sync + 'static) -> Self {
    Self(Box::new(disposable))
  }
}

impl Disposable for BoxDisposable {
  #[inline]
  fn dispose(&self) { self.0.dispose() }

  #[inline]
  fn is_disposed(&self) -> bool { self.0.is_disposed() }
}

impl Debug for BoxDisposable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("BoxDisposable")
      .field("is_disposed", &self.is_disposed())
      .finish()
  }
}
