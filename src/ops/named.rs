use std::borrow::Cow;

use crate::{signal::Signal, subscriber::Subscriber};

/// A signal carrying a diagnostic name; subscribing is unchanged.
pub struct Named<S> {
  pub(crate) source: S,
  pub(crate) name: Cow<'static, str>,
}

impl<S: Signal> Signal for Named<S> {
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = S::Unsub;

  fn actual_subscribe(&self, subscriber: Subscriber<S::Item, S::Err>) -> S::Unsub {
    self.source.actual_subscribe(subscriber)
  }

  fn name(&self) -> Cow<'static, str> { self.name.clone() }
}
