use std::sync::Arc;

use crate::{
  disposable::CompoundDisposable, observer::Observer, signal::Signal, subscriber::Subscriber,
};

/// Drops values until the predicate first yields `start_when`, then forwards
/// that value and everything after it.
///
/// Built by `skip_until_block` (`start_when == true`) and `skip_while_block`
/// (`start_when == false`).
pub struct SkipUntilBlock<S, P> {
  pub(crate) source: S,
  pub(crate) predicate: Arc<P>,
  pub(crate) start_when: bool,
}

impl<S, P> Signal for SkipUntilBlock<S, P>
where
  S: Signal,
  P: Fn(&S::Item) -> bool + Send + Sync + 'static,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = CompoundDisposable;

  fn actual_subscribe(&self, subscriber: Subscriber<S::Item, S::Err>) -> CompoundDisposable {
    self.source.subscribe(SkipUntilBlockObserver {
      observer: subscriber,
      predicate: self.predicate.clone(),
      start_when: self.start_when,
      skipping: true,
    })
  }
}

pub struct SkipUntilBlockObserver<Item, Err, P> {
  observer: Subscriber<Item, Err>,
  predicate: Arc<P>,
  start_when: bool,
  skipping: bool,
}

impl<Item, Err, P> Observer<Item, Err> for SkipUntilBlockObserver<Item, Err, P>
where
  P: Fn(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if self.skipping && (self.predicate)(&value) == self.start_when {
      self.skipping = false;
    }
    if !self.skipping {
      self.observer.next(value);
    }
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
