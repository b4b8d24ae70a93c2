use std::sync::Arc;

use crate::{
  disposable::CompoundDisposable, observer::Observer, signal::Signal, subscriber::Subscriber,
};

/// Forwards only the values satisfying a predicate.
pub struct Filter<S, F> {
  pub(crate) source: S,
  pub(crate) predicate: Arc<F>,
}

impl<S, F> Signal for Filter<S, F>
where
  S: Signal,
  F: Fn(&S::Item) -> bool + Send + Sync + 'static,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = CompoundDisposable;

  fn actual_subscribe(&self, subscriber: Subscriber<S::Item, S::Err>) -> CompoundDisposable {
    self
      .source
      .subscribe(FilterObserver { observer: subscriber, predicate: self.predicate.clone() })
  }
}

pub struct FilterObserver<Item, Err, F> {
  observer: Subscriber<Item, Err>,
  predicate: Arc<F>,
}

impl<Item, Err, F> Observer<Item, Err> for FilterObserver<Item, Err, F>
where
  F: Fn(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    if (self.predicate)(&value) {
      self.observer.next(value)
    }
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
