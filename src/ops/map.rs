use std::sync::Arc;

use crate::{
  disposable::CompoundDisposable, observer::Observer, signal::Signal, subscriber::Subscriber,
};

/// Applies a function to every value.
pub struct Map<S, F> {
  pub(crate) source: S,
  pub(crate) func: Arc<F>,
}

impl<S, F, B> Signal for Map<S, F>
where
  S: Signal,
  F: Fn(S::Item) -> B + Send + Sync + 'static,
  B: Send + 'static,
{
  type Item = B;
  type Err = S::Err;
  type Unsub = CompoundDisposable;

  fn actual_subscribe(&self, subscriber: Subscriber<B, S::Err>) -> CompoundDisposable {
    self
      .source
      .subscribe(MapObserver { observer: subscriber, func: self.func.clone() })
  }
}

pub struct MapObserver<B, Err, F> {
  observer: Subscriber<B, Err>,
  func: Arc<F>,
}

impl<Item, Err, B, F> Observer<Item, Err> for MapObserver<B, Err, F>
where
  F: Fn(Item) -> B,
{
  fn next(&mut self, value: Item) { self.observer.next((self.func)(value)) }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
