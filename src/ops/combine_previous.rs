use std::sync::Arc;

use crate::{
  disposable::CompoundDisposable, observer::Observer, signal::Signal, subscriber::Subscriber,
};

/// Combines every value with the one before it.
pub struct CombinePreviousWithStart<S: Signal, F> {
  pub(crate) source: S,
  pub(crate) start: S::Item,
  pub(crate) func: Arc<F>,
}

impl<S, F, B> Signal for CombinePreviousWithStart<S, F>
where
  S: Signal,
  S::Item: Clone + Sync,
  F: Fn(&S::Item, &S::Item) -> B + Send + Sync + 'static,
  B: Send + 'static,
{
  type Item = B;
  type Err = S::Err;
  type Unsub = CompoundDisposable;

  fn actual_subscribe(&self, subscriber: Subscriber<B, S::Err>) -> CompoundDisposable {
    self.source.subscribe(CombinePreviousObserver {
      observer: subscriber,
      func: self.func.clone(),
      previous: self.start.clone(),
    })
  }
}

pub struct CombinePreviousObserver<Item, B, Err, F> {
  observer: Subscriber<B, Err>,
  func: Arc<F>,
  previous: Item,
}

impl<Item, Err, B, F> Observer<Item, Err> for CombinePreviousObserver<Item, B, Err, F>
where
  F: Fn(&Item, &Item) -> B,
{
  fn next(&mut self, value: Item) {
    let combined = (self.func)(&self.previous, &value);
    self.previous = value;
    self.observer.next(combined);
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
