use std::sync::Arc;

use crate::{
  disposable::CompoundDisposable, observer::Observer, signal::Signal, subscriber::Subscriber,
};

/// Emits everything from `first`, then everything from `second`.
pub struct Concat<A, B> {
  pub(crate) first: A,
  pub(crate) second: Arc<B>,
}

impl<A, B> Signal for Concat<A, B>
where
  A: Signal,
  B: Signal<Item = A::Item, Err = A::Err>,
{
  type Item = A::Item;
  type Err = A::Err;
  type Unsub = CompoundDisposable;

  fn actual_subscribe(&self, subscriber: Subscriber<A::Item, A::Err>) -> CompoundDisposable {
    let disposables = CompoundDisposable::new();
    let first = self.first.subscribe(ConcatObserver {
      observer: subscriber,
      second: self.second.clone(),
      disposables: disposables.clone(),
    });
    disposables.add(first);
    disposables
  }
}

pub struct ConcatObserver<Item, Err, B> {
  observer: Subscriber<Item, Err>,
  second: Arc<B>,
  // Also receives the subscription to `second`.
  disposables: CompoundDisposable,
}

impl<Item, Err, B> Observer<Item, Err> for ConcatObserver<Item, Err, B>
where
  B: Signal<Item = Item, Err = Err>,
{
  fn next(&mut self, value: Item) { self.observer.next(value) }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) {
    let second = self.second.actual_subscribe(self.observer);
    self.disposables.add(second);
  }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
