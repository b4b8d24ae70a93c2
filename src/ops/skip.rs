use crate::{
  disposable::CompoundDisposable, observer::Observer, signal::Signal, subscriber::Subscriber,
};

/// Drops the first `count` values.
pub struct Skip<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<S> Signal for Skip<S>
where
  S: Signal,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = CompoundDisposable;

  fn actual_subscribe(&self, subscriber: Subscriber<S::Item, S::Err>) -> CompoundDisposable {
    if self.count == 0 {
      let disposable = CompoundDisposable::new();
      disposable.add(self.source.actual_subscribe(subscriber));
      return disposable;
    }
    self
      .source
      .subscribe(SkipObserver { observer: subscriber, remaining: self.count })
  }
}

pub struct SkipObserver<Item, Err> {
  observer: Subscriber<Item, Err>,
  remaining: usize,
}

impl<Item, Err> Observer<Item, Err> for SkipObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    if self.remaining == 0 {
      self.observer.next(value);
    } else {
      self.remaining -= 1;
    }
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}
