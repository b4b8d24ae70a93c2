use std::sync::Arc;

use crate::{
  disposable::CompoundDisposable, observer::Observer, signal::Signal, subscriber::Subscriber,
};

/// Forwards values until the predicate yields `stop_when`, then completes
/// without forwarding that value.
///
/// Built by `take_until_block` (`stop_when == true`) and `take_while_block`
/// (`stop_when == false`).
pub struct TakeUntilBlock<S, P> {
  pub(crate) source: S,
  pub(crate) predicate: Arc<P>,
  pub(crate) stop_when: bool,
}

impl<S, P> Signal for TakeUntilBlock<S, P>
where
  S: Signal,
  P: Fn(&S::Item) -> bool + Send + Sync + 'static,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = CompoundDisposable;

  fn actual_subscribe(&self, subscriber: Subscriber<S::Item, S::Err>) -> CompoundDisposable {
    self.source.subscribe(TakeUntilBlockObserver {
      observer: Some(subscriber),
      predicate: self.predicate.clone(),
      stop_when: self.stop_when,
    })
  }
}

pub struct TakeUntilBlockObserver<Item, Err, P> {
  observer: Option<Subscriber<Item, Err>>,
  predicate: Arc<P>,
  stop_when: bool,
}

impl<Item, Err, P> Observer<Item, Err> for TakeUntilBlockObserver<Item, Err, P>
where
  P: Fn(&Item) -> bool,
{
  fn next(&mut self, value: Item) {
    let Some(observer) = &self.observer else { return };
    if (self.predicate)(&value) == self.stop_when {
      if let Some(observer) = self.observer.take() {
        observer.complete();
      }
    } else {
      observer.next(value);
    }
  }

  fn error(self, err: Err) {
    if let Some(observer) = self.observer {
      observer.error(err);
    }
  }

  fn complete(self) {
    if let Some(observer) = self.observer {
      observer.complete();
    }
  }

  fn is_closed(&self) -> bool { self.observer.as_ref().is_none_or(Subscriber::is_closed) }
}
