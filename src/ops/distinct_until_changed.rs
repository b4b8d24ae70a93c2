use crate::{
  disposable::CompoundDisposable, observer::Observer, signal::Signal, subscriber::Subscriber,
};

/// Drops values equal to the previously emitted one.
pub struct DistinctUntilChanged<S>(pub(crate) S);

impl<S> Signal for DistinctUntilChanged<S>
where
  S: Signal,
  S::Item: PartialEq + Clone,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = CompoundDisposable;

  fn actual_subscribe(&self, subscriber: Subscriber<S::Item, S::Err>) -> CompoundDisposable {
    self
      .0
      .subscribe(DistinctUntilChangedObserver { observer: subscriber, last: None })
  }
}

pub struct DistinctUntilChangedObserver<Item, Err> {
  observer: Subscriber<Item, Err>,
  last: Option<Item>,
}

impl<Item, Err> Observer<Item, Err> for DistinctUntilChangedObserver<Item, Err>
where
  Item: PartialEq + Clone,
{
  fn next(&mut self, value: Item) {
    if self.last.as_ref() != Some(&value) {
      self.last = Some(value.clone());
      self.observer.next(value);
    }
  }

  fn error(self, err: Err) { self.observer.error(err) }

  fn complete(self) { self.observer.complete() }

  fn is_closed(&self) -> bool { self.observer.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[rxsignal_macro::test]
  fn drops_repeats() {
    let values = Arc::new(Mutex::new(vec![]));
    let c_values = values.clone();
    from_iter::<_, ()>(vec![1, 1, 2, 2, 2, 3])
      .distinct_until_changed()
      .subscribe_next(move |v| c_values.lock().unwrap().push(v));
    assert_eq!(*values.lock().unwrap(), vec![1, 2, 3]);
  }

  #[rxsignal_macro::test]
  fn value_may_come_back_later() {
    let values = Arc::new(Mutex::new(vec![]));
    let c_values = values.clone();
    from_iter::<_, ()>(vec!["a", "b", "b", "a"])
      .distinct_until_changed()
      .subscribe_next(move |v| c_values.lock().unwrap().push(v));
    assert_eq!(*values.lock().unwrap(), vec!["a", "b", "a"]);
  }
}
