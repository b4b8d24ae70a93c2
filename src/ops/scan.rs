use std::sync::Arc;

use crate::{
  disposable::CompoundDisposable, observer::Observer, signal::Signal, subscriber::Subscriber,
};

/// A running fold step; `index` counts the values seen so far, from zero.
pub trait Reducer<Acc, Item> {
  fn reduce(&self, acc: Acc, value: Item, index: usize) -> Acc;
}

/// Adapts a `Fn(acc, value) -> acc` closure.
pub struct Plain<F>(pub(crate) F);

/// Adapts a `Fn(acc, value, index) -> acc` closure.
pub struct Indexed<F>(pub(crate) F);

impl<Acc, Item, F> Reducer<Acc, Item> for Plain<F>
where
  F: Fn(Acc, Item) -> Acc,
{
  #[inline]
  fn reduce(&self, acc: Acc, value: Item, _: usize) -> Acc { (self.0)(acc, value) }
}

impl<Acc, Item, F> Reducer<Acc, Item> for Indexed<F>
where
  F: Fn(Acc, Item, usize) -> Acc,
{
  #[inline]
  fn reduce(&self, acc: Acc, value: Item, index: usize) -> Acc { (self.0)(acc, value, index) }
}

/// Emits every intermediate accumulator of a fold.
pub struct ScanWithStart<S, B, R> {
  pub(crate) source: S,
  pub(crate) seed: B,
  pub(crate) reducer: Arc<R>,
}

impl<S, B, R> Signal for ScanWithStart<S, B, R>
where
  S: Signal,
  B: Clone + Send + Sync + 'static,
  R: Reducer<B, S::Item> + Send + Sync + 'static,
{
  type Item = B;
  type Err = S::Err;
  type Unsub = CompoundDisposable;

  fn actual_subscribe(&self, subscriber: Subscriber<B, S::Err>) -> CompoundDisposable {
    self.source.subscribe(ScanObserver {
      observer: subscriber,
      reducer: self.reducer.clone(),
      acc: Some(self.seed.clone()),
      index: 0,
    })
  }
}

pub struct ScanObserver<B, Err, R> {
  observer: Subscriber<B, Err>,
  reducer: Arc<R>,
  acc: Option<B>,
  index: usize,
}

impl<Item, Err, B, R> Observer<Item, Err> for ScanObserver<B, Err, R>
where
  B: Clone,
  R: Reducer<B, Item>,
{
  fn next(&mut self, value: Item) {
    // Only `None` while the reducer runs.
    let Some(acc) = self.acc.take() else { return };
    let acc = self.reducer.reduce(acc, value, self.index);
    self.index += 1;
    self.acc = Some(acc.clone());
    self.observer.next(acc);
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
  fn running_sum() {
    let values = Arc::new(Mutex::new(vec![]));
    let c_values = values.clone();
    from_iter::<_, ()>(1..=4)
      .scan_with_start(0, |acc, v| acc + v)
      .subscribe_next(move |v| c_values.lock().unwrap().push(v));
    assert_eq!(*values.lock().unwrap(), vec![1, 3, 6, 10]);
  }

  #[rxsignal_macro::test]
  fn indexed_sees_positions() {
    let values = Arc::new(Mutex::new(vec![]));
    let c_values = values.clone();
    from_iter::<_, ()>(vec!["a", "b", "c"])
      .scan_with_start_indexed(String::new(), |acc, v, i| format!("{acc}{v}{i}"))
      .subscribe_next(move |v| c_values.lock().unwrap().push(v));
    assert_eq!(*values.lock().unwrap(), vec!["a0", "a0b1", "a0b1c2"]);
  }

  #[rxsignal_macro::test]
  fn state_is_per_subscription() {
    let signal = from_iter::<_, ()>(vec![1, 1]).scan_with_start(10, |acc, v| acc + v);
    for _ in 0..2 {
      let values = Arc::new(Mutex::new(vec![]));
      let c_values = values.clone();
      signal.subscribe_next(move |v| c_values.lock().unwrap().push(v));
      assert_eq!(*values.lock().unwrap(), vec![11, 12]);
    }
  }
}
