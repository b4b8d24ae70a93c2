use crate::{signal::Signal, subscriber::Subscriber};

/// Creates a signal that calls `factory` on every subscription and subscribes
/// to whatever it returns.
pub fn defer<F, S>(factory: F) -> Defer<F>
where
  F: Fn() -> S + Send + Sync + 'static,
  S: Signal,
{
  Defer(factory)
}

#[derive(Clone)]
pub struct Defer<F>(F);

impl<F, S> Signal for Defer<F>
where
  F: Fn() -> S + Send + Sync + 'static,
  S: Signal,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = S::Unsub;

  fn actual_subscribe(&self, subscriber: Subscriber<S::Item, S::Err>) -> S::Unsub {
    (self.0)().actual_subscribe(subscriber)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
  };

  use crate::prelude::*;

  #[rxsignal_macro::test]
  fn factory_runs_per_subscription() {
    let calls = Arc::new(AtomicUsize::new(0));
    let c_calls = calls.clone();
    let signal = defer(move || of::<_, ()>(c_calls.fetch_add(1, Ordering::SeqCst)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);

    let values = Arc::new(Mutex::new(vec![]));
    for _ in 0..3 {
      let c_values = values.clone();
      signal.subscribe_next(move |v| c_values.lock().unwrap().push(v));
    }
    assert_eq!(*values.lock().unwrap(), vec![0, 1, 2]);
  }
}
