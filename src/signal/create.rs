use std::marker::PhantomData;

use crate::{disposable::Disposable, signal::Signal, subscriber::Subscriber};

/// Creates a signal from a subscribe function.
///
/// `subscribe` runs once per subscription. It drives the given subscriber and
/// returns a disposable that tears down whatever it started; return `()` when
/// there is nothing to tear down.
///
/// # Examples
///
/// ```
/// use rxsignal::prelude::*;
///
/// let signal = create(|subscriber: Subscriber<i32, ()>| {
///   subscriber.next(1);
///   subscriber.next(2);
///   subscriber.complete();
/// });
///
/// signal.subscribe_next(|v| println!("{v}"));
/// ```
pub fn create<F, U, Item, Err>(subscribe: F) -> Create<F, Item, Err>
where
  F: Fn(Subscriber<Item, Err>) -> U + Send + Sync + 'static,
  U: Disposable + Send + Sync + 'static,
{
  Create { subscribe, _hint: PhantomData }
}

pub struct Create<F, Item, Err> {
  subscribe: F,
  _hint: PhantomData<fn() -> (Item, Err)>,
}

impl<F, U, Item, Err> Signal for Create<F, Item, Err>
where
  F: Fn(Subscriber<Item, Err>) -> U + Send + Sync + 'static,
  U: Disposable + Send + Sync + 'static,
  Item: Send + 'static,
  Err: Send + 'static,
{
  type Item = Item;
  type Err = Err;
  type Unsub = U;

  fn actual_subscribe(&self, subscriber: Subscriber<Item, Err>) -> U { (self.subscribe)(subscriber) }
}

#[cfg(test)]
mod tests {
  use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
  };

  use crate::{disposable::ActionDisposable, prelude::*};

  #[rxsignal_macro::test]
  fn emits_what_the_function_sends() {
    let values = Arc::new(Mutex::new(vec![]));
    let c_values = values.clone();
    create(|subscriber: Subscriber<_, ()>| {
      subscriber.next("a");
      subscriber.next("b");
      subscriber.complete();
      subscriber.next("c");
    })
    .subscribe_next(move |v| c_values.lock().unwrap().push(v));

    assert_eq!(*values.lock().unwrap(), vec!["a", "b"]);
  }

  #[rxsignal_macro::test]
  fn teardown_runs_on_dispose() {
    let torn_down = Arc::new(AtomicBool::new(false));
    let c_torn_down = torn_down.clone();
    let signal = create(move |_: Subscriber<i32, ()>| {
      let flag = c_torn_down.clone();
      ActionDisposable::new(move || flag.store(true, Ordering::SeqCst))
    });

    let subscription = signal.subscribe_next(|_| {});
    assert!(!torn_down.load(Ordering::SeqCst));
    subscription.dispose();
    assert!(torn_down.load(Ordering::SeqCst));
  }

  #[rxsignal_macro::test]
  fn teardown_runs_after_terminal() {
    let torn_down = Arc::new(AtomicBool::new(false));
    let c_torn_down = torn_down.clone();
    let slot: Arc<Mutex<Option<Subscriber<i32, ()>>>> = Arc::default();
    let c_slot = slot.clone();
    let signal = create(move |subscriber: Subscriber<i32, ()>| {
      *c_slot.lock().unwrap() = Some(subscriber);
      let flag = c_torn_down.clone();
      ActionDisposable::new(move || flag.store(true, Ordering::SeqCst))
    });

    signal.subscribe_next(|_| {});
    let subscriber = slot.lock().unwrap().take().unwrap();
    subscriber.complete();
    assert!(torn_down.load(Ordering::SeqCst));
  }
}
