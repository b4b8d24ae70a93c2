use std::marker::PhantomData;

use crate::{signal::Signal, subscriber::Subscriber};

/// Creates a signal that emits every element of `iter`, then completes.
///
/// Each subscription iterates a fresh clone of `iter`. Emission stops early
/// once the subscriber is closed, so `from_iter(0..).take(3)` terminates.
///
/// # Examples
///
/// ```
/// use rxsignal::prelude::*;
///
/// from_iter::<_, ()>(vec![0, 1, 2, 3]).subscribe_next(|v| println!("{v},"));
/// ```
pub fn from_iter<Iter, Err>(iter: Iter) -> FromIter<Iter, Err>
where
  Iter: IntoIterator + Clone + Send + Sync + 'static,
  Iter::Item: Send + 'static,
{
  FromIter { iter, _hint: PhantomData }
}

#[derive(Clone)]
pub struct FromIter<Iter, Err> {
  iter: Iter,
  _hint: PhantomData<fn() -> Err>,
}

impl<Iter, Err> Signal for FromIter<Iter, Err>
where
  Iter: IntoIterator + Clone + Send + Sync + 'static,
  Iter::Item: Send + 'static,
  Err: Send + 'static,
{
  type Item = Iter::Item;
  type Err = Err;
  type Unsub = ();

  fn actual_subscribe(&self, subscriber: Subscriber<Iter::Item, Err>) {
    for v in self.iter.clone() {
      if subscriber.is_closed() {
        return;
      }
      subscriber.next(v);
    }
    subscriber.complete();
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use crate::prelude::*;

  #[rxsignal_macro::test]
  fn emits_all_then_completes() {
    let values = Arc::new(Mutex::new(vec![]));
    let completed = Arc::new(Mutex::new(false));
    let (c_values, c_completed) = (values.clone(), completed.clone());

    from_iter::<_, ()>(0..5).subscribe_next_completed(
      move |v| c_values.lock().unwrap().push(v),
      move || *c_completed.lock().unwrap() = true,
    );

    assert_eq!(*values.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    assert!(*completed.lock().unwrap());
  }

  #[rxsignal_macro::test]
  fn stops_when_subscriber_closes() {
    let count = Arc::new(Mutex::new(0));
    let c_count = count.clone();
    from_iter::<_, ()>(0..)
      .take(3)
      .subscribe_next(move |_| *c_count.lock().unwrap() += 1);
    assert_eq!(*count.lock().unwrap(), 3);
  }

  #[rxsignal_macro::test]
  fn each_subscription_iterates_afresh() {
    let signal = from_iter::<_, ()>(vec!["a", "b"]);
    for _ in 0..2 {
      let values = Arc::new(Mutex::new(vec![]));
      let c_values = values.clone();
      signal.subscribe_next(move |v| c_values.lock().unwrap().push(v));
      assert_eq!(*values.lock().unwrap(), vec!["a", "b"]);
    }
  }
}
