use std::sync::Arc;

use super::fan_out::FanOut;
use crate::{
  disposable::{CompoundDisposable, DisposableKey},
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

/// Maps every value to an inner signal and merges all of them.
///
/// See [`Signal::flatten_map`].
pub struct FlattenMap<S, F> {
  pub(crate) source: S,
  pub(crate) func: Arc<F>,
}

impl<S, F, R> Signal for FlattenMap<S, F>
where
  S: Signal,
  F: Fn(S::Item) -> Option<R> + Send + Sync + 'static,
  R: Signal<Err = S::Err>,
{
  type Item = R::Item;
  type Err = S::Err;
  type Unsub = CompoundDisposable;

  fn actual_subscribe(&self, subscriber: Subscriber<R::Item, S::Err>) -> CompoundDisposable {
    let fan_out = FanOut::new(subscriber);
    fan_out.attach_source(&self.source, |key, _| FlattenMapObserver {
      fan_out: fan_out.clone(),
      func: self.func.clone(),
      key,
    });
    fan_out.disposable()
  }
}

pub struct FlattenMapObserver<Item, Err, F> {
  fan_out: Arc<FanOut<Item, Err>>,
  func: Arc<F>,
  key: DisposableKey,
}

impl<SourceItem, Err, F, R> Observer<SourceItem, Err> for FlattenMapObserver<R::Item, Err, F>
where
  F: Fn(SourceItem) -> Option<R>,
  R: Signal<Err = Err>,
  Err: Send + 'static,
{
  fn next(&mut self, value: SourceItem) {
    if self.fan_out.is_closed() {
      return;
    }
    if let Some(signal) = (self.func)(value) {
      self.fan_out.spawn(signal);
    }
  }

  fn error(self, err: Err) { self.fan_out.fail(err) }

  fn complete(self) { self.fan_out.finish(self.key) }

  fn is_closed(&self) -> bool { self.fan_out.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::{
    sync::{
      atomic::{AtomicUsize, Ordering},
      Arc, Barrier, Mutex,
    },
    thread,
  };

  use crate::prelude::*;

  #[rxsignal_macro::test]
  fn merges_inner_signals() {
    let values = Arc::new(Mutex::new(vec![]));
    let completed = Arc::new(Mutex::new(0));
    let (c_values, c_completed) = (values.clone(), completed.clone());
    from_iter::<_, ()>(1..=3)
      .flatten_map(|v| Some(from_iter(vec![v; v as usize])))
      .subscribe_next_completed(
        move |v| c_values.lock().unwrap().push(v),
        move || *c_completed.lock().unwrap() += 1,
      );
    assert_eq!(*values.lock().unwrap(), vec![1, 2, 2, 3, 3, 3]);
    assert_eq!(*completed.lock().unwrap(), 1);
  }

  #[rxsignal_macro::test]
  fn none_is_skipped() {
    let values = Arc::new(Mutex::new(vec![]));
    let c_values = values.clone();
    from_iter::<_, ()>(1..=4)
      .flatten_map(|v| (v % 2 == 0).then(|| of(v)))
      .subscribe_next(move |v| c_values.lock().unwrap().push(v));
    assert_eq!(*values.lock().unwrap(), vec![2, 4]);
  }

  #[rxsignal_macro::test]
  fn waits_for_pending_inner_signals() {
    let run_loop = RunLoop::new();
    let scheduler = run_loop.scheduler();
    let completed = Arc::new(Mutex::new(false));
    let c_completed = completed.clone();
    from_iter::<_, ()>(1..=2)
      .flatten_map(move |v| {
        let scheduler = scheduler.clone();
        Some(create(move |subscriber: Subscriber<i32, ()>| {
          scheduler.schedule(Box::new(move || {
            subscriber.next(v);
            subscriber.complete();
          }))
        }))
      })
      .subscribe_completed(move || *c_completed.lock().unwrap() = true);

    assert!(!*completed.lock().unwrap());
    run_loop.run_pending();
    assert!(*completed.lock().unwrap());
  }

  #[rxsignal_macro::test]
  fn one_failing_inner_signal_wins() {
    let log = Arc::new(Mutex::new(vec![]));
    let (n, e, c) = (log.clone(), log.clone(), log.clone());
    from_iter::<_, String>(1..=5)
      .flatten_map(|v| {
        Some(if v == 3 { throw_err("inner failed".to_owned()).box_it() } else { of(v).box_it() })
      })
      .subscribe_all(
        move |v| n.lock().unwrap().push(v.to_string()),
        move |err| e.lock().unwrap().push(err),
        move || c.lock().unwrap().push("completed".to_owned()),
      );
    assert_eq!(*log.lock().unwrap(), vec!["1", "2", "inner failed"]);
  }


  #[rxsignal_macro::test]
  fn no_inner_signal_starts_after_a_failure() {
    let first: Arc<Mutex<Option<Subscriber<i32, String>>>> = Arc::default();
    let late_subscriptions = Arc::new(AtomicUsize::new(0));
    let errors = Arc::new(Mutex::new(vec![]));
    let (c_first, c_late, c_errors) = (first.clone(), late_subscriptions.clone(), errors.clone());

    from_iter::<_, String>(0..2)
      .flatten_map(move |v| {
        if v == 0 {
          let slot = c_first.clone();
          return Some(
            create(move |subscriber: Subscriber<i32, String>| {
              *slot.lock().unwrap() = Some(subscriber);
            })
            .box_it(),
          );
        }
        // Fail the first inner signal while this value is being mapped.
        let failing = c_first.lock().unwrap().take();
        if let Some(inner) = failing {
          inner.error("boom".to_owned());
        }
        let late = c_late.clone();
        Some(
          create(move |_: Subscriber<i32, String>| {
            late.fetch_add(1, Ordering::SeqCst);
          })
          .box_it(),
        )
      })
      .subscribe_error(move |err| c_errors.lock().unwrap().push(err));

    assert_eq!(*errors.lock().unwrap(), vec!["boom"]);
    assert_eq!(late_subscriptions.load(Ordering::SeqCst), 0);
  }
  #[rxsignal_macro::test]
  fn inner_signals_on_many_threads() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 200;

    let barrier = Arc::new(Barrier::new(THREADS));
    let sum = Arc::new(Mutex::new(0));
    let completed = Arc::new(Mutex::new(0));
    let (c_sum, c_completed) = (sum.clone(), completed.clone());
    let handles = Arc::new(Mutex::new(vec![]));
    let c_handles = handles.clone();

    let subscription = from_iter::<_, ()>(0..THREADS)
      .flatten_map(move |_| {
        let barrier = barrier.clone();
        let handles = c_handles.clone();
        Some(create(move |subscriber: Subscriber<usize, ()>| {
          let barrier = barrier.clone();
          let handle = thread::spawn(move || {
            barrier.wait();
            for i in 0..PER_THREAD {
              subscriber.next(i);
            }
            subscriber.complete();
          });
          handles.lock().unwrap().push(handle);
        }))
      })
      .subscribe_next_completed(
        move |v| *c_sum.lock().unwrap() += v,
        move || *c_completed.lock().unwrap() += 1,
      );

    let handles = std::mem::take(&mut *handles.lock().unwrap());
    for handle in handles {
      handle.join().unwrap();
    }

    assert_eq!(*sum.lock().unwrap(), THREADS * (PER_THREAD * (PER_THREAD - 1) / 2));
    assert_eq!(*completed.lock().unwrap(), 1);
    assert!(subscription.is_disposed());
  }
}
