use crate::{
  disposable::CompoundDisposable, observer::Observer, signal::Signal, subscriber::Subscriber,
};

/// Forwards at most `count` values, then completes.
///
/// Values arriving after the `count`-th one, including those re-entrantly
/// produced while it is being delivered, are ignored and the source is told
/// to stop.
pub struct Take<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<S> Signal for Take<S>
where
  S: Signal,
{
  type Item = S::Item;
  type Err = S::Err;
  type Unsub = CompoundDisposable;

  fn actual_subscribe(&self, subscriber: Subscriber<S::Item, S::Err>) -> CompoundDisposable {
    if self.count == 0 {
      subscriber.complete();
      return CompoundDisposable::disposed();
    }
    self
      .source
      .subscribe(TakeObserver { observer: Some(subscriber), remaining: self.count })
  }
}

pub struct TakeObserver<Item, Err> {
  // `None` once `count` values went through.
  observer: Option<Subscriber<Item, Err>>,
  remaining: usize,
}

impl<Item, Err> Observer<Item, Err> for TakeObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    let Some(observer) = &self.observer else { return };
    self.remaining -= 1;
    observer.next(value);
    if self.remaining == 0 {
      if let Some(observer) = self.observer.take() {
        observer.complete();
      }
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

#[cfg(test)]
mod tests {
  use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
  };

  use crate::prelude::*;

  #[rxsignal_macro::test]
  fn base_function() {
    let completed = Arc::new(AtomicUsize::new(0));
    let next_count = Arc::new(Mutex::new(0));
    let c_completed = completed.clone();
    let c_next_count = next_count.clone();

    from_iter::<_, ()>(0..100).take(5).subscribe_next_completed(
      move |_| *c_next_count.lock().unwrap() += 1,
      move || {
        c_completed.fetch_add(1, Ordering::SeqCst);
      },
    );

    assert_eq!(*next_count.lock().unwrap(), 5);
    assert_eq!(completed.load(Ordering::SeqCst), 1);
  }

  #[rxsignal_macro::test]
  fn fewer_values_than_count() {
    let values = Arc::new(Mutex::new(vec![]));
    let c_values = values.clone();
    from_iter::<_, ()>(0..2)
      .take(5)
      .subscribe_next(move |v| c_values.lock().unwrap().push(v));
    assert_eq!(*values.lock().unwrap(), vec![0, 1]);
  }

  #[rxsignal_macro::test]
  fn take_zero_never_subscribes() {
    let subscribed = Arc::new(AtomicUsize::new(0));
    let completed = Arc::new(AtomicUsize::new(0));
    let c_subscribed = subscribed.clone();
    let c_completed = completed.clone();
    create(move |subscriber: Subscriber<i32, ()>| {
      c_subscribed.fetch_add(1, Ordering::SeqCst);
      subscriber.next(1);
    })
    .take(0)
    .subscribe_completed(move || {
      c_completed.fetch_add(1, Ordering::SeqCst);
    });

    assert_eq!(subscribed.load(Ordering::SeqCst), 0);
    assert_eq!(completed.load(Ordering::SeqCst), 1);
  }

  #[rxsignal_macro::test]
  fn reentrant_values_after_the_last_are_ignored() {
    let slot: Arc<Mutex<Option<Subscriber<i32, ()>>>> = Arc::default();
    let c_slot = slot.clone();
    let source = create(move |subscriber: Subscriber<i32, ()>| {
      *c_slot.lock().unwrap() = Some(subscriber.clone());
      subscriber.next(1);
    });

    let log = Arc::new(Mutex::new(vec![]));
    let (n, c) = (log.clone(), log.clone());
    let r_slot = slot.clone();
    source.take(1).subscribe_next_completed(
      move |v| {
        n.lock().unwrap().push(format!("next {v}"));
        // Re-enter the source while the only allowed value is delivered.
        let upstream = r_slot.lock().unwrap().clone();
        if let Some(upstream) = upstream {
          upstream.next(2);
          upstream.next(3);
        }
      },
      move || c.lock().unwrap().push("completed".to_owned()),
    );

    assert_eq!(*log.lock().unwrap(), vec!["next 1", "completed"]);
    let upstream = slot.lock().unwrap().take().unwrap();
    assert!(upstream.is_closed());
  }

  #[rxsignal_macro::test]
  fn infinite_source_is_stopped() {
    let produced = Arc::new(AtomicUsize::new(0));
    let c_produced = produced.clone();
    let source = create(move |subscriber: Subscriber<usize, ()>| {
      let mut i = 0;
      while !subscriber.is_closed() {
        c_produced.fetch_add(1, Ordering::SeqCst);
        subscriber.next(i);
        i += 1;
      }
    });

    source.take(3).subscribe_next(|_| {});
    assert_eq!(produced.load(Ordering::SeqCst), 3);
  }
}
