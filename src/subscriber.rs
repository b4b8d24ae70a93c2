//! The sink a signal drives on subscription.
//!
//! A [`Subscriber`] wraps one observer and enforces the delivery contract every
//! operator relies on:
//!
//! - **terminal-once**: after `error` or `complete` was accepted, every later
//!   event is dropped;
//! - **serialized**: the observer is never invoked concurrently. Whichever
//!   thread finds the subscriber idle becomes the *drainer* and delivers queued
//!   events in order; events arriving meanwhile (from other threads, or
//!   re-entrantly from inside the observer's own callback) are queued instead
//!   of blocking;
//! - **disposal-aware**: once the subscription's [`CompoundDisposable`] is
//!   disposed, queued and future events are dropped. Conversely, a terminal
//!   event, or the observer reporting [`Observer::is_closed`], disposes the
//!   compound so the producer is torn down.

use std::{
  collections::VecDeque,
  fmt::{Debug, Formatter},
  sync::Arc,
};

use crate::{
  disposable::{CompoundDisposable, Disposable},
  observer::{BoxedObserver, Notification, Observer},
  rc::{MutArc, RcDeref, RcDerefMut},
};

/// A cloneable, thread-safe handle feeding one observer.
pub struct Subscriber<Item, Err>(Arc<Inner<Item, Err>>);

struct Inner<Item, Err> {
  state: MutArc<State<Item, Err>>,
  disposable: CompoundDisposable,
}

struct State<Item, Err> {
  // Taken out by the drainer while it runs user code.
  observer: Option<BoxedObserver<Item, Err>>,
  pending: VecDeque<Notification<Item, Err>>,
  draining: bool,
  // A terminal event has been accepted into `pending`.
  terminated: bool,
}

impl<Item, Err> Clone for Subscriber<Item, Err> {
  #[inline]
  fn clone(&self) -> Self { Self(self.0.clone()) }
}

impl<Item, Err> Subscriber<Item, Err> {
  /// Wrap `observer` with a fresh disposable.
  pub fn new<O>(observer: O) -> Self
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    Self::with_disposable(observer, CompoundDisposable::new())
  }

  /// Wrap `observer`, tying the subscription to an existing disposable.
  pub fn with_disposable<O>(observer: O, disposable: CompoundDisposable) -> Self
  where
    O: Observer<Item, Err> + Send + 'static,
  {
    let state = State {
      observer: Some(Box::new(observer)),
      pending: VecDeque::new(),
      draining: false,
      terminated: false,
    };
    Self(Arc::new(Inner { state: MutArc::own(state), disposable }))
  }

  pub fn next(&self, value: Item) { self.send(Notification::Next(value)) }

  pub fn error(&self, err: Err) { self.send(Notification::Error(err)) }

  pub fn complete(&self) { self.send(Notification::Completed) }

  /// Deliver `notification`, or queue it if another delivery is in progress.
  pub fn send(&self, notification: Notification<Item, Err>) {
    if self.enqueue(notification) {
      self.drain();
    }
  }

  /// The disposable representing this subscription.
  ///
  /// Producers register their teardown here; it is disposed after the
  /// terminal event or when the consumer cancels.
  pub fn disposable(&self) -> &CompoundDisposable { &self.0.disposable }

  /// Whether further events would be dropped.
  pub fn is_closed(&self) -> bool {
    self.0.disposable.is_disposed() || self.0.state.rc_deref().terminated
  }

  /// Queue `notification` without delivering it.
  ///
  /// Returns whether it was accepted. Operators that must fix the delivery
  /// order inside their own critical section enqueue there and call
  /// [`drain`](Self::drain) once the section is left, so user callbacks never
  /// run under the operator's lock.
  pub(crate) fn enqueue(&self, notification: Notification<Item, Err>) -> bool {
    if self.0.disposable.is_disposed() {
      return false;
    }
    let mut state = self.0.state.rc_deref_mut();
    if state.terminated {
      return false;
    }
    state.terminated = notification.is_terminal();
    state.pending.push_back(notification);
    true
  }

  /// Deliver queued events unless another thread is already doing so.
  pub(crate) fn drain(&self) {
    let mut observer = {
      let mut state = self.0.state.rc_deref_mut();
      if state.draining {
        return;
      }
      match state.observer.take() {
        Some(observer) => {
          state.draining = true;
          observer
        }
        None => {
          state.pending.clear();
          return;
        }
      }
    };

    loop {
      let notification = {
        let mut state = self.0.state.rc_deref_mut();
        match state.pending.pop_front() {
          Some(n) => n,
          None => {
            state.observer = Some(observer);
            state.draining = false;
            return;
          }
        }
      };

      if self.0.disposable.is_disposed() {
        self.close();
        return;
      }

      match notification {
        Notification::Next(value) => {
          observer.next(value);
          if observer.is_closed() {
            self.close();
            return;
          }
        }
        Notification::Error(err) => {
          self.close();
          observer.error(err);
          return;
        }
        Notification::Completed => {
          self.close();
          observer.complete();
          return;
        }
      }
    }
  }

  // Refuse everything from now on and tear down the producer. The observer
  // stays out of `state`, so nothing will ever be delivered again.
  fn close(&self) {
    {
      let mut state = self.0.state.rc_deref_mut();
      state.terminated = true;
      state.draining = false;
      state.pending.clear();
    }
    self.0.disposable.dispose();
  }
}

impl<Item, Err> Debug for Subscriber<Item, Err> {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Subscriber")
      .field("is_closed", &self.is_closed())
      .field("disposable", &self.0.disposable)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use std::{
    sync::{Arc, Mutex},
    thread,
  };

  use super::*;
  use crate::{disposable::ActionDisposable, observer::CallbackObserver};

  type Log = Arc<Mutex<Vec<String>>>;

  fn recording(log: &Log) -> Subscriber<i32, String> {
    let (n, e, c) = (log.clone(), log.clone(), log.clone());
    Subscriber::new(CallbackObserver::new(
      move |v: i32| n.lock().unwrap().push(format!("next {v}")),
      move |err: String| e.lock().unwrap().push(format!("error {err}")),
      move || c.lock().unwrap().push("completed".to_owned()),
    ))
  }

  #[rxsignal_macro::test]
  fn nothing_after_complete() {
    let log = Log::default();
    let subscriber = recording(&log);
    subscriber.next(1);
    subscriber.next(2);
    subscriber.complete();
    subscriber.next(3);
    subscriber.error("never dispatched".to_owned());

    assert_eq!(*log.lock().unwrap(), vec!["next 1", "next 2", "completed"]);
    assert!(subscriber.is_closed());
  }

  #[rxsignal_macro::test]
  fn terminal_disposes_producer() {
    let log = Log::default();
    let subscriber = recording(&log);
    let teardown = ActionDisposable::new(|| {});
    subscriber.disposable().add(teardown.clone());

    subscriber.error("boom".to_owned());
    assert!(teardown.is_disposed());
    assert_eq!(*log.lock().unwrap(), vec!["error boom"]);
  }

  #[rxsignal_macro::test]
  fn dispose_silences_delivery() {
    let log = Log::default();
    let subscriber = recording(&log);
    subscriber.next(1);
    subscriber.disposable().dispose();
    subscriber.next(2);
    subscriber.complete();

    assert_eq!(*log.lock().unwrap(), vec!["next 1"]);
  }

  #[rxsignal_macro::test]
  fn reentrant_events_are_queued_in_order() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let slot: Arc<Mutex<Option<Subscriber<i32, ()>>>> = Arc::default();

    let c_seen = seen.clone();
    let c_slot = slot.clone();
    let subscriber = Subscriber::new(CallbackObserver::new(
      move |v: i32| {
        c_seen.lock().unwrap().push(v);
        if v == 1 {
          let me = c_slot.lock().unwrap().clone();
          if let Some(me) = me {
            me.next(2);
            me.next(3);
          }
        }
      },
      |_: ()| {},
      || {},
    ));
    *slot.lock().unwrap() = Some(subscriber.clone());

    subscriber.next(1);
    subscriber.next(4);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
    slot.lock().unwrap().take();
  }

  #[rxsignal_macro::test]
  fn concurrent_senders_deliver_every_value_once() {
    let sum = Arc::new(Mutex::new(0));
    let c_sum = sum.clone();
    let subscriber: Subscriber<i32, ()> = Subscriber::new(CallbackObserver::new(
      move |v: i32| *c_sum.lock().unwrap() += v,
      |_: ()| {},
      || {},
    ));

    let handles: Vec<_> = (0..4)
      .map(|_| {
        let subscriber = subscriber.clone();
        thread::spawn(move || {
          for i in 1..=100 {
            subscriber.next(i);
          }
        })
      })
      .collect();
    for h in handles {
      h.join().unwrap();
    }

    assert_eq!(*sum.lock().unwrap(), 4 * 5050);
  }
}
