//! Hot, replaying signals started from a block of work.
//!
//! The block runs at most once, on a [`Scheduler`], no matter how many
//! subscribers come and go. Its events are recorded and replayed to every
//! subscriber, early or late.

use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::{
  disposable::{ActionDisposable, BoxDisposable, Disposable},
  observer::{Notification, Observer},
  rc::{MutArc, RcDerefMut},
  scheduler::Scheduler,
  signal::Signal,
  subscriber::Subscriber,
};

/// Runs `block` on `scheduler` the first time the returned signal is
/// subscribed.
///
/// # Examples
///
/// ```
/// use rxsignal::prelude::*;
///
/// let signal = start_lazily(ImmediateScheduler, |subscriber: Subscriber<i32, ()>| {
///   subscriber.next(1);
///   subscriber.complete();
/// });
/// // Nothing ran yet.
/// signal.subscribe_next(|v| assert_eq!(v, 1));
/// ```
pub fn start_lazily<Item, Err, S, F>(scheduler: S, block: F) -> StartSignal<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
  S: Scheduler + 'static,
  F: FnOnce(Subscriber<Item, Err>) + Send + 'static,
{
  StartSignal::new(scheduler, block)
}

/// Runs `block` on `scheduler` right away.
pub fn start_eagerly<Item, Err, S, F>(scheduler: S, block: F) -> StartSignal<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
  S: Scheduler + 'static,
  F: FnOnce(Subscriber<Item, Err>) + Send + 'static,
{
  let signal = StartSignal::new(scheduler, block);
  signal.launch();
  signal
}

type Launch = Box<dyn FnOnce() -> BoxDisposable + Send>;

pub struct StartSignal<Item, Err>(Arc<Shared<Item, Err>>);

struct Shared<Item, Err> {
  replay: MutArc<Replay<Item, Err>>,
  // `None` once launched.
  launch: Mutex<Option<Launch>>,
  // Keeps the scheduled work alive for as long as the signal exists.
  work: Mutex<Option<BoxDisposable>>,
}

struct Replay<Item, Err> {
  events: Vec<Notification<Item, Err>>,
  terminated: bool,
  subscribers: Vec<Subscriber<Item, Err>>,
}

impl<Item, Err> Clone for StartSignal<Item, Err> {
  fn clone(&self) -> Self { StartSignal(self.0.clone()) }
}

impl<Item, Err> StartSignal<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  fn new<S, F>(scheduler: S, block: F) -> Self
  where
    S: Scheduler + 'static,
    F: FnOnce(Subscriber<Item, Err>) + Send + 'static,
  {
    let replay = MutArc::own(Replay { events: vec![], terminated: false, subscribers: vec![] });
    let recorder = Subscriber::new(Recorder { replay: replay.clone() });
    let launch: Launch = Box::new(move || scheduler.schedule(Box::new(move || block(recorder))));
    StartSignal(Arc::new(Shared {
      replay,
      launch: Mutex::new(Some(launch)),
      work: Mutex::new(None),
    }))
  }

  fn launch(&self) {
    let launch = self.0.launch.lock().unwrap_or_else(|p| p.into_inner()).take();
    if let Some(launch) = launch {
      trace!("start block scheduled");
      let work = launch();
      *self.0.work.lock().unwrap_or_else(|p| p.into_inner()) = Some(work);
    }
  }
}

impl<Item, Err> Signal for StartSignal<Item, Err>
where
  Item: Clone + Send + 'static,
  Err: Clone + Send + 'static,
{
  type Item = Item;
  type Err = Err;
  type Unsub = ActionDisposable;

  fn actual_subscribe(&self, subscriber: Subscriber<Item, Err>) -> ActionDisposable {
    {
      let mut replay = self.0.replay.rc_deref_mut();
      for event in &replay.events {
        subscriber.enqueue(event.clone());
      }
      if !replay.terminated {
        replay.subscribers.retain(|s| !s.is_closed());
        replay.subscribers.push(subscriber.clone());
      }
    }
    subscriber.drain();
    self.launch();

    // Disposed together with the subscriber, which is closed by then.
    let replay = self.0.replay.clone();
    ActionDisposable::new(move || {
      replay.rc_deref_mut().subscribers.retain(|s| !s.is_closed());
    })
  }
}

// Records the block's events and fans them out to the live subscribers.
struct Recorder<Item, Err> {
  replay: MutArc<Replay<Item, Err>>,
}

impl<Item, Err> Recorder<Item, Err>
where
  Item: Clone,
  Err: Clone,
{
  fn record(&self, event: Notification<Item, Err>) {
    let targets = {
      let mut replay = self.replay.rc_deref_mut();
      for subscriber in &replay.subscribers {
        subscriber.enqueue(event.clone());
      }
      let targets = if event.is_terminal() {
        replay.terminated = true;
        std::mem::take(&mut replay.subscribers)
      } else {
        replay.subscribers.clone()
      };
      replay.events.push(event);
      targets
    };
    for subscriber in targets {
      subscriber.drain();
    }
  }
}

impl<Item, Err> Observer<Item, Err> for Recorder<Item, Err>
where
  Item: Clone,
  Err: Clone,
{
  fn next(&mut self, value: Item) { self.record(Notification::Next(value)) }

  fn error(self, err: Err) { self.record(Notification::Error(err)) }

  fn complete(self) { self.record(Notification::Completed) }

  fn is_closed(&self) -> bool { false }
}

impl<Item, Err> Disposable for StartSignal<Item, Err> {
  /// Cancel the block if it has not run yet.
  fn dispose(&self) {
    self.0.launch.lock().unwrap_or_else(|p| p.into_inner()).take();
    let work = self.0.work.lock().unwrap_or_else(|p| p.into_inner()).take();
    work.dispose();
  }

  fn is_disposed(&self) -> bool {
    self.0.launch.lock().unwrap_or_else(|p| p.into_inner()).is_none()
      && self.0.work.lock().unwrap_or_else(|p| p.into_inner()).is_none()
  }
}
