//! Bridging signals into synchronous code.
//!
//! The run-loop helpers keep a [`RunLoop`] alive while they wait, so work
//! posted onto it (including the events of the awaited signal) still runs.
//! The blocking helpers park the calling thread instead and must not be used
//! on a thread that the signal itself needs.

use std::{
  sync::{Arc, Condvar, Mutex},
  time::{Duration, Instant},
};

use tracing::debug;

use crate::{
  disposable::Disposable,
  error::WaitError,
  observer::Observer,
  rc::{MutArc, RcDerefMut},
  scheduler::{RunLoop, RunLoopScheduler, Scheduler},
  signal::Signal,
};

/// Timing of the run-loop helpers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitConfig {
  /// Give up once this much time passed without a terminal event.
  pub timeout: Duration,
  /// How long the run loop waits for posted work before the outcome is
  /// checked again.
  pub poll_slice: Duration,
}

impl Default for WaitConfig {
  fn default() -> Self {
    WaitConfig { timeout: Duration::from_secs(10), poll_slice: Duration::from_millis(10) }
  }
}

impl WaitConfig {
  pub fn with_timeout(timeout: Duration) -> Self { WaitConfig { timeout, ..Self::default() } }
}

// The first value, or `None` for an empty completion.
type Outcome<Item, Err> = Result<Option<Item>, Err>;

/// Synchronous access to the first value or the completion of a signal.
pub trait SignalBlocking: Signal {
  /// Wait for the first value while pumping `run_loop`.
  ///
  /// Returns `default` if the signal completes without a value.
  ///
  /// # Panics
  ///
  /// When not called on the thread owning `run_loop`.
  fn asynchronous_first_or_default(
    &self, run_loop: &RunLoop, default: Self::Item, timeout: Duration,
  ) -> Result<Self::Item, WaitError<Self::Err>> {
    self.asynchronous_first_or_default_with(run_loop, default, WaitConfig::with_timeout(timeout))
  }

  fn asynchronous_first_or_default_with(
    &self, run_loop: &RunLoop, default: Self::Item, config: WaitConfig,
  ) -> Result<Self::Item, WaitError<Self::Err>> {
    run_loop.assert_current("asynchronous_first_or_default");
    pump_until_first(self, run_loop, config, false).map(|first| first.unwrap_or(default))
  }

  /// Wait for completion while pumping `run_loop`; values are ignored.
  ///
  /// # Panics
  ///
  /// When not called on the thread owning `run_loop`.
  fn asynchronously_wait_until_completed(
    &self, run_loop: &RunLoop, timeout: Duration,
  ) -> Result<(), WaitError<Self::Err>> {
    self.asynchronously_wait_until_completed_with(run_loop, WaitConfig::with_timeout(timeout))
  }

  fn asynchronously_wait_until_completed_with(
    &self, run_loop: &RunLoop, config: WaitConfig,
  ) -> Result<(), WaitError<Self::Err>> {
    run_loop.assert_current("asynchronously_wait_until_completed");
    pump_until_first(self, run_loop, config, true).map(|_| ())
  }

  /// Block the calling thread until the first value arrives or the signal
  /// terminates.
  ///
  /// There is no timeout: use with caution, this blocks forever if the
  /// signal never emits nor terminates (e.g. [`never`](crate::signal::never)).
  /// Prefer [`asynchronous_first_or_default`](Self::asynchronous_first_or_default)
  /// when a deadline is needed.
  fn first_or_default(&self, default: Self::Item) -> Result<Self::Item, Self::Err> {
    block_until_first(self, false).map(|first| first.unwrap_or(default))
  }

  /// Block the calling thread until the signal terminates.
  ///
  /// There is no timeout: use with caution, this blocks forever if the
  /// signal never completes or errors out. Prefer
  /// [`asynchronously_wait_until_completed`](Self::asynchronously_wait_until_completed)
  /// when a deadline is needed.
  fn wait_until_completed(&self) -> Result<(), Self::Err> { block_until_first(self, true).map(|_| ()) }
}

impl<S: Signal> SignalBlocking for S {}

// ==================== Run-loop bridge ====================

// Posts the outcome onto the run loop; the first terminal event wins.
struct PostingObserver<Item, Err> {
  scheduler: RunLoopScheduler,
  outcome: MutArc<Option<Outcome<Item, Err>>>,
  ignore_values: bool,
  done: bool,
}

impl<Item, Err> PostingObserver<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
{
  fn post(&mut self, outcome: Outcome<Item, Err>) {
    self.done = true;
    let slot = self.outcome.clone();
    self.scheduler.schedule(Box::new(move || {
      let mut slot = slot.rc_deref_mut();
      if slot.is_none() {
        *slot = Some(outcome);
      }
    }));
  }
}

impl<Item, Err> Observer<Item, Err> for PostingObserver<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
{
  fn next(&mut self, value: Item) {
    if !self.ignore_values && !self.done {
      self.post(Ok(Some(value)));
    }
  }

  fn error(mut self, err: Err) { self.post(Err(err)) }

  fn complete(mut self) { self.post(Ok(None)) }

  fn is_closed(&self) -> bool { self.done }
}

fn pump_until_first<S: Signal + ?Sized>(
  signal: &S, run_loop: &RunLoop, config: WaitConfig, ignore_values: bool,
) -> Result<Option<S::Item>, WaitError<S::Err>> {
  let outcome = MutArc::own(None);
  let subscription = signal.subscribe(PostingObserver {
    scheduler: run_loop.scheduler(),
    outcome: outcome.clone(),
    ignore_values,
    done: false,
  });

  let deadline = Instant::now() + config.timeout;
  loop {
    let ready = outcome.rc_deref_mut().take();
    if let Some(result) = ready {
      subscription.dispose();
      return result.map_err(WaitError::Source);
    }
    let now = Instant::now();
    if now >= deadline {
      debug!(signal = %signal.name(), timeout = ?config.timeout, "timed out waiting on run loop");
      subscription.dispose();
      return Err(WaitError::TimedOut);
    }
    run_loop.run_for(config.poll_slice.min(deadline - now));
  }
}

// ==================== Thread-blocking bridge ====================

struct Gate<Item, Err> {
  outcome: Mutex<Option<Outcome<Item, Err>>>,
  ready: Condvar,
}

struct GateObserver<Item, Err> {
  gate: Arc<Gate<Item, Err>>,
  ignore_values: bool,
  done: bool,
}

impl<Item, Err> GateObserver<Item, Err> {
  fn open(&mut self, outcome: Outcome<Item, Err>) {
    self.done = true;
    let mut slot = self.gate.outcome.lock().unwrap_or_else(|p| p.into_inner());
    if slot.is_none() {
      *slot = Some(outcome);
      self.gate.ready.notify_all();
    }
  }
}

impl<Item, Err> Observer<Item, Err> for GateObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    if !self.ignore_values && !self.done {
      self.open(Ok(Some(value)));
    }
  }

  fn error(mut self, err: Err) { self.open(Err(err)) }

  fn complete(mut self) { self.open(Ok(None)) }

  fn is_closed(&self) -> bool { self.done }
}

fn block_until_first<S: Signal + ?Sized>(
  signal: &S, ignore_values: bool,
) -> Result<Option<S::Item>, S::Err> {
  let gate = Arc::new(Gate { outcome: Mutex::new(None), ready: Condvar::new() });
  let subscription =
    signal.subscribe(GateObserver { gate: gate.clone(), ignore_values, done: false });

  let mut slot = gate.outcome.lock().unwrap_or_else(|p| p.into_inner());
  let result = loop {
    if let Some(result) = slot.take() {
      break result;
    }
    slot = gate.ready.wait(slot).unwrap_or_else(|p| p.into_inner());
  };
  drop(slot);
  subscription.dispose();
  result
}
