//! Per-subscription state shared by `bind` and `flatten_map`.
//!
//! One counter tracks the source plus every inner signal still running. It
//! starts at 1 for the source; each spawned inner signal adds one and every
//! completion subtracts one. Whoever brings it to zero sends `completed`.

use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

use tracing::trace;

use crate::{
  disposable::{CompoundDisposable, Disposable, DisposableKey, SerialDisposable},
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

pub(crate) struct FanOut<Item, Err> {
  downstream: Subscriber<Item, Err>,
  active: AtomicUsize,
  disposables: CompoundDisposable,
}

impl<Item, Err> FanOut<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
{
  pub(crate) fn new(downstream: Subscriber<Item, Err>) -> Arc<Self> {
    Arc::new(FanOut {
      downstream,
      active: AtomicUsize::new(1),
      disposables: CompoundDisposable::new(),
    })
  }

  /// Everything this fan-out started; disposing it cancels the whole tree.
  pub(crate) fn disposable(&self) -> CompoundDisposable { self.disposables.clone() }

  pub(crate) fn is_closed(&self) -> bool {
    self.disposables.is_disposed() || self.downstream.is_closed()
  }

  /// Subscribe the source with the observer `make` builds from the source's
  /// key and slot.
  pub(crate) fn attach_source<S, O>(
    &self, source: &S, make: impl FnOnce(DisposableKey, SerialDisposable) -> O,
  ) where
    S: Signal,
    O: Observer<S::Item, S::Err> + Send + 'static,
  {
    let slot = SerialDisposable::new();
    let key = self.disposables.add(slot.clone());
    slot.set(source.subscribe(make(key, slot.clone())));
  }

  /// Subscribe an inner signal, forwarding its values downstream.
  ///
  /// Does nothing once the fan-out failed or was cancelled.
  pub(crate) fn spawn<R>(self: &Arc<Self>, signal: R)
  where
    R: Signal<Item = Item, Err = Err>,
  {
    if self.is_closed() {
      return;
    }
    self.active.fetch_add(1, Ordering::AcqRel);
    let slot = SerialDisposable::new();
    let key = self.disposables.add(slot.clone());
    // Lost a race with `fail` or a cancel: the slot came back disposed.
    if slot.is_disposed() {
      self.active.fetch_sub(1, Ordering::AcqRel);
      return;
    }
    trace!(signal = %signal.name(), "fan-out spawns inner signal");
    slot.set(signal.subscribe(InnerObserver { fan_out: self.clone(), key }));
  }

  /// One participant completed.
  pub(crate) fn finish(&self, key: DisposableKey) {
    if self.active.fetch_sub(1, Ordering::AcqRel) == 1 {
      self.downstream.complete();
      self.disposables.dispose();
    } else {
      self.disposables.remove(key);
    }
  }

  /// One participant failed: cancel everything and forward the error.
  pub(crate) fn fail(&self, err: Err) {
    self.disposables.dispose();
    self.downstream.error(err);
  }
}

struct InnerObserver<Item, Err> {
  fan_out: Arc<FanOut<Item, Err>>,
  key: DisposableKey,
}

impl<Item, Err> Observer<Item, Err> for InnerObserver<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
{
  fn next(&mut self, value: Item) { self.fan_out.downstream.next(value) }

  fn error(self, err: Err) { self.fan_out.fail(err) }

  fn complete(self) { self.fan_out.finish(self.key) }

  fn is_closed(&self) -> bool { self.fan_out.is_closed() }
}
