use std::sync::Arc;

use super::fan_out::FanOut;
use crate::{
  disposable::{CompoundDisposable, Disposable, DisposableKey, SerialDisposable},
  observer::Observer,
  signal::Signal,
  subscriber::Subscriber,
};

/// Flattens the signals a per-subscription binding closure returns.
///
/// See [`Signal::bind`].
pub struct Bind<S, F> {
  pub(crate) source: S,
  pub(crate) factory: Arc<F>,
}

impl<S, F, B, R> Signal for Bind<S, F>
where
  S: Signal,
  F: Fn() -> B + Send + Sync + 'static,
  B: FnMut(S::Item, &mut bool) -> Option<R> + Send + 'static,
  R: Signal<Err = S::Err>,
{
  type Item = R::Item;
  type Err = S::Err;
  type Unsub = CompoundDisposable;

  fn actual_subscribe(&self, subscriber: Subscriber<R::Item, S::Err>) -> CompoundDisposable {
    let fan_out = FanOut::new(subscriber);
    let binding = (self.factory)();
    fan_out.attach_source(&self.source, |key, slot| BindObserver {
      fan_out: fan_out.clone(),
      binding,
      key,
      slot,
      stopped: false,
    });
    fan_out.disposable()
  }
}

pub struct BindObserver<Item, Err, B> {
  fan_out: Arc<FanOut<Item, Err>>,
  binding: B,
  key: DisposableKey,
  // Holds the source subscription.
  slot: SerialDisposable,
  stopped: bool,
}

impl<SourceItem, Err, B, R> Observer<SourceItem, Err> for BindObserver<R::Item, Err, B>
where
  B: FnMut(SourceItem, &mut bool) -> Option<R>,
  R: Signal<Err = Err>,
  Err: Send + 'static,
{
  fn next(&mut self, value: SourceItem) {
    if self.stopped || self.fan_out.is_closed() {
      return;
    }
    let mut stop = false;
    let signal = (self.binding)(value, &mut stop);
    let stop = stop || signal.is_none();
    if let Some(signal) = signal {
      self.fan_out.spawn(signal);
    }
    if stop {
      self.stopped = true;
      self.slot.dispose();
      self.fan_out.finish(self.key);
    }
  }

  fn error(self, err: Err) { self.fan_out.fail(err) }

  fn complete(self) {
    if !self.stopped {
      self.fan_out.finish(self.key);
    }
  }

  fn is_closed(&self) -> bool { self.stopped || self.fan_out.is_closed() }
}
