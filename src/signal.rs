//! The `Signal` trait and the leaf signals.
//!
//! A signal is a cold producer: nothing happens until it is subscribed, and
//! every subscription re-runs the production logic with fresh state.
//! Operators are provided methods of [`Signal`] that wrap `self` in an
//! operator struct; subscribing to that struct wires subscriptions to its
//! inputs.

use std::{borrow::Cow, sync::Arc};

use tracing::trace;

use crate::{
  disposable::{CompoundDisposable, Disposable},
  observer::{CallbackObserver, Observer},
  ops::{
    bind::Bind,
    combine_previous::CombinePreviousWithStart,
    concat::Concat,
    distinct_until_changed::DistinctUntilChanged,
    filter::Filter,
    flatten_map::FlattenMap,
    map::Map,
    named::Named,
    scan::{Indexed, Plain, ScanWithStart},
    skip::Skip,
    skip_until::SkipUntilBlock,
    take::Take,
    take_until::TakeUntilBlock,
    zip::ZipWith,
  },
  subscriber::Subscriber,
};

mod boxed;
mod create;
mod defer;
mod from_iter;
mod start;
mod trivial;

pub use boxed::*;
pub use create::*;
pub use defer::*;
pub use from_iter::*;
pub use start::*;
pub use trivial::*;

pub use crate::ops::zip::{zip, Zip};

/// A cold, push-based producer of values terminated by an error or by
/// completion.
pub trait Signal: Send + Sync + 'static {
  type Item: Send + 'static;
  type Err: Send + 'static;
  /// What `actual_subscribe` hands back to cancel the subscription.
  type Unsub: Disposable + Send + Sync + 'static;

  /// Start producing into `subscriber`.
  ///
  /// This is the single operation every signal implements. Consumers call
  /// [`subscribe`](Signal::subscribe) or one of its convenience forms instead.
  fn actual_subscribe(&self, subscriber: Subscriber<Self::Item, Self::Err>) -> Self::Unsub;

  /// Diagnostic name, shown in trace logs only.
  fn name(&self) -> Cow<'static, str> { Cow::Borrowed(std::any::type_name::<Self>()) }

  // ==================== Subscription ====================

  /// Subscribe `observer` and return the disposable for this subscription.
  ///
  /// The returned compound is disposed automatically once a terminal event
  /// was delivered; disposing it earlier cancels the subscription.
  fn subscribe<O>(&self, observer: O) -> CompoundDisposable
  where
    O: Observer<Self::Item, Self::Err> + Send + 'static,
  {
    let subscriber = Subscriber::new(observer);
    trace!(signal = %self.name(), "subscribe");
    let unsub = self.actual_subscribe(subscriber.clone());
    let disposable = subscriber.disposable().clone();
    disposable.add(unsub);
    disposable
  }

  fn subscribe_next<N>(&self, next: N) -> CompoundDisposable
  where
    N: FnMut(Self::Item) + Send + 'static,
  {
    self.subscribe(CallbackObserver::new(next, |_: Self::Err| {}, || {}))
  }

  fn subscribe_next_completed<N, C>(&self, next: N, completed: C) -> CompoundDisposable
  where
    N: FnMut(Self::Item) + Send + 'static,
    C: FnOnce() + Send + 'static,
  {
    self.subscribe(CallbackObserver::new(next, |_: Self::Err| {}, completed))
  }

  fn subscribe_next_error<N, E>(&self, next: N, error: E) -> CompoundDisposable
  where
    N: FnMut(Self::Item) + Send + 'static,
    E: FnOnce(Self::Err) + Send + 'static,
  {
    self.subscribe(CallbackObserver::new(next, error, || {}))
  }

  fn subscribe_all<N, E, C>(&self, next: N, error: E, completed: C) -> CompoundDisposable
  where
    N: FnMut(Self::Item) + Send + 'static,
    E: FnOnce(Self::Err) + Send + 'static,
    C: FnOnce() + Send + 'static,
  {
    self.subscribe(CallbackObserver::new(next, error, completed))
  }

  fn subscribe_error<E>(&self, error: E) -> CompoundDisposable
  where
    E: FnOnce(Self::Err) + Send + 'static,
  {
    self.subscribe(CallbackObserver::new(|_: Self::Item| {}, error, || {}))
  }

  fn subscribe_completed<C>(&self, completed: C) -> CompoundDisposable
  where
    C: FnOnce() + Send + 'static,
  {
    self.subscribe(CallbackObserver::new(|_: Self::Item| {}, |_: Self::Err| {}, completed))
  }

  fn subscribe_error_completed<E, C>(&self, error: E, completed: C) -> CompoundDisposable
  where
    E: FnOnce(Self::Err) + Send + 'static,
    C: FnOnce() + Send + 'static,
  {
    self.subscribe(CallbackObserver::new(|_: Self::Item| {}, error, completed))
  }

  // ==================== Sequential composition ====================

  /// Flatten the signals produced by a per-subscription binding closure.
  ///
  /// `factory` runs once per subscription and yields the binding closure.
  /// For every source value the closure may return a signal to subscribe
  /// (its values are forwarded downstream), and may set the `stop` flag to
  /// end consumption of the source; returning `None` ends it as well.
  /// Completion is sent once the source and every returned signal have
  /// completed. The first error from any of them is forwarded and tears
  /// everything down.
  fn bind<F, B, R>(self, factory: F) -> Bind<Self, F>
  where
    Self: Sized,
    F: Fn() -> B + Send + Sync + 'static,
    B: FnMut(Self::Item, &mut bool) -> Option<R> + Send + 'static,
    R: Signal<Err = Self::Err>,
  {
    Bind { source: self, factory: Arc::new(factory) }
  }

  /// Emit everything from `self`, then everything from `other`.
  ///
  /// `other` is subscribed only after `self` completes; an error from `self`
  /// means `other` is never subscribed.
  fn concat<B>(self, other: B) -> Concat<Self, B>
  where
    Self: Sized,
    B: Signal<Item = Self::Item, Err = Self::Err>,
  {
    Concat { first: self, second: Arc::new(other) }
  }

  /// Emit `value` before everything from `self`.
  fn start_with(self, value: Self::Item) -> Concat<Of<Self::Item, Self::Err>, Self>
  where
    Self: Sized,
    Self::Item: Clone + Sync,
  {
    of(value).concat(self)
  }

  // ==================== Concurrent fan-out ====================

  /// Map each value to an inner signal and merge all of them.
  ///
  /// Inner signals run concurrently; their values interleave in delivery
  /// order. `None` spawns nothing.
  fn flatten_map<F, R>(self, func: F) -> FlattenMap<Self, F>
  where
    Self: Sized,
    F: Fn(Self::Item) -> Option<R> + Send + Sync + 'static,
    R: Signal<Err = Self::Err>,
  {
    FlattenMap { source: self, func: Arc::new(func) }
  }

  // ==================== Synchronizing ====================

  /// Pair the n-th value of `self` with the n-th value of `other`.
  ///
  /// Completes as soon as either side has completed with nothing buffered.
  /// Values of the faster side are buffered without bound.
  fn zip_with<B>(self, other: B) -> ZipWith<Self, B>
  where
    Self: Sized,
    B: Signal<Err = Self::Err>,
  {
    ZipWith { a: self, b: other }
  }

  // ==================== Simple transforms ====================

  fn map<B, F>(self, func: F) -> Map<Self, F>
  where
    Self: Sized,
    F: Fn(Self::Item) -> B + Send + Sync + 'static,
    B: Send + 'static,
  {
    Map { source: self, func: Arc::new(func) }
  }

  fn filter<F>(self, predicate: F) -> Filter<Self, F>
  where
    Self: Sized,
    F: Fn(&Self::Item) -> bool + Send + Sync + 'static,
  {
    Filter { source: self, predicate: Arc::new(predicate) }
  }

  /// Drop the first `count` values.
  fn skip(self, count: usize) -> Skip<Self>
  where
    Self: Sized,
  {
    Skip { source: self, count }
  }

  /// Forward at most `count` values, then complete.
  ///
  /// `take(0)` completes without subscribing the source.
  fn take(self, count: usize) -> Take<Self>
  where
    Self: Sized,
  {
    Take { source: self, count }
  }

  /// Drop values equal to the previously emitted one.
  fn distinct_until_changed(self) -> DistinctUntilChanged<Self>
  where
    Self: Sized,
    Self::Item: PartialEq + Clone,
  {
    DistinctUntilChanged(self)
  }

  /// Emit the running fold of the values, starting from `seed`.
  fn scan_with_start<B, F>(self, seed: B, func: F) -> ScanWithStart<Self, B, Plain<F>>
  where
    Self: Sized,
    B: Clone + Send + Sync + 'static,
    F: Fn(B, Self::Item) -> B + Send + Sync + 'static,
  {
    ScanWithStart { source: self, seed, reducer: Arc::new(Plain(func)) }
  }

  /// Like [`scan_with_start`](Signal::scan_with_start), the reducer also
  /// receives the zero-based index of the value.
  fn scan_with_start_indexed<B, F>(self, seed: B, func: F) -> ScanWithStart<Self, B, Indexed<F>>
  where
    Self: Sized,
    B: Clone + Send + Sync + 'static,
    F: Fn(B, Self::Item, usize) -> B + Send + Sync + 'static,
  {
    ScanWithStart { source: self, seed, reducer: Arc::new(Indexed(func)) }
  }

  /// Emit `func(previous, current)` for every value; `previous` starts out
  /// as `start`.
  fn combine_previous_with_start<B, F>(
    self, start: Self::Item, func: F,
  ) -> CombinePreviousWithStart<Self, F>
  where
    Self: Sized,
    Self::Item: Clone + Sync,
    F: Fn(&Self::Item, &Self::Item) -> B + Send + Sync + 'static,
    B: Send + 'static,
  {
    CombinePreviousWithStart { source: self, start, func: Arc::new(func) }
  }

  /// Forward values until `predicate` holds, then complete instead of
  /// emitting that value.
  fn take_until_block<P>(self, predicate: P) -> TakeUntilBlock<Self, P>
  where
    Self: Sized,
    P: Fn(&Self::Item) -> bool + Send + Sync + 'static,
  {
    TakeUntilBlock { source: self, predicate: Arc::new(predicate), stop_when: true }
  }

  /// Forward values while `predicate` holds, then complete.
  fn take_while_block<P>(self, predicate: P) -> TakeUntilBlock<Self, P>
  where
    Self: Sized,
    P: Fn(&Self::Item) -> bool + Send + Sync + 'static,
  {
    TakeUntilBlock { source: self, predicate: Arc::new(predicate), stop_when: false }
  }

  /// Drop values until `predicate` first holds, then forward that value and
  /// everything after it.
  fn skip_until_block<P>(self, predicate: P) -> SkipUntilBlock<Self, P>
  where
    Self: Sized,
    P: Fn(&Self::Item) -> bool + Send + Sync + 'static,
  {
    SkipUntilBlock { source: self, predicate: Arc::new(predicate), start_when: true }
  }

  /// Drop values while `predicate` holds.
  fn skip_while_block<P>(self, predicate: P) -> SkipUntilBlock<Self, P>
  where
    Self: Sized,
    P: Fn(&Self::Item) -> bool + Send + Sync + 'static,
  {
    SkipUntilBlock { source: self, predicate: Arc::new(predicate), start_when: false }
  }

  // ==================== Misc ====================

  /// Attach a diagnostic name.
  fn set_name(self, name: impl Into<Cow<'static, str>>) -> Named<Self>
  where
    Self: Sized,
  {
    Named { source: self, name: name.into() }
  }

  /// Erase the concrete signal type.
  fn box_it(self) -> BoxSignal<Self::Item, Self::Err>
  where
    Self: Sized,
  {
    BoxSignal::new(self)
  }
}
