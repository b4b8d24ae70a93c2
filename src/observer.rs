//! Observer trait and implementations
//!
//! An observer is the consumer side of a signal: it receives values, then at
//! most one terminal event (an error or completion).

// ============================================================================
// Observer Trait
// ============================================================================

/// The consumer of a signal's events.
pub trait Observer<Item, Err> {
  /// Receive the next value.
  fn next(&mut self, value: Item);

  /// Receive the terminal error.
  ///
  /// Consumes the observer: nothing can follow a terminal event.
  fn error(self, err: Err);

  /// Receive the terminal completion.
  ///
  /// Consumes the observer: nothing can follow a terminal event.
  fn complete(self);

  /// Whether the observer refuses further values.
  ///
  /// A [`Subscriber`](crate::subscriber::Subscriber) checks this after every
  /// delivered value and tears down its producer once it turns `true`. This
  /// is how a finished operator (e.g. `take`) stops a synchronous source.
  fn is_closed(&self) -> bool;
}

// ============================================================================
// DynObserver Trait - Object-safe Observer
// ============================================================================

/// Object-safe mirror of [`Observer`].
///
/// `Observer` consumes `self` in its terminal methods, which a trait object
/// cannot do; `DynObserver` takes `Box<Self>` instead.
pub trait DynObserver<Item, Err> {
  fn box_next(&mut self, value: Item);
  fn box_error(self: Box<Self>, err: Err);
  fn box_complete(self: Box<Self>);
  fn box_is_closed(&self) -> bool;
}

impl<T, Item, Err> DynObserver<Item, Err> for T
where
  T: Observer<Item, Err>,
{
  fn box_next(&mut self, value: Item) { self.next(value); }
  fn box_error(self: Box<Self>, err: Err) { self.error(err); }
  fn box_complete(self: Box<Self>) { self.complete(); }
  fn box_is_closed(&self) -> bool { self.is_closed() }
}

/// A thread-safe boxed observer.
pub type BoxedObserver<Item, Err> = Box<dyn DynObserver<Item, Err> + Send>;

impl<Item, Err> Observer<Item, Err> for BoxedObserver<Item, Err> {
  #[inline]
  fn next(&mut self, value: Item) { (**self).box_next(value) }

  #[inline]
  fn error(self, err: Err) { self.box_error(err) }

  #[inline]
  fn complete(self) { self.box_complete() }

  #[inline]
  fn is_closed(&self) -> bool { (**self).box_is_closed() }
}

// ============================================================================
// Notification
// ============================================================================

/// One event travelling from a producer to an observer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification<Item, Err> {
  Next(Item),
  Error(Err),
  Completed,
}

impl<Item, Err> Notification<Item, Err> {
  #[inline]
  pub fn is_terminal(&self) -> bool { !matches!(self, Notification::Next(_)) }
}

// ============================================================================
// CallbackObserver - Closure adapter
// ============================================================================

/// Builds an observer out of three callbacks.
///
/// The `subscribe_*` convenience methods fill the slots they were not given
/// with no-op closures.
#[derive(Clone)]
pub struct CallbackObserver<N, E, C> {
  next: N,
  error: E,
  complete: C,
}

impl<N, E, C> CallbackObserver<N, E, C> {
  pub fn new(next: N, error: E, complete: C) -> Self { Self { next, error, complete } }
}

impl<Item, Err, N, E, C> Observer<Item, Err> for CallbackObserver<N, E, C>
where
  N: FnMut(Item),
  E: FnOnce(Err),
  C: FnOnce(),
{
  #[inline]
  fn next(&mut self, value: Item) { (self.next)(value) }

  #[inline]
  fn error(self, err: Err) { (self.error)(err) }

  #[inline]
  fn complete(self) { (self.complete)() }

  #[inline]
  fn is_closed(&self) -> bool { false }
}

// ============================================================================
// Observer implementation for Option
// ============================================================================

/// `None` ignores all events and reports closed, `Some` delegates.
impl<O, Item, Err> Observer<Item, Err> for Option<O>
where
  O: Observer<Item, Err>,
{
  fn next(&mut self, value: Item) {
    if let Some(inner) = self {
      inner.next(value);
    }
  }

  fn error(self, err: Err) {
    if let Some(inner) = self {
      inner.error(err);
    }
  }

  fn complete(self) {
    if let Some(inner) = self {
      inner.complete();
    }
  }

  fn is_closed(&self) -> bool { self.as_ref().is_none_or(Observer::is_closed) }
}

// ============================================================================
// Tests
// ============================================================================
