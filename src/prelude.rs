//! Prelude module for convenient imports
//!
//! This module re-exports commonly used types and traits for easy access.

// Bridging
pub use crate::blocking::{SignalBlocking, WaitConfig};
// Disposables
pub use crate::disposable::{
  ActionDisposable, BoxDisposable, CompoundDisposable, Disposable, DisposableKey, DisposeGuard,
  SerialDisposable,
};
pub use crate::error::WaitError;
// Observer
pub use crate::observer::{CallbackObserver, Notification, Observer};
// Schedulers
#[cfg(feature = "futures-scheduler")]
pub use crate::scheduler::ThreadPoolScheduler;
#[cfg(feature = "tokio-scheduler")]
pub use crate::scheduler::TokioScheduler;
pub use crate::scheduler::{ImmediateScheduler, RunLoop, RunLoopScheduler, Scheduler};
// Signals and leaf constructors
pub use crate::signal::{
  create, defer, empty, from_iter, never, of, start_eagerly, start_lazily, throw_err, zip,
  BoxSignal, Create, Defer, Empty, FromIter, Never, Of, Signal, StartSignal, ThrowErr, Zip,
};
pub use crate::subscriber::Subscriber;
