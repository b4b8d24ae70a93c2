//! Where deferred work runs.
//!
//! Signals never schedule implicitly; a [`Scheduler`] is only consulted by
//! [`start_lazily`](crate::signal::start_lazily),
//! [`start_eagerly`](crate::signal::start_eagerly) and the run-loop bridge.

use std::sync::Arc;

use crate::disposable::BoxDisposable;

mod immediate;
mod run_loop;
#[cfg(feature = "futures-scheduler")]
mod thread_pool_scheduler;
#[cfg(feature = "tokio-scheduler")]
mod tokio_scheduler;

pub use immediate::ImmediateScheduler;
pub use run_loop::{RunLoop, RunLoopScheduler};
#[cfg(feature = "futures-scheduler")]
pub use thread_pool_scheduler::ThreadPoolScheduler;
#[cfg(feature = "tokio-scheduler")]
pub use tokio_scheduler::TokioScheduler;

/// A unit of work handed to a scheduler.
pub type Task = Box<dyn FnOnce() + Send>;

/// Orders tasks and decides on which thread they execute.
pub trait Scheduler: Send + Sync {
  /// Run `task` at some point; disposing the returned handle before the task
  /// started prevents it from running.
  fn schedule(&self, task: Task) -> BoxDisposable;
}

impl<S: Scheduler + ?Sized> Scheduler for Arc<S> {
  #[inline]
  fn schedule(&self, task: Task) -> BoxDisposable { (**self).schedule(task) }
}

impl<S: Scheduler + ?Sized> Scheduler for &'static S {
  #[inline]
  fn schedule(&self, task: Task) -> BoxDisposable { (**self).schedule(task) }
}
