use tokio::runtime::Handle;

use super::{Scheduler, Task};
use crate::disposable::{ActionDisposable, BoxDisposable};

/// Runs tasks on a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
  handle: Handle,
}

impl TokioScheduler {
  pub fn new(handle: Handle) -> Self { TokioScheduler { handle } }

  /// Schedules onto the runtime the caller is running in.
  ///
  /// # Panics
  ///
  /// When called outside of a tokio runtime.
  pub fn current() -> Self { TokioScheduler { handle: Handle::current() } }
}

impl Scheduler for TokioScheduler {
  fn schedule(&self, task: Task) -> BoxDisposable {
    let join = self.handle.spawn(async move { task() });
    BoxDisposable::new(ActionDisposable::new(move || join.abort()))
  }
}
