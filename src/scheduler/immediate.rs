use super::{Scheduler, Task};
use crate::disposable::BoxDisposable;

/// Runs every task synchronously on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
  fn schedule(&self, task: Task) -> BoxDisposable {
    task();
    BoxDisposable::new(())
  }
}
