use futures::{executor::ThreadPool, future};
use once_cell::sync::Lazy;
use tracing::debug;

use super::{Scheduler, Task};
use crate::disposable::{ActionDisposable, BoxDisposable};

static DEFAULT_POOL: Lazy<Option<ThreadPool>> = Lazy::new(|| {
  ThreadPool::new()
    .map_err(|e| debug!(error = %e, "failed to create the default thread pool"))
    .ok()
});

/// Runs tasks on a `futures` thread pool.
///
/// [`ThreadPoolScheduler::default`] shares one lazily created pool across the
/// process.
#[derive(Clone)]
pub struct ThreadPoolScheduler {
  pool: Option<ThreadPool>,
}

impl ThreadPoolScheduler {
  pub fn new(pool: ThreadPool) -> Self { ThreadPoolScheduler { pool: Some(pool) } }
}

impl Default for ThreadPoolScheduler {
  fn default() -> Self { ThreadPoolScheduler { pool: DEFAULT_POOL.clone() } }
}

impl Scheduler for ThreadPoolScheduler {
  fn schedule(&self, task: Task) -> BoxDisposable {
    let Some(pool) = &self.pool else {
      debug!("no thread pool available, task dropped");
      return BoxDisposable::new(());
    };
    let (work, handle) = future::abortable(future::lazy(move |_| task()));
    pool.spawn_ok(async move {
      let _ = work.await;
    });
    // Aborting only prevents a task that has not started yet.
    BoxDisposable::new(ActionDisposable::new(move || handle.abort()))
  }
}
