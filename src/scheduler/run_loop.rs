use std::{
  collections::VecDeque,
  fmt::{Debug, Formatter},
  sync::{Arc, Condvar, Mutex, MutexGuard},
  thread::{self, ThreadId},
  time::Duration,
};

use super::{Scheduler, Task};
use crate::disposable::{ActionDisposable, BoxDisposable, Disposable};

/// An event queue owned by the thread that created it.
///
/// Any thread may post work through [`scheduler`](RunLoop::scheduler); only
/// the owner thread runs it, by calling [`run_pending`](RunLoop::run_pending)
/// or [`run_for`](RunLoop::run_for).
pub struct RunLoop {
  queue: Arc<Queue>,
  owner: ThreadId,
}

#[derive(Default)]
struct Queue {
  tasks: Mutex<VecDeque<Task>>,
  posted: Condvar,
}

impl Queue {
  fn lock(&self) -> MutexGuard<'_, VecDeque<Task>> {
    self.tasks.lock().unwrap_or_else(|p| p.into_inner())
  }
}

/// A `Send` handle posting tasks onto a [`RunLoop`].
#[derive(Clone)]
pub struct RunLoopScheduler {
  queue: Arc<Queue>,
}

impl RunLoop {
  /// A run loop owned by the current thread.
  pub fn new() -> Self { RunLoop { queue: Arc::default(), owner: thread::current().id() } }

  pub fn scheduler(&self) -> RunLoopScheduler { RunLoopScheduler { queue: self.queue.clone() } }

  /// Whether the calling thread owns this run loop.
  pub fn is_current(&self) -> bool { thread::current().id() == self.owner }

  /// Run every task posted so far, plus those they post in turn. Returns how
  /// many tasks ran.
  ///
  /// # Panics
  ///
  /// When called from a thread other than the owner.
  pub fn run_pending(&self) -> usize {
    self.assert_current("RunLoop::run_pending");
    let mut ran = 0;
    loop {
      let task = self.queue.lock().pop_front();
      match task {
        Some(task) => {
          task();
          ran += 1;
        }
        None => return ran,
      }
    }
  }

  /// Wait up to `slice` for work to be posted, then run everything pending.
  ///
  /// # Panics
  ///
  /// When called from a thread other than the owner.
  pub fn run_for(&self, slice: Duration) -> usize {
    self.assert_current("RunLoop::run_for");
    {
      let tasks = self.queue.lock();
      if tasks.is_empty() {
        let _ = self
          .queue
          .posted
          .wait_timeout(tasks, slice)
          .unwrap_or_else(|p| p.into_inner());
      }
    }
    self.run_pending()
  }

  pub(crate) fn assert_current(&self, caller: &str) {
    assert!(
      self.is_current(),
      "{caller} must be called on the thread that owns the run loop (owner {:?}, caller {:?})",
      self.owner,
      thread::current().id()
    );
  }
}

impl Default for RunLoop {
  fn default() -> Self { Self::new() }
}

impl Debug for RunLoop {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RunLoop")
      .field("owner", &self.owner)
      .field("pending", &self.queue.lock().len())
      .finish()
  }
}

impl Scheduler for RunLoopScheduler {
  fn schedule(&self, task: Task) -> BoxDisposable {
    let cancel = ActionDisposable::new(|| {});
    let c_cancel = cancel.clone();
    self.queue.lock().push_back(Box::new(move || {
      if !c_cancel.is_disposed() {
        task();
      }
    }));
    self.queue.posted.notify_all();
    BoxDisposable::new(cancel)
  }
}

impl Debug for RunLoopScheduler {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RunLoopScheduler").finish()
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use super::*;

  #[rxsignal_macro::test]
  fn posts_run_only_when_pumped() {
    let run_loop = RunLoop::new();
    let log = Arc::new(Mutex::new(vec![]));
    let c_log = log.clone();
    run_loop.scheduler().schedule(Box::new(move || c_log.lock().unwrap().push(1)));
    assert!(log.lock().unwrap().is_empty());

    assert_eq!(run_loop.run_pending(), 1);
    assert_eq!(*log.lock().unwrap(), vec![1]);
  }

  #[rxsignal_macro::test]
  fn other_threads_post_and_owner_runs() {
    let run_loop = RunLoop::new();
    let scheduler = run_loop.scheduler();
    let owner = thread::current().id();
    let ran_on = Arc::new(Mutex::new(None));
    let c_ran_on = ran_on.clone();

    thread::spawn(move || {
      scheduler.schedule(Box::new(move || {
        *c_ran_on.lock().unwrap() = Some(thread::current().id());
      }));
    })
    .join()
    .unwrap();

    run_loop.run_for(Duration::from_millis(10));
    assert_eq!(*ran_on.lock().unwrap(), Some(owner));
  }

  #[rxsignal_macro::test]
  fn disposed_task_is_skipped() {
    let run_loop = RunLoop::new();
    let log = Arc::new(Mutex::new(vec![]));
    let c_log = log.clone();
    let handle = run_loop.scheduler().schedule(Box::new(move || c_log.lock().unwrap().push(1)));
    handle.dispose();
    run_loop.run_pending();
    assert!(log.lock().unwrap().is_empty());
  }

  #[rxsignal_macro::test]
  fn pumping_off_the_owner_thread_panics() {
    let run_loop = RunLoop::new();
    let result = thread::scope(|s| s.spawn(|| run_loop.run_pending()).join());
    assert!(result.is_err());
  }
}
