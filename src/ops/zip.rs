//! Zip operators
//!
//! `zip_with` pairs two signals, `zip` combines any number of signals of the
//! same type. Both buffer every input in a FIFO queue and emit once each
//! queue holds a value. All buffers of one subscription live under a single
//! lock; emissions are enqueued on the downstream subscriber inside that lock,
//! which fixes their order, and delivered after it was released.

use std::{collections::VecDeque, sync::Arc};

use crate::{
  disposable::{CompoundDisposable, Disposable},
  observer::{Notification, Observer},
  rc::{MutArc, RcDerefMut},
  signal::Signal,
  subscriber::Subscriber,
};

// ==================== Shared State ====================

/// What a flush decided while the lock was held.
#[derive(Default)]
struct Flush {
  deliver: bool,
  completed: bool,
}

// Lock-free part of a zip subscription: the downstream and every input
// subscription.
struct ZipShared<Item, Err, State> {
  downstream: Subscriber<Item, Err>,
  disposables: CompoundDisposable,
  state: MutArc<State>,
}

impl<Item, Err, State> ZipShared<Item, Err, State> {
  fn new(downstream: Subscriber<Item, Err>, state: State) -> Arc<Self> {
    Arc::new(ZipShared {
      downstream,
      disposables: CompoundDisposable::new(),
      state: MutArc::own(state),
    })
  }

  // Mutate the buffers under the lock, then deliver outside of it.
  fn update(&self, f: impl FnOnce(&mut State, &Subscriber<Item, Err>) -> Flush) {
    let flush = {
      let mut state = self.state.rc_deref_mut();
      f(&mut state, &self.downstream)
    };
    if flush.deliver {
      self.downstream.drain();
    }
    if flush.completed {
      self.disposables.dispose();
    }
  }

  fn fail(&self, err: Err) {
    self.disposables.dispose();
    self.downstream.error(err);
  }

  fn is_closed(&self) -> bool { self.disposables.is_disposed() || self.downstream.is_closed() }
}

// ==================== Binary zip ====================

/// Pairs the n-th value of `a` with the n-th value of `b`.
pub struct ZipWith<A, B> {
  pub(crate) a: A,
  pub(crate) b: B,
}

/// Buffers of one `zip_with` subscription.
struct ZipState<ItemA, ItemB> {
  buffer_a: VecDeque<ItemA>,
  buffer_b: VecDeque<ItemB>,
  completed_a: bool,
  completed_b: bool,
  done: bool,
}

impl<ItemA, ItemB> ZipState<ItemA, ItemB> {
  fn flush<Err>(&mut self, downstream: &Subscriber<(ItemA, ItemB), Err>) -> Flush {
    let mut flush = Flush::default();
    if self.done {
      return flush;
    }
    while !self.buffer_a.is_empty() && !self.buffer_b.is_empty() {
      if let (Some(a), Some(b)) = (self.buffer_a.pop_front(), self.buffer_b.pop_front()) {
        flush.deliver |= downstream.enqueue(Notification::Next((a, b)));
      }
    }
    if (self.completed_a && self.buffer_a.is_empty()) || (self.completed_b && self.buffer_b.is_empty())
    {
      self.done = true;
      self.buffer_a.clear();
      self.buffer_b.clear();
      flush.deliver |= downstream.enqueue(Notification::Completed);
      flush.completed = true;
    }
    flush
  }
}

type ZipWithShared<ItemA, ItemB, Err> = ZipShared<(ItemA, ItemB), Err, ZipState<ItemA, ItemB>>;

impl<A, B> Signal for ZipWith<A, B>
where
  A: Signal,
  B: Signal<Err = A::Err>,
{
  type Item = (A::Item, B::Item);
  type Err = A::Err;
  type Unsub = CompoundDisposable;

  fn actual_subscribe(&self, subscriber: Subscriber<Self::Item, A::Err>) -> CompoundDisposable {
    let shared = ZipShared::new(
      subscriber,
      ZipState {
        buffer_a: VecDeque::new(),
        buffer_b: VecDeque::new(),
        completed_a: false,
        completed_b: false,
        done: false,
      },
    );
    let disposables = shared.disposables.clone();
    disposables.add(self.a.subscribe(ZipAObserver(shared.clone())));
    if !disposables.is_disposed() {
      disposables.add(self.b.subscribe(ZipBObserver(shared)));
    }
    disposables
  }
}

pub struct ZipAObserver<ItemA, ItemB, Err>(Arc<ZipWithShared<ItemA, ItemB, Err>>);

pub struct ZipBObserver<ItemA, ItemB, Err>(Arc<ZipWithShared<ItemA, ItemB, Err>>);

impl<ItemA, ItemB, Err> Observer<ItemA, Err> for ZipAObserver<ItemA, ItemB, Err> {
  fn next(&mut self, value: ItemA) {
    self.0.update(|state, downstream| {
      state.buffer_a.push_back(value);
      state.flush(downstream)
    })
  }

  fn error(self, err: Err) { self.0.fail(err) }

  fn complete(self) {
    self.0.update(|state, downstream| {
      state.completed_a = true;
      state.flush(downstream)
    })
  }

  fn is_closed(&self) -> bool { self.0.is_closed() }
}

impl<ItemA, ItemB, Err> Observer<ItemB, Err> for ZipBObserver<ItemA, ItemB, Err> {
  fn next(&mut self, value: ItemB) {
    self.0.update(|state, downstream| {
      state.buffer_b.push_back(value);
      state.flush(downstream)
    })
  }

  fn error(self, err: Err) { self.0.fail(err) }

  fn complete(self) {
    self.0.update(|state, downstream| {
      state.completed_b = true;
      state.flush(downstream)
    })
  }

  fn is_closed(&self) -> bool { self.0.is_closed() }
}

// ==================== N-ary zip ====================

/// Combines the n-th values of every signal into one `Vec`, in input order.
///
/// Completes as soon as any input has completed with nothing buffered; an
/// empty list completes immediately. Values of faster inputs are buffered
/// without bound.
///
/// # Examples
///
/// ```
/// use rxsignal::prelude::*;
///
/// zip(vec![from_iter::<_, ()>(vec![1, 2]), from_iter(vec![10, 20, 30])])
///   .subscribe_next(|v| println!("{v:?}"));
/// // [1, 10]
/// // [2, 20]
/// ```
pub fn zip<S: Signal>(signals: Vec<S>) -> Zip<S> { Zip { sources: signals } }

pub struct Zip<S> {
  sources: Vec<S>,
}

/// Buffers of one n-ary `zip` subscription.
struct ZipAllState<Item> {
  buffers: Vec<VecDeque<Item>>,
  completed: Vec<bool>,
  done: bool,
}

impl<Item> ZipAllState<Item> {
  fn flush<Err>(&mut self, downstream: &Subscriber<Vec<Item>, Err>) -> Flush {
    let mut flush = Flush::default();
    if self.done {
      return flush;
    }
    while self.buffers.iter().all(|b| !b.is_empty()) {
      let row: Vec<Item> = self.buffers.iter_mut().filter_map(VecDeque::pop_front).collect();
      flush.deliver |= downstream.enqueue(Notification::Next(row));
    }
    let exhausted = self
      .completed
      .iter()
      .zip(&self.buffers)
      .any(|(completed, buffer)| *completed && buffer.is_empty());
    if exhausted {
      self.done = true;
      self.buffers.iter_mut().for_each(VecDeque::clear);
      flush.deliver |= downstream.enqueue(Notification::Completed);
      flush.completed = true;
    }
    flush
  }
}

impl<S: Signal> Signal for Zip<S> {
  type Item = Vec<S::Item>;
  type Err = S::Err;
  type Unsub = CompoundDisposable;

  fn actual_subscribe(&self, subscriber: Subscriber<Vec<S::Item>, S::Err>) -> CompoundDisposable {
    if self.sources.is_empty() {
      subscriber.complete();
      return CompoundDisposable::disposed();
    }
    let n = self.sources.len();
    let shared = ZipShared::new(
      subscriber,
      ZipAllState {
        buffers: (0..n).map(|_| VecDeque::new()).collect(),
        completed: vec![false; n],
        done: false,
      },
    );
    let disposables = shared.disposables.clone();
    for (index, source) in self.sources.iter().enumerate() {
      if disposables.is_disposed() {
        break;
      }
      disposables.add(source.subscribe(ZipAllObserver { shared: shared.clone(), index }));
    }
    disposables
  }
}

pub struct ZipAllObserver<Item, Err> {
  shared: Arc<ZipShared<Vec<Item>, Err, ZipAllState<Item>>>,
  index: usize,
}

impl<Item, Err> Observer<Item, Err> for ZipAllObserver<Item, Err> {
  fn next(&mut self, value: Item) {
    let index = self.index;
    self.shared.update(|state, downstream| {
      state.buffers[index].push_back(value);
      state.flush(downstream)
    })
  }

  fn error(self, err: Err) { self.shared.fail(err) }

  fn complete(self) {
    let index = self.index;
    self.shared.update(|state, downstream| {
      state.completed[index] = true;
      state.flush(downstream)
    })
  }

  fn is_closed(&self) -> bool { self.shared.is_closed() }
}

#[cfg(test)]
mod tests {
  use std::{
    sync::{Arc, Mutex},
    thread,
  };

  use crate::prelude::*;

  type Log = Arc<Mutex<Vec<String>>>;

  fn record<S>(signal: &S) -> (Log, CompoundDisposable)
  where
    S: Signal,
    S::Item: std::fmt::Debug,
    S::Err: std::fmt::Debug,
  {
    let log = Log::default();
    let (n, e, c) = (log.clone(), log.clone(), log.clone());
    let subscription = signal.subscribe_all(
      move |v| n.lock().unwrap().push(format!("{v:?}")),
      move |err| e.lock().unwrap().push(format!("error {err:?}")),
      move || c.lock().unwrap().push("completed".to_owned()),
    );
    (log, subscription)
  }

  #[rxsignal_macro::test]
  fn pairs_until_shorter_side_is_exhausted() {
    let signal = from_iter::<_, ()>(vec![1, 2, 3]).zip_with(from_iter(vec![10, 20]));
    let (log, subscription) = record(&signal);
    assert_eq!(*log.lock().unwrap(), vec!["(1, 10)", "(2, 20)", "completed"]);
    assert!(subscription.is_disposed());
  }

  #[rxsignal_macro::test]
  fn completes_when_a_finished_side_has_nothing_buffered() {
    let slots: Arc<Mutex<Vec<Subscriber<i32, ()>>>> = Arc::default();
    let c_slots = slots.clone();
    let manual = move || {
      let c_slots = c_slots.clone();
      create(move |subscriber: Subscriber<i32, ()>| c_slots.lock().unwrap().push(subscriber))
    };

    let (log, _) = record(&manual().zip_with(manual()));
    let (a, b) = {
      let slots = slots.lock().unwrap();
      (slots[0].clone(), slots[1].clone())
    };

    a.next(1);
    a.next(2);
    a.complete();
    assert!(log.lock().unwrap().is_empty());

    b.next(10);
    assert_eq!(*log.lock().unwrap(), vec!["(1, 10)"]);
    b.next(20);
    assert_eq!(*log.lock().unwrap(), vec!["(1, 10)", "(2, 20)", "completed"]);
    assert!(b.is_closed());
  }

  #[rxsignal_macro::test]
  fn error_disposes_both_inputs() {
    let other = never::<i32, String>();
    let signal = throw_err::<i32, _>("bad".to_owned()).zip_with(other);
    let (log, subscription) = record(&signal);
    assert_eq!(*log.lock().unwrap(), vec!["error \"bad\""]);
    assert!(subscription.is_disposed());
  }

  #[rxsignal_macro::test]
  fn n_ary_rows_follow_input_order() {
    let signal = zip(vec![
      from_iter::<_, ()>(vec![1, 2]).box_it(),
      from_iter(vec![10, 20, 30]).box_it(),
      from_iter(vec![100, 200]).box_it(),
    ]);
    let (log, _) = record(&signal);
    assert_eq!(*log.lock().unwrap(), vec!["[1, 10, 100]", "[2, 20, 200]", "completed"]);
  }

  #[rxsignal_macro::test]
  fn n_ary_completes_on_first_exhausted_input() {
    let signal = zip(vec![
      from_iter::<_, ()>(vec![1]).box_it(),
      never().box_it(),
      from_iter(vec![2, 3]).box_it(),
    ]);
    let (log, _) = record(&signal);
    assert!(log.lock().unwrap().is_empty());

    let signal = zip(vec![empty::<i32, ()>().box_it(), never().box_it()]);
    let (log, subscription) = record(&signal);
    assert_eq!(*log.lock().unwrap(), vec!["completed"]);
    assert!(subscription.is_disposed());
  }

  #[rxsignal_macro::test]
  fn empty_list_completes_immediately() {
    let (log, _) = record(&zip(Vec::<Empty<i32, ()>>::new()));
    assert_eq!(*log.lock().unwrap(), vec!["completed"]);
  }

  #[rxsignal_macro::test]
  fn inputs_on_different_threads() {
    const N: usize = 1000;
    let slots: Arc<Mutex<Vec<Subscriber<usize, ()>>>> = Arc::default();
    let c_slots = slots.clone();
    let manual = move || {
      let c_slots = c_slots.clone();
      create(move |subscriber: Subscriber<usize, ()>| c_slots.lock().unwrap().push(subscriber))
    };

    let rows = Arc::new(Mutex::new(vec![]));
    let completed = Arc::new(Mutex::new(0));
    let (c_rows, c_completed) = (rows.clone(), completed.clone());
    zip(vec![manual(), manual()]).subscribe_next_completed(
      move |row| c_rows.lock().unwrap().push(row),
      move || *c_completed.lock().unwrap() += 1,
    );

    let inputs = std::mem::take(&mut *slots.lock().unwrap());
    let handles: Vec<_> = inputs
      .into_iter()
      .map(|input| {
        thread::spawn(move || {
          for i in 0..N {
            input.next(i);
          }
          input.complete();
        })
      })
      .collect();
    for h in handles {
      h.join().unwrap();
    }

    let rows = rows.lock().unwrap();
    assert_eq!(rows.len(), N);
    assert!(rows.iter().enumerate().all(|(i, row)| *row == vec![i, i]));
    assert_eq!(*completed.lock().unwrap(), 1);
  }
}
