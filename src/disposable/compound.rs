use std::fmt::{Debug, Formatter};

use smallvec::SmallVec;

use super::{BoxDisposable, Disposable};
use crate::rc::{MutArc, RcDeref, RcDerefMut};

/// Identifies a child registered in a [`CompoundDisposable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DisposableKey(usize);

/// A disposable owning a dynamically growing set of children.
///
/// - Disposing the compound disposes every child exactly once, no matter how
///   many threads race on `dispose`.
/// - Adding a child to an already disposed compound disposes the child
///   immediately.
/// - `remove` detaches a child without disposing it, used when a child's
///   work finished on its own.
///
/// Handles are cheap to clone and all clones refer to the same node.
#[derive(Clone, Default)]
pub struct CompoundDisposable(MutArc<Inner>);

// Children finished on their own are swept out once the list reaches this
// many entries; the threshold then doubles with the surviving count.
const PRUNE_FLOOR: usize = 8;

#[derive(Default)]
struct Inner {
  disposed: bool,
  next_key: usize,
  children: SmallVec<[(usize, BoxDisposable); 2]>,
  prune_at: usize,
}

impl CompoundDisposable {
  pub fn new() -> Self { Self::default() }

  /// A compound that is already disposed.
  pub fn disposed() -> Self {
    let compound = Self::default();
    compound.dispose();
    compound
  }

  /// Register `child`; it is disposed along with this compound.
  pub fn add(&self, child: impl Disposable + Send + Sync + 'static) -> DisposableKey {
    self.add_boxed(BoxDisposable::new(child))
  }

  pub fn add_boxed(&self, child: BoxDisposable) -> DisposableKey {
    let mut inner = self.0.rc_deref_mut();
    let key = inner.next_key;
    inner.next_key += 1;
    if inner.disposed {
      drop(inner);
      child.dispose();
    } else {
      if inner.children.len() >= inner.prune_at {
        inner.children.retain(|(_, c)| !c.is_disposed());
        inner.prune_at = (inner.children.len() * 2).max(PRUNE_FLOOR);
      }
      inner.children.push((key, child));
    }
    DisposableKey(key)
  }

  /// Detach a child without disposing it.
  pub fn remove(&self, key: DisposableKey) -> Option<BoxDisposable> {
    let mut inner = self.0.rc_deref_mut();
    let pos = inner.children.iter().position(|(k, _)| *k == key.0)?;
    Some(inner.children.remove(pos).1)
  }

  /// Number of live children, mostly useful in tests.
  pub fn len(&self) -> usize { self.0.rc_deref().children.len() }

  pub fn is_empty(&self) -> bool { self.len() == 0 }

  pub fn ptr_eq(&self, other: &Self) -> bool { self.0.ptr_eq(&other.0) }
}

impl Disposable for CompoundDisposable {
  fn dispose(&self) {
    let children = {
      let mut inner = self.0.rc_deref_mut();
      if inner.disposed {
        return;
      }
      inner.disposed = true;
      std::mem::take(&mut inner.children)
    };
    for (_, child) in children {
      child.dispose();
    }
  }

  #[inline]
  fn is_disposed(&self) -> bool { self.0.rc_deref().disposed }
}

impl Debug for CompoundDisposable {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let inner = self.0.rc_deref();
    f.debug_struct("CompoundDisposable")
      .field("disposed", &inner.disposed)
      .field("children", &inner.children.len())
      .finish()
  }
}
