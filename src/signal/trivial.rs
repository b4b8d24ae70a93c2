use std::marker::PhantomData;

use crate::{signal::Signal, subscriber::Subscriber};

/// A signal that emits `value` and then completes.
///
/// # Examples
///
/// ```
/// use rxsignal::prelude::*;
///
/// of::<_, ()>(42).subscribe_next(|v| assert_eq!(v, 42));
/// ```
pub fn of<Item, Err>(value: Item) -> Of<Item, Err>
where
  Item: Clone + Send + Sync + 'static,
{
  Of { value, _hint: PhantomData }
}

#[derive(Clone)]
pub struct Of<Item, Err> {
  value: Item,
  _hint: PhantomData<fn() -> Err>,
}

impl<Item, Err> Signal for Of<Item, Err>
where
  Item: Clone + Send + Sync + 'static,
  Err: Send + 'static,
{
  type Item = Item;
  type Err = Err;
  type Unsub = ();

  fn actual_subscribe(&self, subscriber: Subscriber<Item, Err>) {
    subscriber.next(self.value.clone());
    subscriber.complete();
  }
}

/// A signal that emits no values and terminates with `err`.
pub fn throw_err<Item, Err>(err: Err) -> ThrowErr<Item, Err>
where
  Err: Clone + Send + Sync + 'static,
{
  ThrowErr { err, _hint: PhantomData }
}

#[derive(Clone)]
pub struct ThrowErr<Item, Err> {
  err: Err,
  _hint: PhantomData<fn() -> Item>,
}

impl<Item, Err> Signal for ThrowErr<Item, Err>
where
  Item: Send + 'static,
  Err: Clone + Send + Sync + 'static,
{
  type Item = Item;
  type Err = Err;
  type Unsub = ();

  fn actual_subscribe(&self, subscriber: Subscriber<Item, Err>) { subscriber.error(self.err.clone()) }
}

/// A signal that never emits anything.
pub fn never<Item, Err>() -> Never<Item, Err> { Never(PhantomData) }

pub struct Never<Item, Err>(PhantomData<fn() -> (Item, Err)>);

impl<Item, Err> Clone for Never<Item, Err> {
  fn clone(&self) -> Self { Never(PhantomData) }
}

impl<Item, Err> Signal for Never<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
{
  type Item = Item;
  type Err = Err;
  type Unsub = ();

  fn actual_subscribe(&self, _: Subscriber<Item, Err>) {}
}

/// A signal that completes immediately without emitting.
pub fn empty<Item, Err>() -> Empty<Item, Err> { Empty(PhantomData) }

pub struct Empty<Item, Err>(PhantomData<fn() -> (Item, Err)>);

impl<Item, Err> Clone for Empty<Item, Err> {
  fn clone(&self) -> Self { Empty(PhantomData) }
}

impl<Item, Err> Signal for Empty<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
{
  type Item = Item;
  type Err = Err;
  type Unsub = ();

  fn actual_subscribe(&self, subscriber: Subscriber<Item, Err>) { subscriber.complete() }
}
