use std::marker::PhantomData;

use crate::cancelable::Cancelable;
use crate::observable::Observable;
use crate::observer::Observer;

/// An observable that completes immediately without emitting.
pub fn empty<Item, Err>() -> Empty<Item, Err> { Empty { _hint: PhantomData } }

/// An observable that emits one value and completes.
pub fn of<Item, Err>(value: Item) -> Of<Item, Err> { Of { value, _hint: PhantomData } }

/// An observable that terminates immediately with the given error.
pub fn throw<Item, Err>(err: Err) -> Throw<Item, Err> { Throw { err, _hint: PhantomData } }

/// An observable that never emits anything and never terminates.
pub fn never<Item, Err>() -> Never<Item, Err> { Never { _hint: PhantomData } }

pub struct Empty<Item, Err> {
  _hint: PhantomData<fn() -> (Item, Err)>,
}

impl<Item, Err> Clone for Empty<Item, Err> {
  fn clone(&self) -> Self { Empty { _hint: PhantomData } }
}

impl<Item, Err> Observable for Empty<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<Item, Err> + 'static,
  {
    observer.on_completed();
    Cancelable::already_canceled()
  }
}

pub struct Of<Item, Err> {
  value: Item,
  _hint: PhantomData<fn() -> Err>,
}

impl<Item: Clone, Err> Clone for Of<Item, Err> {
  fn clone(&self) -> Self { Of { value: self.value.clone(), _hint: PhantomData } }
}

impl<Item, Err> Observable for Of<Item, Err>
where
  Item: Clone + Send + Sync + 'static,
  Err: Send + 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<Item, Err> + 'static,
  {
    if !observer.on_next(self.value.clone()).is_stop() {
      observer.on_completed();
    }
    Cancelable::already_canceled()
  }
}

pub struct Throw<Item, Err> {
  err: Err,
  _hint: PhantomData<fn() -> Item>,
}

impl<Item, Err: Clone> Clone for Throw<Item, Err> {
  fn clone(&self) -> Self { Throw { err: self.err.clone(), _hint: PhantomData } }
}

impl<Item, Err> Observable for Throw<Item, Err>
where
  Item: Send + 'static,
  Err: Clone + Send + Sync + 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<Item, Err> + 'static,
  {
    observer.on_error(self.err.clone());
    Cancelable::already_canceled()
  }
}

pub struct Never<Item, Err> {
  _hint: PhantomData<fn() -> (Item, Err)>,
}

impl<Item, Err> Clone for Never<Item, Err> {
  fn clone(&self) -> Self { Never { _hint: PhantomData } }
}

impl<Item, Err> Observable for Never<Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<Item, Err> + 'static,
  {
    Cancelable::new()
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  fn record<Item>() -> (Arc<Mutex<Vec<String>>>, impl Fn(Item) + Send + Sync + 'static)
  where
    Item: std::fmt::Debug + Send + 'static,
  {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    (log, move |v: Item| sink.lock().unwrap().push(format!("next {:?}", v)))
  }

  #[test]
  fn empty_only_completes() {
    let (log, next) = record::<i32>();
    let sink = log.clone();
    let handle =
      empty::<i32, ()>().subscribe_all(next, |_| {}, move || sink.lock().unwrap().push("done".into()));

    assert!(handle.is_canceled());
    assert_eq!(*log.lock().unwrap(), vec!["done"]);
  }

  #[test]
  fn of_emits_then_completes() {
    let (log, next) = record::<i32>();
    let sink = log.clone();
    of::<_, ()>(10).subscribe_all(next, |_| {}, move || sink.lock().unwrap().push("done".into()));

    assert_eq!(*log.lock().unwrap(), vec!["next 10", "done"]);
  }

  #[test]
  fn throw_only_errors() {
    let (log, next) = record::<i32>();
    let err_sink = log.clone();
    let done_sink = log.clone();
    throw::<i32, _>("boom").subscribe_all(
      next,
      move |e| err_sink.lock().unwrap().push(format!("error {}", e)),
      move || done_sink.lock().unwrap().push("done".into()),
    );

    assert_eq!(*log.lock().unwrap(), vec!["error boom"]);
  }

  #[test]
  fn never_emits_nothing_and_hands_out_a_live_handle() {
    let (log, next) = record::<i32>();
    let handle = never::<i32, ()>().subscribe(next);

    assert!(log.lock().unwrap().is_empty());
    assert!(!handle.is_canceled());
    handle.cancel();
    handle.cancel();
    assert!(handle.is_canceled());
  }
}
