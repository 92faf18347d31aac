use std::marker::PhantomData;

use crate::cancelable::Cancelable;
use crate::observable::Observable;
use crate::observer::Observer;

/// Iterate a sequence synchronously on the subscriber's thread.
///
/// Each item is pushed through `on_next`; a [`Stop`](crate::ack::Ack::Stop)
/// reply ends the iteration without `on_completed`. Natural exhaustion
/// emits `on_completed`. The iterable is cloned per subscription, so every
/// subscriber replays the sequence from the start.
pub fn from_iter<I, Err>(iter: I) -> FromIter<I, Err>
where
  I: IntoIterator + Clone,
{
  FromIter { iter, _hint: PhantomData }
}

/// Iterate a sequence whose production can fail mid-stream.
///
/// `Ok` items flow as `on_next`; the first `Err` becomes the one terminal
/// `on_error` and nothing is consumed after it, in particular no
/// `on_completed` follows.
pub fn from_iter_result<I, Item, Err>(iter: I) -> FromIterResult<I>
where
  I: IntoIterator<Item = Result<Item, Err>> + Clone,
{
  FromIterResult { iter }
}

pub struct FromIter<I, Err> {
  iter: I,
  _hint: PhantomData<fn() -> Err>,
}

impl<I: Clone, Err> Clone for FromIter<I, Err> {
  fn clone(&self) -> Self { FromIter { iter: self.iter.clone(), _hint: PhantomData } }
}

impl<I, Err> Observable for FromIter<I, Err>
where
  I: IntoIterator + Clone + Send + Sync + 'static,
  I::Item: Send + 'static,
  Err: Send + 'static,
{
  type Item = I::Item;
  type Err = Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<I::Item, Err> + 'static,
  {
    for value in self.iter.clone() {
      if observer.on_next(value).is_stop() {
        return Cancelable::already_canceled();
      }
    }
    observer.on_completed();
    Cancelable::already_canceled()
  }
}

pub struct FromIterResult<I> {
  iter: I,
}

impl<I: Clone> Clone for FromIterResult<I> {
  fn clone(&self) -> Self { FromIterResult { iter: self.iter.clone() } }
}

impl<I, Item, Err> Observable for FromIterResult<I>
where
  I: IntoIterator<Item = Result<Item, Err>> + Clone + Send + Sync + 'static,
  Item: Send + 'static,
  Err: Send + 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<Item, Err> + 'static,
  {
    for value in self.iter.clone() {
      match value {
        Ok(value) => {
          if observer.on_next(value).is_stop() {
            return Cancelable::already_canceled();
          }
        }
        Err(e) => {
          observer.on_error(e);
          return Cancelable::already_canceled();
        }
      }
    }
    observer.on_completed();
    Cancelable::already_canceled()
  }
}
