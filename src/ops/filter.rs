use std::sync::Arc;

use crate::ack::Ack;
use crate::cancelable::Cancelable;
use crate::function::NextFn;
use crate::observable::Observable;
use crate::observer::Observer;

/// Forwards only the elements matching a predicate.
///
/// This struct is created by [`Observable::filter`] and
/// [`Observable::try_filter`]. A rejected element answers `Continue` so the
/// producer keeps going; a forwarded element answers whatever the
/// downstream answered.
pub struct FilterOp<S, N, T> {
  pub(crate) source: S,
  pub(crate) predicate: Arc<NextFn<N, T>>,
}

impl<S: Clone, N, T> Clone for FilterOp<S, N, T> {
  fn clone(&self) -> Self {
    FilterOp { source: self.source.clone(), predicate: self.predicate.clone() }
  }
}

impl<S, N, T> Observable for FilterOp<S, N, T>
where
  S: Observable,
  N: Fn(&S::Item) -> bool + Send + Sync + 'static,
  T: Fn(&S::Item) -> Result<bool, S::Err> + Send + Sync + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    self
      .source
      .actual_subscribe(FilterObserver { observer, predicate: self.predicate.clone() })
  }
}

pub struct FilterObserver<O, N, T> {
  observer: O,
  predicate: Arc<NextFn<N, T>>,
}

impl<Item, Err, O, N, T> Observer<Item, Err> for FilterObserver<O, N, T>
where
  O: Observer<Item, Err>,
  N: Fn(&Item) -> bool + Send + Sync,
  T: Fn(&Item) -> Result<bool, Err> + Send + Sync,
{
  fn on_next(&self, value: Item) -> Ack {
    match self.predicate.call(&value) {
      Ok(true) => self.observer.on_next(value),
      Ok(false) => Ack::Continue,
      Err(e) => {
        self.observer.on_error(e);
        Ack::Stop
      }
    }
  }

  fn on_error(&self, err: Err) { self.observer.on_error(err) }

  fn on_completed(&self) { self.observer.on_completed() }
}
