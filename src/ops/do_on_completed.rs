use std::sync::Arc;

use crate::ack::Ack;
use crate::cancelable::Cancelable;
use crate::observable::Observable;
use crate::observer::Observer;

/// Runs a callback after forwarding `on_completed`.
///
/// This struct is created by [`Observable::do_on_completed`]. The callback
/// is deliberately unprotected: if it panics the panic escapes, and no
/// further observer method is called either way.
pub struct DoOnCompletedOp<S, C> {
  pub(crate) source: S,
  pub(crate) callback: Arc<C>,
}

impl<S: Clone, C> Clone for DoOnCompletedOp<S, C> {
  fn clone(&self) -> Self {
    DoOnCompletedOp { source: self.source.clone(), callback: self.callback.clone() }
  }
}

impl<S, C> Observable for DoOnCompletedOp<S, C>
where
  S: Observable,
  C: Fn() + Send + Sync + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    self
      .source
      .actual_subscribe(DoOnCompletedObserver { observer, callback: self.callback.clone() })
  }
}

pub struct DoOnCompletedObserver<O, C> {
  observer: O,
  callback: Arc<C>,
}

impl<Item, Err, O, C> Observer<Item, Err> for DoOnCompletedObserver<O, C>
where
  O: Observer<Item, Err>,
  C: Fn() + Send + Sync,
{
  fn on_next(&self, value: Item) -> Ack { self.observer.on_next(value) }

  fn on_error(&self, err: Err) { self.observer.on_error(err) }

  fn on_completed(&self) {
    self.observer.on_completed();
    (self.callback)();
  }
}
