use std::sync::Arc;

use crate::ack::Ack;
use crate::cancelable::Cancelable;
use crate::function::NextFn;
use crate::observable::Observable;
use crate::observer::Observer;

/// Runs a side effect on each element before forwarding it.
///
/// This struct is created by [`Observable::do_work`] and
/// [`Observable::try_do_work`]. A failing callback is a stream error: the
/// element is not forwarded, the downstream sees `on_error`.
pub struct DoWorkOp<S, N, T> {
  pub(crate) source: S,
  pub(crate) callback: Arc<NextFn<N, T>>,
}

impl<S: Clone, N, T> Clone for DoWorkOp<S, N, T> {
  fn clone(&self) -> Self {
    DoWorkOp { source: self.source.clone(), callback: self.callback.clone() }
  }
}

impl<S, N, T> Observable for DoWorkOp<S, N, T>
where
  S: Observable,
  N: Fn(&S::Item) + Send + Sync + 'static,
  T: Fn(&S::Item) -> Result<(), S::Err> + Send + Sync + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    self
      .source
      .actual_subscribe(DoWorkObserver { observer, callback: self.callback.clone() })
  }
}

pub struct DoWorkObserver<O, N, T> {
  observer: O,
  callback: Arc<NextFn<N, T>>,
}

impl<Item, Err, O, N, T> Observer<Item, Err> for DoWorkObserver<O, N, T>
where
  O: Observer<Item, Err>,
  N: Fn(&Item) + Send + Sync,
  T: Fn(&Item) -> Result<(), Err> + Send + Sync,
{
  fn on_next(&self, value: Item) -> Ack {
    match self.callback.call(&value) {
      Ok(()) => self.observer.on_next(value),
      Err(e) => {
        self.observer.on_error(e);
        Ack::Stop
      }
    }
  }

  fn on_error(&self, err: Err) { self.observer.on_error(err) }

  fn on_completed(&self) { self.observer.on_completed() }
}
