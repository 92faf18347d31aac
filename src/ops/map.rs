use std::sync::Arc;

use crate::ack::Ack;
use crate::cancelable::Cancelable;
use crate::function::NextFn;
use crate::observable::Observable;
use crate::observer::Observer;

/// Applies a function to each element before forwarding it.
///
/// This struct is created by [`Observable::map`] and
/// [`Observable::try_map`]. A failing callback is a stream error: the
/// downstream sees `on_error` and the producer gets `Stop`.
pub struct MapOp<S, N, T> {
  pub(crate) source: S,
  pub(crate) func: Arc<NextFn<N, T>>,
}

impl<S: Clone, N, T> Clone for MapOp<S, N, T> {
  fn clone(&self) -> Self { MapOp { source: self.source.clone(), func: self.func.clone() } }
}

impl<S, B, N, T> Observable for MapOp<S, N, T>
where
  S: Observable,
  B: Send + 'static,
  N: Fn(S::Item) -> B + Send + Sync + 'static,
  T: Fn(S::Item) -> Result<B, S::Err> + Send + Sync + 'static,
{
  type Item = B;
  type Err = S::Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<B, S::Err> + 'static,
  {
    self
      .source
      .actual_subscribe(MapObserver { observer, func: self.func.clone() })
  }
}

pub struct MapObserver<O, N, T> {
  observer: O,
  func: Arc<NextFn<N, T>>,
}

impl<Item, B, Err, O, N, T> Observer<Item, Err> for MapObserver<O, N, T>
where
  O: Observer<B, Err>,
  N: Fn(Item) -> B + Send + Sync,
  T: Fn(Item) -> Result<B, Err> + Send + Sync,
{
  fn on_next(&self, value: Item) -> Ack {
    match self.func.call(value) {
      Ok(mapped) => self.observer.on_next(mapped),
      Err(e) => {
        self.observer.on_error(e);
        Ack::Stop
      }
    }
  }

  fn on_error(&self, err: Err) { self.observer.on_error(err) }

  fn on_completed(&self) { self.observer.on_completed() }
}
