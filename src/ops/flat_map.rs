use std::sync::Arc;

use crate::ack::Ack;
use crate::cancelable::{
  Cancelable, CompositeCancelable, RefCountCancelable, SingleAssignmentCancelable,
};
use crate::function::NextFn;
use crate::observable::Observable;
use crate::observer::{DynObserver, Observer};

/// Maps each element to an inner observable and merges the inner streams
/// into one output.
///
/// This struct is created by [`Observable::flat_map`] and
/// [`Observable::try_flat_map`]. Liveness is tracked by a
/// [`RefCountCancelable`] whose terminal action is the downstream
/// `on_completed`: the outer completion marks the main work done, each live
/// inner subscription holds a handle, so the output completes exactly when
/// the outer and every inner stream have completed. A
/// [`CompositeCancelable`] owns the outer subscription and one
/// single-assignment slot per live inner subscription; any error cancels
/// the whole composite.
///
/// Inner streams are *not* serialized against each other: a downstream
/// that is not safe to call concurrently should be wrapped via
/// [`Observable::safe`].
pub struct FlatMapOp<S, N, T> {
  pub(crate) source: S,
  pub(crate) func: Arc<NextFn<N, T>>,
}

impl<S: Clone, N, T> Clone for FlatMapOp<S, N, T> {
  fn clone(&self) -> Self { FlatMapOp { source: self.source.clone(), func: self.func.clone() } }
}

impl<S, R, N, T> Observable for FlatMapOp<S, N, T>
where
  S: Observable,
  R: Observable<Err = S::Err>,
  N: Fn(S::Item) -> R + Send + Sync + 'static,
  T: Fn(S::Item) -> Result<R, S::Err> + Send + Sync + 'static,
{
  type Item = R::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<R::Item, S::Err> + 'static,
  {
    let down: DynObserver<R::Item, S::Err> = Arc::new(observer);
    let composite = CompositeCancelable::new();
    let terminal_target = down.clone();
    let ref_count = RefCountCancelable::new(move || terminal_target.on_completed());
    let outer = OuterObserver {
      down,
      func: self.func.clone(),
      composite: composite.clone(),
      ref_count,
    };
    composite.add(self.source.actual_subscribe(outer));
    Cancelable::from(composite)
  }
}

struct OuterObserver<R: Observable, N, T> {
  down: DynObserver<R::Item, R::Err>,
  func: Arc<NextFn<N, T>>,
  composite: CompositeCancelable,
  ref_count: RefCountCancelable,
}

impl<Item, R, N, T> Observer<Item, R::Err> for OuterObserver<R, N, T>
where
  R: Observable,
  N: Fn(Item) -> R + Send + Sync,
  T: Fn(Item) -> Result<R, R::Err> + Send + Sync,
{
  fn on_next(&self, value: Item) -> Ack {
    if self.composite.is_canceled() {
      return Ack::Stop;
    }
    let inner_source = match self.func.call(value) {
      Ok(source) => source,
      Err(e) => {
        self.down.on_error(e);
        self.composite.cancel();
        return Ack::Stop;
      }
    };

    // Hold the liveness token before the inner subscription can complete.
    let token = self.ref_count.acquire();
    let slot = SingleAssignmentCancelable::new();
    self.composite.add(Cancelable::from(slot.clone()));
    let inner = InnerObserver {
      down: self.down.clone(),
      composite: self.composite.clone(),
      slot: slot.clone(),
      token,
    };
    slot.set(inner_source.actual_subscribe(inner));

    // An inner error tears the composite down synchronously; report that
    // back to the outer producer instead of asking for more.
    if self.composite.is_canceled() { Ack::Stop } else { Ack::Continue }
  }

  fn on_error(&self, err: R::Err) {
    self.down.on_error(err);
    self.composite.cancel();
  }

  fn on_completed(&self) {
    // Outer is done; the ref-count fires the downstream completion once
    // the last inner stream lets go of its token.
    self.ref_count.cancel();
  }
}

struct InnerObserver<Item, Err> {
  down: DynObserver<Item, Err>,
  composite: CompositeCancelable,
  slot: SingleAssignmentCancelable,
  token: Cancelable,
}

impl<Item, Err> Observer<Item, Err> for InnerObserver<Item, Err> {
  fn on_next(&self, value: Item) -> Ack { self.down.on_next(value) }

  fn on_error(&self, err: Err) {
    self.down.on_error(err);
    self.composite.cancel();
  }

  fn on_completed(&self) {
    let slot = Cancelable::from(self.slot.clone());
    self.composite.remove(&slot);
    slot.cancel();
    self.token.cancel();
  }
}
