use std::marker::PhantomData;
use std::sync::Arc;

use crate::cancelable::Cancelable;
use crate::function::NextFn;
use crate::observable::Observable;
use crate::observer::{DynObserver, Observer};

/// Wrap an arbitrary subscription function into an observable.
///
/// The function receives a shared observer handle and returns the
/// cancelable guarding whatever it started. Producers that emit
/// synchronously can return [`Cancelable::already_canceled`].
pub fn create<Item, Err, F>(
  subscribe: F,
) -> CreateOp<F, fn(DynObserver<Item, Err>) -> Result<Cancelable, Err>, Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
  F: Fn(DynObserver<Item, Err>) -> Cancelable + Send + Sync + 'static,
{
  CreateOp { subscribe_fn: Arc::new(NextFn::Plain(subscribe)), _hint: PhantomData }
}

/// Like [`create`], for subscription functions that can fail before they
/// touch the observer. A failure becomes `on_error` on the observer, and
/// the subscriber gets the already-canceled sentinel.
pub fn try_create<Item, Err, F>(
  subscribe: F,
) -> CreateOp<fn(DynObserver<Item, Err>) -> Cancelable, F, Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
  F: Fn(DynObserver<Item, Err>) -> Result<Cancelable, Err> + Send + Sync + 'static,
{
  CreateOp { subscribe_fn: Arc::new(NextFn::Fallible(subscribe)), _hint: PhantomData }
}

pub struct CreateOp<N, T, Item, Err> {
  subscribe_fn: Arc<NextFn<N, T>>,
  _hint: PhantomData<fn() -> (Item, Err)>,
}

impl<N, T, Item, Err> Clone for CreateOp<N, T, Item, Err> {
  fn clone(&self) -> Self {
    CreateOp { subscribe_fn: self.subscribe_fn.clone(), _hint: PhantomData }
  }
}

impl<N, T, Item, Err> Observable for CreateOp<N, T, Item, Err>
where
  Item: Send + 'static,
  Err: Send + 'static,
  N: Fn(DynObserver<Item, Err>) -> Cancelable + Send + Sync + 'static,
  T: Fn(DynObserver<Item, Err>) -> Result<Cancelable, Err> + Send + Sync + 'static,
{
  type Item = Item;
  type Err = Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<Item, Err> + 'static,
  {
    let shared: DynObserver<Item, Err> = Arc::new(observer);
    match self.subscribe_fn.call(shared.clone()) {
      Ok(cancelable) => cancelable,
      Err(e) => {
        shared.on_error(e);
        Cancelable::already_canceled()
      }
    }
  }
}
