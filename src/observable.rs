//! The observable abstraction and the operator surface.

use std::convert::identity;
use std::fmt::Debug;
use std::sync::Arc;

use crate::cancelable::Cancelable;
use crate::function::NextFn;
use crate::observer::{AnonymousObserver, Observer};
use crate::ops::as_future::{self, AsFuture};
use crate::ops::concat::ConcatOp;
use crate::ops::do_on_completed::DoOnCompletedOp;
use crate::ops::do_work::DoWorkOp;
use crate::ops::drop::DropOp;
use crate::ops::drop_while::DropWhileOp;
use crate::ops::filter::FilterOp;
use crate::ops::flat_map::FlatMapOp;
use crate::ops::fold::FoldOp;
use crate::ops::map::MapOp;
use crate::ops::safe::SafeOp;
use crate::ops::take::TakeOp;
use crate::ops::take_while::TakeWhileOp;
use crate::ops::zip::ZipOp;
use crate::reporter::{FailureReporter, LogReporter};

mod create;
mod either;
mod from_iter;
mod trivial;

pub use create::{create, try_create, CreateOp};
pub use either::EitherObservable;
pub use from_iter::{from_iter, from_iter_result, FromIter, FromIterResult};
pub use trivial::{empty, never, of, throw, Empty, Never, Of, Throw};

/// A cold producer of a finite or infinite sequence of values, plus at most
/// one terminal event.
///
/// An observable is a passive description; [`actual_subscribe`] activates
/// it. Cold means per-subscription state: subscribing twice runs the
/// producer twice, independently. Cancellation flows upstream through the
/// returned [`Cancelable`], data flows downstream through the observer, and
/// every `on_next` reply steers the producer.
///
/// Operators are plain values that capture their upstream plus parameters,
/// composing through this one trait; there is no inheritance anywhere.
///
/// [`actual_subscribe`]: Observable::actual_subscribe
pub trait Observable: Send + Sync + Sized + 'static {
  type Item: Send + 'static;
  type Err: Send + 'static;

  /// Activate the producer for the given observer.
  ///
  /// Emission may happen synchronously, before this returns; producers
  /// that finished by then return the already-canceled sentinel.
  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<Self::Item, Self::Err> + 'static;

  // ==================== subscribing with closures ====================

  /// Subscribe with a next-handler only. Errors go to the default
  /// [`LogReporter`].
  fn subscribe<N>(&self, next: N) -> Cancelable
  where
    N: Fn(Self::Item) + Send + Sync + 'static,
    Self::Err: Debug,
  {
    self.subscribe_with_reporter(next, LogReporter)
  }

  /// Subscribe with a next-handler, routing errors to the given reporter.
  fn subscribe_with_reporter<N, R>(&self, next: N, reporter: R) -> Cancelable
  where
    N: Fn(Self::Item) + Send + Sync + 'static,
    R: FailureReporter<Self::Err> + 'static,
  {
    self.actual_subscribe(AnonymousObserver::new(
      next,
      move |err: Self::Err| reporter.report_failure(err),
      || {},
    ))
  }

  /// Subscribe with next- and error-handlers.
  fn subscribe_err<N, E>(&self, next: N, error: E) -> Cancelable
  where
    N: Fn(Self::Item) + Send + Sync + 'static,
    E: Fn(Self::Err) + Send + Sync + 'static,
  {
    self.actual_subscribe(AnonymousObserver::new(next, error, || {}))
  }

  /// Subscribe with next-, error- and completion-handlers.
  fn subscribe_all<N, E, C>(&self, next: N, error: E, complete: C) -> Cancelable
  where
    N: Fn(Self::Item) + Send + Sync + 'static,
    E: Fn(Self::Err) + Send + Sync + 'static,
    C: Fn() + Send + Sync + 'static,
  {
    self.actual_subscribe(AnonymousObserver::new(next, error, complete))
  }

  // ==================== operators ====================

  /// Transform each element with `f`.
  fn map<B, F>(self, f: F) -> MapOp<Self, F, fn(Self::Item) -> Result<B, Self::Err>>
  where
    B: Send + 'static,
    F: Fn(Self::Item) -> B + Send + Sync + 'static,
  {
    MapOp { source: self, func: Arc::new(NextFn::Plain(f)) }
  }

  /// Transform each element with a fallible `f`; a failure ends the stream
  /// as `on_error`.
  fn try_map<B, F>(self, f: F) -> MapOp<Self, fn(Self::Item) -> B, F>
  where
    B: Send + 'static,
    F: Fn(Self::Item) -> Result<B, Self::Err> + Send + Sync + 'static,
  {
    MapOp { source: self, func: Arc::new(NextFn::Fallible(f)) }
  }

  /// Keep only the elements matching `predicate`.
  fn filter<F>(self, predicate: F) -> FilterOp<Self, F, fn(&Self::Item) -> Result<bool, Self::Err>>
  where
    F: Fn(&Self::Item) -> bool + Send + Sync + 'static,
  {
    FilterOp { source: self, predicate: Arc::new(NextFn::Plain(predicate)) }
  }

  /// Keep only the elements matching a fallible `predicate`.
  fn try_filter<F>(self, predicate: F) -> FilterOp<Self, fn(&Self::Item) -> bool, F>
  where
    F: Fn(&Self::Item) -> Result<bool, Self::Err> + Send + Sync + 'static,
  {
    FilterOp { source: self, predicate: Arc::new(NextFn::Fallible(predicate)) }
  }

  /// Map each element to an inner observable and merge the inner streams.
  ///
  /// The output completes only once the outer source and every inner
  /// stream have completed.
  fn flat_map<R, F>(self, f: F) -> FlatMapOp<Self, F, fn(Self::Item) -> Result<R, Self::Err>>
  where
    R: Observable<Err = Self::Err>,
    F: Fn(Self::Item) -> R + Send + Sync + 'static,
  {
    FlatMapOp { source: self, func: Arc::new(NextFn::Plain(f)) }
  }

  /// [`flat_map`](Observable::flat_map) with a fallible inner-observable
  /// builder.
  fn try_flat_map<R, F>(self, f: F) -> FlatMapOp<Self, fn(Self::Item) -> R, F>
  where
    R: Observable<Err = Self::Err>,
    F: Fn(Self::Item) -> Result<R, Self::Err> + Send + Sync + 'static,
  {
    FlatMapOp { source: self, func: Arc::new(NextFn::Fallible(f)) }
  }

  /// Alias for [`flat_map`](Observable::flat_map).
  fn merge_map<R, F>(self, f: F) -> FlatMapOp<Self, F, fn(Self::Item) -> Result<R, Self::Err>>
  where
    R: Observable<Err = Self::Err>,
    F: Fn(Self::Item) -> R + Send + Sync + 'static,
  {
    self.flat_map(f)
  }

  /// Merge a stream of streams into one.
  fn flatten(
    self,
  ) -> FlatMapOp<Self, fn(Self::Item) -> Self::Item, fn(Self::Item) -> Result<Self::Item, Self::Err>>
  where
    Self::Item: Observable<Err = Self::Err>,
  {
    self.flat_map(identity::<Self::Item> as fn(Self::Item) -> Self::Item)
  }

  /// Forward the first `count` elements, then complete. Requires
  /// `count > 0`.
  fn take(self, count: usize) -> TakeOp<Self> {
    assert!(count > 0, "take requires count > 0");
    TakeOp { source: self, count }
  }

  /// Discard the first `count` elements, then forward the rest. Requires
  /// `count > 0`.
  fn drop(self, count: usize) -> DropOp<Self> {
    assert!(count > 0, "drop requires count > 0");
    DropOp { source: self, count }
  }

  /// The first element only.
  fn head(self) -> TakeOp<Self> { self.take(1) }

  /// Everything but the first element.
  fn tail(self) -> DropOp<Self> { self.drop(1) }

  /// Forward elements while `predicate` holds, completing on the first
  /// element that fails it.
  fn take_while<F>(
    self,
    predicate: F,
  ) -> TakeWhileOp<Self, F, fn(&Self::Item) -> Result<bool, Self::Err>>
  where
    F: Fn(&Self::Item) -> bool + Send + Sync + 'static,
  {
    TakeWhileOp { source: self, predicate: Arc::new(NextFn::Plain(predicate)) }
  }

  /// [`take_while`](Observable::take_while) with a fallible predicate.
  fn try_take_while<F>(self, predicate: F) -> TakeWhileOp<Self, fn(&Self::Item) -> bool, F>
  where
    F: Fn(&Self::Item) -> Result<bool, Self::Err> + Send + Sync + 'static,
  {
    TakeWhileOp { source: self, predicate: Arc::new(NextFn::Fallible(predicate)) }
  }

  /// Discard elements while `predicate` holds, then forward everything
  /// from the first non-matching element on.
  fn drop_while<F>(
    self,
    predicate: F,
  ) -> DropWhileOp<Self, F, fn(&Self::Item) -> Result<bool, Self::Err>>
  where
    F: Fn(&Self::Item) -> bool + Send + Sync + 'static,
  {
    DropWhileOp { source: self, predicate: Arc::new(NextFn::Plain(predicate)) }
  }

  /// [`drop_while`](Observable::drop_while) with a fallible predicate.
  fn try_drop_while<F>(self, predicate: F) -> DropWhileOp<Self, fn(&Self::Item) -> bool, F>
  where
    F: Fn(&Self::Item) -> Result<bool, Self::Err> + Send + Sync + 'static,
  {
    DropWhileOp { source: self, predicate: Arc::new(NextFn::Fallible(predicate)) }
  }

  /// Fold the whole sequence into one value, emitted on completion.
  fn fold_left<A, F>(
    self,
    seed: A,
    f: F,
  ) -> FoldOp<Self, A, F, fn(A, Self::Item) -> Result<A, Self::Err>>
  where
    A: Clone + Send + Sync + 'static,
    F: Fn(A, Self::Item) -> A + Send + Sync + 'static,
  {
    FoldOp { source: self, seed, func: Arc::new(NextFn::Plain(f)) }
  }

  /// [`fold_left`](Observable::fold_left) with a fallible fold function.
  fn try_fold_left<A, F>(self, seed: A, f: F) -> FoldOp<Self, A, fn(A, Self::Item) -> A, F>
  where
    A: Clone + Send + Sync + 'static,
    F: Fn(A, Self::Item) -> Result<A, Self::Err> + Send + Sync + 'static,
  {
    FoldOp { source: self, seed, func: Arc::new(NextFn::Fallible(f)) }
  }

  /// Emit everything from this stream, then everything from `other`.
  fn concat<B>(self, other: B) -> ConcatOp<Self, B>
  where
    B: Observable<Item = Self::Item, Err = Self::Err>,
  {
    ConcatOp { first: self, second: Arc::new(other) }
  }

  /// Pair this stream's elements positionally with `other`'s.
  fn zip<B>(self, other: B) -> ZipOp<Self, B>
  where
    B: Observable<Err = Self::Err>,
  {
    ZipOp { left: self, right: other }
  }

  /// Run `callback` after the stream completes normally.
  ///
  /// The callback is unprotected: a panic inside it escapes.
  fn do_on_completed<C>(self, callback: C) -> DoOnCompletedOp<Self, C>
  where
    C: Fn() + Send + Sync + 'static,
  {
    DoOnCompletedOp { source: self, callback: Arc::new(callback) }
  }

  /// Run a side effect on each element before forwarding it.
  fn do_work<F>(self, callback: F) -> DoWorkOp<Self, F, fn(&Self::Item) -> Result<(), Self::Err>>
  where
    F: Fn(&Self::Item) + Send + Sync + 'static,
  {
    DoWorkOp { source: self, callback: Arc::new(NextFn::Plain(callback)) }
  }

  /// [`do_work`](Observable::do_work) with a fallible side effect.
  fn try_do_work<F>(self, callback: F) -> DoWorkOp<Self, fn(&Self::Item), F>
  where
    F: Fn(&Self::Item) -> Result<(), Self::Err> + Send + Sync + 'static,
  {
    DoWorkOp { source: self, callback: Arc::new(NextFn::Fallible(callback)) }
  }

  /// Serialize the downstream behind a mutex, making it safe to use under
  /// operators that fan producers out.
  fn safe(self) -> SafeOp<Self> { SafeOp { source: self } }

  /// The first element matching `predicate`, if any.
  fn find<F>(
    self,
    predicate: F,
  ) -> TakeOp<FilterOp<Self, F, fn(&Self::Item) -> Result<bool, Self::Err>>>
  where
    F: Fn(&Self::Item) -> bool + Send + Sync + 'static,
  {
    self.filter(predicate).head()
  }

  /// Emits whether any element matches `predicate`.
  fn exists<F>(
    self,
    predicate: F,
  ) -> FoldOp<
    TakeOp<FilterOp<Self, F, fn(&Self::Item) -> Result<bool, Self::Err>>>,
    bool,
    fn(bool, Self::Item) -> bool,
    fn(bool, Self::Item) -> Result<bool, Self::Err>,
  >
  where
    F: Fn(&Self::Item) -> bool + Send + Sync + 'static,
  {
    fn witnessed<T>(_: bool, _: T) -> bool { true }
    self
      .find(predicate)
      .fold_left(false, witnessed::<Self::Item> as fn(bool, Self::Item) -> bool)
  }

  /// Emits whether every element matches `predicate`.
  fn for_all<F>(self, predicate: F) -> impl Observable<Item = bool, Err = Self::Err>
  where
    F: Fn(&Self::Item) -> bool + Send + Sync + 'static,
  {
    self
      .exists(move |v: &Self::Item| !predicate(v))
      .map(|found: bool| !found)
  }

  /// The first element, or `default` if the stream is empty.
  fn head_or_else(self, default: Self::Item) -> impl Observable<Item = Self::Item, Err = Self::Err>
  where
    Self::Item: Clone + Sync,
  {
    self
      .head()
      .fold_left(None, |_: Option<Self::Item>, v: Self::Item| Some(v))
      .map(move |first: Option<Self::Item>| first.unwrap_or_else(|| default.clone()))
  }

  /// Resolve a future with the first element (`Ok(Some(_))`), `Ok(None)`
  /// on an empty stream, or the stream's error. Orphaned errors go to the
  /// default [`LogReporter`].
  fn as_future(&self) -> AsFuture<Self::Item, Self::Err>
  where
    Self::Err: Debug,
  {
    self.as_future_with(LogReporter)
  }

  /// [`as_future`](Observable::as_future) with an explicit failure
  /// reporter for errors that arrive once nobody is listening.
  fn as_future_with<R>(&self, reporter: R) -> AsFuture<Self::Item, Self::Err>
  where
    R: FailureReporter<Self::Err> + 'static,
  {
    as_future::subscribe_first(self, reporter)
  }
}

/// Interleave two sources into one stream: a two-element sequence of
/// sources flattened through [`Observable::flatten`].
pub fn merge<A, B>(a: A, b: B) -> impl Observable<Item = A::Item, Err = A::Err>
where
  A: Observable + Clone,
  B: Observable<Item = A::Item, Err = A::Err> + Clone,
{
  from_iter::<_, A::Err>(vec![EitherObservable::Left(a), EitherObservable::Right(b)]).flatten()
}
