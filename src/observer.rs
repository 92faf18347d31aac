//! The three-callback sink every observable pushes into.

use std::sync::Arc;

use crate::ack::Ack;

mod anonymous;
mod sync;

pub use anonymous::AnonymousObserver;
pub use sync::SynchronizedObserver;

/// A consumer of the values delivered by an
/// [`Observable`](crate::observable::Observable), one callback per kind of
/// notification: `on_next`, `on_error` and `on_completed`.
///
/// The protocol grammar is `on_next* (on_error | on_completed)?`: any number
/// of items followed by at most one terminal event. The grammar is enforced
/// by well-behaved producers, not by this type. Two extra rules tie the
/// grammar to back-pressure and teardown:
///
/// - after `on_next` returns [`Ack::Stop`], the producer must not call any
///   further method on this observer;
/// - after a terminal event, no further method may be called either.
///
/// Methods take `&self` so that one downstream can be shared by several
/// producers (the situation `flat_map`, `zip`, `concat` and `safe` create);
/// implementations keep their mutable state behind atomics or locks.
pub trait Observer<Item, Err>: Send + Sync {
  /// Present one item to the observer. Must reply synchronously.
  fn on_next(&self, value: Item) -> Ack;

  /// Present the terminal error. No further calls may follow.
  fn on_error(&self, err: Err);

  /// Present the normal terminal. No further calls may follow.
  fn on_completed(&self);
}

/// A shared, type-erased observer handle.
///
/// Operators that fan one downstream out to several producers pass this
/// around; the `Arc` forwarding impl below makes every clone an observer in
/// its own right.
pub type DynObserver<Item, Err> = Arc<dyn Observer<Item, Err>>;

impl<Item, Err, O> Observer<Item, Err> for Arc<O>
where
  O: Observer<Item, Err> + ?Sized,
{
  #[inline]
  fn on_next(&self, value: Item) -> Ack { (**self).on_next(value) }

  #[inline]
  fn on_error(&self, err: Err) { (**self).on_error(err) }

  #[inline]
  fn on_completed(&self) { (**self).on_completed() }
}

impl<Item, Err, O> Observer<Item, Err> for Box<O>
where
  O: Observer<Item, Err> + ?Sized,
{
  #[inline]
  fn on_next(&self, value: Item) -> Ack { (**self).on_next(value) }

  #[inline]
  fn on_error(&self, err: Err) { (**self).on_error(err) }

  #[inline]
  fn on_completed(&self) { (**self).on_completed() }
}
