//! Re-exports of everything a stream pipeline needs.

pub use crate::ack::Ack;
pub use crate::cancelable::{
  Cancelable, CancelableLike, CompositeCancelable, RefCountCancelable, SingleAssignmentCancelable,
};
pub use crate::function::NextFn;
pub use crate::observable::{
  create, empty, from_iter, from_iter_result, merge, never, of, throw, try_create,
  EitherObservable, FromIter, FromIterResult, Observable,
};
pub use crate::observer::{AnonymousObserver, DynObserver, Observer, SynchronizedObserver};
pub use crate::ops::*;
pub use crate::reporter::{FailureReporter, LogReporter};
