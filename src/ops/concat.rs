use std::sync::Arc;

use crate::ack::Ack;
use crate::cancelable::{Cancelable, CompositeCancelable};
use crate::observable::Observable;
use crate::observer::{Observer, SynchronizedObserver};

/// Emits everything from the first source, then everything from the
/// second.
///
/// This struct is created by [`Observable::concat`]. The downstream sits
/// behind a [`SynchronizedObserver`] so the hand-off at the boundary is
/// safe even if the two sources deliver from different threads. Errors
/// from either phase forward verbatim and end the whole stream.
pub struct ConcatOp<A, B> {
  pub(crate) first: A,
  pub(crate) second: Arc<B>,
}

impl<A: Clone, B> Clone for ConcatOp<A, B> {
  fn clone(&self) -> Self { ConcatOp { first: self.first.clone(), second: self.second.clone() } }
}

impl<A, B> Observable for ConcatOp<A, B>
where
  A: Observable,
  B: Observable<Item = A::Item, Err = A::Err>,
{
  type Item = A::Item;
  type Err = A::Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<A::Item, A::Err> + 'static,
  {
    let down = Arc::new(SynchronizedObserver::new(observer));
    let composite = CompositeCancelable::new();
    let head = HeadObserver {
      down: down.clone(),
      tail: self.second.clone(),
      composite: composite.clone(),
    };
    composite.add(self.first.actual_subscribe(head));
    Cancelable::from(composite)
  }
}

struct HeadObserver<B, O> {
  down: Arc<SynchronizedObserver<O>>,
  tail: Arc<B>,
  composite: CompositeCancelable,
}

impl<Item, Err, B, O> Observer<Item, Err> for HeadObserver<B, O>
where
  B: Observable<Item = Item, Err = Err>,
  O: Observer<Item, Err> + 'static,
{
  fn on_next(&self, value: Item) -> Ack { self.down.on_next(value) }

  fn on_error(&self, err: Err) { self.down.on_error(err) }

  fn on_completed(&self) {
    // First source exhausted: hand the same serialized downstream to the
    // second one. An externally canceled composite cancels it on insert.
    let tail_subscription = self.tail.actual_subscribe(self.down.clone());
    self.composite.add(tail_subscription);
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn base_function() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (n, c) = (log.clone(), log.clone());
    from_iter::<_, ()>(vec![1, 2])
      .concat(from_iter::<_, ()>(vec![3, 4]))
      .subscribe_all(
        move |v| n.lock().unwrap().push(format!("next {}", v)),
        |_| {},
        move || c.lock().unwrap().push("completed".into()),
      );
    assert_eq!(
      *log.lock().unwrap(),
      vec!["next 1", "next 2", "next 3", "next 4", "completed"]
    );
  }

  #[test]
  fn error_in_the_first_phase_skips_the_second() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (n, e) = (log.clone(), log.clone());
    throw::<i32, _>("early")
      .concat(from_iter::<_, &'static str>(vec![3, 4]))
      .subscribe_err(
        move |v| n.lock().unwrap().push(format!("next {}", v)),
        move |err| e.lock().unwrap().push(format!("error {}", err)),
      );
    assert_eq!(*log.lock().unwrap(), vec!["error early"]);
  }

  #[test]
  fn completes_exactly_once() {
    let completions = Arc::new(Mutex::new(0));
    let c = completions.clone();
    empty::<i32, ()>()
      .concat(empty::<i32, ()>())
      .subscribe_all(|_| {}, |_| {}, move || *c.lock().unwrap() += 1);
    assert_eq!(*completions.lock().unwrap(), 1);
  }
}
