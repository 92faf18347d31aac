use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ack::Ack;
use crate::cancelable::Cancelable;
use crate::observable::Observable;
use crate::observer::Observer;

/// Discards the first `count` elements, then forwards everything.
///
/// This struct is created by [`Observable::drop`], which requires
/// `count > 0`. The mirror image of [`TakeOp`](crate::ops::take::TakeOp):
/// the CAS loop guarantees that under concurrent delivery exactly `count`
/// items are swallowed.
#[derive(Clone)]
pub struct DropOp<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<S> Observable for DropOp<S>
where
  S: Observable,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    self.source.actual_subscribe(DropObserver {
      observer,
      limit: self.count,
      discarded: AtomicUsize::new(0),
    })
  }
}

pub struct DropObserver<O> {
  observer: O,
  limit: usize,
  discarded: AtomicUsize,
}

impl<Item, Err, O> Observer<Item, Err> for DropObserver<O>
where
  O: Observer<Item, Err>,
{
  fn on_next(&self, value: Item) -> Ack {
    let mut cur = self.discarded.load(Ordering::Relaxed);
    while cur < self.limit {
      match self
        .discarded
        .compare_exchange_weak(cur, cur + 1, Ordering::AcqRel, Ordering::Relaxed)
      {
        Ok(_) => return Ack::Continue,
        Err(actual) => cur = actual,
      }
    }
    self.observer.on_next(value)
  }

  fn on_error(&self, err: Err) { self.observer.on_error(err) }

  fn on_completed(&self) { self.observer.on_completed() }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn base_function() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    from_iter::<_, ()>(1..=5).drop(2).subscribe(move |v| sink.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![3, 4, 5]);
  }

  #[test]
  fn dropping_more_than_available_just_completes() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (n, c) = (log.clone(), log.clone());
    from_iter::<_, ()>(vec![1, 2]).drop(5).subscribe_all(
      move |v| n.lock().unwrap().push(format!("next {}", v)),
      |_| {},
      move || c.lock().unwrap().push("completed".into()),
    );
    assert_eq!(*log.lock().unwrap(), vec!["completed"]);
  }

  #[test]
  #[should_panic(expected = "count > 0")]
  fn zero_is_rejected_at_construction() {
    from_iter::<_, ()>(vec![1]).drop(0);
  }
}
