use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ack::Ack;
use crate::cancelable::Cancelable;
use crate::observable::Observable;
use crate::observer::Observer;

/// Forwards the first `count` elements, then completes.
///
/// This struct is created by [`Observable::take`], which requires
/// `count > 0`. The counter is claimed with a CAS loop, so concurrent
/// deliveries forward at most `count` items and exactly one of them emits
/// the `on_completed`.
#[derive(Clone)]
pub struct TakeOp<S> {
  pub(crate) source: S,
  pub(crate) count: usize,
}

impl<S> Observable for TakeOp<S>
where
  S: Observable,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    self.source.actual_subscribe(TakeObserver {
      observer,
      limit: self.count,
      seen: AtomicUsize::new(0),
    })
  }
}

pub struct TakeObserver<O> {
  observer: O,
  limit: usize,
  seen: AtomicUsize,
}

impl<Item, Err, O> Observer<Item, Err> for TakeObserver<O>
where
  O: Observer<Item, Err>,
{
  fn on_next(&self, value: Item) -> Ack {
    let mut cur = self.seen.load(Ordering::Relaxed);
    loop {
      if cur >= self.limit {
        return Ack::Stop;
      }
      match self
        .seen
        .compare_exchange_weak(cur, cur + 1, Ordering::AcqRel, Ordering::Relaxed)
      {
        Ok(_) => break,
        Err(actual) => cur = actual,
      }
    }

    let ack = self.observer.on_next(value);
    if cur + 1 == self.limit {
      self.observer.on_completed();
      Ack::Stop
    } else {
      ack
    }
  }

  fn on_error(&self, err: Err) {
    if self.seen.load(Ordering::Acquire) < self.limit {
      self.observer.on_error(err);
    }
  }

  fn on_completed(&self) {
    if self.seen.load(Ordering::Acquire) < self.limit {
      self.observer.on_completed();
    }
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
    from_iter::<_, ()>(1..=10).take(3).subscribe_all(
      move |v| n.lock().unwrap().push(format!("next {}", v)),
      |_| {},
      move || c.lock().unwrap().push("completed".into()),
    );
    assert_eq!(*log.lock().unwrap(), vec!["next 1", "next 2", "next 3", "completed"]);
  }

  #[test]
  fn stops_an_endless_source() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    from_iter::<_, ()>(0..).take(4).subscribe(move |v| sink.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2, 3]);
  }

  #[test]
  fn short_source_completes_naturally() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (n, c) = (log.clone(), log.clone());
    from_iter::<_, ()>(vec![1, 2]).take(5).subscribe_all(
      move |v| n.lock().unwrap().push(format!("next {}", v)),
      |_| {},
      move || c.lock().unwrap().push("completed".into()),
    );
    assert_eq!(*log.lock().unwrap(), vec!["next 1", "next 2", "completed"]);
  }

  #[test]
  #[should_panic(expected = "count > 0")]
  fn zero_is_rejected_at_construction() {
    from_iter::<_, ()>(vec![1]).take(0);
  }
}
