use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ack::Ack;
use crate::cancelable::Cancelable;
use crate::function::NextFn;
use crate::observable::Observable;
use crate::observer::Observer;

/// Discards elements while a predicate holds, then forwards everything
/// starting with the first element that fails it.
///
/// This struct is created by [`Observable::drop_while`] and
/// [`Observable::try_drop_while`]. The dropping gate only ever flips from
/// `true` to `false`; when the CAS loses a race, the element is retried and
/// lands on the forwarding path, so exactly one element is admitted as the
/// first non-matching one.
pub struct DropWhileOp<S, N, T> {
  pub(crate) source: S,
  pub(crate) predicate: Arc<NextFn<N, T>>,
}

impl<S: Clone, N, T> Clone for DropWhileOp<S, N, T> {
  fn clone(&self) -> Self {
    DropWhileOp { source: self.source.clone(), predicate: self.predicate.clone() }
  }
}

impl<S, N, T> Observable for DropWhileOp<S, N, T>
where
  S: Observable,
  N: Fn(&S::Item) -> bool + Send + Sync + 'static,
  T: Fn(&S::Item) -> Result<bool, S::Err> + Send + Sync + 'static,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    self.source.actual_subscribe(DropWhileObserver {
      observer,
      predicate: self.predicate.clone(),
      dropping: AtomicBool::new(true),
    })
  }
}

pub struct DropWhileObserver<O, N, T> {
  observer: O,
  predicate: Arc<NextFn<N, T>>,
  dropping: AtomicBool,
}

impl<Item, Err, O, N, T> Observer<Item, Err> for DropWhileObserver<O, N, T>
where
  O: Observer<Item, Err>,
  N: Fn(&Item) -> bool + Send + Sync,
  T: Fn(&Item) -> Result<bool, Err> + Send + Sync,
{
  fn on_next(&self, value: Item) -> Ack {
    if !self.dropping.load(Ordering::Acquire) {
      return self.observer.on_next(value);
    }
    let keep_dropping = match self.predicate.call(&value) {
      Ok(v) => v,
      Err(e) => {
        self.observer.on_error(e);
        return Ack::Stop;
      }
    };
    let lost_race = self
      .dropping
      .compare_exchange(true, keep_dropping, Ordering::AcqRel, Ordering::Acquire)
      .is_err();
    if lost_race || !keep_dropping {
      // The gate is down; retry lands on the forwarding path above.
      return self.on_next(value);
    }
    Ack::Continue
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
    from_iter::<_, ()>(1..=6)
      .drop_while(|v| *v < 4)
      .subscribe(move |v| sink.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![4, 5, 6]);
  }

  #[test]
  fn later_matches_still_flow() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    from_iter::<_, ()>(vec![1, 1, 5, 1, 6])
      .drop_while(|v| *v < 4)
      .subscribe(move |v| sink.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![5, 1, 6]);
  }

  #[test]
  fn dropping_everything_just_completes() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (n, c) = (log.clone(), log.clone());
    from_iter::<_, ()>(1..=3).drop_while(|_| true).subscribe_all(
      move |v| n.lock().unwrap().push(format!("next {}", v)),
      |_| {},
      move || c.lock().unwrap().push("completed".into()),
    );
    assert_eq!(*log.lock().unwrap(), vec!["completed"]);
  }

  #[test]
  fn failing_predicate_becomes_the_terminal() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (n, e) = (log.clone(), log.clone());
    from_iter::<_, &'static str>(1..=5)
      .try_drop_while(|v: &i32| if *v == 2 { Err("opaque") } else { Ok(true) })
      .subscribe_err(
        move |v| n.lock().unwrap().push(format!("next {}", v)),
        move |err| e.lock().unwrap().push(format!("error {}", err)),
      );
    assert_eq!(*log.lock().unwrap(), vec!["error opaque"]);
  }
}
