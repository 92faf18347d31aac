use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ack::Ack;
use crate::cancelable::Cancelable;
use crate::function::NextFn;
use crate::observable::Observable;
use crate::observer::Observer;

/// Forwards elements while a predicate holds, then completes on the first
/// element that fails it.
///
/// This struct is created by [`Observable::take_while`] and
/// [`Observable::try_take_while`]. Termination is claimed with a single
/// `compare_exchange(true, false)` on the gate, so racing deliveries agree
/// on who emits the one `on_completed`.
pub struct TakeWhileOp<S, N, T> {
  pub(crate) source: S,
  pub(crate) predicate: Arc<NextFn<N, T>>,
}

impl<S: Clone, N, T> Clone for TakeWhileOp<S, N, T> {
  fn clone(&self) -> Self {
    TakeWhileOp { source: self.source.clone(), predicate: self.predicate.clone() }
  }
}

impl<S, N, T> Observable for TakeWhileOp<S, N, T>
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
    self.source.actual_subscribe(TakeWhileObserver {
      observer,
      predicate: self.predicate.clone(),
      open: AtomicBool::new(true),
    })
  }
}

pub struct TakeWhileObserver<O, N, T> {
  observer: O,
  predicate: Arc<NextFn<N, T>>,
  open: AtomicBool,
}

impl<Item, Err, O, N, T> Observer<Item, Err> for TakeWhileObserver<O, N, T>
where
  O: Observer<Item, Err>,
  N: Fn(&Item) -> bool + Send + Sync,
  T: Fn(&Item) -> Result<bool, Err> + Send + Sync,
{
  fn on_next(&self, value: Item) -> Ack {
    if !self.open.load(Ordering::Acquire) {
      return Ack::Stop;
    }
    match self.predicate.call(&value) {
      Ok(true) => match self
        .open
        .compare_exchange(true, true, Ordering::AcqRel, Ordering::Acquire)
      {
        Ok(_) => self.observer.on_next(value),
        Err(_) => Ack::Stop,
      },
      Ok(false) => {
        if self
          .open
          .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
          .is_ok()
        {
          self.observer.on_completed();
        }
        Ack::Stop
      }
      Err(e) => {
        if self
          .open
          .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
          .is_ok()
        {
          self.observer.on_error(e);
        }
        Ack::Stop
      }
    }
  }

  fn on_error(&self, err: Err) {
    if self.open.swap(false, Ordering::AcqRel) {
      self.observer.on_error(err);
    }
  }

  fn on_completed(&self) {
    if self.open.swap(false, Ordering::AcqRel) {
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
    from_iter::<_, ()>(1..=5).take_while(|v| *v < 3).subscribe_all(
      move |v| n.lock().unwrap().push(format!("next {}", v)),
      |_| {},
      move || c.lock().unwrap().push("completed".into()),
    );
    assert_eq!(*log.lock().unwrap(), vec!["next 1", "next 2", "completed"]);
  }

  #[test]
  fn all_matching_completes_with_the_source() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    from_iter::<_, ()>(1..=3)
      .take_while(|_| true)
      .subscribe(move |v| sink.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
  }

  #[test]
  fn failing_predicate_becomes_the_terminal() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (n, e, c) = (log.clone(), log.clone(), log.clone());
    from_iter::<_, &'static str>(1..=5)
      .try_take_while(|v: &i32| if *v == 2 { Err("opaque") } else { Ok(true) })
      .subscribe_all(
        move |v| n.lock().unwrap().push(format!("next {}", v)),
        move |err| e.lock().unwrap().push(format!("error {}", err)),
        move || c.lock().unwrap().push("completed".into()),
      );
    assert_eq!(*log.lock().unwrap(), vec!["next 1", "error opaque"]);
  }
}
