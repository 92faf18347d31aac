use std::sync::{Arc, Mutex};

use crate::ack::Ack;
use crate::cancelable::Cancelable;
use crate::function::NextFn;
use crate::observable::Observable;
use crate::observer::Observer;

/// Folds the whole sequence into one value, emitted on completion.
///
/// This struct is created by [`Observable::fold_left`] and
/// [`Observable::try_fold_left`]. The accumulator lives behind a mutex so
/// concurrent deliveries apply their updates one at a time; the fold
/// function itself runs under that lock, the downstream never does.
pub struct FoldOp<S, A, N, T> {
  pub(crate) source: S,
  pub(crate) seed: A,
  pub(crate) func: Arc<NextFn<N, T>>,
}

impl<S: Clone, A: Clone, N, T> Clone for FoldOp<S, A, N, T> {
  fn clone(&self) -> Self {
    FoldOp { source: self.source.clone(), seed: self.seed.clone(), func: self.func.clone() }
  }
}

impl<S, A, N, T> Observable for FoldOp<S, A, N, T>
where
  S: Observable,
  A: Clone + Send + Sync + 'static,
  N: Fn(A, S::Item) -> A + Send + Sync + 'static,
  T: Fn(A, S::Item) -> Result<A, S::Err> + Send + Sync + 'static,
{
  type Item = A;
  type Err = S::Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<A, S::Err> + 'static,
  {
    self.source.actual_subscribe(FoldObserver {
      observer,
      state: Mutex::new(Some(self.seed.clone())),
      func: self.func.clone(),
    })
  }
}

pub struct FoldObserver<O, A, N, T> {
  observer: O,
  state: Mutex<Option<A>>,
  func: Arc<NextFn<N, T>>,
}

impl<Item, Err, O, A, N, T> Observer<Item, Err> for FoldObserver<O, A, N, T>
where
  O: Observer<A, Err>,
  A: Send,
  N: Fn(A, Item) -> A + Send + Sync,
  T: Fn(A, Item) -> Result<A, Err> + Send + Sync,
{
  fn on_next(&self, value: Item) -> Ack {
    let failure = {
      let mut state = self.state.lock().unwrap();
      let acc = match state.take() {
        Some(acc) => acc,
        // A failed fold already tore the state down.
        None => return Ack::Stop,
      };
      match self.func.call2(acc, value) {
        Ok(next) => {
          *state = Some(next);
          None
        }
        Err(e) => Some(e),
      }
    };
    match failure {
      None => Ack::Continue,
      Some(e) => {
        self.observer.on_error(e);
        Ack::Stop
      }
    }
  }

  fn on_error(&self, err: Err) {
    self.state.lock().unwrap().take();
    self.observer.on_error(err)
  }

  fn on_completed(&self) {
    let state = self.state.lock().unwrap().take();
    if let Some(acc) = state {
      if !self.observer.on_next(acc).is_stop() {
        self.observer.on_completed();
      }
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
    from_iter::<_, ()>(1..=4).fold_left(0, |acc, v| acc + v).subscribe_all(
      move |v| n.lock().unwrap().push(format!("next {}", v)),
      |_| {},
      move || c.lock().unwrap().push("completed".into()),
    );
    assert_eq!(*log.lock().unwrap(), vec!["next 10", "completed"]);
  }

  #[test]
  fn empty_source_emits_the_seed() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    empty::<i32, ()>()
      .fold_left(7, |acc, _| acc)
      .subscribe(move |v| sink.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![7]);
  }

  #[test]
  fn upstream_error_suppresses_the_fold_value() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (n, e) = (log.clone(), log.clone());
    throw::<i32, _>("boom").fold_left(0, |acc, v| acc + v).subscribe_err(
      move |v| n.lock().unwrap().push(format!("next {}", v)),
      move |err| e.lock().unwrap().push(format!("error {}", err)),
    );
    assert_eq!(*log.lock().unwrap(), vec!["error boom"]);
  }

  #[test]
  fn failing_fold_function_ends_the_stream() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (n, e, c) = (log.clone(), log.clone(), log.clone());
    from_iter::<_, &'static str>(1..=5)
      .try_fold_left(0, |acc: i32, v: i32| if v == 3 { Err("overflow") } else { Ok(acc + v) })
      .subscribe_all(
        move |v| n.lock().unwrap().push(format!("next {}", v)),
        move |err| e.lock().unwrap().push(format!("error {}", err)),
        move || c.lock().unwrap().push("completed".into()),
      );
    assert_eq!(*log.lock().unwrap(), vec!["error overflow"]);
  }
}
