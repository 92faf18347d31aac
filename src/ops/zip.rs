use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::ack::Ack;
use crate::cancelable::{Cancelable, CompositeCancelable};
use crate::observable::Observable;
use crate::observer::Observer;

/// Pairs items from two sources positionally.
///
/// This struct is created by [`Observable::zip`]. One mutex guards both
/// queues and both done-flags so the "partner queued / partner done"
/// decision is atomic; pair emission happens under that lock, which also
/// serializes the downstream. The output completes as soon as either side
/// can no longer contribute to a pair.
#[derive(Clone)]
pub struct ZipOp<A, B> {
  pub(crate) left: A,
  pub(crate) right: B,
}

impl<A, B> Observable for ZipOp<A, B>
where
  A: Observable,
  B: Observable<Err = A::Err>,
{
  type Item = (A::Item, B::Item);
  type Err = A::Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<(A::Item, B::Item), A::Err> + 'static,
  {
    let composite = CompositeCancelable::new();
    let state = Arc::new(ZipState {
      observer,
      queues: Mutex::new(ZipQueues {
        left: VecDeque::new(),
        right: VecDeque::new(),
        left_done: false,
        right_done: false,
        terminated: false,
      }),
      teardown: composite.clone(),
    });
    composite.add(self.left.actual_subscribe(LeftObserver(state.clone())));
    composite.add(self.right.actual_subscribe(RightObserver(state)));
    Cancelable::from(composite)
  }
}

struct ZipQueues<L, R> {
  left: VecDeque<L>,
  right: VecDeque<R>,
  left_done: bool,
  right_done: bool,
  terminated: bool,
}

impl<L, R> ZipQueues<L, R> {
  /// Claim termination under the lock; at most one caller wins.
  fn claim_terminal(&mut self) -> bool {
    if self.terminated {
      return false;
    }
    self.terminated = true;
    self.left_done = true;
    self.right_done = true;
    self.left.clear();
    self.right.clear();
    true
  }
}

struct ZipState<O, L, R> {
  observer: O,
  queues: Mutex<ZipQueues<L, R>>,
  teardown: CompositeCancelable,
}

struct LeftObserver<O, L, R>(Arc<ZipState<O, L, R>>);

impl<Err, O, L, R> Observer<L, Err> for LeftObserver<O, L, R>
where
  O: Observer<(L, R), Err>,
  L: Send,
  R: Send,
{
  fn on_next(&self, value: L) -> Ack {
    let mut queues = self.0.queues.lock().unwrap();
    if queues.terminated || queues.left_done {
      return Ack::Stop;
    }
    if let Some(partner) = queues.right.pop_front() {
      // Emission stays under the lock so pairs leave positionally ordered.
      let ack = self.0.observer.on_next((value, partner));
      if ack.is_stop() {
        queues.claim_terminal();
        drop(queues);
        self.0.teardown.cancel();
      }
      return ack;
    }
    if queues.right_done {
      // The partner side is done and drained: no pair will ever form.
      let emit = queues.claim_terminal();
      drop(queues);
      if emit {
        self.0.observer.on_completed();
        self.0.teardown.cancel();
      }
      return Ack::Stop;
    }
    queues.left.push_back(value);
    Ack::Continue
  }

  fn on_error(&self, err: Err) {
    let mut queues = self.0.queues.lock().unwrap();
    let emit = queues.claim_terminal();
    drop(queues);
    if emit {
      self.0.observer.on_error(err);
      self.0.teardown.cancel();
    }
  }

  fn on_completed(&self) {
    let mut queues = self.0.queues.lock().unwrap();
    if queues.terminated {
      return;
    }
    queues.left_done = true;
    if queues.left.is_empty() || queues.right_done {
      let emit = queues.claim_terminal();
      drop(queues);
      if emit {
        self.0.observer.on_completed();
        self.0.teardown.cancel();
      }
    }
  }
}

struct RightObserver<O, L, R>(Arc<ZipState<O, L, R>>);

impl<Err, O, L, R> Observer<R, Err> for RightObserver<O, L, R>
where
  O: Observer<(L, R), Err>,
  L: Send,
  R: Send,
{
  fn on_next(&self, value: R) -> Ack {
    let mut queues = self.0.queues.lock().unwrap();
    if queues.terminated || queues.right_done {
      return Ack::Stop;
    }
    if let Some(partner) = queues.left.pop_front() {
      let ack = self.0.observer.on_next((partner, value));
      if ack.is_stop() {
        queues.claim_terminal();
        drop(queues);
        self.0.teardown.cancel();
      }
      return ack;
    }
    if queues.left_done {
      let emit = queues.claim_terminal();
      drop(queues);
      if emit {
        self.0.observer.on_completed();
        self.0.teardown.cancel();
      }
      return Ack::Stop;
    }
    queues.right.push_back(value);
    Ack::Continue
  }

  fn on_error(&self, err: Err) {
    let mut queues = self.0.queues.lock().unwrap();
    let emit = queues.claim_terminal();
    drop(queues);
    if emit {
      self.0.observer.on_error(err);
      self.0.teardown.cancel();
    }
  }

  fn on_completed(&self) {
    let mut queues = self.0.queues.lock().unwrap();
    if queues.terminated {
      return;
    }
    queues.right_done = true;
    if queues.right.is_empty() || queues.left_done {
      let emit = queues.claim_terminal();
      drop(queues);
      if emit {
        self.0.observer.on_completed();
        self.0.teardown.cancel();
      }
    }
  }
}
