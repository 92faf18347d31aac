use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::cancelable::{Cancelable, CancelableLike};

/// A cancelable that waits on a dynamic family of handles.
///
/// `acquire` hands out a handle and bumps a counter; canceling the handle
/// releases it. `cancel` on the ref-count itself marks the main work done.
/// The terminal action fires exactly once, on the thread that makes the
/// final transition: main done *and* counter back at zero. Acquiring after
/// the terminal action has fired yields the already-canceled sentinel.
///
/// `flat_map` is the canonical user: the main cancel marks "outer source
/// completed", each live inner subscription holds a handle, and the
/// terminal action is the downstream `on_completed`.
#[derive(Clone)]
pub struct RefCountCancelable(Arc<RefCountInner>);

impl RefCountCancelable {
  pub fn new<F>(on_done: F) -> Self
  where
    F: FnOnce() + Send + 'static,
  {
    RefCountCancelable(Arc::new(RefCountInner(Mutex::new(RefCountState {
      main_canceled: false,
      active: 0,
      on_done: Some(Box::new(on_done)),
    }))))
  }

  /// Take a handle on the family. Canceling the returned handle releases
  /// it; the first cancel is the release, later ones are no-ops.
  pub fn acquire(&self) -> Cancelable {
    {
      let mut state = self.0 .0.lock().unwrap();
      if state.main_canceled && state.on_done.is_none() {
        // Terminal action already fired.
        return Cancelable::already_canceled();
      }
      state.active += 1;
    }
    Cancelable::from_arc(Arc::new(RefHandle {
      released: AtomicBool::new(false),
      owner: self.0.clone(),
    }))
  }

  pub fn cancel(&self) { self.0.cancel() }

  pub fn is_canceled(&self) -> bool { self.0.is_canceled() }
}

impl From<RefCountCancelable> for Cancelable {
  fn from(rc: RefCountCancelable) -> Cancelable { Cancelable::from_arc(rc.0) }
}

struct RefCountState {
  main_canceled: bool,
  active: usize,
  on_done: Option<Box<dyn FnOnce() + Send>>,
}

struct RefCountInner(Mutex<RefCountState>);

impl RefCountInner {
  fn release(&self) {
    let on_done = {
      let mut state = self.0.lock().unwrap();
      state.active -= 1;
      if state.main_canceled && state.active == 0 {
        state.on_done.take()
      } else {
        None
      }
    };
    if let Some(on_done) = on_done {
      on_done();
    }
  }
}

impl CancelableLike for RefCountInner {
  fn cancel(&self) {
    let on_done = {
      let mut state = self.0.lock().unwrap();
      if state.main_canceled {
        return;
      }
      state.main_canceled = true;
      if state.active == 0 { state.on_done.take() } else { None }
    };
    if let Some(on_done) = on_done {
      on_done();
    }
  }

  fn is_canceled(&self) -> bool { self.0.lock().unwrap().main_canceled }
}

struct RefHandle {
  released: AtomicBool,
  owner: Arc<RefCountInner>,
}

impl CancelableLike for RefHandle {
  fn cancel(&self) {
    if !self.released.swap(true, Ordering::AcqRel) {
      self.owner.release();
    }
  }

  fn is_canceled(&self) -> bool { self.released.load(Ordering::Acquire) }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::sync::atomic::AtomicUsize;
  use std::thread;

  fn counting() -> (RefCountCancelable, Arc<AtomicUsize>) {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let rc = RefCountCancelable::new(move || {
      counter.fetch_add(1, Ordering::SeqCst);
    });
    (rc, fired)
  }

  #[test]
  fn fires_when_main_canceled_with_no_handles() {
    let (rc, fired) = counting();
    rc.cancel();
    assert_eq!(fired.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn waits_for_every_handle() {
    let (rc, fired) = counting();
    let a = rc.acquire();
    let b = rc.acquire();

    rc.cancel();
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    a.cancel();
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    b.cancel();
    assert_eq!(fired.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn handle_release_is_idempotent() {
    let (rc, fired) = counting();
    let a = rc.acquire();
    let b = rc.acquire();
    a.cancel();
    a.cancel();

    rc.cancel();
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    b.cancel();
    assert_eq!(fired.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn acquire_after_terminal_yields_already_canceled() {
    let (rc, fired) = counting();
    rc.cancel();
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    let late = rc.acquire();
    assert!(late.is_canceled());
    late.cancel();
    assert_eq!(fired.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn acquire_after_main_cancel_but_before_terminal_still_counts() {
    let (rc, fired) = counting();
    let a = rc.acquire();
    rc.cancel();

    // Terminal has not fired; new handles keep it pending.
    let b = rc.acquire();
    assert!(!b.is_canceled());

    a.cancel();
    assert_eq!(fired.load(Ordering::SeqCst), 0);
    b.cancel();
    assert_eq!(fired.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn fires_exactly_once_under_races() {
    for _ in 0..50 {
      let (rc, fired) = counting();
      let handles: Vec<_> = (0..8).map(|_| rc.acquire()).collect();

      let mut threads: Vec<_> = handles
        .into_iter()
        .map(|h| thread::spawn(move || h.cancel()))
        .collect();
      let main = rc.clone();
      threads.push(thread::spawn(move || main.cancel()));

      for t in threads {
        t.join().unwrap();
      }
      assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
  }
}
