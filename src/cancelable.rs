//! Composable teardown handles returned by every `subscribe`.
//!
//! Every variant guarantees its teardown action runs **at most once**, no
//! matter how many threads race on `cancel`. Mutations follow one
//! discipline throughout the module: either a single atomic swap, or a lock
//! held only for the state transition. User teardown code always runs
//! after the lock is released.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use lazy_static::lazy_static;

mod composite;
mod ref_count;
mod single;

pub use composite::CompositeCancelable;
pub use ref_count::RefCountCancelable;
pub use single::SingleAssignmentCancelable;

/// One idempotent operation, `cancel`, plus a query for whether it ran.
pub trait CancelableLike: Send + Sync {
  fn cancel(&self);
  fn is_canceled(&self) -> bool;
}

/// A shared, type-erased cancelable handle.
///
/// Clones share the underlying state: canceling one clone cancels them all,
/// and [`CompositeCancelable`] removal is keyed by that shared identity.
#[derive(Clone)]
pub struct Cancelable(Arc<dyn CancelableLike>);

impl Cancelable {
  /// A plain flag with no teardown action, for producers that have nothing
  /// to release but still want an honest handle (e.g. `never`).
  pub fn new() -> Cancelable { Cancelable(Arc::new(Flag(AtomicBool::new(false)))) }

  /// Wrap a teardown action; `cancel` invokes it at most once.
  pub fn from_fn<F>(action: F) -> Cancelable
  where
    F: FnOnce() + Send + 'static,
  {
    Cancelable(Arc::new(Action {
      canceled: AtomicBool::new(false),
      action: Mutex::new(Some(Box::new(action))),
    }))
  }

  /// The shared already-canceled sentinel, returned whenever subscription
  /// work has already concluded synchronously.
  pub fn already_canceled() -> Cancelable { ALREADY_CANCELED.clone() }

  pub fn cancel(&self) { self.0.cancel() }

  pub fn is_canceled(&self) -> bool { self.0.is_canceled() }

  pub(crate) fn from_arc(inner: Arc<dyn CancelableLike>) -> Cancelable { Cancelable(inner) }

  /// Identity of the shared state, used by [`CompositeCancelable`] to
  /// remove exactly the child that was inserted.
  pub(crate) fn inner_addr(&self) -> *const () { Arc::as_ptr(&self.0) as *const () }
}

impl Default for Cancelable {
  fn default() -> Self { Cancelable::new() }
}

impl CancelableLike for Cancelable {
  fn cancel(&self) { self.0.cancel() }

  fn is_canceled(&self) -> bool { self.0.is_canceled() }
}

struct Flag(AtomicBool);

impl CancelableLike for Flag {
  fn cancel(&self) { self.0.store(true, Ordering::Release); }

  fn is_canceled(&self) -> bool { self.0.load(Ordering::Acquire) }
}

struct Action {
  canceled: AtomicBool,
  action: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl CancelableLike for Action {
  fn cancel(&self) {
    if self.canceled.swap(true, Ordering::AcqRel) {
      return;
    }
    let action = self.action.lock().unwrap().take();
    if let Some(action) = action {
      action();
    }
  }

  fn is_canceled(&self) -> bool { self.canceled.load(Ordering::Acquire) }
}

struct AlreadyCanceled;

impl CancelableLike for AlreadyCanceled {
  fn cancel(&self) {}

  fn is_canceled(&self) -> bool { true }
}

lazy_static! {
  static ref ALREADY_CANCELED: Cancelable = Cancelable(Arc::new(AlreadyCanceled));
}

#[cfg(test)]
mod test {
  use super::*;
  use std::sync::atomic::AtomicUsize;
  use std::thread;

  #[test]
  fn action_runs_once() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();
    let c = Cancelable::from_fn(move || {
      counter.fetch_add(1, Ordering::SeqCst);
    });

    assert!(!c.is_canceled());
    c.cancel();
    c.cancel();
    assert!(c.is_canceled());
    assert_eq!(runs.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn action_runs_once_under_racing_cancels() {
    let runs = Arc::new(AtomicUsize::new(0));
    let counter = runs.clone();
    let c = Cancelable::from_fn(move || {
      counter.fetch_add(1, Ordering::SeqCst);
    });

    let handles: Vec<_> = (0..8)
      .map(|_| {
        let c = c.clone();
        thread::spawn(move || c.cancel())
      })
      .collect();
    for h in handles {
      h.join().unwrap();
    }
    assert_eq!(runs.load(Ordering::SeqCst), 1);
  }

  #[test]
  fn sentinel_is_born_canceled() {
    let c = Cancelable::already_canceled();
    assert!(c.is_canceled());
    c.cancel();
    assert!(c.is_canceled());
  }

  #[test]
  fn sentinel_is_shared() {
    let a = Cancelable::already_canceled();
    let b = Cancelable::already_canceled();
    assert_eq!(a.inner_addr(), b.inner_addr());
  }

  #[test]
  fn clones_share_state() {
    let c = Cancelable::new();
    let clone = c.clone();
    clone.cancel();
    assert!(c.is_canceled());
  }
}
