use std::sync::Mutex;

use crate::ack::Ack;
use crate::observer::Observer;

/// Serializes every call to the wrapped observer through one mutex.
///
/// Used wherever multiple producers may push into a single downstream:
/// `concat` hands both of its sources the same synchronized sink, and
/// `safe` wraps an entire subscription in one. The gate is held for the
/// duration of the wrapped callback; callers must not re-enter the same
/// wrapper from inside its own callback.
pub struct SynchronizedObserver<O> {
  inner: O,
  gate: Mutex<()>,
}

impl<O> SynchronizedObserver<O> {
  pub fn new(inner: O) -> Self {
    SynchronizedObserver { inner, gate: Mutex::new(()) }
  }
}

impl<Item, Err, O> Observer<Item, Err> for SynchronizedObserver<O>
where
  O: Observer<Item, Err>,
{
  fn on_next(&self, value: Item) -> Ack {
    let _gate = self.gate.lock().unwrap();
    self.inner.on_next(value)
  }

  fn on_error(&self, err: Err) {
    let _gate = self.gate.lock().unwrap();
    self.inner.on_error(err)
  }

  fn on_completed(&self) {
    let _gate = self.gate.lock().unwrap();
    self.inner.on_completed()
  }
}
