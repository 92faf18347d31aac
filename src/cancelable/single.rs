use std::mem;
use std::sync::{Arc, Mutex};

use crate::cancelable::{Cancelable, CancelableLike};

/// A cancelable that starts empty and is assigned a child exactly once.
///
/// If `cancel` arrives before the assignment, the child is canceled the
/// moment it is assigned. Assigning twice is a programming error and
/// panics.
#[derive(Clone)]
pub struct SingleAssignmentCancelable(Arc<SingleInner>);

impl SingleAssignmentCancelable {
  pub fn new() -> Self {
    SingleAssignmentCancelable(Arc::new(SingleInner(Mutex::new(Slot::Empty))))
  }

  /// Assign the child. Panics if a child was already assigned.
  pub fn set(&self, child: Cancelable) {
    let cancel_now = {
      let mut slot = self.0 .0.lock().unwrap();
      match mem::replace(&mut *slot, Slot::CanceledAssigned) {
        Slot::Empty => {
          *slot = Slot::Assigned(child.clone());
          false
        }
        Slot::CanceledEmpty => true,
        prior @ (Slot::Assigned(_) | Slot::CanceledAssigned) => {
          *slot = prior;
          drop(slot);
          panic!("SingleAssignmentCancelable assigned twice")
        }
      }
    };
    if cancel_now {
      child.cancel();
    }
  }

  pub fn cancel(&self) { self.0.cancel() }

  pub fn is_canceled(&self) -> bool { self.0.is_canceled() }
}

impl Default for SingleAssignmentCancelable {
  fn default() -> Self { Self::new() }
}

impl From<SingleAssignmentCancelable> for Cancelable {
  fn from(single: SingleAssignmentCancelable) -> Cancelable { Cancelable::from_arc(single.0) }
}

enum Slot {
  Empty,
  Assigned(Cancelable),
  CanceledEmpty,
  CanceledAssigned,
}

struct SingleInner(Mutex<Slot>);

impl CancelableLike for SingleInner {
  fn cancel(&self) {
    let child = {
      let mut slot = self.0.lock().unwrap();
      match mem::replace(&mut *slot, Slot::CanceledEmpty) {
        Slot::Assigned(child) => {
          *slot = Slot::CanceledAssigned;
          Some(child)
        }
        Slot::Empty => None,
        prior @ (Slot::CanceledEmpty | Slot::CanceledAssigned) => {
          *slot = prior;
          None
        }
      }
    };
    if let Some(child) = child {
      child.cancel();
    }
  }

  fn is_canceled(&self) -> bool {
    matches!(
      &*self.0.lock().unwrap(),
      Slot::CanceledEmpty | Slot::CanceledAssigned
    )
  }
}
