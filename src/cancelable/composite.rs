use std::mem;
use std::sync::{Arc, Mutex};

use smallvec::SmallVec;

use crate::cancelable::{Cancelable, CancelableLike};

/// A cancelable that owns a dynamic set of children.
///
/// `add` inserts a child, unless the composite is already canceled, in
/// which case the child is canceled on the spot instead. `remove` forgets a
/// child *without* canceling it, which is how operators release a branch
/// that completed on its own. `cancel` cancels every current child exactly
/// once.
///
/// Children are keyed by the identity of their shared state, so removing
/// and re-adding the same handle behaves like a set of objects, not a set
/// of values.
#[derive(Clone)]
pub struct CompositeCancelable(Arc<CompositeInner>);

impl CompositeCancelable {
  pub fn new() -> Self {
    CompositeCancelable(Arc::new(CompositeInner(Mutex::new(CompositeState {
      canceled: false,
      children: SmallVec::new(),
    }))))
  }

  /// Insert a child, or cancel it immediately if the composite is already
  /// canceled.
  pub fn add(&self, child: Cancelable) {
    let cancel_now = {
      let mut state = self.0 .0.lock().unwrap();
      if state.canceled {
        true
      } else {
        state.children.push(child.clone());
        false
      }
    };
    if cancel_now {
      child.cancel();
    }
  }

  /// Remove a child without canceling it. A child that is not present is
  /// ignored.
  pub fn remove(&self, child: &Cancelable) {
    let mut state = self.0 .0.lock().unwrap();
    if let Some(pos) = state
      .children
      .iter()
      .position(|c| c.inner_addr() == child.inner_addr())
    {
      state.children.remove(pos);
    }
  }

  pub fn cancel(&self) { self.0.cancel() }

  pub fn is_canceled(&self) -> bool { self.0.is_canceled() }

  #[cfg(test)]
  pub(crate) fn len(&self) -> usize { self.0 .0.lock().unwrap().children.len() }
}

impl Default for CompositeCancelable {
  fn default() -> Self { Self::new() }
}

impl From<CompositeCancelable> for Cancelable {
  fn from(composite: CompositeCancelable) -> Cancelable { Cancelable::from_arc(composite.0) }
}

struct CompositeState {
  canceled: bool,
  children: SmallVec<[Cancelable; 2]>,
}

struct CompositeInner(Mutex<CompositeState>);

impl CancelableLike for CompositeInner {
  fn cancel(&self) {
    let children = {
      let mut state = self.0.lock().unwrap();
      if state.canceled {
        return;
      }
      state.canceled = true;
      mem::take(&mut state.children)
    };
    for child in children {
      child.cancel();
    }
  }

  fn is_canceled(&self) -> bool { self.0.lock().unwrap().canceled }
}
