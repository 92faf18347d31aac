use crate::cancelable::Cancelable;
use crate::observable::Observable;
use crate::observer::{Observer, SynchronizedObserver};

/// Routes the subscription through a
/// [`SynchronizedObserver`](crate::observer::SynchronizedObserver), so a
/// downstream that is not safe to call concurrently can sit under
/// operators that fan producers out, like `flat_map`.
///
/// This struct is created by [`Observable::safe`].
#[derive(Clone)]
pub struct SafeOp<S> {
  pub(crate) source: S,
}

impl<S> Observable for SafeOp<S>
where
  S: Observable,
{
  type Item = S::Item;
  type Err = S::Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<S::Item, S::Err> + 'static,
  {
    self.source.actual_subscribe(SynchronizedObserver::new(observer))
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn events_still_flow_in_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (n, c) = (log.clone(), log.clone());
    from_iter::<_, ()>(1..=3).safe().subscribe_all(
      move |v| n.lock().unwrap().push(format!("next {}", v)),
      |_| {},
      move || c.lock().unwrap().push("completed".into()),
    );
    assert_eq!(*log.lock().unwrap(), vec!["next 1", "next 2", "next 3", "completed"]);
  }
}
