use crate::ack::Ack;
use crate::observer::Observer;

/// An observer assembled from closures, the shape behind the
/// `subscribe`/`subscribe_err`/`subscribe_all` conveniences.
///
/// `on_next` invokes the next-closure and then answers [`Ack::Continue`]:
/// an anonymous observer never short-circuits on its own. When built
/// through the one-closure `subscribe`, the error slot routes to a
/// [`FailureReporter`](crate::reporter::FailureReporter) and the completion
/// slot is a no-op.
#[derive(Clone)]
pub struct AnonymousObserver<N, E, C> {
  next: N,
  error: E,
  complete: C,
}

impl<N, E, C> AnonymousObserver<N, E, C> {
  pub fn new(next: N, error: E, complete: C) -> Self {
    AnonymousObserver { next, error, complete }
  }
}

impl<Item, Err, N, E, C> Observer<Item, Err> for AnonymousObserver<N, E, C>
where
  N: Fn(Item) + Send + Sync,
  E: Fn(Err) + Send + Sync,
  C: Fn() + Send + Sync,
{
  #[inline]
  fn on_next(&self, value: Item) -> Ack {
    (self.next)(value);
    Ack::Continue
  }

  #[inline]
  fn on_error(&self, err: Err) { (self.error)(err) }

  #[inline]
  fn on_completed(&self) { (self.complete)() }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn invokes_each_slot() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let (n, e, c) = (log.clone(), log.clone(), log.clone());
    let observer = AnonymousObserver::new(
      move |v: i32| n.lock().unwrap().push(format!("next {}", v)),
      move |err: &'static str| e.lock().unwrap().push(format!("error {}", err)),
      move || c.lock().unwrap().push("completed".to_string()),
    );

    assert_eq!(observer.on_next(1), Ack::Continue);
    assert_eq!(observer.on_next(2), Ack::Continue);
    observer.on_completed();
    observer.on_error("late");

    assert_eq!(
      *log.lock().unwrap(),
      vec!["next 1", "next 2", "completed", "error late"]
    );
  }
}
