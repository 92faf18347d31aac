use crate::cancelable::Cancelable;
use crate::observable::Observable;
use crate::observer::Observer;

/// One of two observables with the same item and error types.
///
/// Lets heterogeneous sources travel through item-typed machinery: `merge`
/// feeds a two-element sequence of these through `flatten`.
#[derive(Clone)]
pub enum EitherObservable<A, B> {
  Left(A),
  Right(B),
}

impl<A, B> Observable for EitherObservable<A, B>
where
  A: Observable,
  B: Observable<Item = A::Item, Err = A::Err>,
{
  type Item = A::Item;
  type Err = A::Err;

  fn actual_subscribe<O>(&self, observer: O) -> Cancelable
  where
    O: Observer<A::Item, A::Err> + 'static,
  {
    match self {
      EitherObservable::Left(a) => a.actual_subscribe(observer),
      EitherObservable::Right(b) => b.actual_subscribe(observer),
    }
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use crate::prelude::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn delegates_to_the_held_source() {
    let left: EitherObservable<_, FromIter<Vec<i32>, ()>> =
      EitherObservable::Left(from_iter::<_, ()>(vec![1]));
    let right: EitherObservable<FromIter<Vec<i32>, ()>, _> =
      EitherObservable::Right(from_iter::<_, ()>(vec![2]));

    let seen = Arc::new(Mutex::new(Vec::new()));
    let (a, b) = (seen.clone(), seen.clone());
    left.subscribe(move |v| a.lock().unwrap().push(v));
    right.subscribe(move |v| b.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
  }
}
