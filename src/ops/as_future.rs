use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use pin_project_lite::pin_project;

use crate::ack::Ack;
use crate::cancelable::Cancelable;
use crate::observable::Observable;
use crate::observer::Observer;
use crate::reporter::FailureReporter;

pin_project! {
  /// Resolves with the first element of a stream.
  ///
  /// Created by [`Observable::as_future`]. The output is
  /// `Ok(Some(first))`, `Ok(None)` for an empty stream, or `Err(e)` if the
  /// stream failed first. Dropping the future cancels the underlying
  /// subscription.
  pub struct AsFuture<T, E> {
    #[pin]
    receiver: oneshot::Receiver<Result<Option<T>, E>>,
    subscription: Cancelable,
  }

  impl<T, E> PinnedDrop for AsFuture<T, E> {
    fn drop(this: Pin<&mut Self>) {
      this.project().subscription.cancel();
    }
  }
}

impl<T, E> Future for AsFuture<T, E> {
  type Output = Result<Option<T>, E>;

  fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
    match self.project().receiver.poll(cx) {
      Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
      // Sender gone without a verdict: the subscription was torn down
      // before any terminal event, which reads as an empty stream.
      Poll::Ready(Err(oneshot::Canceled)) => Poll::Ready(Ok(None)),
      Poll::Pending => Poll::Pending,
    }
  }
}

pub(crate) fn subscribe_first<S, R>(source: &S, reporter: R) -> AsFuture<S::Item, S::Err>
where
  S: Observable,
  R: FailureReporter<S::Err> + 'static,
{
  let (sender, receiver) = oneshot::channel();
  let subscription = source.actual_subscribe(FirstValueObserver {
    slot: Mutex::new(Some(sender)),
    reporter,
  });
  AsFuture { receiver, subscription }
}

struct FirstValueObserver<T, E, R> {
  slot: Mutex<Option<oneshot::Sender<Result<Option<T>, E>>>>,
  reporter: R,
}

impl<T, E, R> Observer<T, E> for FirstValueObserver<T, E, R>
where
  T: Send,
  E: Send,
  R: FailureReporter<E>,
{
  fn on_next(&self, value: T) -> Ack {
    if let Some(sender) = self.slot.lock().unwrap().take() {
      // A dropped future means nobody is waiting; the value is discarded.
      let _ = sender.send(Ok(Some(value)));
    }
    Ack::Stop
  }

  fn on_error(&self, err: E) {
    match self.slot.lock().unwrap().take() {
      Some(sender) => {
        if let Err(Err(unseen)) = sender.send(Err(err)) {
          self.reporter.report_failure(unseen);
        }
      }
      None => self.reporter.report_failure(err),
    }
  }

  fn on_completed(&self) {
    if let Some(sender) = self.slot.lock().unwrap().take() {
      let _ = sender.send(Ok(None));
    }
  }
}

#[cfg(test)]
mod test {
  use crate::prelude::*;
  use futures::executor::block_on;
  use std::sync::{Arc, Mutex};

  #[test]
  fn resolves_with_the_first_value() {
    let future = from_iter::<_, ()>(vec![5, 6, 7]).as_future();
    assert_eq!(block_on(future), Ok(Some(5)));
  }

  #[test]
  fn resolves_none_on_empty() {
    let future = empty::<i32, ()>().as_future();
    assert_eq!(block_on(future), Ok(None));
  }

  #[test]
  fn resolves_with_the_error() {
    let future = throw::<i32, _>("gone").as_future();
    assert_eq!(block_on(future), Err("gone"));
  }

  #[test]
  fn stops_the_producer_after_one_item() {
    let produced = Arc::new(Mutex::new(0));
    let counter = produced.clone();
    let future = from_iter::<_, ()>(1..=100)
      .do_work(move |_| *counter.lock().unwrap() += 1)
      .as_future();
    assert_eq!(block_on(future), Ok(Some(1)));
    assert_eq!(*produced.lock().unwrap(), 1);
  }

  #[test]
  fn orphaned_error_goes_to_the_reporter() {
    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink = reported.clone();
    let future = throw::<i32, &'static str>("lost")
      .as_future_with(move |e: &'static str| sink.lock().unwrap().push(e));
    drop(future);
    // throw emitted synchronously during subscribe, before the drop; the
    // receiver was still alive, so nothing was reported...
    assert!(reported.lock().unwrap().is_empty());

    // ...but an error arriving after the first value has claimed the slot
    // has nowhere to go and is reported.
    let reported = Arc::new(Mutex::new(Vec::new()));
    let sink = reported.clone();
    let parked: Arc<Mutex<Vec<DynObserver<i32, &'static str>>>> = Arc::new(Mutex::new(Vec::new()));
    let stash = parked.clone();
    let future = create(move |observer: DynObserver<i32, &'static str>| {
      stash.lock().unwrap().push(observer);
      Cancelable::new()
    })
    .as_future_with(move |e: &'static str| sink.lock().unwrap().push(e));

    let observer = parked.lock().unwrap().pop().unwrap();
    observer.on_next(1);
    observer.on_error("late");
    assert_eq!(block_on(future), Ok(Some(1)));
    assert_eq!(*reported.lock().unwrap(), vec!["late"]);
  }
}
