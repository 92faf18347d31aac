//! Acknowledgement-driven, synchronous push-based reactive streams.
//!
//! An [`Observable`](observable::Observable) pushes values into an
//! [`Observer`](observer::Observer); every `on_next` answers with an
//! [`Ack`](ack::Ack) that tells the producer whether to keep going, and a
//! composable [cancelable](cancelable) substrate coordinates teardown
//! across branching subscriptions.
//!
//! ```
//! use ackstream::prelude::*;
//!
//! let sum = std::sync::Arc::new(std::sync::Mutex::new(0));
//! let sink = sum.clone();
//! from_iter::<_, ()>(1..=5)
//!   .map(|v| v * 2)
//!   .filter(|v| *v > 4)
//!   .fold_left(0, |acc, v| acc + v)
//!   .subscribe(move |v| *sink.lock().unwrap() = v);
//! assert_eq!(*sum.lock().unwrap(), 24);
//! ```
//!
//! The core owns no threads and imposes no timeouts: every callback runs
//! synchronously on whichever thread the producer pushes from, and
//! asynchrony is introduced by producers wired in through
//! [`create`](observable::create).

pub mod ack;
pub mod cancelable;
pub mod function;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod reporter;
