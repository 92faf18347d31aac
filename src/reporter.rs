//! The scheduler collaborator: a handle that accepts failures nobody else
//! can observe anymore.
//!
//! The core owns no execution context. The one capability it borrows from
//! the outside world is somewhere to put an error when no error handler was
//! installed, e.g. a one-closure `subscribe` or a future that was dropped
//! before its error arrived.

use std::fmt::Debug;

/// Receives errors that have no downstream left to flow to.
pub trait FailureReporter<Err>: Send + Sync {
  fn report_failure(&self, cause: Err);
}

impl<Err, F> FailureReporter<Err> for F
where
  F: Fn(Err) + Send + Sync,
{
  fn report_failure(&self, cause: Err) { self(cause) }
}

/// The default reporter: hands the failure to the `log` facade at error
/// level.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogReporter;

impl<Err: Debug> FailureReporter<Err> for LogReporter {
  fn report_failure(&self, cause: Err) {
    log::error!("unhandled stream error: {:?}", cause);
  }
}

#[cfg(test)]
mod test {
  use super::*;
  use std::sync::{Arc, Mutex};

  #[test]
  fn closures_are_reporters() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let reporter = move |cause: &'static str| sink.lock().unwrap().push(cause);
    reporter.report_failure("boom");
    assert_eq!(*seen.lock().unwrap(), vec!["boom"]);
  }

  #[test]
  fn log_reporter_accepts_any_debug_error() {
    LogReporter.report_failure("ignored");
    LogReporter.report_failure(42);
  }
}
