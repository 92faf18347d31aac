//! User-callback wrappers shared by all operators that run user code.
//!
//! Every such operator has two constructors: a plain one taking an
//! infallible closure, and a `try_` one taking a closure that may fail with
//! the stream's error type. Both store the callback as a [`NextFn`] so the
//! operator body handles a single shape: a failed call is a *stream error*
//! and is forwarded downstream as `on_error`, after which the operator
//! answers `Stop`.

/// A user callback in either its infallible or fallible form.
///
/// The unused variant's type parameter is filled with a plain `fn` pointer
/// by the operator constructors, so `map` and `try_map` (and friends) share
/// one operator type.
pub enum NextFn<N, T> {
  Plain(N),
  Fallible(T),
}

impl<N, T> NextFn<N, T> {
  /// Run a single-argument callback, normalizing the result to `Result`.
  #[inline]
  pub fn call<In, Out, Err>(&self, value: In) -> Result<Out, Err>
  where
    N: Fn(In) -> Out,
    T: Fn(In) -> Result<Out, Err>,
  {
    match self {
      NextFn::Plain(f) => Ok(f(value)),
      NextFn::Fallible(f) => f(value),
    }
  }

  /// Run a two-argument callback (accumulator style), normalizing the
  /// result to `Result`.
  #[inline]
  pub fn call2<A, B, Out, Err>(&self, a: A, b: B) -> Result<Out, Err>
  where
    N: Fn(A, B) -> Out,
    T: Fn(A, B) -> Result<Out, Err>,
  {
    match self {
      NextFn::Plain(f) => Ok(f(a, b)),
      NextFn::Fallible(f) => f(a, b),
    }
  }
}
