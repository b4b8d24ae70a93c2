use thiserror::Error;

/// Why waiting for a signal did not produce a result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WaitError<E> {
  /// The signal terminated with this error.
  #[error("signal failed: {0:?}")]
  Source(E),
  /// No terminal event arrived in time. The subscription has been disposed.
  #[error("timed out waiting for the signal")]
  TimedOut,
}

impl<E> WaitError<E> {
  pub fn is_timeout(&self) -> bool { matches!(self, WaitError::TimedOut) }

  /// The source error, if that is what this is.
  pub fn into_source(self) -> Option<E> {
    match self {
      WaitError::Source(e) => Some(e),
      WaitError::TimedOut => None,
    }
  }
}
