//! Error types for queues, coordination strategies and harness runs.

use std::fmt;

/// Rejected `produce`: the queue is at capacity. Carries the value back.
#[derive(PartialEq, Eq)]
pub struct Full<T>(pub T);

impl<T> Full<T> {
   pub fn into_inner(self) -> T {
      self.0
   }
}

// No `T: Debug` bound so any payload can be rejected.
impl<T> fmt::Debug for Full<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str("Full(..)")
   }
}

impl<T> fmt::Display for Full<T> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.write_str("queue is full")
   }
}

impl<T> std::error::Error for Full<T> {}

/// Rejected `consume`: nothing to take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("queue is empty")]
pub struct Empty;

/// Outcome of a blocking strategy call that did not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoordinationError {
   #[error("operation cancelled: stop was requested")]
   Cancelled,

   #[error("Internal synchronisation error (queue lock poisoned): {message}")]
   Poisoned { message: String },
}

impl CoordinationError {
   pub fn is_cancelled(&self) -> bool {
      matches!(self, CoordinationError::Cancelled)
   }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
   #[error("producer sleep time {value} is outside [{min}, {max}]")]
   ProducerSleepTimeOutOfRange { value: u32, min: u32, max: u32 },

   #[error("consumer sleep time {value} is outside [{min}, {max}]")]
   ConsumerSleepTimeOutOfRange { value: u32, min: u32, max: u32 },

   #[error("run duration must be greater than zero")]
   ZeroRunDuration,
}

/// Crate-level error returned by [`crate::run`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
   #[error("invalid configuration: {0}")]
   Config(#[from] ConfigError),

   #[error(transparent)]
   Coordination(#[from] CoordinationError),

   #[error("failed to spawn {role} thread: {source}")]
   Spawn {
      role: &'static str,
      #[source]
      source: std::io::Error,
   },

   #[error("{role} thread panicked")]
   ThreadPanicked { role: &'static str },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
