pub mod config;
pub mod error;
pub mod logging;
pub mod queue;
pub mod strategy;
pub mod tester;

pub use config::TesterConfig;
pub use error::{ConfigError, CoordinationError, Empty, Error, Full};
pub use queue::{FifoQueue, SafeQueue, SizeLimitedQueue};
pub use strategy::{BusyWait, ProduceConsume, SleepPoll, StrategyKind, WaitNotify};
pub use tester::{run, RunReport, Tester, TesterBuilder};

/// Payload moved between producer and consumer by the harness.
pub type Value = i64;

/// Common interface for the core queue and every decorator around it.
///
/// Implementations are not synchronised; callers share them behind a lock.
pub trait Queue<T>: Send {
   /// Append `value`. A rejected value is handed back inside `Full`.
   fn produce(&mut self, value: T) -> Result<(), Full<T>>;
   /// Remove the oldest value.
   fn consume(&mut self) -> Result<T, Empty>;

   fn empty(&self) -> bool;
   /// True when a subsequent `produce` will be rejected.
   fn full(&self) -> bool {
      false
   }
   fn size(&self) -> usize;
}

impl<T, Q: Queue<T> + ?Sized> Queue<T> for Box<Q> {
   #[inline]
   fn produce(&mut self, value: T) -> Result<(), Full<T>> {
      (**self).produce(value)
   }

   #[inline]
   fn consume(&mut self) -> Result<T, Empty> {
      (**self).consume()
   }

   #[inline]
   fn empty(&self) -> bool {
      (**self).empty()
   }

   #[inline]
   fn full(&self) -> bool {
      (**self).full()
   }

   #[inline]
   fn size(&self) -> usize {
      (**self).size()
   }
}
