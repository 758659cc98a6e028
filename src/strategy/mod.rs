//! Coordination strategies: how a producer or consumer waits for the shared
//! queue to accept or yield a value.
//!
//! Every strategy owns the (decorated) queue behind a single mutex, so the
//! queue is never touched by both sides at once, and carries a stop flag that
//! only ever goes from `false` to `true`.

mod busy;
mod sleep;
mod wait;

pub use busy::BusyWait;
pub use sleep::{Pause, SleepPoll};
pub use wait::WaitNotify;

use crate::error::CoordinationError;
use crate::Queue;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::Duration;

/// Blocking produce/consume over a shared queue.
///
/// One producer thread and one consumer thread may call into the same
/// instance concurrently. Concurrent calls to the same operation are not
/// supported.
pub trait ProduceConsume<T: Send>: Send + Sync {
   /// Block until `value` is accepted or stop is requested.
   fn produce(&self, value: T) -> Result<(), CoordinationError>;

   /// Block until a value is available or stop is requested.
   fn consume(&self) -> Result<T, CoordinationError>;

   /// Ask every blocked and future call to give up with
   /// [`CoordinationError::Cancelled`]. Idempotent.
   fn request_stop(&self);

   fn is_stopped(&self) -> bool;

   /// Number of values currently held by the queue.
   fn queue_size(&self) -> Result<usize, CoordinationError>;
}

/// Construction-time choice of strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
   BusyWait,
   /// `pause: None` yields to the scheduler between attempts.
   SleepPoll { pause: Option<Duration> },
   WaitNotify,
}

impl StrategyKind {
   /// Sleep-poll with the fixed 100 µs pause used by the default harness.
   pub const DEFAULT_SLEEP: Duration = Duration::from_micros(100);

   /// Wrap `queue` in the chosen strategy.
   pub fn build<T, Q>(self, queue: Q) -> Box<dyn ProduceConsume<T>>
   where
      T: Send + 'static,
      Q: Queue<T> + 'static,
   {
      match self {
         StrategyKind::BusyWait => Box::new(BusyWait::new(queue)),
         StrategyKind::SleepPoll { pause: None } => Box::new(SleepPoll::new(queue)),
         StrategyKind::SleepPoll { pause: Some(d) } => Box::new(SleepPoll::with_sleep(queue, d)),
         StrategyKind::WaitNotify => Box::new(WaitNotify::new(queue)),
      }
   }
}

impl Default for StrategyKind {
   fn default() -> Self {
      StrategyKind::SleepPoll { pause: Some(Self::DEFAULT_SLEEP) }
   }
}

impl fmt::Display for StrategyKind {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      match self {
         StrategyKind::BusyWait => f.write_str("busy-wait"),
         StrategyKind::SleepPoll { pause: None } => f.write_str("sleep-poll (yield)"),
         StrategyKind::SleepPoll { pause: Some(d) } => write!(f, "sleep-poll ({:?})", d),
         StrategyKind::WaitNotify => f.write_str("wait-notify"),
      }
   }
}

/*──────────────────────────  shared lock helpers  ─────────────────────────*/

fn poisoned(detail: impl fmt::Display) -> CoordinationError {
   CoordinationError::Poisoned {
      message: format!(
         "a panic occurred while holding the queue lock. PoisonError: {}",
         detail
      ),
   }
}

/// Lock the queue, turning poisoning into a coordination error.
pub(crate) fn lock_queue<Q>(queue: &Mutex<Q>) -> Result<MutexGuard<'_, Q>, CoordinationError> {
   queue.lock().map_err(poisoned)
}

/// Park on `cond`, releasing `guard` while parked.
pub(crate) fn wait_on<'a, Q>(
   cond: &Condvar,
   guard: MutexGuard<'a, Q>,
) -> Result<MutexGuard<'a, Q>, CoordinationError> {
   cond.wait(guard).map_err(poisoned)
}
