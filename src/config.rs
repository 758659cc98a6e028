//! Harness configuration.

use crate::error::ConfigError;
use crate::strategy::StrategyKind;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Smallest accepted sleep time, in microseconds.
pub const MIN_SLEEP_TIME_US: u32 = 1;
/// Largest accepted sleep time, in microseconds.
pub const MAX_SLEEP_TIME_US: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TesterConfig {
   /// Mean pause between two produces, in microseconds.
   pub producer_sleep_time_us: u32,
   /// Mean pause between two consumes, in microseconds.
   pub consumer_sleep_time_us: u32,
   /// How long both threads run before stop is requested.
   pub run_duration: Duration,
   /// Queue bound; `None` leaves the queue unbounded.
   pub capacity: Option<NonZeroUsize>,
   pub strategy: StrategyKind,
   /// Fixed seed for reproducible sleep patterns.
   pub seed: Option<u64>,
}

impl Default for TesterConfig {
   fn default() -> Self {
      Self {
         producer_sleep_time_us: 100,
         consumer_sleep_time_us: 100,
         run_duration: Duration::from_secs(10),
         capacity: NonZeroUsize::new(16),
         strategy: StrategyKind::default(),
         seed: None,
      }
   }
}

impl TesterConfig {
   pub fn validate(&self) -> Result<(), ConfigError> {
      let range = MIN_SLEEP_TIME_US..=MAX_SLEEP_TIME_US;
      if !range.contains(&self.producer_sleep_time_us) {
         return Err(ConfigError::ProducerSleepTimeOutOfRange {
            value: self.producer_sleep_time_us,
            min: MIN_SLEEP_TIME_US,
            max: MAX_SLEEP_TIME_US,
         });
      }
      if !range.contains(&self.consumer_sleep_time_us) {
         return Err(ConfigError::ConsumerSleepTimeOutOfRange {
            value: self.consumer_sleep_time_us,
            min: MIN_SLEEP_TIME_US,
            max: MAX_SLEEP_TIME_US,
         });
      }
      if self.run_duration.is_zero() {
         return Err(ConfigError::ZeroRunDuration);
      }
      Ok(())
   }
}
