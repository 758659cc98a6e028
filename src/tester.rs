//! Producer/consumer harness.
//!
//! A [`Tester`] owns one strategy (which owns the decorated queue) and runs a
//! single producer and a single consumer against it for a fixed time.

use crate::config::TesterConfig;
use crate::error::{CoordinationError, Error, Result};
use crate::queue::{FifoQueue, SafeQueue, SizeLimitedQueue};
use crate::strategy::{ProduceConsume, StrategyKind};
use crate::{Queue, Value};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Offset between the producer and consumer seeds so the two sleep
/// sequences differ even when both threads start in the same instant.
const CONSUMER_SEED_OFFSET: u64 = 1000;

/// Counters collected by one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunReport {
   pub produced: u64,
   pub consumed: u64,
   /// Deliveries that did not match the next expected value.
   pub out_of_order: u64,
   /// Values still queued after both threads stopped.
   pub left_in_queue: usize,
}

impl RunReport {
   /// Every value was delivered in order or is still queued.
   pub fn is_consistent(&self) -> bool {
      self.out_of_order == 0 && self.produced == self.consumed + self.left_in_queue as u64
   }
}

impl fmt::Display for RunReport {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      write!(
         f,
         "produced {}, consumed {}, out of order {}, left in queue {}",
         self.produced, self.consumed, self.out_of_order, self.left_in_queue
      )
   }
}

/*──────────────────────────────  Tester  ──────────────────────────────────*/

/// Move-only; a tester runs at most once.
pub struct Tester {
   config: TesterConfig,
   strategy: Option<Box<dyn ProduceConsume<Value>>>,
}

impl Tester {
   pub fn config(&self) -> &TesterConfig {
      &self.config
   }

   pub fn has_strategy(&self) -> bool {
      self.strategy.is_some()
   }

   /// Run to completion, logging the outcome.
   ///
   /// Does nothing without a strategy, and nothing on a second call.
   pub fn test(&mut self) {
      match self.execute() {
         Ok(Some(report)) => log::info!("run finished: {}", report),
         Ok(None) => log::debug!("no strategy attached; nothing to run"),
         Err(e) => log::error!("run failed: {}", e),
      }
   }

   /// Like [`Tester::test`], but hands back the counters.
   ///
   /// `Ok(None)` when there is no strategy to run. An invalid config is
   /// rejected before anything is spawned.
   pub fn execute(&mut self) -> Result<Option<RunReport>> {
      if self.strategy.is_none() {
         return Ok(None);
      }
      self.config.validate()?;
      // a strategy is stopped for good after one run
      match self.strategy.take() {
         Some(strategy) => drive(strategy.as_ref(), &self.config).map(Some),
         None => Ok(None),
      }
   }
}

impl fmt::Debug for Tester {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("Tester")
         .field("config", &self.config)
         .field("has_strategy", &self.has_strategy())
         .finish()
   }
}

/*──────────────────────────────  Builder  ─────────────────────────────────*/

#[derive(Debug, Default)]
pub struct TesterBuilder {
   config: TesterConfig,
   with_strategy: bool,
}

impl TesterBuilder {
   pub fn new() -> Self {
      Self::default()
   }

   /// Builder that attaches `config.strategy` on `build`.
   pub fn from_config(config: TesterConfig) -> Self {
      Self { config, with_strategy: true }
   }

   pub fn set_producer_sleep_time(&mut self, micros: u32) -> &mut Self {
      self.config.producer_sleep_time_us = micros;
      self
   }

   pub fn set_consumer_sleep_time(&mut self, micros: u32) -> &mut Self {
      self.config.consumer_sleep_time_us = micros;
      self
   }

   /// Attach the sleep-poll strategy with a fixed 100 µs pause.
   pub fn set_strategy(&mut self) -> &mut Self {
      self.set_strategy_kind(StrategyKind::default())
   }

   pub fn set_strategy_kind(&mut self, kind: StrategyKind) -> &mut Self {
      self.config.strategy = kind;
      self.with_strategy = true;
      self
   }

   pub fn set_capacity(&mut self, capacity: Option<NonZeroUsize>) -> &mut Self {
      self.config.capacity = capacity;
      self
   }

   pub fn set_run_duration(&mut self, duration: Duration) -> &mut Self {
      self.config.run_duration = duration;
      self
   }

   pub fn set_seed(&mut self, seed: u64) -> &mut Self {
      self.config.seed = Some(seed);
      self
   }

   /// Hand over the assembled tester and reset the builder to defaults.
   pub fn build(&mut self) -> Tester {
      let TesterBuilder { config, with_strategy } = std::mem::take(self);
      let strategy = with_strategy.then(|| make_strategy(&config));
      Tester { config, strategy }
   }
}

/// Validate `config`, run one tester built from it and return its counters.
pub fn run(config: TesterConfig) -> Result<RunReport> {
   config.validate()?;
   let strategy = make_strategy(&config);
   drive(strategy.as_ref(), &config)
}

/// Core queue behind the safety decorator, bounded when a capacity is set.
fn make_queue(capacity: Option<NonZeroUsize>) -> Box<dyn Queue<Value>> {
   let safe = SafeQueue::new(FifoQueue::new());
   match capacity {
      Some(max) => Box::new(SizeLimitedQueue::new(safe, max.get())),
      None => Box::new(safe),
   }
}

fn make_strategy(config: &TesterConfig) -> Box<dyn ProduceConsume<Value>> {
   config.strategy.build(make_queue(config.capacity))
}

/*───────────────────────────────  Run  ────────────────────────────────────*/

#[derive(Debug, Default)]
struct ConsumerTally {
   consumed: u64,
   out_of_order: u64,
}

/// Uniform in `[t/2, t*3/2)` microseconds. `sleep_time_us` is validated
/// to be at least 1 before any run starts.
fn random_sleep(rng: &mut StdRng, sleep_time_us: u32) -> Duration {
   let t = u64::from(sleep_time_us);
   let low = t / 2;
   Duration::from_micros(rng.gen_range(low..low + t))
}

fn produce_loop(
   strategy: &dyn ProduceConsume<Value>,
   stop: &AtomicBool,
   sleep_time_us: u32,
   seed: u64,
) -> Result<u64, CoordinationError> {
   let mut rng = StdRng::seed_from_u64(seed);
   let mut next: Value = 0;
   while !stop.load(Ordering::Acquire) {
      thread::sleep(random_sleep(&mut rng, sleep_time_us));
      match strategy.produce(next) {
         Ok(()) => {
            log::trace!("produced {}", next);
            next += 1;
         }
         Err(CoordinationError::Cancelled) => break,
         Err(e) => return Err(e),
      }
   }
   Ok(next as u64)
}

fn consume_loop(
   strategy: &dyn ProduceConsume<Value>,
   stop: &AtomicBool,
   sleep_time_us: u32,
   seed: u64,
) -> Result<ConsumerTally, CoordinationError> {
   let mut rng = StdRng::seed_from_u64(seed);
   let mut expected: Value = 0;
   let mut tally = ConsumerTally::default();
   while !stop.load(Ordering::Acquire) {
      thread::sleep(random_sleep(&mut rng, sleep_time_us));
      match strategy.consume() {
         Ok(v) => {
            log::trace!("consumed {}", v);
            if v != expected {
               log::warn!("expected {} but consumed {}", expected, v);
               tally.out_of_order += 1;
            }
            expected = v + 1;
            tally.consumed += 1;
         }
         Err(CoordinationError::Cancelled) => break,
         Err(e) => return Err(e),
      }
   }
   Ok(tally)
}

/// Spawn both sides, let them run for `run_duration`, then stop and join.
fn drive(strategy: &dyn ProduceConsume<Value>, config: &TesterConfig) -> Result<RunReport> {
   let stop = AtomicBool::new(false);
   let seed = config.seed.unwrap_or_else(rand::random);
   let request_stop = || {
      stop.store(true, Ordering::Release);
      strategy.request_stop();
   };

   log::debug!(
      "starting {} run for {:?} (capacity {:?}, seed {})",
      config.strategy,
      config.run_duration,
      config.capacity,
      seed
   );

   let joined = crossbeam::scope(|s| -> Result<(u64, ConsumerTally)> {
      let producer = s
         .builder()
         .name("producer".to_owned())
         .spawn(|_| produce_loop(strategy, &stop, config.producer_sleep_time_us, seed))
         .map_err(|source| Error::Spawn { role: "producer", source })?;

      let consumer = match s
         .builder()
         .name("consumer".to_owned())
         .spawn(|_| {
            consume_loop(
               strategy,
               &stop,
               config.consumer_sleep_time_us,
               seed.wrapping_add(CONSUMER_SEED_OFFSET),
            )
         }) {
         Ok(handle) => handle,
         Err(source) => {
            request_stop();
            let _ = producer.join();
            return Err(Error::Spawn { role: "consumer", source });
         }
      };

      thread::sleep(config.run_duration);
      request_stop();

      let produced = producer.join();
      let consumed = consumer.join();
      let produced = produced.map_err(|_| Error::ThreadPanicked { role: "producer" })??;
      let tally = consumed.map_err(|_| Error::ThreadPanicked { role: "consumer" })??;
      Ok((produced, tally))
   });

   let (produced, tally) = joined.map_err(|_| Error::ThreadPanicked { role: "harness" })??;
   let report = RunReport {
      produced,
      consumed: tally.consumed,
      out_of_order: tally.out_of_order,
      left_in_queue: strategy.queue_size()?,
   };
   log::debug!("{} run done: {}", config.strategy, report);
   Ok(report)
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::error::ConfigError;

   #[test]
   fn random_sleep_stays_in_range() {
      let mut rng = StdRng::seed_from_u64(7);
      for t in [1u32, 2, 3, 100, 1000] {
         for _ in 0..200 {
            let d = random_sleep(&mut rng, t).as_micros() as u64;
            let t = u64::from(t);
            assert!(d >= t / 2 && d < t / 2 + t, "{} outside range for {}", d, t);
         }
      }
   }

   #[test]
   fn builder_resets_after_build() {
      let mut builder = TesterBuilder::new();
      builder.set_producer_sleep_time(5).set_strategy();
      let tester = builder.build();
      assert!(tester.has_strategy());
      assert_eq!(tester.config().producer_sleep_time_us, 5);

      let fresh = builder.build();
      assert!(!fresh.has_strategy());
      assert_eq!(fresh.config(), &TesterConfig::default());
   }

   #[test]
   fn builder_tester_rejects_out_of_range_sleep_time() {
      let mut builder = TesterBuilder::new();
      builder.set_producer_sleep_time(0).set_strategy();
      let mut tester = builder.build();

      match tester.execute() {
         Err(Error::Config(ConfigError::ProducerSleepTimeOutOfRange { value: 0, .. })) => {}
         other => panic!("expected config error, got {:?}", other),
      }
      // rejected before the strategy was consumed
      assert!(tester.has_strategy());
      tester.test();
   }

   #[test]
   fn report_consistency() {
      let ok = RunReport { produced: 5, consumed: 3, out_of_order: 0, left_in_queue: 2 };
      assert!(ok.is_consistent());
      let lost = RunReport { produced: 5, consumed: 3, out_of_order: 0, left_in_queue: 1 };
      assert!(!lost.is_consistent());
   }
}
