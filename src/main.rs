use bounded_prodcons::config::{MAX_SLEEP_TIME_US, MIN_SLEEP_TIME_US};
use bounded_prodcons::logging::init_logging;
use bounded_prodcons::{run, StrategyKind, TesterConfig};
use clap::{Parser, ValueEnum};
use std::num::NonZeroUsize;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
   /// Retry under the lock with no pause
   Busy,
   /// Sleep `--poll-interval` between attempts
   Sleep,
   /// Yield to the scheduler between attempts
   Yield,
   /// Park on condition variables
   Wait,
}

/// Run one producer and one consumer against a bounded queue.
#[derive(Debug, Parser)]
#[command(name = "prodcons", version)]
struct Args {
   /// Mean pause between produces, in microseconds
   #[arg(short = 'p', long, default_value_t = 100,
         value_parser = clap::value_parser!(u32).range(MIN_SLEEP_TIME_US as i64..=MAX_SLEEP_TIME_US as i64))]
   producer_sleep_time: u32,

   /// Mean pause between consumes, in microseconds
   #[arg(short = 'c', long, default_value_t = 100,
         value_parser = clap::value_parser!(u32).range(MIN_SLEEP_TIME_US as i64..=MAX_SLEEP_TIME_US as i64))]
   consumer_sleep_time: u32,

   #[arg(short, long, value_enum, default_value_t = StrategyArg::Sleep)]
   strategy: StrategyArg,

   /// Sleep-poll interval, in microseconds
   #[arg(long, default_value_t = 100)]
   poll_interval: u64,

   /// Queue bound
   #[arg(long, default_value = "16", conflicts_with = "unbounded")]
   capacity: NonZeroUsize,

   /// Do not bound the queue
   #[arg(long)]
   unbounded: bool,

   /// Run time, in milliseconds
   #[arg(short, long, default_value_t = 10_000)]
   duration_ms: u64,

   /// Seed for the producer/consumer sleep patterns
   #[arg(long)]
   seed: Option<u64>,

   /// Log level spec, e.g. `debug` or `bounded_prodcons=trace`
   #[arg(long, default_value = "info")]
   log_level: String,
}

impl Args {
   fn into_config(self) -> TesterConfig {
      let strategy = match self.strategy {
         StrategyArg::Busy => StrategyKind::BusyWait,
         StrategyArg::Sleep => StrategyKind::SleepPoll {
            pause: Some(Duration::from_micros(self.poll_interval)),
         },
         StrategyArg::Yield => StrategyKind::SleepPoll { pause: None },
         StrategyArg::Wait => StrategyKind::WaitNotify,
      };
      TesterConfig {
         producer_sleep_time_us: self.producer_sleep_time,
         consumer_sleep_time_us: self.consumer_sleep_time,
         run_duration: Duration::from_millis(self.duration_ms),
         capacity: (!self.unbounded).then_some(self.capacity),
         strategy,
         seed: self.seed,
      }
   }
}

fn main() -> ExitCode {
   let args = Args::parse();
   if let Err(e) = init_logging(Some(&args.log_level)) {
      eprintln!("failed to initialise logging: {}", e);
      return ExitCode::FAILURE;
   }

   let config = args.into_config();
   log::info!("running {} for {:?}", config.strategy, config.run_duration);
   match run(config) {
      Ok(report) => {
         log::info!("{}", report);
         println!("Done!");
         ExitCode::SUCCESS
      }
      Err(e) => {
         log::error!("FATAL: {}", e);
         ExitCode::FAILURE
      }
   }
}
