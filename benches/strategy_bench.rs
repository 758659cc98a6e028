use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use bounded_prodcons::{
   FifoQueue, ProduceConsume, SafeQueue, SizeLimitedQueue, StrategyKind, Value,
};

const RING_CAP: usize = 64;
const ITERS: Value = 100_000;

fn make(kind: StrategyKind) -> Arc<dyn ProduceConsume<Value>> {
   let queue = SizeLimitedQueue::new(SafeQueue::new(FifoQueue::new()), RING_CAP);
   Arc::from(kind.build(queue))
}

// Push ITERS values from a producer thread and time the consumer side.
fn thread_and_run(kind: StrategyKind) -> Duration {
   let pc = make(kind);
   let pc_producer = Arc::clone(&pc);
   let producer = thread::spawn(move || {
      for i in 0..ITERS {
         pc_producer.produce(i).expect("producer cancelled");
      }
   });

   let start = Instant::now();
   for _ in 0..ITERS {
      pc.consume().expect("consumer cancelled");
   }
   let duration = start.elapsed();
   producer.join().expect("producer panicked");
   duration
}

fn bench_strategies(c: &mut Criterion) {
   let mut group = c.benchmark_group("strategy (threads)");
   group.throughput(Throughput::Elements(ITERS as u64));
   let kinds = [
      StrategyKind::BusyWait,
      StrategyKind::SleepPoll { pause: None },
      StrategyKind::SleepPoll { pause: Some(Duration::from_micros(10)) },
      StrategyKind::WaitNotify,
   ];
   for kind in kinds {
      group.bench_function(BenchmarkId::from_parameter(kind), |b| {
         b.iter_custom(|iters| (0..iters).map(|_| thread_and_run(kind)).sum())
      });
   }
   group.finish();
}

fn custom_criterion() -> Criterion {
   Criterion::default()
      .warm_up_time(Duration::from_secs(2))
      .measurement_time(Duration::from_secs(10))
      .sample_size(20)
}

criterion_group! {
   name = benches;
   config = custom_criterion();
   targets = bench_strategies
}
criterion_main!(benches);
