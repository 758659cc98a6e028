// Wait/notify strategy – park on a condition variable until the queue
// state the caller needs is reached, or stop is requested.
//
// A producer only parks on a full queue and a consumer only parks on an
// empty one, so the side that ends a full/empty state is the one that
// wakes the other. All checks happen under the queue lock, and `wait`
// releases that lock atomically, so no wake-up can fall between a failed
// attempt and parking.

use super::{lock_queue, wait_on, ProduceConsume};
use crate::error::{CoordinationError, Full};
use crate::Queue;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};

#[derive(Debug)]
pub struct WaitNotify<Q> {
   queue: Mutex<Q>,
   stop: AtomicBool,
   on_consume_from_full: Condvar, // wakes the producer
   on_produce_to_empty: Condvar,  // wakes the consumer
}

impl<Q> WaitNotify<Q> {
   pub fn new(queue: Q) -> Self {
      Self {
         queue: Mutex::new(queue),
         stop: AtomicBool::new(false),
         on_consume_from_full: Condvar::new(),
         on_produce_to_empty: Condvar::new(),
      }
   }
}

impl<T: Send, Q: Queue<T>> ProduceConsume<T> for WaitNotify<Q> {
   fn produce(&self, value: T) -> Result<(), CoordinationError> {
      let mut pending = value;
      let mut queue = lock_queue(&self.queue)?;
      loop {
         if self.stop.load(Ordering::Acquire) {
            return Err(CoordinationError::Cancelled);
         }
         let was_empty = queue.empty();
         match queue.produce(pending) {
            Ok(()) => {
               if was_empty {
                  self.on_produce_to_empty.notify_one();
               }
               return Ok(());
            }
            // spurious wake-ups land back here and retry against real state
            Err(Full(v)) => {
               pending = v;
               queue = wait_on(&self.on_consume_from_full, queue)?;
            }
         }
      }
   }

   fn consume(&self) -> Result<T, CoordinationError> {
      let mut queue = lock_queue(&self.queue)?;
      loop {
         if self.stop.load(Ordering::Acquire) {
            return Err(CoordinationError::Cancelled);
         }
         let was_full = queue.full();
         match queue.consume() {
            Ok(v) => {
               if was_full {
                  self.on_consume_from_full.notify_one();
               }
               return Ok(v);
            }
            Err(_) => queue = wait_on(&self.on_produce_to_empty, queue)?,
         }
      }
   }

   fn request_stop(&self) {
      self.stop.store(true, Ordering::Release);
      // Taking the lock once orders the store before any waiter's next
      // check: a thread that saw `stop == false` is parked by now.
      drop(self.queue.lock());
      self.on_consume_from_full.notify_all();
      self.on_produce_to_empty.notify_all();
   }

   fn is_stopped(&self) -> bool {
      self.stop.load(Ordering::Acquire)
   }

   fn queue_size(&self) -> Result<usize, CoordinationError> {
      Ok(lock_queue(&self.queue)?.size())
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::{FifoQueue, SafeQueue, SizeLimitedQueue, Value};
   use std::thread;
   use std::time::Duration;

   type Bounded = SizeLimitedQueue<SafeQueue<FifoQueue<Value>>>;

   fn bounded(max: usize) -> WaitNotify<Bounded> {
      WaitNotify::new(SizeLimitedQueue::new(SafeQueue::new(FifoQueue::new()), max))
   }

   #[test]
   fn stop_releases_both_parked_sides() {
      // capacity 1 and full: the producer parks
      let full = bounded(1);
      let empty = bounded(1);
      let pc_full: &dyn ProduceConsume<Value> = &full;
      let pc_empty: &dyn ProduceConsume<Value> = &empty;
      pc_full.produce(0).unwrap();

      thread::scope(|s| {
         let producer = s.spawn(|| pc_full.produce(1));
         let consumer = s.spawn(|| pc_empty.consume());
         thread::sleep(Duration::from_millis(50));
         pc_full.request_stop();
         pc_empty.request_stop();
         assert_eq!(producer.join().unwrap(), Err(CoordinationError::Cancelled));
         assert_eq!(consumer.join().unwrap(), Err(CoordinationError::Cancelled));
      });
   }

   #[test]
   fn request_stop_is_idempotent() {
      let owned = bounded(2);
      let pc: &dyn ProduceConsume<Value> = &owned;
      pc.request_stop();
      pc.request_stop();
      assert!(pc.is_stopped());
      assert_eq!(pc.produce(1), Err(CoordinationError::Cancelled));
   }
}
