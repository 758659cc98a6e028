// Busy-wait strategy – retry under the lock until success or stop, no backoff

use super::{lock_queue, ProduceConsume};
use crate::error::{CoordinationError, Full};
use crate::Queue;
use std::hint::spin_loop;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug)]
pub struct BusyWait<Q> {
   queue: Mutex<Q>,
   stop: AtomicBool,
}

impl<Q> BusyWait<Q> {
   pub fn new(queue: Q) -> Self {
      Self {
         queue: Mutex::new(queue),
         stop: AtomicBool::new(false),
      }
   }
}

impl<T: Send, Q: Queue<T>> ProduceConsume<T> for BusyWait<Q> {
   fn produce(&self, value: T) -> Result<(), CoordinationError> {
      let mut pending = value;
      while !self.stop.load(Ordering::Acquire) {
         // guard dropped at the end of each attempt
         match lock_queue(&self.queue)?.produce(pending) {
            Ok(()) => return Ok(()),
            Err(Full(v)) => pending = v,
         }
         spin_loop();
      }
      Err(CoordinationError::Cancelled)
   }

   fn consume(&self) -> Result<T, CoordinationError> {
      while !self.stop.load(Ordering::Acquire) {
         if let Ok(v) = lock_queue(&self.queue)?.consume() {
            return Ok(v);
         }
         spin_loop();
      }
      Err(CoordinationError::Cancelled)
   }

   fn request_stop(&self) {
      self.stop.store(true, Ordering::Release);
   }

   fn is_stopped(&self) -> bool {
      self.stop.load(Ordering::Acquire)
   }

   fn queue_size(&self) -> Result<usize, CoordinationError> {
      Ok(lock_queue(&self.queue)?.size())
   }
}
