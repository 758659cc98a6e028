// Sleep-poll strategy – like busy-wait, but pauses between failed attempts

use super::{lock_queue, ProduceConsume};
use crate::error::{CoordinationError, Full};
use crate::Queue;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

/// Called between failed attempts, with the queue lock released.
pub type Pause = Box<dyn Fn() + Send + Sync>;

pub struct SleepPoll<Q> {
   queue: Mutex<Q>,
   stop: AtomicBool,
   pause: Pause,
}

impl<Q> SleepPoll<Q> {
   /// Yield to the scheduler between attempts.
   pub fn new(queue: Q) -> Self {
      Self::with_pause(queue, Box::new(thread::yield_now))
   }

   /// Sleep for `interval` between attempts.
   pub fn with_sleep(queue: Q, interval: Duration) -> Self {
      Self::with_pause(queue, Box::new(move || thread::sleep(interval)))
   }

   pub fn with_pause(queue: Q, pause: Pause) -> Self {
      Self {
         queue: Mutex::new(queue),
         stop: AtomicBool::new(false),
         pause,
      }
   }

   pub fn set_pause(&mut self, pause: Pause) {
      self.pause = pause;
   }
}

impl<T: Send, Q: Queue<T>> ProduceConsume<T> for SleepPoll<Q> {
   fn produce(&self, value: T) -> Result<(), CoordinationError> {
      let mut pending = value;
      while !self.stop.load(Ordering::Acquire) {
         match lock_queue(&self.queue)?.produce(pending) {
            Ok(()) => return Ok(()),
            Err(Full(v)) => pending = v,
         }
         (self.pause)();
      }
      Err(CoordinationError::Cancelled)
   }

   fn consume(&self) -> Result<T, CoordinationError> {
      while !self.stop.load(Ordering::Acquire) {
         if let Ok(v) = lock_queue(&self.queue)?.consume() {
            return Ok(v);
         }
         (self.pause)();
      }
      // stop observed before any value arrived
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

impl<Q> fmt::Debug for SleepPoll<Q> {
   fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
      f.debug_struct("SleepPoll")
         .field("stop", &self.stop.load(Ordering::Relaxed))
         .finish()
   }
}
