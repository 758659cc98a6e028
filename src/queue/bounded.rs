// Capacity decorator – refuses to produce beyond `max_size`

use crate::error::{Empty, Full};
use crate::Queue;

#[derive(Debug)]
pub struct SizeLimitedQueue<Q> {
   inner: Q,
   max_size: usize,
}

impl<Q> SizeLimitedQueue<Q> {
   /// `max_size` must be positive.
   pub fn new(inner: Q, max_size: usize) -> Self {
      assert!(max_size > 0, "max_size must be greater than zero");
      Self { inner, max_size }
   }

   pub fn max_size(&self) -> usize {
      self.max_size
   }

   pub fn into_inner(self) -> Q {
      self.inner
   }
}

impl<T, Q: Queue<T>> Queue<T> for SizeLimitedQueue<Q> {
   #[inline]
   fn produce(&mut self, value: T) -> Result<(), Full<T>> {
      if self.full() {
         return Err(Full(value));
      }
      self.inner.produce(value)
   }

   #[inline]
   fn consume(&mut self) -> Result<T, Empty> {
      self.inner.consume()
   }

   #[inline]
   fn empty(&self) -> bool {
      self.inner.empty()
   }

   #[inline]
   fn full(&self) -> bool {
      self.inner.size() >= self.max_size || self.inner.full()
   }

   #[inline]
   fn size(&self) -> usize {
      self.inner.size()
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::{FifoQueue, SafeQueue};

   #[test]
   fn rejects_past_bound_without_mutating() {
      let mut q = SizeLimitedQueue::new(FifoQueue::new(), 2);
      q.produce(1).unwrap();
      q.produce(2).unwrap();
      assert!(q.full());
      assert_eq!(q.produce(3), Err(Full(3)));
      assert_eq!(q.size(), 2);
      assert_eq!(q.consume(), Ok(1));
      assert!(!q.full());
   }

   #[test]
   fn inner_full_propagates() {
      let inner = SizeLimitedQueue::new(FifoQueue::new(), 1);
      let mut q = SizeLimitedQueue::new(SafeQueue::new(inner), 10);
      q.produce(1).unwrap();
      assert!(q.full());
      assert_eq!(q.produce(2), Err(Full(2)));
   }

   #[test]
   #[should_panic(expected = "max_size must be greater than zero")]
   fn zero_bound_panics() {
      let _q = SizeLimitedQueue::new(FifoQueue::<i64>::new(), 0);
   }
}
