// Safety decorator – refuses to consume from an empty queue

use crate::error::{Empty, Full};
use crate::Queue;

/// Wraps (and owns) the next layer of the chain.
#[derive(Debug, Default)]
pub struct SafeQueue<Q> {
   inner: Q,
}

impl<Q> SafeQueue<Q> {
   pub fn new(inner: Q) -> Self {
      Self { inner }
   }

   pub fn into_inner(self) -> Q {
      self.inner
   }
}

impl<T, Q: Queue<T>> Queue<T> for SafeQueue<Q> {
   #[inline]
   fn produce(&mut self, value: T) -> Result<(), Full<T>> {
      self.inner.produce(value)
   }

   #[inline]
   fn consume(&mut self) -> Result<T, Empty> {
      // never touch the inner layer when there is nothing to take
      if self.empty() {
         return Err(Empty);
      }
      self.inner.consume()
   }

   #[inline]
   fn empty(&self) -> bool {
      self.inner.empty()
   }

   #[inline]
   fn full(&self) -> bool {
      self.inner.full()
   }

   #[inline]
   fn size(&self) -> usize {
      self.inner.size()
   }
}

#[cfg(test)]
mod tests {
   use super::*;
   use crate::FifoQueue;

   /// Inner layer that fails the test if `consume` reaches it.
   struct Tripwire;

   impl Queue<i64> for Tripwire {
      fn produce(&mut self, value: i64) -> Result<(), Full<i64>> {
         Err(Full(value))
      }
      fn consume(&mut self) -> Result<i64, Empty> {
         panic!("consume forwarded to an empty inner queue");
      }
      fn empty(&self) -> bool {
         true
      }
      fn size(&self) -> usize {
         0
      }
   }

   #[test]
   fn empty_consume_is_short_circuited() {
      let mut q = SafeQueue::new(Tripwire);
      assert_eq!(q.consume(), Err(Empty));
   }

   #[test]
   fn delegates_when_not_empty() {
      let mut q = SafeQueue::new(FifoQueue::new());
      q.produce(7).unwrap();
      assert_eq!(q.size(), 1);
      assert_eq!(q.consume(), Ok(7));
      assert_eq!(q.consume(), Err(Empty));
      assert_eq!(q.size(), 0);
   }
}
