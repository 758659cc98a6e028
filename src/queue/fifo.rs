// Core queue – unsynchronised FIFO buffer, no capacity policy of its own

use crate::error::{Empty, Full};
use crate::Queue;
use std::collections::VecDeque;

#[derive(Debug)]
pub struct FifoQueue<T> {
   items: VecDeque<T>,
}

impl<T> FifoQueue<T> {
   pub fn new() -> Self {
      Self { items: VecDeque::new() }
   }

   /// Pre-allocate room for `cap` values. Not a limit.
   pub fn with_capacity(cap: usize) -> Self {
      Self { items: VecDeque::with_capacity(cap) }
   }
}

impl<T> Default for FifoQueue<T> {
   fn default() -> Self {
      Self::new()
   }
}

impl<T: Send> Queue<T> for FifoQueue<T> {
   #[inline]
   fn produce(&mut self, value: T) -> Result<(), Full<T>> {
      self.items.push_back(value);
      Ok(())
   }

   #[inline]
   fn consume(&mut self) -> Result<T, Empty> {
      // oldest first
      self.items.pop_front().ok_or(Empty)
   }

   #[inline]
   fn empty(&self) -> bool {
      self.items.is_empty()
   }

   #[inline]
   fn size(&self) -> usize {
      self.items.len()
   }
}
