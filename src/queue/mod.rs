mod fifo;
mod safe;
mod bounded;

pub use fifo::FifoQueue;
pub use safe::SafeQueue;
pub use bounded::SizeLimitedQueue;
