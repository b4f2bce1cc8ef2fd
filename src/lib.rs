mod queue;

pub mod error;

pub use queue::RingQueue;
