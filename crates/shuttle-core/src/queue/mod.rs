//! Queue module: ordering key and the in-memory priority queue.

mod entry;
mod memory;

pub use memory::TaskQueue;
