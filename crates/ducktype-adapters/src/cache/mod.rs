//! Resolution table cache implementations.

mod memory;

pub use memory::{InMemoryTableCache, NoTableCache};
