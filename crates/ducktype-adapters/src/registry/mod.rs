//! Type registry implementations.

mod memory;

pub use memory::InMemoryTypeRegistry;
