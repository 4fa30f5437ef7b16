//! Infrastructure adapters for ducktype.
//!
//! This crate implements the ports defined in `ducktype_core::application::ports`:
//! a type registry, resolution table caches, and a loader for shape manifests.

pub mod cache;
pub mod manifest;
pub mod registry;
pub mod samples;

// Re-export commonly used adapters
pub use cache::{InMemoryTableCache, NoTableCache};
pub use manifest::{ManifestFormat, ManifestLoader};
pub use registry::InMemoryTypeRegistry;
