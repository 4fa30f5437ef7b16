//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "adapt this value to that interface".

pub mod adapter_factory;

pub use adapter_factory::{AdapterFactory, AdapterOptions, MemberReport, ResolutionReport};
