//! Application layer for ducktype.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (AdapterFactory)
//! - **Adapter**: The proxy handed out by the factory
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! resolution rules itself. Those live in `crate::domain`.

pub mod adapter;
pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{AdapterFactory, AdapterOptions, MemberReport, ResolutionReport};

pub use adapter::Adapter;

// Re-export port traits (for adapter implementation)
pub use ports::{ResolutionCache, TypeIntrospector};

pub use error::{ApplicationError, MissingMember};
