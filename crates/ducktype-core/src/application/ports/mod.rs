//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `ducktype-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `TypeIntrospector`: Type descriptions by runtime id or name
//!   - `ResolutionCache`: Memoized resolution tables
//!
//! - **Driving (Input) Ports**: Called by external world, implemented by application
//!   - `AdapterFactory` is used directly; the CLI drives it by type name

pub mod output;

pub use output::{ResolutionCache, TypeIntrospector};

#[cfg(test)]
pub use output::{MockResolutionCache, MockTypeIntrospector};
