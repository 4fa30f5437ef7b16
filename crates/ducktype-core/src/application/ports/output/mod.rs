//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from the outside world.
//! The `ducktype-adapters` crate provides implementations.

use std::any::TypeId;
use std::sync::Arc;

use crate::domain::{ResolutionKey, ResolutionTable, TypeInfo, TypeName};
use crate::error::DuckResult;

/// Port for runtime type introspection.
///
/// Rust has no reflection; types opt in by registering a [`TypeInfo`]
/// describing their members. Lookups by [`TypeId`] serve runtime values and
/// trait-object interfaces, lookups by name serve diagnostics and
/// shape-only types.
///
/// Implemented by:
/// - `ducktype_adapters::registry::InMemoryTypeRegistry`
#[cfg_attr(test, mockall::automock)]
pub trait TypeIntrospector: Send + Sync {
    /// Describe the type with runtime identity `id`, if registered.
    fn type_of_id(&self, id: TypeId) -> DuckResult<Option<Arc<TypeInfo>>>;

    /// Describe the type with fully qualified name `name`, if registered.
    fn type_named(&self, name: &TypeName) -> DuckResult<Option<Arc<TypeInfo>>>;

    /// Every registered type, ordered by name.
    fn list(&self) -> DuckResult<Vec<Arc<TypeInfo>>>;

    /// Register or replace a type description.
    fn register(&self, info: TypeInfo) -> DuckResult<()>;

    /// Counter that advances whenever the set of descriptions changes.
    ///
    /// Resolution tables are keyed by it, so a table computed before a
    /// registration is never served after it.
    fn generation(&self) -> u64;
}

/// Port for memoizing resolution tables.
///
/// Tables are pure functions of their [`ResolutionKey`] (which carries the
/// introspector's generation), so a cache never changes behaviour, only
/// cost. Tables from older generations are never requested again.
///
/// Implemented by:
/// - `ducktype_adapters::cache::InMemoryTableCache` (memoizing)
/// - `ducktype_adapters::cache::NoTableCache` (always recompute)
#[cfg_attr(test, mockall::automock)]
pub trait ResolutionCache: Send + Sync {
    /// Cached table for `key`, if any.
    fn get(&self, key: &ResolutionKey) -> DuckResult<Option<Arc<ResolutionTable>>>;

    /// Publish a fully built table.
    ///
    /// When another table was published for the same key first, that one
    /// is kept and returned; callers must use the returned table.
    fn publish(&self, table: ResolutionTable) -> DuckResult<Arc<ResolutionTable>>;

    /// Number of cached tables.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached table.
    fn clear(&self) -> DuckResult<()>;
}
