//! ducktype core - structural typing adapters.
//!
//! This crate provides the domain and application layers for building
//! adapters that satisfy an interface by shape: each member of the interface
//! is matched against the members of a backing value's runtime type, and
//! the adapter forwards accesses and calls to whatever matched.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          ducktype-cli (CLI)             │
//! │     probe / check / list by name        │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │      (AdapterFactory, Adapter)          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  (TypeIntrospector, ResolutionCache)    │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    ducktype-adapters (Infrastructure)   │
//! │ (InMemoryTypeRegistry, InMemoryTableCache)│
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (TypeInfo, MethodSignature, Resolver)   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ducktype_core::prelude::*;
//!
//! trait IDuck {}
//!
//! struct Duck { quack: Option<String> }
//!
//! # fn run(registry: Box<dyn TypeIntrospector>, cache: Box<dyn ResolutionCache>) -> DuckResult<()> {
//! registry.register(
//!     TypeInfo::interface::<dyn IDuck>()
//!         .property::<Option<String>>("Quack")
//!         .build()?,
//! )?;
//! registry.register(
//!     TypeInfo::concrete::<Duck>()
//!         .member(FieldInfo::new("Quack", |d: &Duck| &d.quack, |d: &mut Duck| &mut d.quack))
//!         .build()?,
//! )?;
//!
//! let factory = AdapterFactory::new(registry, cache);
//! let mut duck = Duck { quack: None };
//! let mut adapter = factory.create_adapter::<dyn IDuck, _>(&mut duck, AdapterOptions::default())?;
//! adapter.set("Quack", Some("Quack".to_string()))?;
//! # Ok(())
//! # }
//! ```

pub mod domain;

pub mod application;

pub mod error;

pub use domain::matches_signature;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        Adapter, AdapterFactory, AdapterOptions, ResolutionReport,
        ports::{ResolutionCache, TypeIntrospector},
    };
    pub use crate::domain::{
        Arguments, FieldInfo, InterfaceMember, MethodInfo, MethodSignature, PropertyInfo,
        ResolutionTable, TypeInfo, TypeName, Visibility, matches_signature,
    };
    pub use crate::error::{DuckError, DuckResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
