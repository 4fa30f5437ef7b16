//! In-memory type registry.

use std::{
    any::TypeId,
    collections::{BTreeMap, HashMap},
    sync::{
        Arc, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use tracing::debug;

use ducktype_core::{
    application::{ApplicationError, ports::TypeIntrospector},
    domain::{DomainError, DomainValidator as validator, TypeInfo, TypeName},
    error::DuckResult,
};

use crate::samples;

#[derive(Default)]
struct Types {
    by_name: BTreeMap<TypeName, Arc<TypeInfo>>,
    by_id: HashMap<TypeId, TypeName>,
}

/// Thread-safe in-memory type registry.
///
/// Types are keyed by name; types with runtime identity are also reachable
/// by [`TypeId`]. Registering a name again replaces the old description,
/// except that a runtime type is never replaced by a shape-only one.
/// Every change advances the registry generation.
#[derive(Clone, Default)]
pub struct InMemoryTypeRegistry {
    inner: Arc<RwLock<Types>>,
    generation: Arc<AtomicU64>,
}

impl InMemoryTypeRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the sample types loaded.
    pub fn with_samples() -> DuckResult<Self> {
        let registry = Self::new();
        registry.load_samples()?;
        Ok(registry)
    }

    /// Register the sample types.
    pub fn load_samples(&self) -> DuckResult<()> {
        for info in samples::all_types()? {
            self.register(info)?;
        }
        Ok(())
    }

    /// Get the number of registered types.
    pub fn len(&self) -> usize {
        self.inner.read().map(|types| types.by_name.len()).unwrap_or(0)
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look a type up by fully qualified name, or by simple name when that
    /// is unique.
    pub fn find(&self, name: &str) -> DuckResult<Arc<TypeInfo>> {
        let types = self
            .inner
            .read()
            .map_err(|_| ApplicationError::RegistryLockError)?;

        if let Some(info) = types.by_name.get(&TypeName::new(name)) {
            return Ok(Arc::clone(info));
        }

        let matches: Vec<&Arc<TypeInfo>> = types
            .by_name
            .values()
            .filter(|info| info.name.simple_name() == name)
            .collect();

        match matches.as_slice() {
            [only] => Ok(Arc::clone(only)),
            [] => Err(ApplicationError::UnknownType {
                name: name.to_string(),
            }
            .into()),
            many => Err(ApplicationError::AmbiguousTypeName {
                name: name.to_string(),
                candidates: many.iter().map(|info| info.name.to_string()).collect(),
            }
            .into()),
        }
    }

    /// Remove every registered type.
    pub fn clear(&self) -> DuckResult<()> {
        let mut types = self
            .inner
            .write()
            .map_err(|_| ApplicationError::RegistryLockError)?;
        types.by_name.clear();
        types.by_id.clear();
        self.generation.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }
}

impl TypeIntrospector for InMemoryTypeRegistry {
    fn type_of_id(&self, id: TypeId) -> DuckResult<Option<Arc<TypeInfo>>> {
        let types = self
            .inner
            .read()
            .map_err(|_| ApplicationError::RegistryLockError)?;

        Ok(types
            .by_id
            .get(&id)
            .and_then(|name| types.by_name.get(name))
            .cloned())
    }

    fn type_named(&self, name: &TypeName) -> DuckResult<Option<Arc<TypeInfo>>> {
        let types = self
            .inner
            .read()
            .map_err(|_| ApplicationError::RegistryLockError)?;

        Ok(types.by_name.get(name).cloned())
    }

    fn list(&self) -> DuckResult<Vec<Arc<TypeInfo>>> {
        let types = self
            .inner
            .read()
            .map_err(|_| ApplicationError::RegistryLockError)?;

        Ok(types.by_name.values().cloned().collect())
    }

    fn register(&self, info: TypeInfo) -> DuckResult<()> {
        // Validate before insertion
        validator::validate_type_info(&info)?;

        let mut types = self
            .inner
            .write()
            .map_err(|_| ApplicationError::RegistryLockError)?;

        validator::validate_inheritance(&info, |name| {
            types.by_name.get(name).map(|base| base.as_ref())
        })?;

        if let Some(existing) = types.by_name.get(&info.name) {
            match (existing.runtime_id, info.runtime_id) {
                (Some(_), None) => {
                    return Err(DomainError::InvalidTypeInfo(format!(
                        "{} is a runtime type and cannot be replaced by a shape-only description",
                        info.name
                    ))
                    .into());
                }
                (Some(old), Some(new)) if old != new => {
                    types.by_id.remove(&old);
                }
                _ => {}
            }
        }

        debug!(name = %info.name, kind = %info.kind(), members = info.member_count(), "Registered type");

        if let Some(id) = info.runtime_id {
            types.by_id.insert(id, info.name.clone());
        }
        types.by_name.insert(info.name.clone(), Arc::new(info));
        self.generation.fetch_add(1, Ordering::AcqRel);
        Ok(())
    }

    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}
