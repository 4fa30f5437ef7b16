//! Adapter Factory - builds adapters and their resolution tables.
//!
//! Two entry points with different failure disciplines:
//!
//! - [`AdapterFactory::create_adapter`] fails fast only when the target is
//!   not an interface. Unresolved members are carried in the table and fail
//!   when used.
//! - [`AdapterFactory::try_create_adapter`] never errors. It returns an
//!   adapter only when every member resolves.
//!
//! Tables are computed once per `(interface, backing type, include_private)`
//! and registry generation, and published to the [`ResolutionCache`].
//! Registering a type advances the generation, so tables built before it
//! are not reused.

use std::any::{Any, TypeId};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        adapter::Adapter,
        error::MissingMember,
        ports::{ResolutionCache, TypeIntrospector},
    },
    domain::{
        Binding, CandidateMember, DomainError, InterfaceMember, MemberResolver, Projection,
        ResolutionKey, ResolutionTable, TypeInfo, TypeName,
    },
    error::DuckResult,
};

/// Per-call adapter options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdapterOptions {
    /// Let private backing members satisfy interface members.
    pub include_private_members: bool,
}

impl AdapterOptions {
    pub fn include_private() -> Self {
        Self {
            include_private_members: true,
        }
    }
}

/// Builds adapters from registered type descriptions.
pub struct AdapterFactory {
    introspector: Box<dyn TypeIntrospector>,
    cache: Box<dyn ResolutionCache>,
}

impl AdapterFactory {
    /// Create a factory over the given adapters.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ducktype_adapters::{InMemoryTableCache, InMemoryTypeRegistry};
    /// use ducktype_core::application::{AdapterFactory, ResolutionCache};
    ///
    /// let factory = AdapterFactory::new(
    ///     Box::new(InMemoryTypeRegistry::new()),
    ///     Box::new(InMemoryTableCache::new()),
    /// );
    /// assert!(factory.cache().is_empty());
    /// ```
    pub fn new(introspector: Box<dyn TypeIntrospector>, cache: Box<dyn ResolutionCache>) -> Self {
        Self {
            introspector,
            cache,
        }
    }

    pub fn introspector(&self) -> &dyn TypeIntrospector {
        self.introspector.as_ref()
    }

    pub fn cache(&self) -> &dyn ResolutionCache {
        self.cache.as_ref()
    }

    /// Adapt `value` to interface `I`.
    ///
    /// Fails only when `I` is not a registered interface. The returned
    /// adapter may contain unresolved members; using one raises
    /// `MissingMember`.
    #[instrument(
        skip_all,
        fields(interface = %TypeName::of::<I>(), backing = %TypeName::of::<V>())
    )]
    pub fn create_adapter<'v, I, V>(
        &self,
        value: &'v mut V,
        options: AdapterOptions,
    ) -> DuckResult<Adapter<'v, I>>
    where
        I: ?Sized + 'static,
        V: Any,
    {
        let generation = self.introspector.generation();
        let interface = self.interface_of::<I>()?;
        let backing = self.introspector.type_of_id(TypeId::of::<V>())?;
        let backing_name = match &backing {
            Some(info) => info.name.clone(),
            None => {
                warn!(
                    backing = %TypeName::of::<V>(),
                    "Backing type is not registered; it exposes no members"
                );
                TypeName::of::<V>()
            }
        };

        let table = self.table_for(
            &interface,
            backing.as_deref(),
            backing_name,
            options.include_private_members,
            generation,
        )?;
        Ok(Adapter::new(value, table))
    }

    /// Adapt `value` to interface `I` only if every member resolves.
    ///
    /// Never errors: a non-interface target, an incomplete table, or a
    /// failed table build all yield `None`.
    pub fn try_create_adapter<'v, I, V>(
        &self,
        value: &'v mut V,
        options: AdapterOptions,
    ) -> Option<Adapter<'v, I>>
    where
        I: ?Sized + 'static,
        V: Any,
    {
        match self.create_adapter::<I, V>(value, options) {
            Ok(adapter) if adapter.table().is_complete() => Some(adapter),
            Ok(adapter) => {
                for member in adapter.table().unresolved() {
                    debug!(
                        "{}",
                        MissingMember::new(adapter.interface(), adapter.backing_type(), member)
                    );
                }
                None
            }
            Err(e) if e.is_not_an_interface() => {
                debug!(error = %e, "Target is not an interface");
                None
            }
            Err(e) => {
                warn!(error = %e, "Failed to build resolution table");
                None
            }
        }
    }

    /// Resolution table for types known by name.
    ///
    /// Used for diagnostics, where no runtime value exists.
    #[instrument(skip(self), fields(interface = %interface, backing = %backing))]
    pub fn resolution_table(
        &self,
        interface: &TypeName,
        backing: &TypeName,
        include_private: bool,
    ) -> DuckResult<Arc<ResolutionTable>> {
        let generation = self.introspector.generation();
        let interface_info = self
            .introspector
            .type_named(interface)?
            .filter(|info| info.is_interface())
            .ok_or_else(|| ApplicationError::NotAnInterface {
                type_name: interface.clone(),
            })?;

        let backing_info =
            self.introspector
                .type_named(backing)?
                .ok_or_else(|| ApplicationError::UnknownType {
                    name: backing.to_string(),
                })?;

        self.table_for(
            &interface_info,
            Some(&backing_info),
            backing_info.name.clone(),
            include_private,
            generation,
        )
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn interface_of<I: ?Sized + 'static>(&self) -> DuckResult<Arc<TypeInfo>> {
        match self.introspector.type_of_id(TypeId::of::<I>())? {
            Some(info) if info.is_interface() => Ok(info),
            Some(info) => Err(ApplicationError::NotAnInterface {
                type_name: info.name.clone(),
            }
            .into()),
            None => Err(ApplicationError::NotAnInterface {
                type_name: TypeName::of::<I>(),
            }
            .into()),
        }
    }

    /// Cached table for the key, or compute and publish it.
    ///
    /// `generation` must be read before any description used here, so a
    /// table is never keyed newer than the data it was built from.
    fn table_for(
        &self,
        interface: &TypeInfo,
        backing: Option<&TypeInfo>,
        backing_name: TypeName,
        include_private: bool,
        generation: u64,
    ) -> DuckResult<Arc<ResolutionTable>> {
        let key = ResolutionKey::new(interface.name.clone(), backing_name, include_private)
            .at_generation(generation);

        if let Some(table) = self.cache.get(&key)? {
            debug!(key = %key, "Resolution table cache hit");
            return Ok(table);
        }

        let members = self.interface_members(interface)?;
        let candidates = match backing {
            Some(info) => self.candidate_members(info)?,
            None => Vec::new(),
        };
        let bindings = MemberResolver::resolve_all(&members, &candidates, include_private)?;
        let table = ResolutionTable::new(key, bindings);

        debug!(
            key = %table.key(),
            members = table.len(),
            unresolved = table.unresolved().count(),
            "Computed resolution table"
        );

        self.cache.publish(table)
    }

    /// Members of `interface` including inherited ones, declared first.
    /// Identical inherited descriptors collapse into one.
    fn interface_members(&self, interface: &TypeInfo) -> DuckResult<Vec<InterfaceMember>> {
        let mut members = Vec::new();
        let mut path = vec![interface.name.clone()];
        self.collect_interface(interface, &mut path, &mut members)?;
        Ok(members)
    }

    fn collect_interface(
        &self,
        info: &TypeInfo,
        path: &mut Vec<TypeName>,
        out: &mut Vec<InterfaceMember>,
    ) -> DuckResult<()> {
        for member in info.interface_members() {
            if !out.contains(member) {
                out.push(member.clone());
            }
        }

        for base in &info.bases {
            let base_info = self.base_of(info, &base.name, path)?;
            if !base_info.is_interface() {
                return Err(DomainError::InvalidTypeInfo(format!(
                    "interface {} cannot extend concrete type {}",
                    info.name, base_info.name
                ))
                .into());
            }
            path.push(base_info.name.clone());
            self.collect_interface(&base_info, path, out)?;
            path.pop();
        }
        Ok(())
    }

    /// Members of `backing` including inherited ones. Members declared on a
    /// derived type hide base members by name (fields, properties) or by
    /// signature (methods).
    fn candidate_members(&self, backing: &TypeInfo) -> DuckResult<Vec<CandidateMember>> {
        let mut members = Vec::new();
        let mut path = vec![backing.name.clone()];
        self.collect_candidates(backing, None, &mut path, &mut members)?;
        Ok(members)
    }

    fn collect_candidates(
        &self,
        info: &TypeInfo,
        projection: Option<&Projection>,
        path: &mut Vec<TypeName>,
        out: &mut Vec<CandidateMember>,
    ) -> DuckResult<()> {
        for member in info.candidate_members() {
            if out.iter().any(|existing| existing.hides(member)) {
                continue;
            }
            out.push(match projection {
                Some(projection) => member.through(projection),
                None => member.clone(),
            });
        }

        for base in &info.bases {
            let base_info = self.base_of(info, &base.name, path)?;
            if base_info.is_interface() {
                return Err(DomainError::InvalidTypeInfo(format!(
                    "concrete type {} cannot extend interface {}",
                    info.name, base_info.name
                ))
                .into());
            }

            let combined = match (projection, &base.projection) {
                (Some(outer), Some(inner)) => Some(outer.then(inner)),
                (None, Some(inner)) => Some(inner.clone()),
                (outer, None) => outer.cloned(),
            };

            path.push(base_info.name.clone());
            self.collect_candidates(&base_info, combined.as_ref(), path, out)?;
            path.pop();
        }
        Ok(())
    }

    fn base_of(
        &self,
        info: &TypeInfo,
        base: &TypeName,
        path: &[TypeName],
    ) -> DuckResult<Arc<TypeInfo>> {
        if path.contains(base) {
            return Err(DomainError::InheritanceCycle {
                type_name: base.to_string(),
            }
            .into());
        }
        self.introspector.type_named(base)?.ok_or_else(|| {
            DomainError::UnknownBaseType {
                type_name: info.name.to_string(),
                base: base.to_string(),
            }
            .into()
        })
    }
}

// -------------------------------------------------------------------------
// Reports
// -------------------------------------------------------------------------

/// Serializable view of a resolution table, for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionReport {
    pub interface: String,
    pub backing: String,
    pub include_private: bool,
    pub complete: bool,
    pub members: Vec<MemberReport>,
}

/// One row of a [`ResolutionReport`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberReport {
    pub member: String,
    pub kind: &'static str,
    pub bound: bool,
    /// The backing member, when bound.
    pub candidate: Option<String>,
    /// The message using the member would raise, when unbound.
    pub missing: Option<String>,
}

impl From<&ResolutionTable> for ResolutionReport {
    fn from(table: &ResolutionTable) -> Self {
        let members = table
            .bindings()
            .iter()
            .map(|binding| {
                let member = binding.member();
                MemberReport {
                    member: member.to_string(),
                    kind: if member.is_property() {
                        "property"
                    } else {
                        "method"
                    },
                    bound: binding.is_resolved(),
                    candidate: binding.candidate().map(ToString::to_string),
                    missing: match binding {
                        Binding::Resolved { .. } => None,
                        Binding::Unresolved(member) => Some(
                            MissingMember::new(table.interface(), table.backing(), member)
                                .to_string(),
                        ),
                    },
                }
            })
            .collect();

        Self {
            interface: table.interface().to_string(),
            backing: table.backing().to_string(),
            include_private: table.key().include_private,
            complete: table.is_complete(),
            members,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockResolutionCache, MockTypeIntrospector};
    use crate::domain::{FieldInfo, MethodSignature};
    use mockall::predicate::eq;

    trait IPond {}

    struct Pond {
        depth: i32,
    }

    fn pond_interface() -> Arc<TypeInfo> {
        Arc::new(
            TypeInfo::interface::<dyn IPond>()
                .property::<i32>("Depth")
                .build()
                .unwrap(),
        )
    }

    fn pond_type() -> Arc<TypeInfo> {
        Arc::new(
            TypeInfo::concrete::<Pond>()
                .member(FieldInfo::new(
                    "Depth",
                    |p: &Pond| &p.depth,
                    |p: &mut Pond| &mut p.depth,
                ))
                .build()
                .unwrap(),
        )
    }

    fn introspector() -> MockTypeIntrospector {
        introspector_at(0)
    }

    fn introspector_at(generation: u64) -> MockTypeIntrospector {
        let mut introspector = MockTypeIntrospector::new();
        introspector.expect_generation().return_const(generation);
        introspector
            .expect_type_of_id()
            .with(eq(TypeId::of::<dyn IPond>()))
            .returning(|_| Ok(Some(pond_interface())));
        introspector
            .expect_type_of_id()
            .with(eq(TypeId::of::<Pond>()))
            .returning(|_| Ok(Some(pond_type())));
        introspector
    }

    #[test]
    fn cache_hit_skips_resolution() {
        let cached = Arc::new(ResolutionTable::new(
            ResolutionKey::new(TypeName::of::<dyn IPond>(), TypeName::of::<Pond>(), false),
            vec![],
        ));

        let mut cache = MockResolutionCache::new();
        let hit = Arc::clone(&cached);
        cache
            .expect_get()
            .times(1)
            .returning(move |_| Ok(Some(Arc::clone(&hit))));
        cache.expect_publish().never();

        let factory = AdapterFactory::new(Box::new(introspector()), Box::new(cache));
        let mut pond = Pond { depth: 1 };
        let adapter = factory
            .create_adapter::<dyn IPond, _>(&mut pond, AdapterOptions::default())
            .unwrap();

        assert!(Arc::ptr_eq(adapter.table(), &cached));
    }

    #[test]
    fn cache_miss_publishes_computed_table() {
        let mut cache = MockResolutionCache::new();
        cache.expect_get().times(1).returning(|_| Ok(None));
        cache
            .expect_publish()
            .times(1)
            .returning(|table| Ok(Arc::new(table)));

        let factory = AdapterFactory::new(Box::new(introspector()), Box::new(cache));
        let mut pond = Pond { depth: 1 };
        let adapter = factory
            .create_adapter::<dyn IPond, _>(&mut pond, AdapterOptions::default())
            .unwrap();

        assert!(adapter.table().is_complete());
        assert_eq!(adapter.get::<i32>("Depth").unwrap(), 1);
    }

    #[test]
    fn cache_key_carries_registry_generation() {
        let mut cache = MockResolutionCache::new();
        cache
            .expect_get()
            .withf(|key| key.generation == 7)
            .times(1)
            .returning(|_| Ok(None));
        cache
            .expect_publish()
            .times(1)
            .returning(|table| Ok(Arc::new(table)));

        let factory = AdapterFactory::new(Box::new(introspector_at(7)), Box::new(cache));
        let mut pond = Pond { depth: 1 };
        let adapter = factory
            .create_adapter::<dyn IPond, _>(&mut pond, AdapterOptions::default())
            .unwrap();

        assert_eq!(adapter.table().key().generation, 7);
    }

    #[test]
    fn incomplete_table_is_rejected_quietly() {
        use std::io;
        use std::sync::Mutex;

        trait IDeepPond {}

        #[derive(Clone, Default)]
        struct Captured(Arc<Mutex<Vec<u8>>>);

        impl io::Write for Captured {
            fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
                self.0.lock().unwrap().extend_from_slice(buf);
                Ok(buf.len())
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut introspector = introspector();
        introspector
            .expect_type_of_id()
            .with(eq(TypeId::of::<dyn IDeepPond>()))
            .returning(|_| {
                Ok(Some(Arc::new(
                    TypeInfo::interface::<dyn IDeepPond>()
                        .property::<i32>("Bottom")
                        .build()
                        .unwrap(),
                )))
            });
        let mut cache = MockResolutionCache::new();
        cache.expect_get().returning(|_| Ok(None));
        cache
            .expect_publish()
            .returning(|table| Ok(Arc::new(table)));
        let factory = AdapterFactory::new(Box::new(introspector), Box::new(cache));

        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            let mut pond = Pond { depth: 1 };
            assert!(
                factory
                    .try_create_adapter::<dyn IDeepPond, _>(&mut pond, AdapterOptions::default())
                    .is_none()
            );
        });

        assert!(captured.0.lock().unwrap().is_empty());
    }

    #[test]
    fn non_interface_target_is_rejected_before_cache() {
        let mut cache = MockResolutionCache::new();
        cache.expect_get().never();

        let factory = AdapterFactory::new(Box::new(introspector()), Box::new(cache));
        let mut pond = Pond { depth: 1 };
        let err = factory
            .create_adapter::<Pond, _>(&mut pond, AdapterOptions::default())
            .unwrap_err();

        assert!(err.is_not_an_interface());
        assert!(err.to_string().ends_with("must be an interface type."));
        assert!(
            factory
                .try_create_adapter::<Pond, _>(&mut pond, AdapterOptions::default())
                .is_none()
        );
    }

    #[test]
    fn unknown_base_type_is_reported() {
        let interface = Arc::new(
            TypeInfo::declared_interface("zoo::IDuck")
                .extends_named("zoo::IBird")
                .build()
                .unwrap(),
        );
        let backing = Arc::new(TypeInfo::declared_concrete("zoo::Duck").build().unwrap());

        let mut introspector = MockTypeIntrospector::new();
        introspector.expect_generation().return_const(0_u64);
        let (i, b) = (Arc::clone(&interface), Arc::clone(&backing));
        introspector
            .expect_type_named()
            .returning(move |name| match name.as_str() {
                "zoo::IDuck" => Ok(Some(Arc::clone(&i))),
                "zoo::Duck" => Ok(Some(Arc::clone(&b))),
                _ => Ok(None),
            });
        let mut cache = MockResolutionCache::new();
        cache.expect_get().returning(|_| Ok(None));

        let factory = AdapterFactory::new(Box::new(introspector), Box::new(cache));
        let err = factory
            .resolution_table(&interface.name, &backing.name, false)
            .unwrap_err();

        assert!(matches!(
            err,
            crate::error::DuckError::Domain(DomainError::UnknownBaseType { .. })
        ));
    }

    #[test]
    fn report_lists_missing_messages() {
        let table = ResolutionTable::new(
            ResolutionKey::new("zoo::IDuck", "zoo::Duck", false),
            vec![Binding::Unresolved(InterfaceMember::method(
                MethodSignature::new("Quack").returns::<bool>(),
            ))],
        );

        let report = ResolutionReport::from(&table);
        assert!(!report.complete);
        assert_eq!(report.members[0].kind, "method");
        assert_eq!(
            report.members[0].missing.as_deref(),
            Some("No accessible method zoo::IDuck.Quack() => bool found on wrapped value zoo::Duck.")
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["members"][0]["bound"], false);
        assert_eq!(json["members"][0]["candidate"], serde_json::Value::Null);
    }
}
