//! Runtime type descriptions.
//!
//! A [`TypeInfo`] is what introspection of a type yields: its name, whether
//! it is an interface (members to satisfy) or concrete (members to bind),
//! its base types, and its members.
//!
//! Concrete Rust types have no inheritance, so a concrete type "extends" a
//! base by embedding it: [`ConcreteBuilder::extends_via`] records a
//! [`Projection`] from the derived value to the embedded base value, and
//! inherited accessors are routed through it.

use std::any::{Any, TypeId};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::domain::{
    entities::{
        member::{CandidateMember, InterfaceMember},
        signature::MethodSignature,
    },
    error::DomainError,
    value_objects::{TypeKind, TypeName},
};

// ── Projection ───────────────────────────────────────────────────────────────

type ProjectRefFn = dyn Fn(&dyn Any) -> Option<&dyn Any> + Send + Sync;
type ProjectMutFn = dyn Fn(&mut dyn Any) -> Option<&mut dyn Any> + Send + Sync;

fn project_ref<F>(f: F) -> F
where
    F: Fn(&dyn Any) -> Option<&dyn Any>,
{
    f
}

fn project_mut<F>(f: F) -> F
where
    F: Fn(&mut dyn Any) -> Option<&mut dyn Any>,
{
    f
}

/// Route from a derived value to its embedded base value.
#[derive(Clone)]
pub struct Projection {
    pub(crate) read: Arc<ProjectRefFn>,
    pub(crate) write: Arc<ProjectMutFn>,
}

impl Projection {
    pub fn new<D, B, R, W>(read: R, write: W) -> Self
    where
        D: 'static,
        B: 'static,
        R: Fn(&D) -> &B + Send + Sync + 'static,
        W: Fn(&mut D) -> &mut B + Send + Sync + 'static,
    {
        Self {
            read: Arc::new(project_ref(move |target: &dyn Any| {
                target.downcast_ref::<D>().map(|d| read(d) as &dyn Any)
            })),
            write: Arc::new(project_mut(move |target: &mut dyn Any| {
                target.downcast_mut::<D>().map(|d| write(d) as &mut dyn Any)
            })),
        }
    }

    /// Follow `inner` after this projection (derived → middle → base).
    pub(crate) fn then(&self, inner: &Projection) -> Projection {
        let (outer_read, inner_read) = (Arc::clone(&self.read), Arc::clone(&inner.read));
        let (outer_write, inner_write) = (Arc::clone(&self.write), Arc::clone(&inner.write));

        Self {
            read: Arc::new(project_ref(move |target: &dyn Any| {
                outer_read(target).and_then(|middle| inner_read(middle))
            })),
            write: Arc::new(project_mut(move |target: &mut dyn Any| {
                outer_write(target).and_then(|middle| inner_write(middle))
            })),
        }
    }
}

impl fmt::Debug for Projection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Projection")
    }
}

/// A declared base type.
#[derive(Debug, Clone)]
pub struct BaseType {
    pub name: TypeName,
    pub(crate) projection: Option<Projection>,
}

impl BaseType {
    pub fn named(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            projection: None,
        }
    }
}

// ── TypeInfo ─────────────────────────────────────────────────────────────────

/// Members of a type, by kind.
#[derive(Debug, Clone)]
pub enum TypeShape {
    Interface(Vec<InterfaceMember>),
    Concrete(Vec<CandidateMember>),
}

/// Introspection record for one type.
#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub name: TypeName,
    /// `None` for shape-only types declared by name (manifests).
    pub runtime_id: Option<TypeId>,
    pub bases: Vec<BaseType>,
    pub shape: TypeShape,
}

impl TypeInfo {
    /// Describe an interface keyed by `I` (typically `dyn Trait`).
    pub fn interface<I: ?Sized + 'static>() -> InterfaceBuilder {
        InterfaceBuilder::new(TypeName::of::<I>(), Some(TypeId::of::<I>()))
    }

    /// Describe a concrete runtime type `S`.
    pub fn concrete<S: 'static>() -> ConcreteBuilder<S> {
        ConcreteBuilder {
            name: TypeName::of::<S>(),
            runtime_id: Some(TypeId::of::<S>()),
            bases: Vec::new(),
            members: Vec::new(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Describe an interface known only by name.
    pub fn declared_interface(name: impl Into<TypeName>) -> InterfaceBuilder {
        InterfaceBuilder::new(name.into(), None)
    }

    /// Describe a concrete type known only by name.
    pub fn declared_concrete(name: impl Into<TypeName>) -> ConcreteBuilder<()> {
        ConcreteBuilder {
            name: name.into(),
            runtime_id: None,
            bases: Vec::new(),
            members: Vec::new(),
            _marker: std::marker::PhantomData,
        }
    }

    pub fn kind(&self) -> TypeKind {
        match self.shape {
            TypeShape::Interface(_) => TypeKind::Interface,
            TypeShape::Concrete(_) => TypeKind::Concrete,
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind() == TypeKind::Interface
    }

    /// Declared (not inherited) interface members; empty for concrete types.
    pub fn interface_members(&self) -> &[InterfaceMember] {
        match &self.shape {
            TypeShape::Interface(members) => members,
            TypeShape::Concrete(_) => &[],
        }
    }

    /// Declared (not inherited) candidate members; empty for interfaces.
    pub fn candidate_members(&self) -> &[CandidateMember] {
        match &self.shape {
            TypeShape::Concrete(members) => members,
            TypeShape::Interface(_) => &[],
        }
    }

    pub fn member_count(&self) -> usize {
        match &self.shape {
            TypeShape::Interface(m) => m.len(),
            TypeShape::Concrete(m) => m.len(),
        }
    }

    /// Validate structural invariants of the description.
    ///
    /// - Name is non-empty and the type does not list itself as a base
    /// - Interface properties declare at least one accessor
    /// - No two fields/properties share a name
    /// - No two methods share a full signature
    /// - No method shares a name with a field or property
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.is_empty() {
            return Err(DomainError::InvalidTypeInfo("type name is empty".into()));
        }

        if self.bases.iter().any(|b| b.name == self.name) {
            return Err(DomainError::InheritanceCycle {
                type_name: self.name.to_string(),
            });
        }

        let mut value_names = HashSet::new();
        let mut method_names = HashSet::new();
        let mut signatures: Vec<&MethodSignature> = Vec::new();

        let mut check_value = |name: &str| -> Result<(), DomainError> {
            if name.trim().is_empty() {
                return Err(DomainError::InvalidTypeInfo(format!(
                    "{} declares a member with an empty name",
                    self.name
                )));
            }
            if !value_names.insert(name.to_string()) {
                return Err(self.duplicate(name));
            }
            Ok(())
        };

        match &self.shape {
            TypeShape::Interface(members) => {
                for member in members {
                    match member {
                        InterfaceMember::Property(p) => {
                            if !p.has_getter && !p.has_setter {
                                return Err(DomainError::InvalidTypeInfo(format!(
                                    "property {}.{} declares neither a getter nor a setter",
                                    self.name, p.name
                                )));
                            }
                            check_value(&p.name)?;
                        }
                        InterfaceMember::Method(m) => signatures.push(&m.signature),
                    }
                }
            }
            TypeShape::Concrete(members) => {
                for member in members {
                    match member {
                        CandidateMember::Field(f) => check_value(&f.name)?,
                        CandidateMember::Property(p) => check_value(&p.name)?,
                        CandidateMember::Method(m) => signatures.push(&m.signature),
                    }
                }
            }
        }

        for (i, sig) in signatures.iter().enumerate() {
            if sig.name.trim().is_empty() {
                return Err(DomainError::InvalidTypeInfo(format!(
                    "{} declares a method with an empty name",
                    self.name
                )));
            }
            if signatures[..i].iter().any(|earlier| earlier.matches(sig)) {
                return Err(self.duplicate(&sig.to_string()));
            }
            method_names.insert(sig.name.as_str());
        }

        if let Some(clash) = method_names.iter().find(|n| value_names.contains(**n)) {
            return Err(self.duplicate(clash));
        }

        Ok(())
    }

    fn duplicate(&self, member: &str) -> DomainError {
        DomainError::DuplicateMember {
            type_name: self.name.to_string(),
            member: member.to_string(),
        }
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.name)
    }
}

// ── Builders ─────────────────────────────────────────────────────────────────

/// Builder for interface descriptions.
#[derive(Debug)]
pub struct InterfaceBuilder {
    name: TypeName,
    runtime_id: Option<TypeId>,
    bases: Vec<BaseType>,
    members: Vec<InterfaceMember>,
}

impl InterfaceBuilder {
    fn new(name: TypeName, runtime_id: Option<TypeId>) -> Self {
        Self {
            name,
            runtime_id,
            bases: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Override the derived type name.
    pub fn named(mut self, name: impl Into<TypeName>) -> Self {
        self.name = name.into();
        self
    }

    /// Inherit the members of interface `J`.
    pub fn extends<J: ?Sized + 'static>(self) -> Self {
        self.extends_named(TypeName::of::<J>())
    }

    pub fn extends_named(mut self, name: impl Into<TypeName>) -> Self {
        self.bases.push(BaseType::named(name));
        self
    }

    pub fn property<T: ?Sized + 'static>(self, name: impl Into<String>) -> Self {
        self.member(InterfaceMember::property::<T>(name))
    }

    pub fn getter<T: ?Sized + 'static>(self, name: impl Into<String>) -> Self {
        self.member(InterfaceMember::getter::<T>(name))
    }

    pub fn setter<T: ?Sized + 'static>(self, name: impl Into<String>) -> Self {
        self.member(InterfaceMember::setter::<T>(name))
    }

    pub fn method(self, signature: MethodSignature) -> Self {
        self.member(InterfaceMember::method(signature))
    }

    pub fn member(mut self, member: InterfaceMember) -> Self {
        self.members.push(member);
        self
    }

    /// Build and validate.
    pub fn build(self) -> Result<TypeInfo, DomainError> {
        let info = TypeInfo {
            name: self.name,
            runtime_id: self.runtime_id,
            bases: self.bases,
            shape: TypeShape::Interface(self.members),
        };
        info.validate()?;
        Ok(info)
    }
}

/// Builder for concrete type descriptions. `S` is the runtime type, or `()`
/// for shape-only declarations.
pub struct ConcreteBuilder<S> {
    name: TypeName,
    runtime_id: Option<TypeId>,
    bases: Vec<BaseType>,
    members: Vec<CandidateMember>,
    _marker: std::marker::PhantomData<fn() -> S>,
}

impl<S: 'static> ConcreteBuilder<S> {
    /// Override the derived type name.
    pub fn named(mut self, name: impl Into<TypeName>) -> Self {
        self.name = name.into();
        self
    }

    /// Inherit the members of `B`, reached through an embedded value.
    pub fn extends_via<B, R, W>(mut self, read: R, write: W) -> Self
    where
        B: 'static,
        R: Fn(&S) -> &B + Send + Sync + 'static,
        W: Fn(&mut S) -> &mut B + Send + Sync + 'static,
    {
        self.bases.push(BaseType {
            name: TypeName::of::<B>(),
            projection: Some(Projection::new(read, write)),
        });
        self
    }

    /// Inherit the members of a base known only by name.
    pub fn extends_named(mut self, name: impl Into<TypeName>) -> Self {
        self.bases.push(BaseType::named(name));
        self
    }

    pub fn member(mut self, member: impl Into<CandidateMember>) -> Self {
        self.members.push(member.into());
        self
    }

    /// Build and validate.
    pub fn build(self) -> Result<TypeInfo, DomainError> {
        let info = TypeInfo {
            name: self.name,
            runtime_id: self.runtime_id,
            bases: self.bases,
            shape: TypeShape::Concrete(self.members),
        };
        info.validate()?;
        Ok(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::member::{FieldInfo, MethodInfo, PropertyInfo};

    trait Honks {}

    struct Goose {
        honk: String,
    }

    #[test]
    fn interface_builder_uses_trait_object_identity() {
        let info = TypeInfo::interface::<dyn Honks>()
            .property::<String>("Honk")
            .build()
            .unwrap();

        assert!(info.is_interface());
        assert_eq!(info.runtime_id, Some(TypeId::of::<dyn Honks>()));
        assert!(info.name.as_str().ends_with("Honks"));
        assert_eq!(info.interface_members().len(), 1);
        assert!(info.candidate_members().is_empty());
    }

    #[test]
    fn concrete_builder_collects_members() {
        let info = TypeInfo::concrete::<Goose>()
            .member(FieldInfo::new(
                "Honk",
                |g: &Goose| &g.honk,
                |g: &mut Goose| &mut g.honk,
            ))
            .build()
            .unwrap();

        assert_eq!(info.kind(), TypeKind::Concrete);
        assert_eq!(info.member_count(), 1);
        assert_eq!(info.runtime_id, Some(TypeId::of::<Goose>()));
    }

    #[test]
    fn rejects_duplicate_field_and_property_names() {
        let result = TypeInfo::declared_concrete("zoo::Goose")
            .member(FieldInfo::declared("Honk", "i32"))
            .member(PropertyInfo::declared("Honk", "i32", true, true))
            .build();

        assert!(matches!(result, Err(DomainError::DuplicateMember { .. })));
    }

    #[test]
    fn rejects_duplicate_method_signatures() {
        let sig = MethodSignature::new("Honk").param::<i32>();
        let result = TypeInfo::declared_concrete("zoo::Goose")
            .member(MethodInfo::declared(sig.clone()))
            .member(MethodInfo::declared(sig))
            .build();

        assert!(matches!(result, Err(DomainError::DuplicateMember { .. })));
    }

    #[test]
    fn allows_overloads() {
        let info = TypeInfo::declared_interface("zoo::IGoose")
            .method(MethodSignature::new("Honk").param::<i32>())
            .method(MethodSignature::new("Honk").param::<i64>())
            .method(MethodSignature::new("Honk").out::<i64>())
            .build();

        assert!(info.is_ok());
    }

    #[test]
    fn rejects_method_named_like_property() {
        let result = TypeInfo::declared_interface("zoo::IGoose")
            .property::<i32>("Honk")
            .method(MethodSignature::new("Honk"))
            .build();

        assert!(matches!(result, Err(DomainError::DuplicateMember { .. })));
    }

    #[test]
    fn rejects_accessorless_interface_property() {
        let result = TypeInfo::declared_interface("zoo::IGoose")
            .member(InterfaceMember::declared_property("Honk", "i32", false, false))
            .build();

        assert!(matches!(result, Err(DomainError::InvalidTypeInfo(_))));
    }

    #[test]
    fn rejects_self_inheritance() {
        let result = TypeInfo::declared_interface("zoo::IGoose")
            .extends_named("zoo::IGoose")
            .build();

        assert!(matches!(result, Err(DomainError::InheritanceCycle { .. })));
    }

    #[test]
    fn rejects_empty_name() {
        let result = TypeInfo::declared_concrete("  ").build();
        assert!(matches!(result, Err(DomainError::InvalidTypeInfo(_))));
    }

    #[test]
    fn projection_reaches_embedded_base() {
        struct Wing {
            span: u32,
        }
        struct Bird {
            wing: Wing,
        }

        let projection = Projection::new(|b: &Bird| &b.wing, |b: &mut Bird| &mut b.wing);
        let mut bird = Bird {
            wing: Wing { span: 4 },
        };

        let base = (projection.read)(&bird as &dyn Any).and_then(|w| w.downcast_ref::<Wing>());
        assert_eq!(base.map(|w| w.span), Some(4));

        if let Some(wing) =
            (projection.write)(&mut bird as &mut dyn Any).and_then(|w| w.downcast_mut::<Wing>())
        {
            wing.span = 6;
        }
        assert_eq!(bird.wing.span, 6);
    }
}
