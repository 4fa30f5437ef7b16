//! Core domain layer for ducktype.
//!
//! Pure type-model logic: describing types, comparing method signatures,
//! and deciding which backing member satisfies which interface member.
//! Registries and caches are reached through ports defined in the
//! application layer.
//!
//! ## Hexagonal Architecture Compliance
//!
//! - **No I/O**: No filesystem, network, or external calls
//! - **No async**: Resolution is synchronous and pure
//! - **Immutable descriptions**: `TypeInfo` and `ResolutionTable` are built once
//!   and shared read-only
pub mod entities;
pub mod error;
pub mod resolution;
pub mod value_objects;

mod validation;

pub use entities::{
    arguments::Arguments,
    binding::{Binding, ResolutionKey, ResolutionTable},
    member::{
        CandidateMember, FieldInfo, InterfaceMember, MethodInfo, MethodMember, PropertyInfo,
        PropertyMember, Thunk,
    },
    signature::{MethodSignature, matches_signature},
    type_info::{BaseType, ConcreteBuilder, InterfaceBuilder, Projection, TypeInfo, TypeShape},
};

pub use error::{DomainError, ErrorCategory};
pub use resolution::MemberResolver;
pub use validation::DomainValidator;
pub use value_objects::{Direction, Parameter, TypeKind, TypeName, Visibility};

#[cfg(test)]
mod tests {
    use super::*;

    // ========================================================================
    // End-to-end domain flow: describe, validate, resolve
    // ========================================================================

    fn duck_interface() -> TypeInfo {
        TypeInfo::declared_interface("zoo::IDuck")
            .property::<Option<String>>("Quack")
            .method(
                MethodSignature::new("TryQuack")
                    .param::<Option<String>>()
                    .out::<Option<String>>()
                    .returns::<bool>(),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn shape_only_types_resolve_fully() {
        let iface = duck_interface();
        let duck = TypeInfo::declared_concrete("zoo::Duck")
            .member(FieldInfo::declared("Quack", TypeName::of::<Option<String>>()))
            .member(MethodInfo::declared(
                MethodSignature::new("TryQuack")
                    .param::<Option<String>>()
                    .out::<Option<String>>()
                    .returns::<bool>(),
            ))
            .build()
            .unwrap();

        DomainValidator::validate_type_info(&duck).unwrap();
        let bindings = MemberResolver::resolve_all(
            iface.interface_members(),
            duck.candidate_members(),
            false,
        )
        .unwrap();

        assert_eq!(bindings.len(), 2);
        assert!(bindings.iter().all(Binding::is_resolved));
    }

    #[test]
    fn overload_differing_only_by_direction_does_not_match() {
        let iface = duck_interface();
        let goose = TypeInfo::declared_concrete("zoo::Goose")
            .member(MethodInfo::declared(
                MethodSignature::new("TryQuack")
                    .param::<Option<String>>()
                    .param::<Option<String>>()
                    .returns::<bool>(),
            ))
            .build()
            .unwrap();

        let bindings = MemberResolver::resolve_all(
            iface.interface_members(),
            goose.candidate_members(),
            false,
        )
        .unwrap();

        assert!(bindings.iter().all(|b| !b.is_resolved()));
    }

    #[test]
    fn member_display_is_readable() {
        let member = InterfaceMember::getter::<bool>("Flying");
        assert_eq!(member.to_string(), "Flying => bool { get }");
    }
}
