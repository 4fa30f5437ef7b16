//! Member resolution policy.
//!
//! Matches one interface member against the members found on a backing
//! type. Pure: the result depends only on the member, the candidate list,
//! and the visibility policy.
//!
//! # Policy
//!
//! 1. Only candidates with the same name are considered, and only public
//!    ones unless `include_private` is set.
//! 2. Properties: a backing *property* of the identical type that provides
//!    every accessor the interface requires wins; otherwise a backing
//!    *field* of the identical type (fields are always readable and
//!    writable); otherwise unresolved.
//! 3. Methods: the backing method whose full signature matches exactly;
//!    otherwise unresolved.
//!
//! Two equally valid candidates for one member is an inconsistent type
//! description, reported as [`DomainError::AmbiguousResolution`] rather
//! than resolved by picking one.

use tracing::trace;

use crate::domain::{
    entities::{
        binding::Binding,
        member::{CandidateMember, InterfaceMember, MethodMember, PropertyMember},
    },
    error::DomainError,
};

/// Resolves interface members against candidate members.
pub struct MemberResolver;

impl MemberResolver {
    /// Resolve a single interface member.
    pub fn resolve(
        member: &InterfaceMember,
        candidates: &[CandidateMember],
        include_private: bool,
    ) -> Result<Binding, DomainError> {
        let visible: Vec<&CandidateMember> = candidates
            .iter()
            .filter(|c| c.name() == member.name())
            .filter(|c| c.visibility().is_accessible(include_private))
            .collect();

        let candidate = match member {
            InterfaceMember::Property(p) => Self::resolve_property(member, p, &visible)?,
            InterfaceMember::Method(m) => Self::resolve_method(member, m, &visible)?,
        };

        trace!(
            member = %member,
            bound = candidate.is_some(),
            "Resolved interface member"
        );

        Ok(match candidate {
            Some(candidate) => Binding::Resolved {
                member: member.clone(),
                candidate: candidate.clone(),
            },
            None => Binding::Unresolved(member.clone()),
        })
    }

    /// Resolve every member, preserving order.
    pub fn resolve_all(
        members: &[InterfaceMember],
        candidates: &[CandidateMember],
        include_private: bool,
    ) -> Result<Vec<Binding>, DomainError> {
        members
            .iter()
            .map(|m| Self::resolve(m, candidates, include_private))
            .collect()
    }

    fn resolve_property<'c>(
        member: &InterfaceMember,
        wanted: &PropertyMember,
        visible: &[&'c CandidateMember],
    ) -> Result<Option<&'c CandidateMember>, DomainError> {
        let properties = visible.iter().copied().filter(|c| match c {
            CandidateMember::Property(p) => {
                p.ty == wanted.value_type
                    && (!wanted.has_getter || p.has_getter())
                    && (!wanted.has_setter || p.has_setter())
            }
            _ => false,
        });
        if let Some(found) = single(member, properties)? {
            return Ok(Some(found));
        }

        let fields = visible.iter().copied().filter(
            |c| matches!(c, CandidateMember::Field(f) if f.ty == wanted.value_type),
        );
        single(member, fields)
    }

    fn resolve_method<'c>(
        member: &InterfaceMember,
        wanted: &MethodMember,
        visible: &[&'c CandidateMember],
    ) -> Result<Option<&'c CandidateMember>, DomainError> {
        let methods = visible.iter().copied().filter(
            |c| matches!(c, CandidateMember::Method(m) if m.signature.matches(&wanted.signature)),
        );
        single(member, methods)
    }
}

/// Zero or one match; more is an internal inconsistency.
fn single<'c>(
    member: &InterfaceMember,
    mut matches: impl Iterator<Item = &'c CandidateMember>,
) -> Result<Option<&'c CandidateMember>, DomainError> {
    let first = matches.next();
    let extra = matches.count();
    if extra > 0 {
        return Err(DomainError::AmbiguousResolution {
            member: member.to_string(),
            candidates: extra + 1,
        });
    }
    Ok(first)
}
