//! Bindings and resolution tables.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::{
        member::{CandidateMember, InterfaceMember},
        signature::MethodSignature,
    },
    value_objects::TypeName,
};

/// Outcome of resolving one interface member.
#[derive(Debug, Clone)]
pub enum Binding {
    Resolved {
        member: InterfaceMember,
        candidate: CandidateMember,
    },
    Unresolved(InterfaceMember),
}

impl Binding {
    pub fn member(&self) -> &InterfaceMember {
        match self {
            Self::Resolved { member, .. } | Self::Unresolved(member) => member,
        }
    }

    pub fn candidate(&self) -> Option<&CandidateMember> {
        match self {
            Self::Resolved { candidate, .. } => Some(candidate),
            Self::Unresolved(_) => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }
}

/// Identity of a resolution table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolutionKey {
    pub interface: TypeName,
    pub backing: TypeName,
    pub include_private: bool,
    /// Registry generation the table was computed against.
    #[serde(default)]
    pub generation: u64,
}

impl ResolutionKey {
    pub fn new(
        interface: impl Into<TypeName>,
        backing: impl Into<TypeName>,
        include_private: bool,
    ) -> Self {
        Self {
            interface: interface.into(),
            backing: backing.into(),
            include_private,
            generation: 0,
        }
    }

    pub fn at_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }
}

impl fmt::Display for ResolutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {}", self.interface, self.backing)?;
        if self.include_private {
            f.write_str(" (including private members)")?;
        }
        Ok(())
    }
}

/// Every binding of one interface against one backing type.
///
/// Immutable once built; shared between adapters through `Arc`.
#[derive(Debug, Clone)]
pub struct ResolutionTable {
    key: ResolutionKey,
    bindings: Vec<Binding>,
}

impl ResolutionTable {
    pub fn new(key: ResolutionKey, bindings: Vec<Binding>) -> Self {
        Self { key, bindings }
    }

    pub fn key(&self) -> &ResolutionKey {
        &self.key
    }

    pub fn interface(&self) -> &TypeName {
        &self.key.interface
    }

    pub fn backing(&self) -> &TypeName {
        &self.key.backing
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// `true` when every member resolved.
    pub fn is_complete(&self) -> bool {
        self.bindings.iter().all(Binding::is_resolved)
    }

    pub fn unresolved(&self) -> impl Iterator<Item = &InterfaceMember> {
        self.bindings
            .iter()
            .filter(|b| !b.is_resolved())
            .map(Binding::member)
    }

    /// Binding of the interface property `name`.
    pub fn property(&self, name: &str) -> Option<&Binding> {
        self.bindings
            .iter()
            .find(|b| matches!(b.member(), InterfaceMember::Property(p) if p.name == name))
    }

    /// Binding of the interface method with exactly `signature`.
    pub fn method(&self, signature: &MethodSignature) -> Option<&Binding> {
        self.bindings.iter().find(
            |b| matches!(b.member(), InterfaceMember::Method(m) if m.signature.matches(signature)),
        )
    }

    /// Whether every interface member called `name` is bound.
    pub fn is_bound(&self, name: &str) -> bool {
        let mut named = self
            .bindings
            .iter()
            .filter(|b| b.member().name() == name)
            .peekable();
        named.peek().is_some() && named.all(Binding::is_resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::member::FieldInfo;

    fn table() -> ResolutionTable {
        let quack = InterfaceMember::property::<String>("Quack");
        let honk = InterfaceMember::method(MethodSignature::new("Honk").param::<i32>());
        let honk_out = InterfaceMember::method(MethodSignature::new("Honk").out::<i32>());

        ResolutionTable::new(
            ResolutionKey::new("zoo::IDuck", "zoo::Duck", false),
            vec![
                Binding::Resolved {
                    member: quack,
                    candidate: FieldInfo::declared("Quack", TypeName::of::<String>()).into(),
                },
                Binding::Unresolved(honk),
                Binding::Unresolved(honk_out),
            ],
        )
    }

    #[test]
    fn completeness_and_unresolved() {
        let table = table();
        assert!(!table.is_complete());
        assert_eq!(table.unresolved().count(), 2);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn property_lookup_by_name() {
        let table = table();
        assert!(table.property("Quack").unwrap().is_resolved());
        assert!(table.property("Honk").is_none());
    }

    #[test]
    fn method_lookup_by_signature() {
        let table = table();
        let sig = MethodSignature::new("Honk").out::<i32>();
        let binding = table.method(&sig).unwrap();
        assert_eq!(binding.member(), &InterfaceMember::method(sig));
        assert!(table.method(&MethodSignature::new("Honk")).is_none());
    }

    #[test]
    fn is_bound_requires_every_overload() {
        let table = table();
        assert!(table.is_bound("Quack"));
        assert!(!table.is_bound("Honk"));
        assert!(!table.is_bound("Missing"));
    }

    #[test]
    fn key_display_mentions_private_policy() {
        let key = ResolutionKey::new("zoo::IDuck", "zoo::Duck", true);
        assert_eq!(
            key.to_string(),
            "zoo::IDuck <- zoo::Duck (including private members)"
        );
    }

    #[test]
    fn keys_from_different_generations_differ() {
        let key = ResolutionKey::new("zoo::IDuck", "zoo::Duck", false);
        assert_eq!(key.generation, 0);
        assert_ne!(key.clone().at_generation(1), key);
        assert_eq!(key.clone().at_generation(1).to_string(), key.to_string());
    }
}
