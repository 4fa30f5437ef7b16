//! Domain value objects: TypeName, Visibility, Direction, Parameter, TypeKind.
//!
//! # Design
//!
//! These are pure value types with equality by value. Type
//! identity in this crate is *nominal by fully-qualified name*: two member
//! types are the same type iff their [`TypeName`]s are identical. Runtime
//! types derive their name from [`std::any::type_name`]; manifest-declared
//! shapes supply it verbatim.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── TypeName ─────────────────────────────────────────────────────────────────

/// Fully qualified, human-readable type identifier (`::` separated path).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Name of a Rust type. Trait objects lose their `dyn ` prefix so an
    /// interface keyed by `dyn IDuck` reads as `path::to::IDuck`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        let raw = std::any::type_name::<T>();
        Self::new(raw.strip_prefix("dyn ").unwrap_or(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment, generic arguments kept.
    ///
    /// `core::option::Option<alloc::string::String>` → `Option<alloc::string::String>`
    pub fn simple_name(&self) -> &str {
        let head_end = self.0.find('<').unwrap_or(self.0.len());
        match self.0[..head_end].rfind("::") {
            Some(idx) => &self.0[idx + 2..],
            None => &self.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TypeName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

// ── Visibility ───────────────────────────────────────────────────────────────

/// Accessibility of a backing member.
///
/// Private members only take part in resolution when the caller opts in
/// with `include_private_members`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
        }
    }

    pub const fn is_public(self) -> bool {
        matches!(self, Self::Public)
    }

    /// Whether a member with this visibility is reachable under the policy.
    pub const fn is_accessible(self, include_private: bool) -> bool {
        self.is_public() || include_private
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Direction ────────────────────────────────────────────────────────────────

/// Parameter passing direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// By-value input.
    #[default]
    In,
    /// Output parameter written by the callee.
    Out,
}

impl Direction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Out => "out",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Parameter ────────────────────────────────────────────────────────────────

/// One positional method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    pub ty: TypeName,
    pub direction: Direction,
}

impl Parameter {
    pub fn input(ty: impl Into<TypeName>) -> Self {
        Self {
            ty: ty.into(),
            direction: Direction::In,
        }
    }

    pub fn output(ty: impl Into<TypeName>) -> Self {
        Self {
            ty: ty.into(),
            direction: Direction::Out,
        }
    }

    pub fn of<T: ?Sized + 'static>(direction: Direction) -> Self {
        Self {
            ty: TypeName::of::<T>(),
            direction,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::In => write!(f, "{}", self.ty),
            Direction::Out => write!(f, "out {}", self.ty),
        }
    }
}

// ── TypeKind ─────────────────────────────────────────────────────────────────

/// Whether a type only declares members to satisfy, or has members to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Interface,
    Concrete,
}

impl TypeKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Interface => "interface",
            Self::Concrete => "concrete",
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TypeKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "interface" | "trait" => Ok(Self::Interface),
            "concrete" | "class" | "struct" => Ok(Self::Concrete),
            other => Err(DomainError::InvalidTypeInfo(format!(
                "unknown type kind: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Quacks {}

    #[test]
    fn type_name_strips_dyn_prefix() {
        let name = TypeName::of::<dyn Quacks>();
        assert!(!name.as_str().starts_with("dyn "));
        assert!(name.as_str().ends_with("Quacks"));
    }

    #[test]
    fn simple_name_keeps_generics() {
        let name = TypeName::new("core::option::Option<alloc::string::String>");
        assert_eq!(name.simple_name(), "Option<alloc::string::String>");
        assert_eq!(TypeName::new("i32").simple_name(), "i32");
    }

    #[test]
    fn parameter_display_marks_out() {
        assert_eq!(Parameter::input("i32").to_string(), "i32");
        assert_eq!(Parameter::output("bool").to_string(), "out bool");
    }

    #[test]
    fn visibility_policy() {
        assert!(Visibility::Public.is_accessible(false));
        assert!(!Visibility::Private.is_accessible(false));
        assert!(Visibility::Private.is_accessible(true));
    }

    #[test]
    fn type_kind_parses_aliases() {
        assert_eq!("trait".parse::<TypeKind>().unwrap(), TypeKind::Interface);
        assert_eq!("Class".parse::<TypeKind>().unwrap(), TypeKind::Concrete);
        assert!("enum".parse::<TypeKind>().is_err());
    }
}
