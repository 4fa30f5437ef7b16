//! Application layer errors.
//!
//! These errors represent failures in orchestration and adapter use, not in
//! the type model itself. Type-model errors are `DomainError` from
//! `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::{InterfaceMember, TypeName};
use crate::error::ErrorCategory;

/// An interface member with no accessible backing member.
///
/// Raised when an unresolved member of an adapter is used.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MissingMember {
    #[error(
        "No accessible field or property {interface}.{member} => {value_type} found on wrapped value {backing}."
    )]
    Property {
        interface: TypeName,
        member: String,
        value_type: TypeName,
        backing: TypeName,
    },

    #[error(
        "No accessible method {interface}.{method}({parameters}) => {return_type} found on wrapped value {backing}."
    )]
    Method {
        interface: TypeName,
        method: String,
        parameters: String,
        return_type: TypeName,
        backing: TypeName,
    },
}

impl MissingMember {
    pub fn new(interface: &TypeName, backing: &TypeName, member: &InterfaceMember) -> Self {
        match member {
            InterfaceMember::Property(p) => Self::Property {
                interface: interface.clone(),
                member: p.name.clone(),
                value_type: p.value_type.clone(),
                backing: backing.clone(),
            },
            InterfaceMember::Method(m) => Self::Method {
                interface: interface.clone(),
                method: m.signature.name.clone(),
                parameters: m.signature.parameter_list(),
                return_type: m.signature.return_type.clone(),
                backing: backing.clone(),
            },
        }
    }
}

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// The requested adapter target is not a registered interface.
    #[error("{type_name} must be an interface type.")]
    NotAnInterface { type_name: TypeName },

    /// An unresolved interface member was used.
    #[error(transparent)]
    MissingMember(#[from] MissingMember),

    /// The adapter was asked for something its interface does not declare.
    #[error("Interface {interface} declares no member {request}")]
    UnknownInterfaceMember { interface: TypeName, request: String },

    /// No registered type carries this name.
    #[error("Unknown type '{name}'")]
    UnknownType { name: String },

    /// A simple name matched more than one registered type.
    #[error("Type name '{name}' is ambiguous ({} matches)", .candidates.len())]
    AmbiguousTypeName {
        name: String,
        candidates: Vec<String>,
    },

    /// Type registry access failed (lock poisoned).
    #[error("Type registry error")]
    RegistryLockError,

    /// Resolution cache access failed (lock poisoned).
    #[error("Resolution cache error")]
    CacheLockError,

    /// A shape manifest could not be read or parsed.
    #[error("Manifest error in {path}: {reason}")]
    ManifestError { path: PathBuf, reason: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::NotAnInterface { type_name } => vec![
                format!("'{}' is concrete or not registered as an interface", type_name),
                "Register the trait with TypeInfo::interface::<dyn Trait>()".into(),
                "Try: ducktype list".into(),
            ],
            Self::MissingMember(_) => vec![
                "Add a public member with the exact same type or signature".into(),
                "Or opt in to private members with --include-private".into(),
            ],
            Self::UnknownInterfaceMember { interface, .. } => vec![
                format!("Check the members declared on {}", interface),
                "Property types and method signatures must match exactly".into(),
            ],
            Self::UnknownType { name } => vec![
                format!("No type named '{}' is registered", name),
                "Try: ducktype list".into(),
                "Or load its shape with --manifest".into(),
            ],
            Self::AmbiguousTypeName { candidates, .. } => {
                let mut hints = vec!["Use one of the fully qualified names:".to_string()];
                hints.extend(candidates.iter().map(|c| format!("  {}", c)));
                hints
            }
            Self::RegistryLockError | Self::CacheLockError => vec![
                "A thread panicked while holding a shared lock".into(),
                "Restart the process".into(),
            ],
            Self::ManifestError { path, .. } => vec![
                format!("Check the syntax of {}", path.display()),
                "Manifests are TOML, or JSON with a .json extension".into(),
            ],
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotAnInterface { .. } | Self::AmbiguousTypeName { .. } => {
                ErrorCategory::Validation
            }
            Self::MissingMember(_) | Self::UnknownInterfaceMember { .. } => {
                ErrorCategory::Resolution
            }
            Self::UnknownType { .. } => ErrorCategory::NotFound,
            Self::ManifestError { .. } => ErrorCategory::Configuration,
            Self::RegistryLockError | Self::CacheLockError => ErrorCategory::Internal,
        }
    }
}
