// ============================================================================
// domain/error.rs - TYPE MODEL & INVOCATION ERRORS
// ============================================================================

use thiserror::Error;

use crate::domain::value_objects::Direction;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (tables and reports carry them around)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Type description errors
    // ========================================================================
    #[error("Invalid type description: {0}")]
    InvalidTypeInfo(String),

    #[error("Type '{type_name}' declares member '{member}' more than once")]
    DuplicateMember { type_name: String, member: String },

    #[error("Type '{type_name}' extends unknown type '{base}'")]
    UnknownBaseType { type_name: String, base: String },

    #[error("Inheritance cycle detected through '{type_name}'")]
    InheritanceCycle { type_name: String },

    // ========================================================================
    // Resolution errors
    // ========================================================================
    #[error("Ambiguous resolution for '{member}': {candidates} candidates match exactly")]
    AmbiguousResolution { member: String, candidates: usize },

    // ========================================================================
    // Invocation errors
    // ========================================================================
    #[error("Type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Argument index {index} out of range for a frame of {len} parameter(s)")]
    ArgumentIndex { index: usize, len: usize },

    #[error("Argument {index} holds no value")]
    ArgumentMissing { index: usize },

    #[error("Argument {index} is not an {expected} parameter")]
    DirectionMismatch { index: usize, expected: Direction },

    #[error("Invocation of '{member}' failed: {reason}")]
    InvocationFailed { member: String, reason: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::DuplicateMember { type_name, member } => vec![
                format!("Remove the second declaration of '{}' on {}", member, type_name),
                "Overloads must differ in parameter types, directions, or return type".into(),
            ],
            Self::UnknownBaseType { base, .. } => vec![
                format!("Register '{}' before resolving types that extend it", base),
                "Try: ducktype list".into(),
            ],
            Self::AmbiguousResolution { member, .. } => vec![
                format!("More than one backing member satisfies '{}'", member),
                "This indicates an inconsistent type description; please report it".into(),
            ],
            Self::TypeMismatch { expected, .. } => vec![
                format!("Pass a value of type {}", expected),
                "Structural adapters never coerce between types".into(),
            ],
            Self::InvocationFailed { reason, .. } => vec![
                format!("Details: {}", reason),
                "Shape-only members from manifests cannot be invoked".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidTypeInfo(_)
            | Self::DuplicateMember { .. }
            | Self::UnknownBaseType { .. }
            | Self::InheritanceCycle { .. } => ErrorCategory::Validation,
            Self::TypeMismatch { .. }
            | Self::ArgumentIndex { .. }
            | Self::ArgumentMissing { .. }
            | Self::DirectionMismatch { .. }
            | Self::InvocationFailed { .. } => ErrorCategory::Invocation,
            Self::AmbiguousResolution { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Invocation,
    Internal,
}
