//! Unified error handling for ducktype core.
//!
//! This module provides a unified error type that wraps domain and application
//! errors, with user-actionable suggestions.

use thiserror::Error;

use crate::application::ApplicationError;
use crate::domain::DomainError;

/// Root error type for ducktype core operations.
#[derive(Debug, Error, Clone)]
pub enum DuckError {
    /// Errors from the domain layer (type model and invocation).
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    /// Errors from the application layer. Displayed unprefixed so adapter
    /// messages read exactly as raised.
    #[error(transparent)]
    Application(#[from] ApplicationError),

    /// Configuration or setup errors.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Unexpected internal errors (bugs).
    #[error("Internal error: {message}. This is a bug, please report it.")]
    Internal { message: String },
}

impl DuckError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::Domain(e) => e.suggestions(),
            Self::Application(e) => e.suggestions(),
            Self::Configuration { message } => vec![
                format!("Configuration issue: {}", message),
                "Check your setup and try again".into(),
            ],
            Self::Internal { .. } => vec![
                "This appears to be a bug in ducktype".into(),
                "Please report it with the output of a -vvv run".into(),
            ],
        }
    }

    /// Get error category for display/styling purposes.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Domain(e) => match e.category() {
                crate::domain::ErrorCategory::Validation => ErrorCategory::Validation,
                crate::domain::ErrorCategory::Invocation => ErrorCategory::Invocation,
                crate::domain::ErrorCategory::Internal => ErrorCategory::Internal,
            },
            Self::Application(e) => e.category(),
            Self::Configuration { .. } => ErrorCategory::Configuration,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Whether this is the "used an unresolved member" error.
    pub fn is_missing_member(&self) -> bool {
        matches!(self, Self::Application(ApplicationError::MissingMember(_)))
    }

    /// Whether this is the "target is not an interface" error.
    pub fn is_not_an_interface(&self) -> bool {
        matches!(
            self,
            Self::Application(ApplicationError::NotAnInterface { .. })
        )
    }
}

/// Error categories for UI display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Resolution,
    Invocation,
    Configuration,
    Internal,
}

/// Convenient result type alias.
pub type DuckResult<T> = Result<T, DuckError>;

/// Extension trait for adding context to errors.
pub trait Context<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> DuckResult<T>;
}

impl<T, E> Context<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn context(self, msg: impl Into<String>) -> DuckResult<T> {
        self.map_err(|e| DuckError::Internal {
            message: format!("{}: {}", msg.into(), e),
        })
    }
}
