//! Method signatures and exact signature matching.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{Direction, Parameter, TypeName};

/// A method's name, ordered parameters (with direction), and return type.
///
/// # Example
///
/// ```rust
/// use ducktype_core::domain::MethodSignature;
///
/// let sig = MethodSignature::new("TryQuack")
///     .param::<i32>()
///     .out::<Option<i32>>()
///     .returns::<bool>();
///
/// assert_eq!(sig.parameters.len(), 2);
/// assert!(sig.to_string().starts_with("TryQuack(i32, out "));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    pub name: String,
    pub parameters: Vec<Parameter>,
    pub return_type: TypeName,
}

impl MethodSignature {
    /// Start a signature with no parameters returning `()`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            return_type: TypeName::of::<()>(),
        }
    }

    /// Append a by-value parameter of type `T`.
    pub fn param<T: ?Sized + 'static>(self) -> Self {
        self.with_parameter(Parameter::of::<T>(Direction::In))
    }

    /// Append an output parameter of type `T`.
    pub fn out<T: ?Sized + 'static>(self) -> Self {
        self.with_parameter(Parameter::of::<T>(Direction::Out))
    }

    /// Set the return type to `T`.
    pub fn returns<T: ?Sized + 'static>(self) -> Self {
        self.with_return_type(TypeName::of::<T>())
    }

    pub fn with_parameter(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_return_type(mut self, return_type: impl Into<TypeName>) -> Self {
        self.return_type = return_type.into();
        self
    }

    /// Exact signature equivalence. See [`matches_signature`].
    pub fn matches(&self, other: &MethodSignature) -> bool {
        matches_signature(self, other)
    }

    /// Parameter list rendered as `T1, out T2`.
    pub fn parameter_list(&self) -> String {
        self.parameters
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({}) => {}",
            self.name,
            self.parameter_list(),
            self.return_type
        )
    }
}

/// Compare two method signatures for exact equivalence.
///
/// Names equal, parameter counts equal, every `(type, direction)` pair
/// identical in order, return types identical. No variance, no coercion.
pub fn matches_signature(a: &MethodSignature, b: &MethodSignature) -> bool {
    a.name == b.name
        && a.parameters.len() == b.parameters.len()
        && a
            .parameters
            .iter()
            .zip(&b.parameters)
            .all(|(pa, pb)| pa.ty == pb.ty && pa.direction == pb.direction)
        && a.return_type == b.return_type
}
