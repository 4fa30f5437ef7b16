//! Invocation frames for dynamic method calls.
//!
//! An [`Arguments`] frame is an ordered list of typed slots. The caller
//! fills input slots and declares output slots; the callee takes inputs and
//! writes outputs; the caller then reads the outputs back in declaration
//! order. The frame's parameter list doubles as the call-site signature used
//! for overload dispatch.

use std::any::Any;
use std::fmt;

use crate::domain::{
    entities::signature::MethodSignature,
    error::DomainError,
    value_objects::{Direction, Parameter, TypeName},
};

struct Slot {
    parameter: Parameter,
    value: Option<Box<dyn Any + Send>>,
}

/// Ordered, typed argument slots for one call.
///
/// ```rust
/// use ducktype_core::domain::Arguments;
///
/// let mut args = Arguments::new().arg(41_i32).out::<Option<i32>>();
///
/// // callee side
/// let n: i32 = args.take(0).unwrap();
/// args.set_out(1, Some(n + 1)).unwrap();
///
/// // caller side
/// assert_eq!(args.take_out::<Option<i32>>(1).unwrap(), Some(42));
/// ```
#[derive(Default)]
pub struct Arguments {
    slots: Vec<Slot>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a by-value argument.
    pub fn arg<T: Send + 'static>(mut self, value: T) -> Self {
        self.slots.push(Slot {
            parameter: Parameter::of::<T>(Direction::In),
            value: Some(Box::new(value)),
        });
        self
    }

    /// Append an output slot of type `T`, initially empty.
    pub fn out<T: Send + 'static>(mut self) -> Self {
        self.slots.push(Slot {
            parameter: Parameter::of::<T>(Direction::Out),
            value: None,
        });
        self
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Declared parameters, in order.
    pub fn parameters(&self) -> Vec<Parameter> {
        self.slots.iter().map(|s| s.parameter.clone()).collect()
    }

    /// The call-site signature: `name(parameters) => R`.
    pub fn signature<R: ?Sized + 'static>(&self, name: impl Into<String>) -> MethodSignature {
        self.slots
            .iter()
            .fold(MethodSignature::new(name), |sig, slot| {
                sig.with_parameter(slot.parameter.clone())
            })
            .returns::<R>()
    }

    /// Move an input argument out of the frame (callee side).
    pub fn take<T: 'static>(&mut self, index: usize) -> Result<T, DomainError> {
        let slot = self.slot_mut::<T>(index, Direction::In)?;
        take_value(slot, index)
    }

    /// Borrow an input argument without consuming it.
    pub fn get<T: 'static>(&self, index: usize) -> Result<&T, DomainError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get(index)
            .ok_or(DomainError::ArgumentIndex { index, len })?;
        check_slot::<T>(&slot.parameter, index, Direction::In)?;

        slot.value
            .as_ref()
            .and_then(|v| v.downcast_ref::<T>())
            .ok_or(DomainError::ArgumentMissing { index })
    }

    /// Write an output argument (callee side).
    pub fn set_out<T: Send + 'static>(&mut self, index: usize, value: T) -> Result<(), DomainError> {
        let slot = self.slot_mut::<T>(index, Direction::Out)?;
        slot.value = Some(Box::new(value));
        Ok(())
    }

    /// Read an output argument back (caller side).
    pub fn take_out<T: 'static>(&mut self, index: usize) -> Result<T, DomainError> {
        let slot = self.slot_mut::<T>(index, Direction::Out)?;
        take_value(slot, index)
    }

    fn slot_mut<T: 'static>(
        &mut self,
        index: usize,
        direction: Direction,
    ) -> Result<&mut Slot, DomainError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(DomainError::ArgumentIndex { index, len })?;
        check_slot::<T>(&slot.parameter, index, direction)?;
        Ok(slot)
    }
}

fn check_slot<T: 'static>(
    parameter: &Parameter,
    index: usize,
    direction: Direction,
) -> Result<(), DomainError> {
    if parameter.direction != direction {
        return Err(DomainError::DirectionMismatch {
            index,
            expected: direction,
        });
    }

    let requested = TypeName::of::<T>();
    if parameter.ty != requested {
        return Err(DomainError::TypeMismatch {
            expected: parameter.ty.to_string(),
            actual: requested.to_string(),
        });
    }

    Ok(())
}

fn take_value<T: 'static>(slot: &mut Slot, index: usize) -> Result<T, DomainError> {
    let value = slot
        .value
        .take()
        .ok_or(DomainError::ArgumentMissing { index })?;

    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| DomainError::TypeMismatch {
            expected: slot.parameter.ty.to_string(),
            actual: TypeName::of::<T>().to_string(),
        })
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|s| {
                format!(
                    "{}{}",
                    s.parameter,
                    if s.value.is_some() { "" } else { " <empty>" }
                )
            }))
            .finish()
    }
}
