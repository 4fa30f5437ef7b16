//! The adapter proxy.
//!
//! An [`Adapter`] borrows a backing value and forwards interface member
//! accesses to it through a shared [`ResolutionTable`]. Each member is
//! either bound or unbound, fixed when the table was built; using an
//! unbound member raises [`MissingMember`].
//!
//! Typed facades implement the user's trait on `Adapter<'_, dyn Trait>`:
//!
//! ```rust,ignore
//! impl IDuck for Adapter<'_, dyn IDuck> {
//!     fn quack(&self) -> DuckResult<Option<String>> {
//!         self.get("Quack")
//!     }
//! }
//! ```

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::{
    application::error::{ApplicationError, MissingMember},
    domain::{
        Arguments, Binding, CandidateMember, DomainError, InterfaceMember, ResolutionTable,
        TypeName,
    },
    error::{DuckError, DuckResult},
};

/// A backing value viewed through interface `I`.
///
/// Holds a mutable borrow of the value for its whole lifetime; the caller
/// keeps ownership.
pub struct Adapter<'v, I: ?Sized> {
    value: &'v mut dyn Any,
    table: Arc<ResolutionTable>,
    _interface: PhantomData<fn(&I)>,
}

impl<'v, I: ?Sized> Adapter<'v, I> {
    pub(crate) fn new(value: &'v mut dyn Any, table: Arc<ResolutionTable>) -> Self {
        Self {
            value,
            table,
            _interface: PhantomData,
        }
    }

    /// Read property `name`.
    pub fn get<T: Any>(&self, name: &str) -> DuckResult<T> {
        let binding = self.property_binding::<T>(&self.table, name, Access::Get)?;
        let get = match self.bound_candidate(binding)? {
            CandidateMember::Field(f) => &f.get,
            CandidateMember::Property(p) => match &p.get {
                Some(get) => get,
                None => return Err(self.inconsistent(binding)),
            },
            CandidateMember::Method(_) => return Err(self.inconsistent(binding)),
        };
        let get = get.bound(name)?;
        downcast(get(&*self.value)?)
    }

    /// Write property `name`.
    pub fn set<T: Any + Send>(&mut self, name: &str, value: T) -> DuckResult<()> {
        let table = Arc::clone(&self.table);
        let binding = self.property_binding::<T>(&table, name, Access::Set)?;
        let set = match self.bound_candidate(binding)? {
            CandidateMember::Field(f) => &f.set,
            CandidateMember::Property(p) => match &p.set {
                Some(set) => set,
                None => return Err(self.inconsistent(binding)),
            },
            CandidateMember::Method(_) => return Err(self.inconsistent(binding)),
        };
        let set = set.bound(name)?;
        set(&mut *self.value, Box::new(value))?;
        Ok(())
    }

    /// Call method `name` with `args`, expecting a result of type `R`.
    ///
    /// The overload is chosen by the signature formed from `name`, the
    /// frame's parameters and `R`. Output slots written by the backing
    /// method are left in `args` for the caller.
    pub fn call<R: Any>(&mut self, name: &str, args: &mut Arguments) -> DuckResult<R> {
        let signature = args.signature::<R>(name);
        let binding = self.table.method(&signature).ok_or_else(|| {
            DuckError::from(ApplicationError::UnknownInterfaceMember {
                interface: self.interface().clone(),
                request: signature.to_string(),
            })
        })?;

        let CandidateMember::Method(method) = self.bound_candidate(binding)? else {
            return Err(self.inconsistent(binding));
        };
        let invoke = method.invoke.bound(name)?;
        let result = invoke(&mut *self.value, args)?;
        downcast(result)
    }

    /// The shared resolution table.
    pub fn table(&self) -> &Arc<ResolutionTable> {
        &self.table
    }

    /// Whether every interface member called `name` is bound.
    pub fn is_bound(&self, name: &str) -> bool {
        self.table.is_bound(name)
    }

    pub fn interface(&self) -> &TypeName {
        self.table.interface()
    }

    pub fn backing_type(&self) -> &TypeName {
        self.table.backing()
    }

    fn property_binding<'t, T: Any>(
        &self,
        table: &'t ResolutionTable,
        name: &str,
        access: Access,
    ) -> DuckResult<&'t Binding> {
        let binding = table
            .property(name)
            .ok_or_else(|| self.unknown_member(name.to_string()))?;

        let InterfaceMember::Property(property) = binding.member() else {
            return Err(self.unknown_member(name.to_string()));
        };

        let declared = match access {
            Access::Get => property.has_getter,
            Access::Set => property.has_setter,
        };
        if !declared {
            return Err(self.unknown_member(format!("{} {{ {} }}", name, access.as_str())));
        }

        let requested = TypeName::of::<T>();
        if property.value_type != requested {
            return Err(DomainError::TypeMismatch {
                expected: property.value_type.to_string(),
                actual: requested.to_string(),
            }
            .into());
        }

        Ok(binding)
    }

    fn bound_candidate<'b>(&self, binding: &'b Binding) -> DuckResult<&'b CandidateMember> {
        match binding {
            Binding::Resolved { candidate, .. } => Ok(candidate),
            Binding::Unresolved(member) => Err(ApplicationError::from(MissingMember::new(
                self.interface(),
                self.backing_type(),
                member,
            ))
            .into()),
        }
    }

    fn unknown_member(&self, request: String) -> DuckError {
        ApplicationError::UnknownInterfaceMember {
            interface: self.interface().clone(),
            request,
        }
        .into()
    }

    fn inconsistent(&self, binding: &Binding) -> DuckError {
        DuckError::Internal {
            message: format!(
                "binding for {} on {} has an incompatible candidate",
                binding.member(),
                self.backing_type()
            ),
        }
    }
}

impl<I: ?Sized> fmt::Debug for Adapter<'_, I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Adapter")
            .field("interface", self.interface())
            .field("backing", self.backing_type())
            .field("complete", &self.table.is_complete())
            .finish()
    }
}

#[derive(Clone, Copy)]
enum Access {
    Get,
    Set,
}

impl Access {
    fn as_str(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
        }
    }
}

fn downcast<T: Any>(value: Box<dyn Any + Send>) -> DuckResult<T> {
    value.downcast::<T>().map(|boxed| *boxed).map_err(|_| {
        DomainError::TypeMismatch {
            expected: TypeName::of::<T>().to_string(),
            actual: "a value of another type".into(),
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FieldInfo, MethodInfo, MethodSignature, PropertyInfo, ResolutionKey};

    struct Pond {
        depth: i32,
        calls: u32,
    }

    fn pond() -> Pond {
        Pond { depth: 1, calls: 0 }
    }

    fn table(bindings: Vec<Binding>) -> Arc<ResolutionTable> {
        Arc::new(ResolutionTable::new(
            ResolutionKey::new("zoo::IPond", "zoo::Pond", false),
            bindings,
        ))
    }

    fn depth_field() -> CandidateMember {
        FieldInfo::new("Depth", |p: &Pond| &p.depth, |p: &mut Pond| &mut p.depth).into()
    }

    #[test]
    fn reads_and_writes_through_field() {
        let mut value = pond();
        {
            let mut adapter: Adapter<'_, ()> = Adapter::new(
                &mut value,
                table(vec![Binding::Resolved {
                    member: InterfaceMember::property::<i32>("Depth"),
                    candidate: depth_field(),
                }]),
            );
            adapter.set("Depth", 7_i32).unwrap();
            assert_eq!(adapter.get::<i32>("Depth").unwrap(), 7);
        }
        assert_eq!(value.depth, 7);
    }

    #[test]
    fn wrong_property_type_is_rejected() {
        let mut value = pond();
        let adapter: Adapter<'_, ()> = Adapter::new(
            &mut value,
            table(vec![Binding::Resolved {
                member: InterfaceMember::property::<i32>("Depth"),
                candidate: depth_field(),
            }]),
        );

        assert!(matches!(
            adapter.get::<i64>("Depth"),
            Err(DuckError::Domain(DomainError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn undeclared_accessor_is_unknown() {
        let mut value = pond();
        let mut adapter: Adapter<'_, ()> = Adapter::new(
            &mut value,
            table(vec![Binding::Resolved {
                member: InterfaceMember::getter::<i32>("Depth"),
                candidate: PropertyInfo::read_only("Depth", |p: &Pond| p.depth).into(),
            }]),
        );

        assert_eq!(adapter.get::<i32>("Depth").unwrap(), 1);
        assert!(matches!(
            adapter.set("Depth", 2_i32),
            Err(DuckError::Application(
                ApplicationError::UnknownInterfaceMember { .. }
            ))
        ));
    }

    #[test]
    fn unresolved_property_raises_missing_member() {
        let mut value = pond();
        let adapter: Adapter<'_, ()> = Adapter::new(
            &mut value,
            table(vec![Binding::Unresolved(InterfaceMember::property::<i32>(
                "Width",
            ))]),
        );

        let err = adapter.get::<i32>("Width").unwrap_err();
        assert!(err.is_missing_member());
        assert_eq!(
            err.to_string(),
            "No accessible field or property zoo::IPond.Width => i32 found on wrapped value zoo::Pond."
        );
    }

    #[test]
    fn calls_dispatch_by_signature() {
        let sig = MethodSignature::new("Deepen").param::<i32>();
        let method = MethodInfo::new(sig.clone(), |p: &mut Pond, args: &mut Arguments| {
            p.calls += 1;
            p.depth += args.take::<i32>(0)?;
            Ok(p.depth)
        });

        let mut value = pond();
        {
            let mut adapter: Adapter<'_, ()> = Adapter::new(
                &mut value,
                table(vec![Binding::Resolved {
                    member: InterfaceMember::method(sig.returns::<i32>()),
                    candidate: method.into(),
                }]),
            );

            let mut args = Arguments::new().arg(4_i32);
            assert_eq!(adapter.call::<i32>("Deepen", &mut args).unwrap(), 5);

            let mut wrong = Arguments::new().arg(4_i64);
            assert!(matches!(
                adapter.call::<i32>("Deepen", &mut wrong),
                Err(DuckError::Application(
                    ApplicationError::UnknownInterfaceMember { .. }
                ))
            ));
        }
        assert_eq!(value.calls, 1);
    }

    #[test]
    fn declared_candidate_fails_on_use() {
        let mut value = pond();
        let adapter: Adapter<'_, ()> = Adapter::new(
            &mut value,
            table(vec![Binding::Resolved {
                member: InterfaceMember::property::<i32>("Depth"),
                candidate: FieldInfo::declared("Depth", TypeName::of::<i32>()).into(),
            }]),
        );

        assert!(matches!(
            adapter.get::<i32>("Depth"),
            Err(DuckError::Domain(DomainError::InvocationFailed { .. }))
        ));
    }
}
