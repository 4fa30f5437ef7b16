//! Interface members (what must be satisfied) and candidate members (what a
//! backing type offers).
//!
//! Candidate members carry their runtime accessors as type-erased closures
//! over `dyn Any`. Shape-only members (declared in manifests) carry
//! [`Thunk::Declared`] instead: they take part in resolution like any other
//! member but fail with [`DomainError::InvocationFailed`] when used.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::domain::{
    entities::{arguments::Arguments, signature::MethodSignature, type_info::Projection},
    error::DomainError,
    value_objects::{TypeName, Visibility},
};

// ── Accessor thunks ──────────────────────────────────────────────────────────

/// Type-erased read accessor.
pub type GetFn = dyn Fn(&dyn Any) -> Result<Box<dyn Any + Send>, DomainError> + Send + Sync;
/// Type-erased write accessor.
pub type SetFn = dyn Fn(&mut dyn Any, Box<dyn Any + Send>) -> Result<(), DomainError> + Send + Sync;
/// Type-erased method invoker.
pub type InvokeFn =
    dyn Fn(&mut dyn Any, &mut Arguments) -> Result<Box<dyn Any + Send>, DomainError> + Send + Sync;

/// A runtime accessor, or a declaration without one.
pub enum Thunk<F: ?Sized> {
    Bound(Arc<F>),
    Declared,
}

impl<F: ?Sized> Thunk<F> {
    pub fn is_bound(&self) -> bool {
        matches!(self, Self::Bound(_))
    }

    /// The bound closure, or an `InvocationFailed` naming `member`.
    pub fn bound(&self, member: &str) -> Result<&F, DomainError> {
        match self {
            Self::Bound(f) => Ok(f.as_ref()),
            Self::Declared => Err(DomainError::InvocationFailed {
                member: member.to_string(),
                reason: "member is declared without a runtime implementation".into(),
            }),
        }
    }
}

impl<F: ?Sized> Clone for Thunk<F> {
    fn clone(&self) -> Self {
        match self {
            Self::Bound(f) => Self::Bound(Arc::clone(f)),
            Self::Declared => Self::Declared,
        }
    }
}

impl<F: ?Sized> fmt::Debug for Thunk<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bound(_) => f.write_str("Bound"),
            Self::Declared => f.write_str("Declared"),
        }
    }
}

fn target_ref<'a, S: 'static>(target: &'a dyn Any, member: &str) -> Result<&'a S, DomainError> {
    target
        .downcast_ref::<S>()
        .ok_or_else(|| wrong_target::<S>(member))
}

fn target_mut<'a, S: 'static>(
    target: &'a mut dyn Any,
    member: &str,
) -> Result<&'a mut S, DomainError> {
    target
        .downcast_mut::<S>()
        .ok_or_else(|| wrong_target::<S>(member))
}

fn wrong_target<S: 'static>(member: &str) -> DomainError {
    DomainError::InvocationFailed {
        member: member.to_string(),
        reason: format!("wrapped value is not a {}", TypeName::of::<S>()),
    }
}

fn unbox<T: 'static>(value: Box<dyn Any + Send>) -> Result<T, DomainError> {
    value
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| DomainError::TypeMismatch {
            expected: TypeName::of::<T>().to_string(),
            actual: "a value of another type".into(),
        })
}

// ── Interface members ────────────────────────────────────────────────────────

/// A property an interface requires.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyMember {
    pub name: String,
    pub value_type: TypeName,
    pub has_getter: bool,
    pub has_setter: bool,
}

/// A method an interface requires.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodMember {
    pub signature: MethodSignature,
}

/// One member of an interface to satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InterfaceMember {
    Property(PropertyMember),
    Method(MethodMember),
}

impl InterfaceMember {
    /// Read/write property of type `T`.
    pub fn property<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::declared_property(name, TypeName::of::<T>(), true, true)
    }

    /// Get-only property of type `T`.
    pub fn getter<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::declared_property(name, TypeName::of::<T>(), true, false)
    }

    /// Set-only property of type `T`.
    pub fn setter<T: ?Sized + 'static>(name: impl Into<String>) -> Self {
        Self::declared_property(name, TypeName::of::<T>(), false, true)
    }

    pub fn declared_property(
        name: impl Into<String>,
        value_type: impl Into<TypeName>,
        has_getter: bool,
        has_setter: bool,
    ) -> Self {
        Self::Property(PropertyMember {
            name: name.into(),
            value_type: value_type.into(),
            has_getter,
            has_setter,
        })
    }

    pub fn method(signature: MethodSignature) -> Self {
        Self::Method(MethodMember { signature })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Property(p) => &p.name,
            Self::Method(m) => &m.signature.name,
        }
    }

    pub fn is_property(&self) -> bool {
        matches!(self, Self::Property(_))
    }
}

impl fmt::Display for InterfaceMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(p) => {
                let access = match (p.has_getter, p.has_setter) {
                    (true, true) => "get; set",
                    (true, false) => "get",
                    (false, true) => "set",
                    (false, false) => "",
                };
                write!(f, "{} => {} {{ {} }}", p.name, p.value_type, access)
            }
            Self::Method(m) => write!(f, "{}", m.signature),
        }
    }
}

// ── Candidate members ────────────────────────────────────────────────────────

/// A field on a backing type. Always readable and writable.
#[derive(Debug, Clone)]
pub struct FieldInfo {
    pub name: String,
    pub ty: TypeName,
    pub visibility: Visibility,
    pub(crate) get: Thunk<GetFn>,
    pub(crate) set: Thunk<SetFn>,
}

impl FieldInfo {
    /// A public field of `S`, projected by `read`/`write`.
    ///
    /// ```rust
    /// use ducktype_core::domain::FieldInfo;
    ///
    /// struct Duck { quack: Option<String> }
    ///
    /// let field = FieldInfo::new("Quack", |d: &Duck| &d.quack, |d: &mut Duck| &mut d.quack);
    /// assert_eq!(field.name, "Quack");
    /// ```
    pub fn new<S, T, R, W>(name: impl Into<String>, read: R, write: W) -> Self
    where
        S: 'static,
        T: Clone + Send + 'static,
        R: Fn(&S) -> &T + Send + Sync + 'static,
        W: Fn(&mut S) -> &mut T + Send + Sync + 'static,
    {
        let name = name.into();

        let get_name = name.clone();
        let get: Arc<GetFn> = Arc::new(
            move |target: &dyn Any| -> Result<Box<dyn Any + Send>, DomainError> {
                let s = target_ref::<S>(target, &get_name)?;
                Ok(Box::new(read(s).clone()))
            },
        );

        let set_name = name.clone();
        let set: Arc<SetFn> = Arc::new(
            move |target: &mut dyn Any, value: Box<dyn Any + Send>| -> Result<(), DomainError> {
                let value = unbox::<T>(value)?;
                let s = target_mut::<S>(target, &set_name)?;
                *write(s) = value;
                Ok(())
            },
        );

        Self {
            name,
            ty: TypeName::of::<T>(),
            visibility: Visibility::Public,
            get: Thunk::Bound(get),
            set: Thunk::Bound(set),
        }
    }

    /// A field known only by shape.
    pub fn declared(name: impl Into<String>, ty: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            visibility: Visibility::Public,
            get: Thunk::Declared,
            set: Thunk::Declared,
        }
    }

    pub fn private(self) -> Self {
        self.with_visibility(Visibility::Private)
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// A property on a backing type, with an optional getter and setter.
#[derive(Debug, Clone)]
pub struct PropertyInfo {
    pub name: String,
    pub ty: TypeName,
    pub visibility: Visibility,
    pub(crate) get: Option<Thunk<GetFn>>,
    pub(crate) set: Option<Thunk<SetFn>>,
}

impl PropertyInfo {
    /// Read/write property of `S`.
    pub fn new<S, T, G, W>(name: impl Into<String>, get: G, set: W) -> Self
    where
        S: 'static,
        T: Send + 'static,
        G: Fn(&S) -> T + Send + Sync + 'static,
        W: Fn(&mut S, T) + Send + Sync + 'static,
    {
        let name = name.into();
        Self {
            get: Some(Thunk::Bound(getter::<S, T, G>(name.clone(), get))),
            set: Some(Thunk::Bound(setter::<S, T, W>(name.clone(), set))),
            name,
            ty: TypeName::of::<T>(),
            visibility: Visibility::Public,
        }
    }

    /// Get-only property of `S`.
    pub fn read_only<S, T, G>(name: impl Into<String>, get: G) -> Self
    where
        S: 'static,
        T: Send + 'static,
        G: Fn(&S) -> T + Send + Sync + 'static,
    {
        let name = name.into();
        Self {
            get: Some(Thunk::Bound(getter::<S, T, G>(name.clone(), get))),
            set: None,
            name,
            ty: TypeName::of::<T>(),
            visibility: Visibility::Public,
        }
    }

    /// Set-only property of `S`.
    pub fn write_only<S, T, W>(name: impl Into<String>, set: W) -> Self
    where
        S: 'static,
        T: Send + 'static,
        W: Fn(&mut S, T) + Send + Sync + 'static,
    {
        let name = name.into();
        Self {
            get: None,
            set: Some(Thunk::Bound(setter::<S, T, W>(name.clone(), set))),
            name,
            ty: TypeName::of::<T>(),
            visibility: Visibility::Public,
        }
    }

    /// A property known only by shape.
    pub fn declared(
        name: impl Into<String>,
        ty: impl Into<TypeName>,
        has_getter: bool,
        has_setter: bool,
    ) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            visibility: Visibility::Public,
            get: has_getter.then_some(Thunk::Declared),
            set: has_setter.then_some(Thunk::Declared),
        }
    }

    pub fn has_getter(&self) -> bool {
        self.get.is_some()
    }

    pub fn has_setter(&self) -> bool {
        self.set.is_some()
    }

    pub fn private(self) -> Self {
        self.with_visibility(Visibility::Private)
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

fn getter<S, T, G>(name: String, get: G) -> Arc<GetFn>
where
    S: 'static,
    T: Send + 'static,
    G: Fn(&S) -> T + Send + Sync + 'static,
{
    Arc::new(
        move |target: &dyn Any| -> Result<Box<dyn Any + Send>, DomainError> {
            let s = target_ref::<S>(target, &name)?;
            Ok(Box::new(get(s)))
        },
    )
}

fn setter<S, T, W>(name: String, set: W) -> Arc<SetFn>
where
    S: 'static,
    T: Send + 'static,
    W: Fn(&mut S, T) + Send + Sync + 'static,
{
    Arc::new(
        move |target: &mut dyn Any, value: Box<dyn Any + Send>| -> Result<(), DomainError> {
            let value = unbox::<T>(value)?;
            let s = target_mut::<S>(target, &name)?;
            set(s, value);
            Ok(())
        },
    )
}

/// A method on a backing type.
#[derive(Debug, Clone)]
pub struct MethodInfo {
    pub signature: MethodSignature,
    pub visibility: Visibility,
    pub(crate) invoke: Thunk<InvokeFn>,
}

impl MethodInfo {
    /// A public method of `S`.
    ///
    /// The name and parameters come from `signature`; the return type is
    /// always taken from the closure's `R`.
    pub fn new<S, R, F>(signature: MethodSignature, f: F) -> Self
    where
        S: 'static,
        R: Send + 'static,
        F: Fn(&mut S, &mut Arguments) -> Result<R, DomainError> + Send + Sync + 'static,
    {
        let signature = signature.returns::<R>();
        let name = signature.name.clone();

        let invoke: Arc<InvokeFn> = Arc::new(
            move |target: &mut dyn Any,
                  args: &mut Arguments|
                  -> Result<Box<dyn Any + Send>, DomainError> {
                let s = target_mut::<S>(target, &name)?;
                f(s, args).map(|r| Box::new(r) as Box<dyn Any + Send>)
            },
        );

        Self {
            signature,
            visibility: Visibility::Public,
            invoke: Thunk::Bound(invoke),
        }
    }

    /// A method known only by shape.
    pub fn declared(signature: MethodSignature) -> Self {
        Self {
            signature,
            visibility: Visibility::Public,
            invoke: Thunk::Declared,
        }
    }

    pub fn private(self) -> Self {
        self.with_visibility(Visibility::Private)
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// A member discovered on a backing type.
#[derive(Debug, Clone)]
pub enum CandidateMember {
    Field(FieldInfo),
    Property(PropertyInfo),
    Method(MethodInfo),
}

impl CandidateMember {
    pub fn name(&self) -> &str {
        match self {
            Self::Field(f) => &f.name,
            Self::Property(p) => &p.name,
            Self::Method(m) => &m.signature.name,
        }
    }

    pub fn visibility(&self) -> Visibility {
        match self {
            Self::Field(f) => f.visibility,
            Self::Property(p) => p.visibility,
            Self::Method(m) => m.visibility,
        }
    }

    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Field(_) => "field",
            Self::Property(_) => "property",
            Self::Method(_) => "method",
        }
    }

    /// The same member, reached on a derived value through `projection`.
    ///
    /// Declared thunks stay declared.
    pub(crate) fn through(&self, projection: &Projection) -> CandidateMember {
        match self {
            Self::Field(f) => Self::Field(FieldInfo {
                get: reroute_get(&f.get, projection, &f.name),
                set: reroute_set(&f.set, projection, &f.name),
                ..f.clone()
            }),
            Self::Property(p) => Self::Property(PropertyInfo {
                get: p.get.as_ref().map(|g| reroute_get(g, projection, &p.name)),
                set: p.set.as_ref().map(|s| reroute_set(s, projection, &p.name)),
                ..p.clone()
            }),
            Self::Method(m) => Self::Method(MethodInfo {
                invoke: reroute_invoke(&m.invoke, projection, &m.signature.name),
                ..m.clone()
            }),
        }
    }

    /// Whether a member declared on a derived type hides `other`.
    ///
    /// Fields and properties hide by name; methods hide by full signature.
    pub fn hides(&self, other: &CandidateMember) -> bool {
        match (self, other) {
            (Self::Method(a), Self::Method(b)) => a.signature.matches(&b.signature),
            (Self::Method(_), _) | (_, Self::Method(_)) => false,
            (a, b) => a.name() == b.name(),
        }
    }
}

fn not_embedded(member: &str) -> DomainError {
    DomainError::InvocationFailed {
        member: member.to_string(),
        reason: "wrapped value does not embed the declaring base type".into(),
    }
}

fn reroute_get(thunk: &Thunk<GetFn>, projection: &Projection, member: &str) -> Thunk<GetFn> {
    let Thunk::Bound(inner) = thunk else {
        return Thunk::Declared;
    };
    let (inner, read, member) = (Arc::clone(inner), Arc::clone(&projection.read), member.to_string());
    Thunk::Bound(Arc::new(
        move |target: &dyn Any| -> Result<Box<dyn Any + Send>, DomainError> {
            let base = read(target).ok_or_else(|| not_embedded(&member))?;
            inner(base)
        },
    ))
}

fn reroute_set(thunk: &Thunk<SetFn>, projection: &Projection, member: &str) -> Thunk<SetFn> {
    let Thunk::Bound(inner) = thunk else {
        return Thunk::Declared;
    };
    let (inner, write, member) = (Arc::clone(inner), Arc::clone(&projection.write), member.to_string());
    Thunk::Bound(Arc::new(
        move |target: &mut dyn Any, value: Box<dyn Any + Send>| -> Result<(), DomainError> {
            let base = write(target).ok_or_else(|| not_embedded(&member))?;
            inner(base, value)
        },
    ))
}

fn reroute_invoke(
    thunk: &Thunk<InvokeFn>,
    projection: &Projection,
    member: &str,
) -> Thunk<InvokeFn> {
    let Thunk::Bound(inner) = thunk else {
        return Thunk::Declared;
    };
    let (inner, write, member) = (Arc::clone(inner), Arc::clone(&projection.write), member.to_string());
    Thunk::Bound(Arc::new(
        move |target: &mut dyn Any,
              args: &mut Arguments|
              -> Result<Box<dyn Any + Send>, DomainError> {
            let base = write(target).ok_or_else(|| not_embedded(&member))?;
            inner(base, args)
        },
    ))
}

impl From<FieldInfo> for CandidateMember {
    fn from(f: FieldInfo) -> Self {
        Self::Field(f)
    }
}

impl From<PropertyInfo> for CandidateMember {
    fn from(p: PropertyInfo) -> Self {
        Self::Property(p)
    }
}

impl From<MethodInfo> for CandidateMember {
    fn from(m: MethodInfo) -> Self {
        Self::Method(m)
    }
}

impl fmt::Display for CandidateMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(field) => {
                write!(f, "{} field {}: {}", field.visibility, field.name, field.ty)
            }
            Self::Property(p) => {
                let access = match (p.has_getter(), p.has_setter()) {
                    (true, true) => "get; set",
                    (true, false) => "get",
                    (false, true) => "set",
                    (false, false) => "",
                };
                write!(
                    f,
                    "{} property {}: {} {{ {} }}",
                    p.visibility, p.name, p.ty, access
                )
            }
            Self::Method(m) => write!(f, "{} method {}", m.visibility, m.signature),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Pond {
        depth: i32,
        name: String,
    }

    fn pond() -> Pond {
        Pond {
            depth: 3,
            name: "mill".into(),
        }
    }

    #[test]
    fn field_accessors_read_and_write() {
        let field = FieldInfo::new("Depth", |p: &Pond| &p.depth, |p: &mut Pond| &mut p.depth);
        let mut target = pond();

        let get = field.get.bound("Depth").unwrap();
        let value = get(&target).unwrap();
        assert_eq!(*value.downcast::<i32>().unwrap(), 3);

        let set = field.set.bound("Depth").unwrap();
        set(&mut target, Box::new(9_i32)).unwrap();
        assert_eq!(target.depth, 9);
    }

    #[test]
    fn field_setter_rejects_wrong_value_type() {
        let field = FieldInfo::new("Depth", |p: &Pond| &p.depth, |p: &mut Pond| &mut p.depth);
        let mut target = pond();
        let set = field.set.bound("Depth").unwrap();

        assert!(matches!(
            set(&mut target, Box::new("deep")),
            Err(DomainError::TypeMismatch { .. })
        ));
        assert_eq!(target.depth, 3);
    }

    #[test]
    fn accessor_rejects_wrong_target() {
        let field = FieldInfo::new("Depth", |p: &Pond| &p.depth, |p: &mut Pond| &mut p.depth);
        let get = field.get.bound("Depth").unwrap();
        assert!(matches!(
            get(&42_u8),
            Err(DomainError::InvocationFailed { .. })
        ));
    }

    #[test]
    fn read_only_property_has_no_setter() {
        let prop = PropertyInfo::read_only("Name", |p: &Pond| p.name.clone());
        assert!(prop.has_getter());
        assert!(!prop.has_setter());
        assert_eq!(prop.ty, TypeName::of::<String>());
    }

    #[test]
    fn method_return_type_comes_from_closure() {
        let method = MethodInfo::new(
            MethodSignature::new("Deepen").param::<i32>(),
            |p: &mut Pond, args: &mut Arguments| {
                p.depth += args.take::<i32>(0)?;
                Ok(p.depth)
            },
        );
        assert_eq!(method.signature.return_type, TypeName::of::<i32>());

        let mut target = pond();
        let mut args = Arguments::new().arg(2_i32);
        let invoke = method.invoke.bound("Deepen").unwrap();
        let result = invoke(&mut target, &mut args).unwrap();
        assert_eq!(*result.downcast::<i32>().unwrap(), 5);
    }

    #[test]
    fn declared_members_fail_on_use() {
        let field = FieldInfo::declared("Depth", "i32");
        assert!(!field.get.is_bound());
        assert!(matches!(
            field.get.bound("Depth"),
            Err(DomainError::InvocationFailed { .. })
        ));
    }

    #[test]
    fn rerouted_members_reach_embedded_value() {
        struct Lake {
            pond: Pond,
        }

        let field: CandidateMember =
            FieldInfo::new("Depth", |p: &Pond| &p.depth, |p: &mut Pond| &mut p.depth).into();
        let projection = Projection::new(|l: &Lake| &l.pond, |l: &mut Lake| &mut l.pond);
        let CandidateMember::Field(inherited) = field.through(&projection) else {
            panic!("kind changed");
        };

        let mut lake = Lake { pond: pond() };
        let set = inherited.set.bound("Depth").unwrap();
        set(&mut lake, Box::new(12_i32)).unwrap();
        assert_eq!(lake.pond.depth, 12);

        let get = inherited.get.bound("Depth").unwrap();
        assert!(matches!(
            get(&pond()),
            Err(DomainError::InvocationFailed { .. })
        ));
    }

    #[test]
    fn hiding_rules() {
        let a: CandidateMember = FieldInfo::declared("Quack", "i32").into();
        let b: CandidateMember = PropertyInfo::declared("Quack", "bool", true, false).into();
        let m1: CandidateMember =
            MethodInfo::declared(MethodSignature::new("Quack").param::<i32>()).into();
        let m2: CandidateMember =
            MethodInfo::declared(MethodSignature::new("Quack").param::<i64>()).into();

        assert!(a.hides(&b));
        assert!(!a.hides(&m1));
        assert!(!m1.hides(&m2));
        assert!(m1.hides(&m1.clone()));
    }
}
