//! Sample types.
//!
//! A small zoo of interfaces and backing types registered with real
//! accessors, used by the CLI to demonstrate resolution and by tests as
//! fixtures. [`all_types`] is the single entry point.
//!
//! | Interface     | Satisfied by                | Shows                          |
//! |---------------|-----------------------------|--------------------------------|
//! | `IDuck`       | `Duck`, `Mallard`           | property backed by a field     |
//! | `IQuacker`    | `QuackingDuck`              | method forwarding              |
//! | `ITryQuack`   | `OverloadedDuck`            | overload dispatch, out params  |
//! | `IMallard`    | `Mallard` (private members) | inheritance on both sides      |
//! | any           | `Goose`                     | nothing resolves               |

use ducktype_core::domain::{
    Arguments, DomainError, FieldInfo, MethodInfo, MethodSignature, PropertyInfo, TypeInfo,
};

// ── Interfaces ───────────────────────────────────────────────────────────────

/// `Quack: Option<String> { get; set }`
pub trait IDuck {}

/// `Quack(Option<String>) => Option<String>`
pub trait IQuacker {}

/// Four `TryQuack` overloads.
pub trait ITryQuack {}

/// `IDuck` plus `Flying: bool { get }`.
pub trait IMallard {}

// ── Backing types ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Duck {
    pub quack: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuackingDuck {
    pub calls: u32,
}

/// Counts calls per overload, in declaration order of [`try_quack_overloads`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverloadedDuck {
    pub calls: [u32; 4],
}

/// Embeds a [`Duck`] as its base and keeps `flying` private.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mallard {
    pub duck: Duck,
    flying: bool,
}

impl Mallard {
    pub fn new(flying: bool) -> Self {
        Self {
            duck: Duck::default(),
            flying,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Goose;

/// The four `TryQuack` signatures, in a fixed order.
pub fn try_quack_overloads() -> [MethodSignature; 4] {
    [
        MethodSignature::new("TryQuack")
            .param::<i32>()
            .out::<Option<i32>>()
            .returns::<bool>(),
        MethodSignature::new("TryQuack")
            .param::<Option<i32>>()
            .out::<Option<i32>>()
            .returns::<bool>(),
        MethodSignature::new("TryQuack")
            .param::<Option<String>>()
            .out::<Option<String>>()
            .returns::<bool>(),
        MethodSignature::new("TryQuack")
            .param::<Option<String>>()
            .param::<Option<String>>()
            .returns::<bool>(),
    ]
}

/// Every sample type, interfaces first.
pub fn all_types() -> Result<Vec<TypeInfo>, DomainError> {
    Ok(vec![
        duck_interface()?,
        quacker_interface()?,
        try_quack_interface()?,
        mallard_interface()?,
        duck()?,
        quacking_duck()?,
        overloaded_duck()?,
        mallard()?,
        TypeInfo::concrete::<Goose>().build()?,
    ])
}

fn duck_interface() -> Result<TypeInfo, DomainError> {
    TypeInfo::interface::<dyn IDuck>()
        .property::<Option<String>>("Quack")
        .build()
}

fn quacker_interface() -> Result<TypeInfo, DomainError> {
    TypeInfo::interface::<dyn IQuacker>()
        .method(
            MethodSignature::new("Quack")
                .param::<Option<String>>()
                .returns::<Option<String>>(),
        )
        .build()
}

fn try_quack_interface() -> Result<TypeInfo, DomainError> {
    try_quack_overloads()
        .into_iter()
        .fold(TypeInfo::interface::<dyn ITryQuack>(), |builder, sig| {
            builder.method(sig)
        })
        .build()
}

fn mallard_interface() -> Result<TypeInfo, DomainError> {
    TypeInfo::interface::<dyn IMallard>()
        .extends::<dyn IDuck>()
        .getter::<bool>("Flying")
        .build()
}

fn duck() -> Result<TypeInfo, DomainError> {
    TypeInfo::concrete::<Duck>()
        .member(FieldInfo::new(
            "Quack",
            |d: &Duck| &d.quack,
            |d: &mut Duck| &mut d.quack,
        ))
        .build()
}

fn quacking_duck() -> Result<TypeInfo, DomainError> {
    TypeInfo::concrete::<QuackingDuck>()
        .member(MethodInfo::new(
            MethodSignature::new("Quack").param::<Option<String>>(),
            |d: &mut QuackingDuck, args: &mut Arguments| {
                d.calls += 1;
                args.take::<Option<String>>(0)
            },
        ))
        .build()
}

fn overloaded_duck() -> Result<TypeInfo, DomainError> {
    let [by_int, by_opt_int, by_str, by_two_str] = try_quack_overloads();

    TypeInfo::concrete::<OverloadedDuck>()
        .member(MethodInfo::new(
            by_int,
            |d: &mut OverloadedDuck, args: &mut Arguments| {
                d.calls[0] += 1;
                let value = args.take::<i32>(0)?;
                args.set_out(1, Some(value))?;
                Ok(true)
            },
        ))
        .member(MethodInfo::new(
            by_opt_int,
            |d: &mut OverloadedDuck, args: &mut Arguments| {
                d.calls[1] += 1;
                let value = args.take::<Option<i32>>(0)?;
                args.set_out(1, value)?;
                Ok(value.is_some())
            },
        ))
        .member(MethodInfo::new(
            by_str,
            |d: &mut OverloadedDuck, args: &mut Arguments| {
                d.calls[2] += 1;
                let value = args.take::<Option<String>>(0)?;
                let found = value.is_some();
                args.set_out(1, value)?;
                Ok(found)
            },
        ))
        .member(MethodInfo::new(
            by_two_str,
            |d: &mut OverloadedDuck, args: &mut Arguments| {
                d.calls[3] += 1;
                let a = args.take::<Option<String>>(0)?;
                let b = args.take::<Option<String>>(1)?;
                Ok(a == b)
            },
        ))
        .build()
}

fn mallard() -> Result<TypeInfo, DomainError> {
    TypeInfo::concrete::<Mallard>()
        .extends_via::<Duck, _, _>(|m: &Mallard| &m.duck, |m: &mut Mallard| &mut m.duck)
        .member(PropertyInfo::read_only("Flying", |m: &Mallard| m.flying).private())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ducktype_core::domain::matches_signature;

    #[test]
    fn all_sample_types_validate() {
        let types = all_types().unwrap();
        assert_eq!(types.len(), 9);
        assert_eq!(types.iter().filter(|t| t.is_interface()).count(), 4);
    }

    #[test]
    fn overloads_are_pairwise_distinct() {
        let sigs = try_quack_overloads();
        for (i, a) in sigs.iter().enumerate() {
            for b in &sigs[i + 1..] {
                assert!(!matches_signature(a, b), "{a} vs {b}");
            }
        }
    }
}
