use std::collections::HashSet;

use crate::domain::{entities::TypeInfo, error::DomainError, value_objects::TypeName};

/// Centralized domain validation.
///
/// Per-type rules live on [`TypeInfo::validate`]; rules that need to see
/// more than one type live here.
pub struct DomainValidator;

impl DomainValidator {
    pub fn validate_type_info(info: &TypeInfo) -> Result<(), DomainError> {
        info.validate()
    }

    /// Walk the base graph of `info` and reject cycles and kind mixing
    /// (an interface extending a concrete type or the reverse).
    ///
    /// Bases that `lookup` cannot find are skipped; they may be registered
    /// later.
    pub fn validate_inheritance<'a, L>(info: &'a TypeInfo, lookup: L) -> Result<(), DomainError>
    where
        L: Fn(&TypeName) -> Option<&'a TypeInfo>,
    {
        let mut path = vec![&info.name];
        Self::walk(info, &lookup, &mut path, &mut HashSet::new())
    }

    fn walk<'a, L>(
        info: &'a TypeInfo,
        lookup: &L,
        path: &mut Vec<&'a TypeName>,
        done: &mut HashSet<&'a TypeName>,
    ) -> Result<(), DomainError>
    where
        L: Fn(&TypeName) -> Option<&'a TypeInfo>,
    {
        for base in &info.bases {
            if path.contains(&&base.name) {
                return Err(DomainError::InheritanceCycle {
                    type_name: base.name.to_string(),
                });
            }
            let Some(base_info) = lookup(&base.name) else {
                continue;
            };
            if base_info.kind() != info.kind() {
                return Err(DomainError::InvalidTypeInfo(format!(
                    "{} {} cannot extend {} {}",
                    info.kind(),
                    info.name,
                    base_info.kind(),
                    base_info.name
                )));
            }
            if done.contains(&base_info.name) {
                continue;
            }
            path.push(&base_info.name);
            Self::walk(base_info, lookup, path, done)?;
            path.pop();
            done.insert(&base_info.name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn registry(types: Vec<TypeInfo>) -> HashMap<TypeName, TypeInfo> {
        types.into_iter().map(|t| (t.name.clone(), t)).collect()
    }

    #[test]
    fn accepts_diamond() {
        let types = registry(vec![
            TypeInfo::declared_interface("a").build().unwrap(),
            TypeInfo::declared_interface("b").extends_named("a").build().unwrap(),
            TypeInfo::declared_interface("c").extends_named("a").build().unwrap(),
        ]);
        let d = TypeInfo::declared_interface("d")
            .extends_named("b")
            .extends_named("c")
            .build()
            .unwrap();

        assert!(DomainValidator::validate_inheritance(&d, |n| types.get(n)).is_ok());
    }

    #[test]
    fn rejects_cycle() {
        let types = registry(vec![
            TypeInfo::declared_interface("a").extends_named("b").build().unwrap(),
            TypeInfo::declared_interface("b").extends_named("a").build().unwrap(),
        ]);
        let a = &types[&TypeName::new("a")];

        assert!(matches!(
            DomainValidator::validate_inheritance(a, |n| types.get(n)),
            Err(DomainError::InheritanceCycle { .. })
        ));
    }

    #[test]
    fn rejects_interface_extending_concrete() {
        let types = registry(vec![TypeInfo::declared_concrete("zoo::Duck").build().unwrap()]);
        let iface = TypeInfo::declared_interface("zoo::IDuck")
            .extends_named("zoo::Duck")
            .build()
            .unwrap();

        assert!(matches!(
            DomainValidator::validate_inheritance(&iface, |n| types.get(n)),
            Err(DomainError::InvalidTypeInfo(_))
        ));
    }

    #[test]
    fn unknown_bases_are_skipped() {
        let iface = TypeInfo::declared_interface("zoo::IDuck")
            .extends_named("zoo::IBird")
            .build()
            .unwrap();

        assert!(DomainValidator::validate_inheritance(&iface, |_| None).is_ok());
    }
}
