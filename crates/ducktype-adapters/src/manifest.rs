//! Shape manifest loader.
//!
//! Declares types by shape alone, for probing resolution without compiling
//! anything. Members loaded this way resolve like any other but have no
//! runtime implementation.
//!
//! # Format
//!
//! TOML, or JSON when the file ends in `.json`:
//!
//! ```toml
//! [[types]]
//! name  = "zoo::IDuck"
//! kind  = "interface"            # interface | concrete
//! bases = []                     # optional
//!
//! [[types.properties]]
//! name = "Quack"
//! type = "Option<String>"
//! get  = true                    # default true
//! set  = true                    # default false
//!
//! [[types.methods]]
//! name    = "TryQuack"
//! params  = [{ type = "i32" }, { type = "Option<i32>", out = true }]
//! returns = "bool"               # default "()"
//!
//! [[types]]
//! name = "zoo::Duck"
//! kind = "concrete"
//!
//! [[types.fields]]               # concrete types only
//! name    = "Quack"
//! type    = "Option<String>"
//! private = false                # concrete types only
//! ```
//!
//! Type names are compared verbatim, so a manifest must spell each type the
//! same way everywhere.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use ducktype_core::{
    application::{ApplicationError, ports::TypeIntrospector},
    domain::{
        DomainError, FieldInfo, InterfaceMember, MethodInfo, MethodSignature, Parameter,
        PropertyInfo, TypeInfo, TypeKind, Visibility,
    },
    error::DuckResult,
};

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised manifest file.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Manifest {
    #[serde(default)]
    pub types: Vec<TypeEntry>,
}

/// One `[[types]]` entry.
#[derive(Debug, Deserialize, Clone)]
pub struct TypeEntry {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub bases: Vec<String>,
    #[serde(default)]
    pub properties: Vec<PropertyEntry>,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PropertyEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default = "default_true")]
    pub get: bool,
    #[serde(default)]
    pub set: bool,
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FieldEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MethodEntry {
    pub name: String,
    #[serde(default)]
    pub params: Vec<ParamEntry>,
    #[serde(default = "default_return")]
    pub returns: String,
    #[serde(default)]
    pub private: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ParamEntry {
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default)]
    pub out: bool,
}

fn default_true() -> bool {
    true
}

fn default_return() -> String {
    "()".into()
}

fn visibility(private: bool) -> Visibility {
    if private {
        Visibility::Private
    } else {
        Visibility::Public
    }
}

impl MethodEntry {
    fn signature(&self) -> MethodSignature {
        self.params
            .iter()
            .fold(MethodSignature::new(&self.name), |sig, p| {
                sig.with_parameter(if p.out {
                    Parameter::output(p.ty.as_str())
                } else {
                    Parameter::input(p.ty.as_str())
                })
            })
            .with_return_type(self.returns.as_str())
    }
}

impl TypeEntry {
    /// Convert into a shape-only [`TypeInfo`].
    pub fn to_type_info(&self) -> Result<TypeInfo, DomainError> {
        match self.kind.parse::<TypeKind>()? {
            TypeKind::Interface => self.to_interface(),
            TypeKind::Concrete => self.to_concrete(),
        }
    }

    fn to_interface(&self) -> Result<TypeInfo, DomainError> {
        if !self.fields.is_empty() {
            return Err(DomainError::InvalidTypeInfo(format!(
                "interface {} cannot declare fields",
                self.name
            )));
        }
        let private = self
            .properties
            .iter()
            .filter(|p| p.private)
            .map(|p| &p.name)
            .chain(self.methods.iter().filter(|m| m.private).map(|m| &m.name))
            .next();
        if let Some(member) = private {
            return Err(DomainError::InvalidTypeInfo(format!(
                "interface member {}.{} cannot be private",
                self.name, member
            )));
        }

        let mut builder = TypeInfo::declared_interface(self.name.as_str());
        for base in &self.bases {
            builder = builder.extends_named(base.as_str());
        }
        for p in &self.properties {
            builder = builder.member(InterfaceMember::declared_property(
                &p.name,
                p.ty.as_str(),
                p.get,
                p.set,
            ));
        }
        for m in &self.methods {
            builder = builder.method(m.signature());
        }
        builder.build()
    }

    fn to_concrete(&self) -> Result<TypeInfo, DomainError> {
        let mut builder = TypeInfo::declared_concrete(self.name.as_str());
        for base in &self.bases {
            builder = builder.extends_named(base.as_str());
        }
        for f in &self.fields {
            builder = builder.member(
                FieldInfo::declared(&f.name, f.ty.as_str()).with_visibility(visibility(f.private)),
            );
        }
        for p in &self.properties {
            builder = builder.member(
                PropertyInfo::declared(&p.name, p.ty.as_str(), p.get, p.set)
                    .with_visibility(visibility(p.private)),
            );
        }
        for m in &self.methods {
            builder = builder
                .member(MethodInfo::declared(m.signature()).with_visibility(visibility(m.private)));
        }
        builder.build()
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// Why one manifest failed to load.
#[derive(Debug, Error)]
pub enum ManifestParseError {
    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid type '{name}': {source}")]
    Type {
        name: String,
        #[source]
        source: DomainError,
    },
}

impl ManifestParseError {
    fn at(self, path: &Path) -> ApplicationError {
        ApplicationError::ManifestError {
            path: path.to_path_buf(),
            reason: self.to_string(),
        }
    }
}

/// Manifest syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Toml,
    Json,
}

impl ManifestFormat {
    /// `.json` files are JSON; everything else is TOML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Parse manifest text into type descriptions.
pub fn parse_manifest(
    content: &str,
    format: ManifestFormat,
) -> Result<Vec<TypeInfo>, ManifestParseError> {
    let manifest: Manifest = match format {
        ManifestFormat::Toml => toml::from_str(content)?,
        ManifestFormat::Json => serde_json::from_str(content)?,
    };

    manifest
        .types
        .iter()
        .map(|entry| {
            entry
                .to_type_info()
                .map_err(|source| ManifestParseError::Type {
                    name: entry.name.clone(),
                    source,
                })
        })
        .collect()
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads shape manifests from files or directories.
///
/// # Example
///
/// ```no_run
/// use ducktype_adapters::{InMemoryTypeRegistry, ManifestLoader};
///
/// let registry = InMemoryTypeRegistry::new();
/// let count = ManifestLoader::new("./shapes").register_into(&registry)?;
/// println!("Registered {} types", count);
/// # Ok::<(), ducktype_core::error::DuckError>(())
/// ```
pub struct ManifestLoader {
    path: PathBuf,
}

impl ManifestLoader {
    /// Create a loader for a manifest file or a directory of manifests.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every type the path declares.
    ///
    /// A file must parse. In a directory, every `*.toml` and `*.json` file is
    /// loaded; ones that fail to parse are **skipped with a `WARN` log**.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn load(&self) -> DuckResult<Vec<TypeInfo>> {
        if self.path.is_dir() {
            self.load_dir()
        } else {
            Ok(Self::load_file(&self.path)?)
        }
    }

    /// Load and register every declared type; returns how many.
    pub fn register_into(&self, registry: &dyn TypeIntrospector) -> DuckResult<usize> {
        let types = self.load()?;
        let count = types.len();
        for info in types {
            registry.register(info)?;
        }
        Ok(count)
    }

    fn load_file(path: &Path) -> Result<Vec<TypeInfo>, ApplicationError> {
        let raw = fs::read_to_string(path).map_err(|e| ManifestParseError::from(e).at(path))?;
        let types =
            parse_manifest(&raw, ManifestFormat::from_path(path)).map_err(|e| e.at(path))?;
        debug!(path = %path.display(), count = types.len(), "Loaded manifest");
        Ok(types)
    }

    fn load_dir(&self) -> DuckResult<Vec<TypeInfo>> {
        let mut types = Vec::new();

        for entry in WalkDir::new(&self.path).min_depth(1).sort_by_file_name() {
            let entry = entry.map_err(|e| ApplicationError::ManifestError {
                path: self.path.clone(),
                reason: format!("directory walk error: {e}"),
            })?;
            let path = entry.path();
            let is_manifest = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("toml") || e.eq_ignore_ascii_case("json"));
            if !entry.file_type().is_file() || !is_manifest {
                continue;
            }

            match Self::load_file(path) {
                Ok(loaded) => types.extend(loaded),
                Err(e) => {
                    // One bad manifest must not block the others.
                    warn!(
                        file = %path.display(),
                        error = %e,
                        "skipping manifest due to load error"
                    );
                }
            }
        }

        debug!(count = types.len(), "finished loading manifests");
        Ok(types)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ducktype_core::application::{AdapterFactory, AdapterOptions};
    use ducktype_core::domain::{CandidateMember, Direction, TypeName};
    use tempfile::TempDir;

    use crate::{InMemoryTableCache, InMemoryTypeRegistry};

    const DUCKS: &str = r#"
[[types]]
name = "zoo::IDuck"
kind = "interface"

[[types.properties]]
name = "Quack"
type = "Option<String>"
get = true
set = true

[[types.methods]]
name = "TryQuack"
params = [{ type = "i32" }, { type = "Option<i32>", out = true }]
returns = "bool"

[[types]]
name = "zoo::Duck"
kind = "concrete"

[[types.fields]]
name = "Quack"
type = "Option<String>"

[[types.methods]]
name = "TryQuack"
params = [{ type = "i32" }, { type = "Option<i32>", out = true }]
returns = "bool"
private = true
"#;

    #[test]
    fn parses_toml_shapes() {
        let types = parse_manifest(DUCKS, ManifestFormat::Toml).unwrap();
        assert_eq!(types.len(), 2);

        let iface = &types[0];
        assert!(iface.is_interface());
        match &iface.interface_members()[1] {
            InterfaceMember::Method(m) => {
                assert_eq!(m.signature.parameters[1].direction, Direction::Out);
                assert_eq!(m.signature.return_type, TypeName::new("bool"));
            }
            other => panic!("expected method, got {other}"),
        }

        let duck = &types[1];
        assert!(matches!(
            &duck.candidate_members()[1],
            CandidateMember::Method(m) if m.visibility == Visibility::Private
        ));
    }

    #[test]
    fn parses_json_shapes() {
        let json = r#"{ "types": [ { "name": "zoo::IGoose", "kind": "trait",
            "properties": [ { "name": "Honk", "type": "bool" } ] } ] }"#;
        let types = parse_manifest(json, ManifestFormat::Json).unwrap();

        match &types[0].interface_members()[0] {
            InterfaceMember::Property(p) => {
                assert!(p.has_getter);
                assert!(!p.has_setter);
            }
            other => panic!("expected property, got {other}"),
        }
    }

    #[test]
    fn rejects_fields_on_interfaces() {
        let toml = r#"
[[types]]
name = "zoo::IDuck"
kind = "interface"
[[types.fields]]
name = "Quack"
type = "i32"
"#;
        assert!(matches!(
            parse_manifest(toml, ManifestFormat::Toml),
            Err(ManifestParseError::Type { .. })
        ));
    }

    #[test]
    fn rejects_unknown_kind() {
        let toml = "[[types]]\nname = \"zoo::Duck\"\nkind = \"enum\"\n";
        assert!(parse_manifest(toml, ManifestFormat::Toml).is_err());
    }

    #[test]
    fn load_file_reports_path_on_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.toml");
        fs::write(&path, "[[types]\n").unwrap();

        let err = ManifestLoader::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("broken.toml"));
    }

    #[test]
    fn load_dir_skips_broken_manifests() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("ducks.toml"), DUCKS).unwrap();
        fs::write(temp.path().join("broken.json"), "{").unwrap();
        fs::write(temp.path().join("README.md"), "# shapes").unwrap();

        let types = ManifestLoader::new(temp.path()).load().unwrap();
        assert_eq!(types.len(), 2);
    }

    #[test]
    fn manifest_shapes_resolve_by_name() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("ducks.toml");
        fs::write(&path, DUCKS).unwrap();

        let registry = InMemoryTypeRegistry::new();
        assert_eq!(ManifestLoader::new(&path).register_into(&registry).unwrap(), 2);

        let factory = AdapterFactory::new(Box::new(registry), Box::new(InMemoryTableCache::new()));
        let (iface, duck) = (TypeName::new("zoo::IDuck"), TypeName::new("zoo::Duck"));

        let public = factory.resolution_table(&iface, &duck, false).unwrap();
        assert!(!public.is_complete());
        assert!(public.is_bound("Quack"));

        let all = factory
            .resolution_table(&iface, &duck, AdapterOptions::include_private().include_private_members)
            .unwrap();
        assert!(all.is_complete());
    }
}
