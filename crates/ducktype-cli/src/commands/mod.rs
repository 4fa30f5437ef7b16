//! Command handlers.
//!
//! Each submodule exposes an `execute` function taking parsed arguments.
//! Registry and factory construction is shared here.

pub mod check;
pub mod completions;
pub mod config;
pub mod list;
pub mod probe;

use std::path::PathBuf;

use tracing::{debug, info};

use ducktype_adapters::{InMemoryTableCache, InMemoryTypeRegistry, ManifestLoader, NoTableCache};
use ducktype_core::{
    application::{AdapterFactory, ResolutionReport, ports::ResolutionCache},
    domain::TypeInfo,
};

use crate::{
    cli::{SourceArgs, TargetArgs},
    config::AppConfig,
    error::CliResult,
};

/// Build a registry from the samples and every configured manifest.
///
/// Manifests from the config come first, then those given on the command
/// line; a later declaration of the same name replaces an earlier one.
pub(crate) fn open_registry(
    source: &SourceArgs,
    config: &AppConfig,
) -> CliResult<InMemoryTypeRegistry> {
    let registry = if source.no_samples {
        InMemoryTypeRegistry::new()
    } else {
        InMemoryTypeRegistry::with_samples()?
    };

    let paths: Vec<&PathBuf> = config
        .manifests
        .paths
        .iter()
        .chain(&source.manifests)
        .collect();
    for path in paths {
        let count = ManifestLoader::new(path).register_into(&registry)?;
        info!(path = %path.display(), count, "Registered manifest types");
    }

    debug!(types = registry.len(), "Registry ready");
    Ok(registry)
}

/// Factory over `registry`, memoizing tables unless the config disables it.
pub(crate) fn factory(registry: InMemoryTypeRegistry, config: &AppConfig) -> AdapterFactory {
    let cache: Box<dyn ResolutionCache> = if config.resolution.cache {
        Box::new(InMemoryTableCache::new())
    } else {
        Box::new(NoTableCache)
    };
    AdapterFactory::new(Box::new(registry), cache)
}

/// Resolve the named interface against the named type.
pub(crate) fn resolve(target: &TargetArgs, config: &AppConfig) -> CliResult<ResolutionReport> {
    let registry = open_registry(&target.source, config)?;
    let interface = registry.find(&target.interface)?;
    let backing = registry.find(&target.backing)?;
    let include_private = target.include_private || config.resolution.include_private;

    let factory = factory(registry, config);
    let table = factory.resolution_table(&interface.name, &backing.name, include_private)?;
    Ok(ResolutionReport::from(table.as_ref()))
}

/// Bases rendered for display.
pub(crate) fn bases(info: &TypeInfo) -> Vec<String> {
    info.bases.iter().map(|b| b.name.to_string()).collect()
}
