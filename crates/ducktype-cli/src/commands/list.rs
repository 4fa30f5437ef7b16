//! Implementation of the `ducktype list` command.

use serde::Serialize;
use tracing::instrument;

use ducktype_core::{application::ports::TypeIntrospector, domain::TypeInfo};

use crate::{
    cli::{KindFilter, ListArgs, ListFormat},
    commands::{bases, open_registry},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// One listed type.
#[derive(Debug, Serialize)]
struct TypeSummary {
    name: String,
    kind: String,
    members: usize,
    bases: Vec<String>,
    /// Declared by a manifest, with no runtime implementation.
    shape_only: bool,
}

impl From<&TypeInfo> for TypeSummary {
    fn from(info: &TypeInfo) -> Self {
        Self {
            name: info.name.to_string(),
            kind: info.kind().to_string(),
            members: info.member_count(),
            bases: bases(info),
            shape_only: info.runtime_id.is_none(),
        }
    }
}

#[instrument(skip_all)]
pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let format = match args.format {
        Some(format) => format,
        None => list_format(&config.output.format)?,
    };

    let registry = open_registry(&args.source, &config)?;
    let types: Vec<TypeSummary> = registry
        .list()?
        .iter()
        .filter(|info| match args.kind {
            Some(KindFilter::Interface) => info.is_interface(),
            Some(KindFilter::Concrete) => !info.is_interface(),
            None => true,
        })
        .map(|info| TypeSummary::from(info.as_ref()))
        .collect();

    match format {
        ListFormat::Table => {
            output.header("Registered Types:")?;
            for t in &types {
                let mut line = format!("  {:<10} {} ({} members)", t.kind, t.name, t.members);
                if !t.bases.is_empty() {
                    line.push_str(&format!(" : {}", t.bases.join(", ")));
                }
                if t.shape_only {
                    line.push_str(" [shape]");
                }
                output.print(&line)?;
            }
        }
        ListFormat::List => {
            for t in &types {
                output.print(&t.name)?;
            }
        }
        ListFormat::Json => output.json(&types)?,
    }

    Ok(())
}

fn list_format(name: &str) -> CliResult<ListFormat> {
    match name.to_ascii_lowercase().as_str() {
        "table" => Ok(ListFormat::Table),
        "list" => Ok(ListFormat::List),
        "json" => Ok(ListFormat::Json),
        other => Err(CliError::ConfigError {
            message: format!("output.format '{other}' is not valid for list (table, list, json)"),
            source: None,
        }),
    }
}
