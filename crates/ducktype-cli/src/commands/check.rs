//! Implementation of the `ducktype check` command.

use tracing::instrument;

use crate::{
    cli::CheckArgs,
    commands::resolve,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Succeed only if every interface member resolves; otherwise print the
/// message each unresolved member would raise.
#[instrument(skip_all, fields(interface = %args.target.interface, backing = %args.target.backing))]
pub fn execute(args: CheckArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let report = resolve(&args.target, &config)?;

    if report.complete {
        output.success(&format!(
            "{} satisfies {}",
            report.backing, report.interface
        ))?;
        return Ok(());
    }

    let missing: Vec<&str> = report
        .members
        .iter()
        .filter_map(|m| m.missing.as_deref())
        .collect();
    for message in &missing {
        output.error(message)?;
    }

    Err(CliError::Unresolved {
        interface: report.interface,
        backing: report.backing,
        missing: missing.len(),
    })
}
