//! Implementation of the `ducktype probe` command.

use tracing::instrument;

use ducktype_core::application::ResolutionReport;

use crate::{
    cli::{ProbeArgs, ProbeFormat},
    commands::resolve,
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[instrument(skip_all, fields(interface = %args.target.interface, backing = %args.target.backing))]
pub fn execute(args: ProbeArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let format = match args.format {
        Some(format) => format,
        None => probe_format(&config.output.format)?,
    };

    let report = resolve(&args.target, &config)?;

    match format {
        ProbeFormat::Json => output.json(&report)?,
        ProbeFormat::Table => print_table(&report, &output)?,
    }
    Ok(())
}

fn print_table(report: &ResolutionReport, output: &OutputManager) -> CliResult<()> {
    output.header(&format!("{} <- {}", report.interface, report.backing))?;
    if report.include_private {
        output.print("  (private members included)")?;
    }

    for member in &report.members {
        output.binding(&member.member, member.candidate.as_deref())?;
    }

    let bound = report.members.iter().filter(|m| m.bound).count();
    let summary = format!("{} of {} members bound", bound, report.members.len());
    if report.complete {
        output.success(&summary)?;
    } else {
        output.warning(&summary)?;
    }
    Ok(())
}

/// `list` is accepted in the config for `list`; `probe` renders it as a table.
fn probe_format(name: &str) -> CliResult<ProbeFormat> {
    match name.to_ascii_lowercase().as_str() {
        "table" | "list" => Ok(ProbeFormat::Table),
        "json" => Ok(ProbeFormat::Json),
        other => Err(CliError::ConfigError {
            message: format!("output.format '{other}' is not valid for probe (table, json)"),
            source: None,
        }),
    }
}
