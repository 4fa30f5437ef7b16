//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "ducktype",
    bin_name = "ducktype",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{1f986} Structural typing inspector",
    long_about = "ducktype shows how an interface resolves against a backing \
                  type: which members bind, to what, and what is missing.",
    after_help = "EXAMPLES:\n\
        \x20 ducktype list\n\
        \x20 ducktype probe IMallard Mallard --include-private\n\
        \x20 ducktype check IDuck Duck\n\
        \x20 ducktype probe zoo::IDuck zoo::Duck --manifest shapes.toml",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List registered types.
    #[command(
        visible_alias = "ls",
        about = "List registered types",
        after_help = "EXAMPLES:\n\
            \x20 ducktype list\n\
            \x20 ducktype list --kind interface\n\
            \x20 ducktype list --manifest shapes.toml --no-samples --format json"
    )]
    List(ListArgs),

    /// Show how an interface resolves against a type.
    #[command(
        visible_alias = "p",
        about = "Show the resolution table for an interface and a type",
        after_help = "EXAMPLES:\n\
            \x20 ducktype probe IDuck Duck\n\
            \x20 ducktype probe IMallard Mallard --include-private\n\
            \x20 ducktype probe ITryQuack OverloadedDuck --format json"
    )]
    Probe(ProbeArgs),

    /// Check that every member of an interface resolves.
    #[command(
        about = "Fail unless every interface member resolves",
        after_help = "EXAMPLES:\n\
            \x20 ducktype check IDuck Duck\n\
            \x20 ducktype check IMallard Mallard --include-private\n\n\
            EXIT CODES:\n\
            \x20 0  every member resolves\n\
            \x20 3  at least one member is unresolved"
    )]
    Check(CheckArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 ducktype completions bash > ~/.local/share/bash-completion/completions/ducktype\n\
            \x20 ducktype completions zsh  > ~/.zfunc/_ducktype\n\
            \x20 ducktype completions fish > ~/.config/fish/completions/ducktype.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the ducktype configuration.
    #[command(
        about = "Configuration management",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 ducktype config get resolution.include_private\n\
            \x20 ducktype config list\n\
            \x20 ducktype config path"
    )]
    Config(ConfigCommands),
}

// ── shared ────────────────────────────────────────────────────────────────────

/// Where type descriptions come from.
#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Shape manifest file or directory; may be repeated.
    #[arg(
        short = 'm',
        long = "manifest",
        value_name = "PATH",
        help = "Load shapes from a manifest file or directory (repeatable)"
    )]
    pub manifests: Vec<PathBuf>,

    /// Do not register the built-in sample types.
    #[arg(long = "no-samples", help = "Skip the built-in sample types")]
    pub no_samples: bool,
}

// ── list ──────────────────────────────────────────────────────────────────────

/// Arguments for `ducktype list`.
#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Filter by kind.
    #[arg(short = 'k', long = "kind", value_enum, help = "Filter by kind")]
    pub kind: Option<KindFilter>,

    /// Output format; defaults to `output.format` from the config.
    #[arg(long = "format", value_enum, help = "Output format")]
    pub format: Option<ListFormat>,
}

/// Type kind filter for `list`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindFilter {
    Interface,
    Concrete,
}

/// Output format for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One name per line.
    List,
    /// JSON array.
    Json,
}

// ── probe / check ─────────────────────────────────────────────────────────────

/// Arguments for `ducktype probe`.
#[derive(Debug, Args)]
pub struct ProbeArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output format; defaults to `output.format` from the config.
    #[arg(long = "format", value_enum, help = "Output format")]
    pub format: Option<ProbeFormat>,
}

/// Arguments for `ducktype check`.
#[derive(Debug, Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

/// The interface/type pair to resolve.
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Interface name, fully qualified or a unique simple name.
    #[arg(value_name = "INTERFACE", help = "Interface to satisfy")]
    pub interface: String,

    /// Backing type name, fully qualified or a unique simple name.
    #[arg(value_name = "TYPE", help = "Backing type to resolve against")]
    pub backing: String,

    /// Let private members satisfy interface members.
    #[arg(
        short = 'p',
        long = "include-private",
        help = "Allow private backing members to bind"
    )]
    pub include_private: bool,

    #[command(flatten)]
    pub source: SourceArgs,
}

/// Output format for the `probe` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ProbeFormat {
    /// Human-readable table.
    Table,
    /// JSON report.
    Json,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `ducktype completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `ducktype config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `resolution.include_private`.
        key: String,
    },
    /// Print all configuration values.
    List,
    /// Print the path to the default configuration file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_probe_command() {
        let cli = Cli::parse_from([
            "ducktype",
            "probe",
            "IMallard",
            "Mallard",
            "--include-private",
            "--format",
            "json",
        ]);
        let Commands::Probe(args) = cli.command else {
            panic!("expected Probe command");
        };
        assert_eq!(args.target.interface, "IMallard");
        assert_eq!(args.target.backing, "Mallard");
        assert!(args.target.include_private);
        assert!(matches!(args.format, Some(ProbeFormat::Json)));
    }

    #[test]
    fn manifests_are_repeatable() {
        let cli = Cli::parse_from([
            "ducktype", "check", "IDuck", "Duck", "-m", "a.toml", "-m", "shapes/",
        ]);
        let Commands::Check(args) = cli.command else {
            panic!("expected Check command");
        };
        assert_eq!(
            args.target.source.manifests,
            vec![PathBuf::from("a.toml"), PathBuf::from("shapes/")]
        );
    }

    #[test]
    fn list_alias_and_kind_filter() {
        let cli = Cli::parse_from(["ducktype", "ls", "--kind", "interface"]);
        let Commands::List(args) = cli.command else {
            panic!("expected List command");
        };
        assert_eq!(args.kind, Some(KindFilter::Interface));
    }

    #[test]
    fn probe_requires_both_names() {
        assert!(Cli::try_parse_from(["ducktype", "probe", "IDuck"]).is_err());
    }

    #[test]
    fn no_color_flag_sets_true() {
        let cli = Cli::parse_from(["ducktype", "--no-color", "list"]);
        assert!(cli.global.no_color);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        // clap should reject --quiet --verbose together
        let result = Cli::try_parse_from(["ducktype", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
