use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::{Commands, DiscoverArgs};

/// Top-level CLI parser for the `appscan` binary.
#[derive(Debug, Parser)]
#[command(
    name = "appscan",
    version,
    about = "Locate a Go application's entry type and module set without compiling it"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, text, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Quiet mode (errors only in logs)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file used instead of `.appscan.toml`
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
            config: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "appscan",
            "--format",
            "text",
            "--verbose",
            "--config",
            "scan.toml",
            "capabilities",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Text);
        assert!(cli.verbose);
        assert_eq!(cli.config.as_deref(), Some(Path::new("scan.toml")));
        assert!(matches!(cli.command, Commands::Capabilities));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["appscan", "capabilities", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let parsed = Cli::try_parse_from(["appscan", "-q", "-v", "capabilities"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["appscan", "--format", "xml", "capabilities"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn discover_defaults_to_current_dir() {
        let cli = Cli::try_parse_from(["appscan", "discover"]).expect("cli should parse");
        let Commands::Discover(args) = cli.command else {
            panic!("expected discover");
        };
        assert_eq!(args.root, PathBuf::from("."));
        assert_eq!(args.hint, None);
        assert_eq!(args.timeout, None);
    }

    #[test]
    fn discover_takes_root_hint_and_timeout() {
        let cli = Cli::try_parse_from([
            "appscan", "discover", "chain", "--hint", "app", "--timeout", "30",
        ])
        .expect("cli should parse");
        let Commands::Discover(args) = cli.command else {
            panic!("expected discover");
        };
        assert_eq!(args.root, PathBuf::from("chain"));
        assert_eq!(args.hint, Some(PathBuf::from("app")));
        assert_eq!(args.timeout, Some(30));
    }
}
