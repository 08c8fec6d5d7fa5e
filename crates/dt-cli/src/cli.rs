//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::analyze::AnalyzeArgs;

/// Estimate active development time from git history.
///
/// Gaps between consecutive commits shorter than the break threshold count as
/// work; longer gaps are replaced by the average working session.
#[derive(Debug, Parser)]
#[command(name = "devtime", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Estimate development time from commit history.
    Analyze(AnalyzeArgs),

    /// Show the effective configuration.
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze_flags() {
        let cli = Cli::try_parse_from([
            "devtime",
            "-v",
            "analyze",
            "--branch-only",
            "--since",
            "2 weeks ago",
            "--author",
            "ada",
            "--json",
        ])
        .unwrap();

        assert!(cli.verbose);
        let Some(Commands::Analyze(args)) = cli.command else {
            panic!("expected analyze command");
        };
        assert!(args.branch_only);
        assert!(args.json);
        assert_eq!(args.since.as_deref(), Some("2 weeks ago"));
        assert_eq!(args.author.as_deref(), Some("ada"));
    }

    #[test]
    fn test_repo_conflicts_with_input() {
        let result = Cli::try_parse_from([
            "devtime", "analyze", "--repo", ".", "--input", "log.txt",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_branch_only_conflicts_with_input() {
        let result = Cli::try_parse_from([
            "devtime",
            "analyze",
            "--branch-only",
            "--input",
            "log.txt",
        ]);
        assert!(result.is_err());
    }
}
