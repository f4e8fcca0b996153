//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::{cases::CasesArgs, init::InitArgs, resolve::ResolveArgs};

#[derive(Parser, Debug)]
#[command(name = "defect-rca")]
#[command(about = "Defect root-cause assistant: solutions, explanations and test cases for known defects", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Load configuration from this file instead of .defect-rca/
    #[arg(short, long, global = true, env = "DEFECT_RCA_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve an error description into a solution with test cases
    Resolve(ResolveArgs),

    /// List stored test cases for a module
    Cases(CasesArgs),

    /// Write the default configuration to .defect-rca/config.yaml
    Init(InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_resolve_with_globals() {
        let cli = Cli::try_parse_from([
            "defect-rca",
            "--config",
            "alt.yaml",
            "resolve",
            "BIOS",
            "not",
            "booting",
            "--format",
            "html",
            "--no-notify",
        ])
        .unwrap();

        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("alt.yaml")));
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.error, vec!["BIOS", "not", "booting"]);
                assert_eq!(args.format.as_deref(), Some("html"));
                assert!(args.no_notify);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["defect-rca", "resolve", "x", "--format", "pdf"]).is_err());
    }

    #[test]
    fn test_parse_cases_json() {
        let cli = Cli::try_parse_from(["defect-rca", "cases", "BIOS", "--json"]).unwrap();
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Cases(args) if args.module == "BIOS"));
    }
}
