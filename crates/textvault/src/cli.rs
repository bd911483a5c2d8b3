//! CLI argument parsing with clap

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

pub use crate::commands::backup::BackupArgs;
pub use crate::commands::collect::CollectArgs;
pub use crate::commands::process::ProcessArgs;
pub use crate::commands::restore::RestoreArgs;
pub use crate::commands::run::RunArgs;
pub use crate::commands::validate::ValidateArgs;

/// Textvault - encoding-aware text processing and archival
#[derive(Parser, Debug)]
#[command(name = "textvault")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to textvault.yaml config file
    #[arg(short, long, global = true, env = "TEXTVAULT_CONFIG")]
    pub config: Option<Utf8PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the whole pipeline: process, collect, validate, report, back up
    Run(RunArgs),

    /// Write the sample input files into data/raw
    Seed,

    /// Case-invert every file under data/raw into data/processed
    Process(ProcessArgs),

    /// Collect file-system metadata into the file-info manifest
    Collect(CollectArgs),

    /// Validate a manifest against an embedded schema
    Validate(ValidateArgs),

    /// Archive the data tree into the backups directory
    Backup(BackupArgs),

    /// Restore the data tree from an archive
    Restore(RestoreArgs),
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
    fn test_parse_run_with_flags() {
        let cli = Cli::try_parse_from(["textvault", "-vv", "run", "--seed", "--restore"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run(args) => {
                assert!(args.seed);
                assert!(args.restore);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_validate_defaults_to_file_info_schema() {
        let cli = Cli::try_parse_from(["textvault", "validate", "output/file_info.json"]).unwrap();
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.manifest, Utf8PathBuf::from("output/file_info.json"));
                assert_eq!(args.schema, "file-info");
                assert_eq!(args.schema_dir, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_validate_with_schema_dir() {
        let cli = Cli::try_parse_from([
            "textvault",
            "validate",
            "notes.json",
            "--schema",
            "note",
            "--schema-dir",
            "my-schemas",
        ])
        .unwrap();
        match cli.command {
            Commands::Validate(args) => {
                assert_eq!(args.schema, "note");
                assert_eq!(args.schema_dir, Some(Utf8PathBuf::from("my-schemas")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_restore_requires_archive() {
        assert!(Cli::try_parse_from(["textvault", "restore"]).is_err());
        let cli = Cli::try_parse_from([
            "textvault",
            "--config",
            "textvault.yaml",
            "restore",
            "backups/backup_20240309.tar.gz",
            "--dest",
            "restored",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(Utf8PathBuf::from("textvault.yaml")));
        match cli.command {
            Commands::Restore(args) => assert_eq!(args.dest, Some(Utf8PathBuf::from("restored"))),
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
