//! `vdm` command line.
//!
//! `vdm sync` brings every destination in the spec file up to its declared
//! version; `vdm validate` only loads and checks the spec file.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use vdm::error::VdmError;
use vdm::exit_codes;
use vdm::logging;
use vdm::options::{DEFAULT_SPEC_FILE, SyncOptions};
use vdm::sync::run_sync;
use vdm::validate::load_and_validate;

#[derive(Parser)]
#[command(
    name = "vdm",
    version,
    about = "Sync versioned remote dependencies into local paths"
)]
struct Cli {
    /// Path to the vdm spec file.
    #[arg(long, global = true, env = "VDM_SPECFILE_PATH", default_value = DEFAULT_SPEC_FILE)]
    specfile_path: PathBuf,

    /// Show debug logs.
    #[arg(long, global = true, env = "VDM_DEBUG")]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch every remote listed in the spec file.
    Sync {
        /// Keep the `.git` directory in git destinations after checkout.
        #[arg(long)]
        keep_git_dir: bool,
    },
    /// Load and validate the spec file without fetching anything.
    Validate,
}

impl Cli {
    /// Run options shared by every command; `keep_git_dir` only comes from `sync`.
    fn options(&self) -> SyncOptions {
        let keep_git_dir = match self.command {
            Command::Sync { keep_git_dir } => keep_git_dir,
            Command::Validate => false,
        };
        SyncOptions {
            spec_path: self.specfile_path.clone(),
            debug: self.debug,
            keep_git_dir,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let options = cli.options();
    logging::init(options.debug);
    if let Err(err) = run(&cli.command, &options) {
        eprintln!("{:#}", err);
        let code = err
            .downcast_ref::<VdmError>()
            .map_or(exit_codes::FAILURE, VdmError::exit_code);
        std::process::exit(code);
    }
}

fn run(command: &Command, options: &SyncOptions) -> Result<()> {
    match command {
        Command::Sync { .. } => {
            let report = run_sync(options)?;
            println!(
                "sync: fetched={} skipped={}",
                report.fetched(),
                report.skipped()
            );
        }
        Command::Validate => {
            let spec = load_and_validate(&options.spec_path)?;
            println!("valid: entries={}", spec.entries.len());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_sync_defaults() {
        let cli = Cli::parse_from(["vdm", "sync"]);
        assert!(matches!(
            cli.command,
            Command::Sync {
                keep_git_dir: false
            }
        ));
        assert_eq!(cli.specfile_path, PathBuf::from(DEFAULT_SPEC_FILE));
        assert!(!cli.debug);
    }

    #[test]
    fn parse_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "vdm",
            "sync",
            "--keep-git-dir",
            "--specfile-path",
            "deps/vdm.json",
            "--debug",
        ]);
        assert!(matches!(cli.command, Command::Sync { keep_git_dir: true }));
        assert_eq!(cli.specfile_path, PathBuf::from("deps/vdm.json"));
        assert!(cli.debug);
    }

    #[test]
    fn options_carry_flags_from_the_command_line() {
        let cli = Cli::parse_from([
            "vdm",
            "--debug",
            "--specfile-path",
            "deps.yaml",
            "sync",
            "--keep-git-dir",
        ]);
        assert_eq!(
            cli.options(),
            SyncOptions {
                spec_path: PathBuf::from("deps.yaml"),
                debug: true,
                keep_git_dir: true,
            }
        );

        let cli = Cli::parse_from(["vdm", "validate"]);
        assert!(!cli.options().keep_git_dir);
    }

    #[test]
    fn parse_validate() {
        let cli = Cli::parse_from(["vdm", "--specfile-path", "x.yaml", "validate"]);
        assert!(matches!(cli.command, Command::Validate));
        assert_eq!(cli.specfile_path, PathBuf::from("x.yaml"));
    }
}
