//! Git adapter for fetch operations.
//!
//! vdm delegates all transport and VCS work to the locally installed `git`,
//! so we keep a small, explicit wrapper around `git` subprocess calls.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Command, Output};

use tracing::{debug, instrument};

/// A git invocation that could not be spawned or exited non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitFailure {
    /// Rendered command line, e.g. `git checkout v1`.
    pub command: String,
    /// Combined stdout + stderr, or the spawn error.
    pub output: String,
}

/// Wrapper for executing git commands.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new("git")
    }
}

impl GitCli {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Return `git --version` output; fails if git cannot be run at all.
    #[instrument(skip_all)]
    pub fn version(&self) -> Result<String, GitFailure> {
        let out = self.run_checked(&[OsStr::new("--version")])?;
        let version = out.trim().to_string();
        debug!(%version, "git was found on PATH");
        Ok(version)
    }

    /// Clone `source` into `destination`, at depth 1 when `shallow`.
    #[instrument(skip(self, destination))]
    pub fn clone_repo(
        &self,
        source: &str,
        destination: &Path,
        shallow: bool,
    ) -> Result<String, GitFailure> {
        let mut args: Vec<&OsStr> = vec![OsStr::new("clone")];
        if shallow {
            args.push(OsStr::new("--depth=1"));
        }
        args.push(OsStr::new(source));
        args.push(destination.as_os_str());
        self.run_checked(&args)
    }

    /// Check out `revision` inside the working copy at `workdir`.
    #[instrument(skip(self, workdir))]
    pub fn checkout(&self, workdir: &Path, revision: &str) -> Result<String, GitFailure> {
        self.run_checked(&[
            OsStr::new("-C"),
            workdir.as_os_str(),
            OsStr::new("checkout"),
            OsStr::new(revision),
        ])
    }

    fn run_checked(&self, args: &[&OsStr]) -> Result<String, GitFailure> {
        let output = self.run(args).map_err(|err| GitFailure {
            command: self.render(args),
            output: format!("spawn {}: {err}", self.program.to_string_lossy()),
        })?;
        let combined = combined_output(&output);
        if !output.status.success() {
            debug!(exit_code = ?output.status.code(), output = %combined, "git command failed");
            return Err(GitFailure {
                command: self.render(args),
                output: combined,
            });
        }
        debug!(output = %combined, "git command finished");
        Ok(combined)
    }

    fn run(&self, args: &[&OsStr]) -> std::io::Result<Output> {
        Command::new(&self.program).args(args).output()
    }

    fn render(&self, args: &[&OsStr]) -> String {
        let mut rendered = self.program.to_string_lossy().into_owned();
        for arg in args {
            rendered.push(' ');
            rendered.push_str(&arg.to_string_lossy());
        }
        rendered
    }
}

fn combined_output(output: &Output) -> String {
    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    combined
}
