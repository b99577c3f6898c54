//! Git fetch strategy.

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;

use tracing::{debug, info, instrument, warn};

use crate::core::git_plan::{GitStep, plan};
use crate::core::spec::Entry;
use crate::error::VdmError;
use crate::fetch::Fetcher;
use crate::io::git::{GitCli, GitFailure};

/// Clones a repository and pins it to the requested version.
#[derive(Debug, Clone, Default)]
pub struct GitFetcher {
    git: GitCli,
    keep_git_dir: bool,
}

impl GitFetcher {
    /// `keep_git_dir` leaves `.git` in place so the destination stays a
    /// working repository.
    pub fn new(keep_git_dir: bool) -> Self {
        Self {
            git: GitCli::default(),
            keep_git_dir,
        }
    }

    /// Use a different git executable (name or path).
    pub fn with_program(mut self, program: impl Into<OsString>) -> Self {
        self.git = GitCli::new(program);
        self
    }

    fn ensure_available(&self, op: &str) -> Result<(), VdmError> {
        self.git
            .version()
            .map(|_| ())
            .map_err(|failure| VdmError::ToolUnavailable {
                op: op.to_string(),
                tool: self.git.program().to_string_lossy().into_owned(),
                detail: failure.output.trim().to_string(),
            })
    }

    fn run_plan(&self, op: &str, entry: &Entry) -> Result<(), VdmError> {
        for step in plan(entry) {
            match step {
                GitStep::Clone { shallow } => {
                    if shallow {
                        debug!("{op} -- version is 'latest', making shallow clone and skipping checkout");
                    } else {
                        debug!("{op} -- version is pinned, making full clone for checkout");
                    }
                    info!("{op} -- Retrieving...");
                    self.git
                        .clone_repo(&entry.source, &entry.destination, shallow)
                        .map_err(|failure| fetch_error(op, failure))?;
                }
                GitStep::Checkout { revision } => {
                    info!("{op} -- Setting specified version...");
                    self.git
                        .checkout(&entry.destination, &revision)
                        .map_err(|failure| fetch_error(op, failure))?;
                }
            }
        }
        Ok(())
    }

    fn remove_git_dir(&self, entry: &Entry) -> Result<(), VdmError> {
        let dot_git = entry.destination.join(".git");
        debug!(path = %dot_git.display(), "removing .git dir");
        match fs::remove_dir_all(&dot_git) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(VdmError::io(dot_git, err)),
        }
    }
}

impl Fetcher for GitFetcher {
    #[instrument(skip_all, fields(source = %entry.source, version = %entry.version))]
    fn apply(&self, entry: &Entry) -> Result<(), VdmError> {
        let op = entry.op_msg();
        self.ensure_available(&op)?;

        let created = !entry.destination.exists();
        if let Err(err) = self.run_plan(&op, entry) {
            if created {
                discard_partial_clone(entry);
            }
            return Err(err);
        }

        if !self.keep_git_dir {
            self.remove_git_dir(entry)?;
        }
        Ok(())
    }
}

/// Drop a clone left behind by a failed step so the next run starts clean.
fn discard_partial_clone(entry: &Entry) {
    let dest = &entry.destination;
    match fs::remove_dir_all(dest) {
        Ok(()) => debug!(path = %dest.display(), "removed partial clone"),
        Err(err) if err.kind() == ErrorKind::NotFound => {}
        Err(err) => warn!(path = %dest.display(), error = %err, "could not remove partial clone"),
    }
}

fn fetch_error(op: &str, failure: GitFailure) -> VdmError {
    VdmError::Fetch {
        op: op.to_string(),
        action: failure.command,
        output: failure.output,
    }
}
