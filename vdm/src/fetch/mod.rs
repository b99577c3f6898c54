//! Fetch strategies that materialize one entry's content on disk.
//!
//! The [`Fetcher`] trait decouples reconciliation from the concrete backends
//! (`git` subprocesses, HTTP downloads). Tests use scripted fetchers that
//! record calls without spawning processes or opening sockets.

pub mod file;
pub mod git;

pub use file::FileFetcher;
pub use git::GitFetcher;

use crate::core::spec::Entry;
use crate::error::VdmError;

pub trait Fetcher {
    /// Place `entry`'s content at `entry.destination`.
    fn apply(&self, entry: &Entry) -> Result<(), VdmError>;
}
