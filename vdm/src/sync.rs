//! Orchestration for `vdm sync`.
//!
//! Entries are reconciled strictly in spec order, one at a time. The first
//! failure aborts the run; entries already synced keep their records.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::core::decision::{Decision, decide};
use crate::core::spec::{Entry, FetchKind, META_FILE_NAME, MetaRecord, meta_path};
use crate::error::VdmError;
use crate::fetch::{FileFetcher, Fetcher, GitFetcher};
use crate::io::http::ReqwestClient;
use crate::io::meta::{read_meta, remove_meta, write_meta};
use crate::options::SyncOptions;
use crate::validate::load_and_validate;

/// Terminal state of one successfully processed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Content was (re)fetched and the record written.
    Fetched,
    /// Record already matched; nothing was done.
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryOutcome {
    pub op_msg: String,
    pub destination: PathBuf,
    pub state: SyncState,
}

/// Result of a full sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub outcomes: Vec<EntryOutcome>,
}

impl SyncReport {
    pub fn fetched(&self) -> usize {
        self.count(SyncState::Fetched)
    }

    pub fn skipped(&self) -> usize {
        self.count(SyncState::Skipped)
    }

    fn count(&self, state: SyncState) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.state == state)
            .count()
    }
}

/// Load, validate and reconcile the spec file named in `options`.
///
/// Load or validation failures abort before any entry is touched.
pub fn run_sync(options: &SyncOptions) -> Result<SyncReport, VdmError> {
    let spec = load_and_validate(&options.spec_path)?;
    let git = GitFetcher::new(options.keep_git_dir);
    let file = FileFetcher::new(ReqwestClient::new()?);
    let report = reconcile(&spec.entries, &git, &file)?;
    info!("All done!");
    Ok(report)
}

/// Converge every entry's destination towards its declared state.
pub fn reconcile<G: Fetcher, F: Fetcher>(
    entries: &[Entry],
    git: &G,
    file: &F,
) -> Result<SyncReport, VdmError> {
    let mut report = SyncReport::default();
    for entry in entries {
        let state = sync_entry(entry, git, file)?;
        report.outcomes.push(EntryOutcome {
            op_msg: entry.op_msg(),
            destination: entry.destination.clone(),
            state,
        });
    }
    Ok(report)
}

fn sync_entry<G: Fetcher, F: Fetcher>(
    entry: &Entry,
    git: &G,
    file: &F,
) -> Result<SyncState, VdmError> {
    let op = entry.op_msg();
    let kind = entry
        .fetch_kind()
        .ok_or_else(|| VdmError::UnrecognizedType {
            op: op.clone(),
            kind: entry.kind.as_str().to_string(),
        })?;

    let record = read_meta(entry)?;
    match decide(entry, record.as_ref()) {
        Decision::Skip => {
            info!(
                "Version unchanged ({}) in spec file for '{}' --> '{}', skipping",
                entry.version,
                entry.source,
                entry.destination.display()
            );
            return Ok(SyncState::Skipped);
        }
        Decision::Fetch => {
            info!(
                "{META_FILE_NAME} not found at '{}' -- will be created",
                meta_path(entry).display()
            );
        }
        Decision::Refetch { previous } => {
            info!(
                "Changing '{}' from '{}@{}' to '{}@{}'...",
                entry.destination.display(),
                previous.source,
                previous.version,
                entry.source,
                entry.effective_version()
            );
            clear_destination(&op, entry, kind)?;
        }
        Decision::Unsupported { reason } => {
            return Err(VdmError::UnsupportedTransition { op, reason });
        }
    }

    match kind {
        FetchKind::Git => git.apply(entry)?,
        FetchKind::File => file.apply(entry)?,
    }
    write_meta(entry, &MetaRecord::from_entry(entry))?;
    info!("{op} -- Done.");
    Ok(SyncState::Fetched)
}

/// Remove the stale record and content so the fetcher starts from an empty
/// destination.
///
/// The record goes first: if the new fetch fails, the entry is left without a
/// record and the next run fetches it again. Refuses to remove something of
/// the wrong kind (a file where a git checkout should be, or a directory
/// where a file should be).
fn clear_destination(op: &str, entry: &Entry, kind: FetchKind) -> Result<(), VdmError> {
    let dest = &entry.destination;
    let file_type = match fs::symlink_metadata(dest) {
        Ok(meta) => Some(meta.file_type()),
        Err(err) if err.kind() == ErrorKind::NotFound => None,
        Err(err) => return Err(VdmError::io(dest, err)),
    };

    let unsupported = |reason: &str| VdmError::UnsupportedTransition {
        op: op.to_string(),
        reason: format!("'{}' {reason}", dest.display()),
    };
    match (kind, file_type) {
        (FetchKind::Git, Some(ft)) if !ft.is_dir() => {
            return Err(unsupported("exists but is not a directory"));
        }
        (FetchKind::File, Some(ft)) if ft.is_dir() => {
            return Err(unsupported("is a directory"));
        }
        _ => {}
    }

    remove_meta(entry)?;
    let Some(file_type) = file_type else {
        return Ok(());
    };
    if file_type.is_dir() {
        debug!(path = %dest.display(), "removing stale checkout");
        fs::remove_dir_all(dest).map_err(|err| VdmError::io(dest, err))
    } else {
        debug!(path = %dest.display(), "removing stale file");
        fs::remove_file(dest).map_err(|err| VdmError::io(dest, err))
    }
}
