//! Entry invariants checked before any entry is synced.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::spec::{Entry, FetchKind, RemoteType};
use crate::error::VdmError;

/// Findings from checking every entry of a spec.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Collapse the findings into a single aggregate error.
    pub fn into_result(self) -> Result<(), VdmError> {
        if self.is_valid() {
            return Ok(());
        }
        Err(VdmError::Validation {
            count: self.errors.len(),
            details: self.errors,
        })
    }
}

/// True if `source` begins with a locator vdm knows how to fetch from.
///
/// Accepts `https://`, `http://`, `git://` and the scp-like SSH form `user@host:`.
pub fn has_known_prefix(source: &str) -> bool {
    static PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^(https?://|git://|[A-Za-z0-9._-]+@[A-Za-z0-9._-]+:)").unwrap()
    });
    PREFIX_RE.is_match(source)
}

/// Check every entry and accumulate all violations:
/// - `source` non-empty with a known prefix
/// - `version` present for git entries
/// - `destination` non-empty (and naming a file for file entries)
/// - `type` recognized
///
/// A version on a file entry is only a warning.
pub fn validate_entries(entries: &[Entry]) -> ValidationReport {
    let mut report = ValidationReport::default();
    for (index, entry) in entries.iter().enumerate() {
        validate_entry(index, entry, &mut report);
    }
    report
}

fn validate_entry(index: usize, entry: &Entry, report: &mut ValidationReport) {
    if entry.source.is_empty() {
        report.errors.push(format!("remote #{index}: 'source' must be non-empty"));
    } else if !has_known_prefix(&entry.source) {
        report.errors.push(format!(
            "remote #{index} provided as '{}', but 'source' must begin with a protocol \
             specifier or other valid prefix (e.g. 'https://', 'git://', 'git@host:')",
            entry.source
        ));
    }

    match entry.fetch_kind() {
        Some(FetchKind::Git) if entry.version.is_empty() => {
            report.errors.push(format!(
                "remote #{index}: 'version' must be non-empty for git remotes \
                 (use '{}' to track the default branch)",
                crate::core::spec::LATEST
            ));
        }
        Some(FetchKind::File) if !entry.version.is_empty() => {
            report.warnings.push(format!(
                "remote #{index} '{}' is a file remote, which does not take version info \
                 (got '{}'); ignoring version",
                entry.source, entry.version
            ));
        }
        _ => {}
    }

    if entry.destination.as_os_str().is_empty() {
        report
            .errors
            .push(format!("remote #{index}: 'destination' must be non-empty"));
    } else if entry.fetch_kind() == Some(FetchKind::File) && entry.destination.file_name().is_none()
    {
        report.errors.push(format!(
            "remote #{index}: file destination '{}' must name a file",
            entry.destination.display()
        ));
    }

    if let RemoteType::Unrecognized(raw) = &entry.kind {
        report
            .errors
            .push(format!("remote #{index}: unrecognized remote type '{raw}'"));
    }
}
