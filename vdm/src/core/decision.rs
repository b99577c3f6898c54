//! Per-entry sync decision from desired state and the last recorded state.

use crate::core::spec::{Entry, MetaRecord};

/// What the reconciler should do with one entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// No record yet: fetch and record.
    Fetch,
    /// Record matches desired `(source, version)`: nothing to do.
    Skip,
    /// Record exists but `(source, version)` changed: clear the stale
    /// destination, fetch again and rewrite the record.
    Refetch { previous: MetaRecord },
    /// Record cannot be converged to the entry in place.
    Unsupported { reason: String },
}

/// Compare `entry` against the record found on disk (if any).
pub fn decide(entry: &Entry, record: Option<&MetaRecord>) -> Decision {
    let Some(record) = record else {
        return Decision::Fetch;
    };

    if record.kind.fetch_kind() != entry.fetch_kind() {
        return Decision::Unsupported {
            reason: format!(
                "recorded remote type '{}' differs from declared type '{}'",
                record.kind.as_str(),
                entry.kind.as_str()
            ),
        };
    }

    if record.matches(entry) {
        Decision::Skip
    } else {
        Decision::Refetch {
            previous: record.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::spec::RemoteType;
    use crate::test_support::{file_entry, git_entry};

    #[test]
    fn missing_record_fetches() {
        let entry = git_entry("https://x", "v1", "deps/x");
        assert_eq!(decide(&entry, None), Decision::Fetch);
    }

    #[test]
    fn matching_record_skips() {
        let entry = git_entry("https://x", "v1", "deps/x");
        let record = MetaRecord::from_entry(&entry);
        assert_eq!(decide(&entry, Some(&record)), Decision::Skip);
    }

    #[test]
    fn version_change_refetches() {
        let old = git_entry("https://x", "v1", "deps/x");
        let record = MetaRecord::from_entry(&old);
        let entry = git_entry("https://x", "v2", "deps/x");
        assert_eq!(
            decide(&entry, Some(&record)),
            Decision::Refetch { previous: record }
        );
    }

    #[test]
    fn source_change_refetches() {
        let old = git_entry("https://x", "v1", "deps/x");
        let record = MetaRecord::from_entry(&old);
        let entry = git_entry("https://y", "v1", "deps/x");
        assert!(matches!(
            decide(&entry, Some(&record)),
            Decision::Refetch { .. }
        ));
    }

    #[test]
    fn legacy_untyped_record_counts_as_git() {
        let entry = git_entry("https://x", "v1", "deps/x");
        let mut record = MetaRecord::from_entry(&entry);
        record.kind = RemoteType::Unspecified;
        assert_eq!(decide(&entry, Some(&record)), Decision::Skip);
    }

    #[test]
    fn file_version_is_ignored_when_comparing() {
        let mut entry = file_entry("https://x/f.bin", "deps/f.bin");
        let record = MetaRecord::from_entry(&entry);
        entry.version = "v9".to_string();
        assert_eq!(decide(&entry, Some(&record)), Decision::Skip);
    }

    #[test]
    fn type_change_is_unsupported() {
        let entry = git_entry("https://x", "v1", "deps/x");
        let mut record = MetaRecord::from_entry(&entry);
        record.kind = RemoteType::File;
        assert!(matches!(
            decide(&entry, Some(&record)),
            Decision::Unsupported { .. }
        ));
    }
}
