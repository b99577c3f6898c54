//! Desired-state data model: entries, remote types and metadata records.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Version string meaning "most recent default-branch content".
pub const LATEST: &str = "latest";

/// Base name of the per-entry metadata file.
pub const META_FILE_NAME: &str = "VDMMETA";

/// Remote type as written in the spec file.
///
/// Unknown strings are kept rather than rejected at decode time so validation
/// can report them alongside every other problem in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RemoteType {
    Git,
    File,
    /// No `type` given; treated as [`RemoteType::Git`].
    #[default]
    Unspecified,
    Unrecognized(String),
}

/// Closed set of fetch strategies an entry can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    Git,
    File,
}

impl RemoteType {
    /// Strategy this type resolves to, or `None` for an unrecognized type.
    pub fn fetch_kind(&self) -> Option<FetchKind> {
        match self {
            Self::Git | Self::Unspecified => Some(FetchKind::Git),
            Self::File => Some(FetchKind::File),
            Self::Unrecognized(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Git => "git",
            Self::File => "file",
            Self::Unspecified => "",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for RemoteType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "git" => Self::Git,
            "file" => Self::File,
            "" => Self::Unspecified,
            _ => Self::Unrecognized(raw),
        }
    }
}

impl From<RemoteType> for String {
    fn from(kind: RemoteType) -> Self {
        kind.as_str().to_string()
    }
}

impl From<FetchKind> for RemoteType {
    fn from(kind: FetchKind) -> Self {
        match kind {
            FetchKind::Git => Self::Git,
            FetchKind::File => Self::File,
        }
    }
}

/// One declared remote-to-local mapping.
///
/// Missing `source`/`destination` decode as empty so they surface as
/// validation findings instead of a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(rename = "type", default)]
    pub kind: RemoteType,
    #[serde(alias = "remote", default)]
    pub source: String,
    #[serde(default)]
    pub version: String,
    #[serde(alias = "local_path", default)]
    pub destination: PathBuf,
}

impl Entry {
    pub fn fetch_kind(&self) -> Option<FetchKind> {
        self.kind.fetch_kind()
    }

    /// Version that participates in change detection.
    ///
    /// File entries have no versioning, so any declared version is ignored.
    pub fn effective_version(&self) -> &str {
        match self.fetch_kind() {
            Some(FetchKind::File) => "",
            _ => &self.version,
        }
    }

    /// Log prefix describing the operation for this entry.
    pub fn op_msg(&self) -> String {
        if self.version.is_empty() {
            format!("{} --> {}", self.source, self.destination.display())
        } else {
            format!(
                "{}@{} --> {}",
                self.source,
                self.version,
                self.destination.display()
            )
        }
    }

    pub fn is_latest(&self) -> bool {
        self.version == LATEST
    }
}

/// Ordered list of entries loaded from a spec file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Specification {
    pub entries: Vec<Entry>,
}

/// What was last materialized on disk for an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaRecord {
    #[serde(rename = "type", default)]
    pub kind: RemoteType,
    #[serde(alias = "remote")]
    pub source: String,
    #[serde(default)]
    pub version: String,
    #[serde(alias = "local_path")]
    pub destination: PathBuf,
}

impl MetaRecord {
    /// Snapshot `entry` as it will look once successfully fetched.
    pub fn from_entry(entry: &Entry) -> Self {
        let kind = entry
            .fetch_kind()
            .map(RemoteType::from)
            .unwrap_or_else(|| entry.kind.clone());
        Self {
            kind,
            source: entry.source.clone(),
            version: entry.effective_version().to_string(),
            destination: entry.destination.clone(),
        }
    }

    /// True when the record already reflects the entry's `(source, version)`.
    pub fn matches(&self, entry: &Entry) -> bool {
        self.source == entry.source && self.version == entry.effective_version()
    }
}

/// Location of the metadata record for `entry`.
///
/// Git destinations are directories and hold `VDMMETA` directly. File
/// destinations are leaf files, so the record sits next to them as
/// `VDMMETA_<file name>`.
pub fn meta_path(entry: &Entry) -> PathBuf {
    match (entry.fetch_kind(), entry.destination.file_name()) {
        (Some(FetchKind::File), Some(name)) => {
            let parent = entry.destination.parent().unwrap_or(Path::new(""));
            parent.join(format!("{}_{}", META_FILE_NAME, name.to_string_lossy()))
        }
        _ => entry.destination.join(META_FILE_NAME),
    }
}
