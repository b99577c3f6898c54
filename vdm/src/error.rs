//! Error types shared by every vdm operation.

use std::path::PathBuf;

use crate::exit_codes;

/// Result alias for vdm operations.
pub type Result<T> = std::result::Result<T, VdmError>;

/// Errors surfaced by loading, validating and syncing a spec file.
///
/// Per-entry variants carry the entry's `op` message (`source@version --> destination`)
/// so a failure can be diagnosed without re-running in debug mode.
#[derive(Debug, thiserror::Error)]
pub enum VdmError {
    #[error(
        "spec file not found at '{}'; pass --specfile-path or create one in the default location",
        path.display()
    )]
    SpecNotFound { path: PathBuf },

    #[error("reading spec file '{}': {source}", path.display())]
    SpecRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing spec file '{}': {message}", path.display())]
    SpecParse { path: PathBuf, message: String },

    #[error("{count} validation failure(s) found in your vdm spec file:\n- {}", details.join("\n- "))]
    Validation { count: usize, details: Vec<String> },

    #[error("{op}: remote type '{kind}' is not supported")]
    UnrecognizedType { op: String, kind: String },

    #[error("{op}: '{tool}' does not seem to be available on your PATH: {detail}")]
    ToolUnavailable {
        op: String,
        tool: String,
        detail: String,
    },

    #[error("{op}: {action} failed: {}", output.trim())]
    Fetch {
        op: String,
        action: String,
        output: String,
    },

    #[error("unsuccessful status code '{status}' from server when retrieving remote file '{url}'")]
    HttpStatus { status: u16, url: String },

    #[error("requesting '{url}': {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("building HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing metadata file '{}': {message}", path.display())]
    MetaParse { path: PathBuf, message: String },

    #[error("encoding metadata file '{}': {message}", path.display())]
    MetaEncode { path: PathBuf, message: String },

    #[error("{op}: cannot converge to the requested state: {reason}")]
    UnsupportedTransition { op: String, reason: String },
}

impl VdmError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Stable process exit code for this failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::SpecNotFound { .. }
            | Self::SpecRead { .. }
            | Self::SpecParse { .. }
            | Self::Validation { .. } => exit_codes::INVALID_SPEC,
            _ => exit_codes::FAILURE,
        }
    }
}
