//! Spec file loading (YAML or JSON).

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::core::spec::{Entry, Specification};
use crate::error::VdmError;

/// Accepted document shapes: a bare list of entries, or `{ remotes: [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SpecDocument {
    List(Vec<Entry>),
    Wrapped { remotes: Vec<Entry> },
}

impl From<SpecDocument> for Specification {
    fn from(doc: SpecDocument) -> Self {
        let entries = match doc {
            SpecDocument::List(entries) => entries,
            SpecDocument::Wrapped { remotes } => remotes,
        };
        Specification { entries }
    }
}

/// Read and decode the spec file at `path`.
///
/// `.json` files are decoded as JSON, anything else as YAML.
pub fn load_spec(path: &Path) -> Result<Specification, VdmError> {
    let contents = fs::read_to_string(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => VdmError::SpecNotFound {
            path: path.to_path_buf(),
        },
        _ => VdmError::SpecRead {
            path: path.to_path_buf(),
            source: err,
        },
    })?;
    debug!(path = %path.display(), bytes = contents.len(), "spec file read");
    let spec = parse_spec(path, &contents)?;
    debug!(entries = spec.entries.len(), "spec file decoded");
    Ok(spec)
}

fn parse_spec(path: &Path, contents: &str) -> Result<Specification, VdmError> {
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let doc: SpecDocument = if is_json {
        serde_json::from_str(contents).map_err(|err| parse_error(path, err))?
    } else {
        serde_yaml::from_str(contents).map_err(|err| parse_error(path, err))?
    };
    Ok(doc.into())
}

fn parse_error(path: &Path, err: impl std::fmt::Display) -> VdmError {
    VdmError::SpecParse {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}
