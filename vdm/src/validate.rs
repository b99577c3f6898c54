//! Load + validate a spec file before anything touches the filesystem.

use std::path::Path;

use tracing::{debug, warn};

use crate::core::spec::Specification;
use crate::core::validation::validate_entries;
use crate::error::VdmError;
use crate::io::spec_file::load_spec;

/// Load the spec at `path` and check every entry.
///
/// Warnings are logged; any error aborts with a single aggregate
/// [`VdmError::Validation`] listing every finding.
pub fn load_and_validate(path: &Path) -> Result<Specification, VdmError> {
    let spec = load_spec(path)?;
    let report = validate_entries(&spec.entries);
    for warning in &report.warnings {
        warn!("{warning}");
    }
    report.into_result()?;
    debug!(entries = spec.entries.len(), "spec file is valid");
    Ok(spec)
}
