//! Metadata record storage (`VDMMETA`) for synced entries.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::core::spec::{Entry, META_FILE_NAME, MetaRecord, meta_path};
use crate::error::VdmError;

/// Load the record for `entry`.
///
/// Returns `Ok(None)` when no record exists yet; that is the normal state of
/// an entry that has never been synced.
pub fn read_meta(entry: &Entry) -> Result<Option<MetaRecord>, VdmError> {
    let path = meta_path(entry);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no {META_FILE_NAME} record");
            return Ok(None);
        }
        Err(err) => return Err(VdmError::io(&path, err)),
    };
    debug!(path = %path.display(), contents = %contents, "{META_FILE_NAME} contents read");
    let record: MetaRecord =
        serde_json::from_str(&contents).map_err(|err| VdmError::MetaParse {
            path: path.clone(),
            message: err.to_string(),
        })?;
    Ok(Some(record))
}

/// Write `record` as the metadata for `entry`, replacing any prior record.
pub fn write_meta(entry: &Entry, record: &MetaRecord) -> Result<(), VdmError> {
    let path = meta_path(entry);
    debug!(path = %path.display(), "writing {META_FILE_NAME} record");
    let mut buf = serde_json::to_string_pretty(record).map_err(|err| VdmError::MetaEncode {
        path: path.clone(),
        message: err.to_string(),
    })?;
    buf.push('\n');
    write_atomic(&path, &buf)
}

/// Delete the record for `entry`, if any.
pub fn remove_meta(entry: &Entry) -> Result<(), VdmError> {
    let path = meta_path(entry);
    match fs::remove_file(&path) {
        Ok(()) => {
            debug!(path = %path.display(), "removed {META_FILE_NAME} record");
            Ok(())
        }
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(VdmError::io(path, err)),
    }
}

/// Write through a temp file + rename so readers never see a half-written record.
///
/// The temp name keeps the full record name (`.VDMMETA_a.proto.tmp`), so
/// records of sibling files never share a temp path.
fn write_atomic(path: &Path, contents: &str) -> Result<(), VdmError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| VdmError::io(parent, err))?;
    }
    let tmp_path = temp_path(path);
    fs::write(&tmp_path, contents).map_err(|err| VdmError::io(&tmp_path, err))?;
    fs::rename(&tmp_path, path).map_err(|err| VdmError::io(path, err))?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| META_FILE_NAME.to_string());
    path.with_file_name(format!(".{name}.tmp"))
}
