//! Plain-file fetch strategy over HTTP.

use std::fs::{self, File};
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::core::spec::Entry;
use crate::error::VdmError;
use crate::fetch::Fetcher;
use crate::io::http::HttpClient;

/// Downloads a single file once; an existing file is left untouched.
pub struct FileFetcher<C> {
    client: C,
}

impl<C: HttpClient> FileFetcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }
}

impl<C: HttpClient> Fetcher for FileFetcher<C> {
    #[instrument(skip_all, fields(source = %entry.source))]
    fn apply(&self, entry: &Entry) -> Result<(), VdmError> {
        let dest = &entry.destination;
        if is_regular_file(dest)? {
            info!("File '{}' already exists locally, skipping", dest.display());
            return Ok(());
        }

        info!("File '{}' does not exist locally, retrieving", dest.display());
        let response = self.client.get(&entry.source)?;
        if !response.is_success() {
            return Err(VdmError::HttpStatus {
                status: response.status,
                url: entry.source.clone(),
            });
        }

        ensure_parent_dirs(dest)?;
        let written = write_streamed(&entry.op_msg(), dest, response.body)?;
        debug!(bytes = written, path = %dest.display(), "file written");
        Ok(())
    }
}

fn is_regular_file(path: &Path) -> Result<bool, VdmError> {
    match fs::metadata(path) {
        Ok(meta) => Ok(meta.is_file()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(false),
        Err(err) => Err(VdmError::io(path, err)),
    }
}

fn ensure_parent_dirs(path: &Path) -> Result<(), VdmError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|err| VdmError::io(parent, err))?;
        debug!(dir = %parent.display(), "ensured parent directories");
    }
    Ok(())
}

/// Stream `body` into a sibling temp file, then rename it onto `dest`.
///
/// On any failure the temp file is removed, so `dest` is either absent or complete.
fn write_streamed(op: &str, dest: &Path, mut body: impl io::Read) -> Result<u64, VdmError> {
    let tmp_path = partial_path(dest)?;
    let result = (|| -> Result<u64, VdmError> {
        let mut out = File::create(&tmp_path).map_err(|err| VdmError::io(&tmp_path, err))?;
        let written = io::copy(&mut body, &mut out).map_err(|err| VdmError::Fetch {
            op: op.to_string(),
            action: "copying HTTP response to disk".to_string(),
            output: err.to_string(),
        })?;
        out.sync_all().map_err(|err| VdmError::io(&tmp_path, err))?;
        fs::rename(&tmp_path, dest).map_err(|err| VdmError::io(dest, err))?;
        Ok(written)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn partial_path(dest: &Path) -> Result<PathBuf, VdmError> {
    let name = dest.file_name().ok_or_else(|| {
        VdmError::io(
            dest,
            io::Error::new(ErrorKind::InvalidInput, "destination does not name a file"),
        )
    })?;
    Ok(dest.with_file_name(format!(".{}.vdm-part", name.to_string_lossy())))
}
