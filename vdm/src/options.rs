//! Run options built once at the CLI boundary and passed down explicitly.

use std::path::PathBuf;

/// Default spec file location, relative to the working directory.
pub const DEFAULT_SPEC_FILE: &str = "./vdm.yaml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    /// Path to the spec file.
    pub spec_path: PathBuf,
    /// Emit debug-level logs (raw subprocess output, decoded records).
    pub debug: bool,
    /// Keep `.git` inside git destinations instead of removing it after checkout.
    pub keep_git_dir: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            spec_path: PathBuf::from(DEFAULT_SPEC_FILE),
            debug: false,
            keep_git_dir: false,
        }
    }
}
