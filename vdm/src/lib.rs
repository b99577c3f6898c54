//! Versioned dependency manager.
//!
//! vdm reads a spec file listing remote sources (git repositories or plain
//! files over HTTP) and makes each declared local destination hold the
//! declared version. A small `VDMMETA` record per destination lets repeated
//! runs skip entries that are already in place.
//!
//! - **[`core`]**: Pure, deterministic logic (data model, validation, sync
//!   decisions, git plans). No I/O.
//! - **[`io`]**: Side-effecting adapters (spec and metadata files, `git`
//!   subprocesses, HTTP).
//! - **[`fetch`]**: Per-type fetch strategies behind the [`fetch::Fetcher`] trait.
//!
//! Orchestration modules ([`sync`], [`validate`]) coordinate core logic with
//! I/O to implement CLI commands.

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod fetch;
pub mod io;
pub mod logging;
pub mod options;
pub mod sync;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod validate;
