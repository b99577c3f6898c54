//! I/O helpers for vdm commands.

pub mod git;
pub mod http;
pub mod meta;
pub mod spec_file;
