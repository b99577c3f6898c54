//! Deterministic, pure logic shared by vdm commands.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod decision;
pub mod git_plan;
pub mod spec;
pub mod validation;
