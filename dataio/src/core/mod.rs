//! Deterministic, pure logic shared by the layout and loaders.
//!
//! Core modules must be free of I/O side effects. They name files, model the
//! loaded artifacts and validate keys, returning deterministic outputs
//! suitable for tests.

pub mod archive;
pub mod cohort;
pub mod keys;
pub mod naming;
