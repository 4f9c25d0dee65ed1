//! Canonical data layout and artifact loaders for the HapMap pipeline.
//!
//! Downstream analysis code uses this crate to locate and read intermediate
//! data produced upstream, without re-deriving paths or re-implementing
//! parsing. The crate is split the same way throughout:
//!
//! - **[`core`]**: Pure logic (key validation, file naming, artifact records,
//!   cohort index extraction). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (root discovery, directory creation,
//!   archive and cohort loading, diagnostics).
//!
//! The entry point is [`io::layout::Layout`], an explicit value holding the
//! project root and every derived directory:
//!
//! ```no_run
//! use dataio::core::keys::Group;
//! use dataio::io::{archive, cohort, layout::Layout};
//!
//! # fn main() -> dataio::error::Result<()> {
//! let layout = Layout::discover()?;
//! let region = archive::load_region_archive(&layout.region_archive_path("CEU_chr2_5Mb"))?;
//! let cohorts = cohort::load_cohorts(&layout.cohort_split_path())?;
//! let cases = region.sample_rows(&cohorts.group_indices(Group::Case)?)?;
//! # let _ = cases;
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod error;
pub mod exit_codes;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use error::{DataioError, Result};
