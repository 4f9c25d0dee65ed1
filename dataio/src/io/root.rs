//! Project root discovery.

use std::env;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{DataioError, Result};

/// Files or directories whose presence marks the project root.
pub const ROOT_MARKERS: [&str; 2] = ["requirements.txt", ".git"];

/// Walk from `start` upward and return the nearest directory holding a marker.
pub fn resolve_root_from(start: &Path) -> Result<PathBuf> {
    find_root(start, &ROOT_MARKERS)
}

/// Resolve the project root starting at the current working directory.
pub fn resolve_root() -> Result<PathBuf> {
    let cwd = env::current_dir().map_err(|e| DataioError::io(".", e))?;
    resolve_root_from(&cwd)
}

fn find_root(start: &Path, markers: &[&str]) -> Result<PathBuf> {
    for dir in start.ancestors() {
        if markers.iter().any(|marker| dir.join(marker).exists()) {
            debug!(start = %start.display(), root = %dir.display(), "project root resolved");
            return Ok(dir.to_path_buf());
        }
    }
    Err(DataioError::RootNotFound {
        start: start.to_path_buf(),
    })
}
