//! Region archive (`.npz`) loader.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use super::npy;
use crate::core::archive::{RawArray, RegionArchive};
use crate::error::{DataioError, Result};

/// Read every `<field>.npy` member of the archive at `path`.
pub fn read_fields(path: &Path) -> Result<BTreeMap<String, RawArray>> {
    debug!(path = %path.display(), "reading archive");
    let file = File::open(path).map_err(|e| DataioError::archive(path, e.to_string()))?;
    let mut zip = ZipArchive::new(BufReader::new(file))
        .map_err(|e| DataioError::archive(path, format!("not a zip archive: {e}")))?;

    let mut fields = BTreeMap::new();
    for i in 0..zip.len() {
        let mut member = zip
            .by_index(i)
            .map_err(|e| DataioError::archive(path, e.to_string()))?;
        let Some(name) = member.name().strip_suffix(".npy").map(str::to_string) else {
            debug!(member = member.name(), "skipping non-npy member");
            continue;
        };
        let mut bytes = Vec::new();
        member
            .read_to_end(&mut bytes)
            .map_err(|e| DataioError::archive(path, format!("member '{name}': {e}")))?;
        let array = npy::decode(&bytes)
            .map_err(|e| DataioError::archive(path, format!("field '{name}': {e}")))?;
        fields.insert(name, array);
    }
    debug!(fields = fields.len(), "archive read");
    Ok(fields)
}

/// Load a region archive and normalize its known fields.
///
/// Absent fields stay `None`; callers check presence before use.
pub fn load_region_archive(path: &Path) -> Result<RegionArchive> {
    let fields = read_fields(path)?;
    let archive = RegionArchive::from_fields(path, fields)?;
    debug!(dims = ?archive.dims(), "region archive loaded");
    Ok(archive)
}
