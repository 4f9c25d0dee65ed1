//! Test-only helpers for building synthetic projects, archives and cohorts.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::io::layout::Layout;

/// Encode an `.npy` (version 1.0) member from raw little-endian element bytes.
pub fn npy_bytes(descr: &str, shape: &[usize], payload: &[u8]) -> Vec<u8> {
    encode_npy(1, descr, shape, payload)
}

/// Same as [`npy_bytes`] but written as format version 2.0, which stores the
/// header length in four bytes.
pub fn npy_bytes_v2(descr: &str, shape: &[usize], payload: &[u8]) -> Vec<u8> {
    encode_npy(2, descr, shape, payload)
}

fn encode_npy(major: u8, descr: &str, shape: &[usize], payload: &[u8]) -> Vec<u8> {
    let shape_text = match shape {
        [] => "()".to_string(),
        [n] => format!("({n},)"),
        dims => format!(
            "({})",
            dims.iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        ),
    };
    let mut header =
        format!("{{'descr': '{descr}', 'fortran_order': False, 'shape': {shape_text}, }}");
    let preamble = if major == 1 { 10 } else { 12 };
    // Pad so the payload starts on a 64-byte boundary, header ends in '\n'.
    let unpadded = preamble + header.len() + 1;
    header.push_str(&" ".repeat((64 - unpadded % 64) % 64));
    header.push('\n');

    let mut out = Vec::with_capacity(preamble + header.len() + payload.len());
    out.extend_from_slice(b"\x93NUMPY");
    out.extend_from_slice(&[major, 0]);
    if major == 1 {
        out.extend_from_slice(&(header.len() as u16).to_le_bytes());
    } else {
        out.extend_from_slice(&(header.len() as u32).to_le_bytes());
    }
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(payload);
    out
}

/// 1-D `int8` array.
pub fn npy_i8(values: &[i8]) -> Vec<u8> {
    let payload: Vec<u8> = values.iter().map(|v| *v as u8).collect();
    npy_bytes("|i1", &[values.len()], &payload)
}

/// Row-major 2-D `int64` matrix.
pub fn npy_i64_matrix(rows: &[Vec<i64>]) -> Vec<u8> {
    let n_cols = rows.first().map_or(0, Vec::len);
    let payload: Vec<u8> = rows
        .iter()
        .flat_map(|row| row.iter().flat_map(|v| v.to_le_bytes()))
        .collect();
    npy_bytes("<i8", &[rows.len(), n_cols], &payload)
}

/// 1-D `int32` array.
pub fn npy_i32(values: &[i32]) -> Vec<u8> {
    let payload: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    npy_bytes("<i4", &[values.len()], &payload)
}

/// 1-D fixed-width unicode array (`<U{n}`), as numpy writes string lists.
pub fn npy_text(values: &[&str]) -> Vec<u8> {
    let width = values
        .iter()
        .map(|s| s.chars().count())
        .max()
        .unwrap_or(1)
        .max(1);
    let mut payload = Vec::with_capacity(values.len() * width * 4);
    for value in values {
        let mut written = 0;
        for ch in value.chars() {
            payload.extend_from_slice(&u32::from(ch).to_le_bytes());
            written += 1;
        }
        for _ in written..width {
            payload.extend_from_slice(&0u32.to_le_bytes());
        }
    }
    npy_bytes(&format!("<U{width}"), &[values.len()], &payload)
}

/// Write an `.npz` archive with one `<name>.npy` member per entry.
pub fn write_npz(path: &Path, members: &[(&str, Vec<u8>)]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut zip = ZipWriter::new(file);
    for (name, bytes) in members {
        zip.start_file(format!("{name}.npy"), SimpleFileOptions::default())
            .with_context(|| format!("start member {name}"))?;
        zip.write_all(bytes)
            .with_context(|| format!("write member {name}"))?;
    }
    zip.finish().context("finish npz")?;
    Ok(())
}

/// Write a cohort JSON document.
pub fn write_json(path: &Path, value: &Value) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let mut buf = serde_json::to_string_pretty(value)?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write {}", path.display()))
}

/// Temporary project directory with a `.git` marker and its [`Layout`].
pub struct TestProject {
    _temp: TempDir,
    pub layout: Layout,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("tempdir")?;
        fs::create_dir_all(temp.path().join(".git")).context("create .git marker")?;
        let layout = Layout::new(temp.path());
        Ok(Self { _temp: temp, layout })
    }

    pub fn path(&self) -> &Path {
        &self.layout.root
    }

    /// Small three-sample, four-SNP region archive at the canonical path.
    pub fn write_region(&self, region_name: &str) -> Result<PathBuf> {
        let path = self.layout.region_archive_path(region_name);
        write_npz(
            &path,
            &[
                (
                    "G",
                    npy_i64_matrix(&[vec![0, 1, 2, -1], vec![2, 2, 0, 1], vec![1, 0, -1, 0]]),
                ),
                ("sample_ids", npy_text(&["NA06985", "NA06991", "NA06993"])),
                ("snp_ids", npy_text(&["rs1", "rs22", "rs333", "rs4444"])),
                ("positions", npy_i32(&[1000, 2000, 3500, 4100])),
                ("minor_alleles", npy_text(&["A", "C", "G", "T"])),
                ("major_alleles", npy_text(&["G", "T", "A", "C"])),
            ],
        )?;
        Ok(path)
    }

    /// Cohort split at the canonical path.
    pub fn write_cohorts(&self, value: &Value) -> Result<PathBuf> {
        let path = self.layout.cohort_split_path();
        write_json(&path, value)?;
        Ok(path)
    }
}
