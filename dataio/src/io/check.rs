//! Human-facing diagnostics: existence checks and the layout summary.

use std::io::Write;
use std::path::{Path, PathBuf};

use super::layout::Layout;
use crate::error::{DataioError, Result};

/// Report presence of every path to `out`, then fail if any is missing.
///
/// All paths are checked before failing; the error lists every missing path.
/// Paths under `root` are printed relative to it.
pub fn assert_exists(
    root: &Path,
    paths: &[PathBuf],
    label: &str,
    out: &mut impl Write,
) -> Result<()> {
    let report_err = |e| DataioError::io("<report>", e);
    writeln!(out, "\n=== {label} ===").map_err(report_err)?;
    let mut missing = Vec::new();
    for path in paths {
        let shown = path.strip_prefix(root).unwrap_or(path);
        if path.exists() {
            writeln!(out, "ok       {}", shown.display()).map_err(report_err)?;
        } else {
            writeln!(out, "missing  {}", shown.display()).map_err(report_err)?;
            missing.push(path.clone());
        }
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(DataioError::MissingRequiredFiles { missing })
    }
}

/// Print where the project expects its inputs and outputs.
pub fn write_layout_summary(layout: &Layout, out: &mut impl Write) -> Result<()> {
    let report_err = |e| DataioError::io("<report>", e);
    let rows = [
        ("PROJECT_ROOT", &layout.root),
        ("RAW_DIR", &layout.raw_dir),
        ("PROC_DIR", &layout.processed_dir),
        ("DERIVED_DIR", &layout.derived_dir),
    ];
    for (name, path) in rows {
        writeln!(out, "{name}: {}", path.display()).map_err(report_err)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn all_present_passes_and_reports_each_path() {
        let temp = tempfile::tempdir().expect("tempdir");
        let a = temp.path().join("a.json");
        let b = temp.path().join("sub").join("b.npz");
        fs::write(&a, "{}").expect("write a");
        fs::create_dir_all(b.parent().expect("parent")).expect("mkdir");
        fs::write(&b, "").expect("write b");

        let mut out = Vec::new();
        assert_exists(temp.path(), &[a, b], "INPUTS", &mut out).expect("all present");

        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("=== INPUTS ==="));
        assert!(text.contains("ok       a.json"));
        assert!(text.contains(&format!("ok       {}", Path::new("sub").join("b.npz").display())));
    }

    #[test]
    fn every_missing_path_is_reported_before_failing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let present = temp.path().join("present.txt");
        fs::write(&present, "").expect("write");
        let gone1 = temp.path().join("gone1.npz");
        let gone2 = temp.path().join("gone2.json");

        let mut out = Vec::new();
        let err = assert_exists(
            temp.path(),
            &[gone1.clone(), present, gone2.clone()],
            "CHECK",
            &mut out,
        )
        .unwrap_err();

        match err {
            DataioError::MissingRequiredFiles { missing } => assert_eq!(missing, vec![gone1, gone2]),
            other => panic!("unexpected error: {other}"),
        }
        let text = String::from_utf8(out).expect("utf8");
        assert_eq!(text.matches("missing  ").count(), 2);
        assert!(text.contains("ok       present.txt"));
    }

    #[test]
    fn layout_summary_lists_top_level_directories() {
        let layout = Layout::new("/proj");
        let mut out = Vec::new();
        write_layout_summary(&layout, &mut out).expect("summary");
        let text = String::from_utf8(out).expect("utf8");
        assert!(text.contains("PROJECT_ROOT: /proj\n"));
        assert!(text.contains("DERIVED_DIR: /proj/data/derived\n"));
    }
}
