//! CLI tests for the `dataio` binary.
//!
//! Spawns the binary against synthetic projects and verifies stdout and exit
//! codes for path naming, root discovery, existence checks and loaders.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use dataio::exit_codes;
use dataio::io::config::{DataioConfig, config_path, write_config};
use dataio::test_support::TestProject;
use serde_json::json;

fn dataio(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dataio"))
        .current_dir(cwd)
        .args(args)
        .output()
        .expect("run dataio")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("utf8 stdout")
}

#[test]
fn genotype_path_uppercases_population() {
    let project = TestProject::new().expect("project");

    let output = dataio(project.path(), &["path", "genotype", "yri", "10"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let expected = project
        .layout
        .raw_genotypes_dir
        .join("genotypes_chr10_YRI_r27_nr.b36_fwd.txt.gz");
    assert_eq!(stdout(&output).trim_end(), expected.display().to_string());
}

#[test]
fn unknown_population_exits_invalid() {
    let project = TestProject::new().expect("project");

    let output = dataio(project.path(), &["path", "genotype", "JPT", "2"]);

    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid population"));
}

#[test]
fn method_path_creates_directory() {
    let project = TestProject::new().expect("project");

    let output = dataio(project.path(), &["path", "method", "method1", "0.1"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let dir = project.layout.derived_dir.join("method1").join("eps_0_1");
    assert_eq!(stdout(&output).trim_end(), dir.display().to_string());
    assert!(dir.is_dir());
}

/// Root discovery from three levels below the `.git` marker.
#[test]
fn layout_discovers_root_from_nested_directory() {
    let project = TestProject::new().expect("project");
    let nested = project.path().join("notebooks").join("a").join("b");
    fs::create_dir_all(&nested).expect("create nested");
    let root = fs::canonicalize(project.path()).expect("canonical root");

    let output = dataio(&nested, &["layout"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert!(stdout(&output).contains(&format!("PROJECT_ROOT: {}\n", root.display())));
}

#[test]
fn ensure_dirs_is_idempotent() {
    let project = TestProject::new().expect("project");
    let root = project.path().display().to_string();

    for _ in 0..2 {
        let output = dataio(project.path(), &["--root", &root, "ensure-dirs"]);
        assert_eq!(output.status.code(), Some(exit_codes::OK));
    }
    for dir in project.layout.directories() {
        assert!(dir.is_dir(), "{} missing", dir.display());
    }
}

#[test]
fn check_reports_all_missing_files() {
    let project = TestProject::new().expect("project");
    project.write_region("CEU_chr2_5Mb").expect("write region");

    let output = dataio(
        project.path(),
        &[
            "check",
            "data/processed/hapmap/regions/CEU_chr2_5Mb.npz",
            "data/processed/hapmap/cohorts/ceu_case_control_test_split.json",
            "data/processed/hapmap/ceu_maf_reference.npz",
        ],
    );

    assert_eq!(output.status.code(), Some(exit_codes::MISSING_FILES));
    let text = stdout(&output);
    assert!(text.contains("ok       data/processed/hapmap/regions/CEU_chr2_5Mb.npz"));
    assert_eq!(text.matches("missing  ").count(), 2);
}

#[test]
fn check_falls_back_to_config() {
    let project = TestProject::new().expect("project");
    project.write_region("CEU_chr2_5Mb").expect("write region");
    let cfg = DataioConfig {
        required_files: vec!["data/processed/hapmap/regions/CEU_chr2_5Mb.npz".into()],
    };
    write_config(&config_path(project.path()), &cfg).expect("write config");

    let output = dataio(project.path(), &["check"]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
}

#[test]
fn indices_prints_group_indices() {
    let project = TestProject::new().expect("project");
    project
        .write_cohorts(&json!({
            "case": {"sample_ids": ["s1", "s2", "s3"], "indices_in_ceu_matrix": [0, 3, 7]},
            "control": {"sample_ids": ["s4"]}
        }))
        .expect("write cohorts");

    let output = dataio(project.path(), &["indices", "case"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout(&output).trim_end(), "[0,3,7]");

    let output = dataio(project.path(), &["indices", "control"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("indices_in_ceu_matrix"));
}

#[test]
fn inspect_summarizes_region_archive() {
    let project = TestProject::new().expect("project");
    let path = project.write_region("CEU_chr2_5Mb").expect("write region");

    let output = dataio(project.path(), &["inspect", &path.display().to_string()]);

    assert_eq!(output.status.code(), Some(exit_codes::OK));
    let text = stdout(&output);
    assert!(text.contains("G: 3 samples x 4 snps"));
    assert!(text.contains("counted_alleles: absent"));
    assert!(text.contains("shape: ok"));
}
