//! Cohort split loader.

use std::fs;
use std::path::Path;

use tracing::debug;

use super::layout::Layout;
use crate::core::cohort::CohortDocument;
use crate::error::{DataioError, Result};

/// Parse the cohort document at `path`. Schema problems surface later, at
/// index extraction.
pub fn load_cohorts(path: &Path) -> Result<CohortDocument> {
    debug!(path = %path.display(), "loading cohorts");
    let contents = fs::read_to_string(path).map_err(|e| DataioError::cohort(path, e.to_string()))?;
    let doc: CohortDocument =
        serde_json::from_str(&contents).map_err(|e| DataioError::cohort(path, e.to_string()))?;
    debug!(
        case = doc.case.is_some(),
        control = doc.control.is_some(),
        test = doc.test.is_some(),
        "cohorts loaded"
    );
    Ok(doc)
}

/// Load from `path`, or from the canonical cohort split when `None`.
pub fn load_cohorts_or_default(layout: &Layout, path: Option<&Path>) -> Result<CohortDocument> {
    match path {
        Some(path) => load_cohorts(path),
        None => load_cohorts(&layout.cohort_split_path()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::keys::Group;
    use crate::test_support::{TestProject, write_json};
    use serde_json::json;

    #[test]
    fn default_path_is_canonical_split() {
        let project = TestProject::new().expect("project");
        project
            .write_cohorts(&json!({
                "case": {"sample_ids": ["a", "b"], "indices_in_ceu_matrix": [4, 1]},
                "control": {"sample_ids": ["c"], "indices_in_ceu_matrix": [0]},
                "test": {"sample_ids": ["d"]}
            }))
            .expect("write cohorts");

        let doc = load_cohorts_or_default(&project.layout, None).expect("load");
        assert_eq!(doc.group_indices(Group::Case).expect("case"), vec![4, 1]);
        assert_eq!(doc.group_indices(Group::Control).expect("control"), vec![0]);
        assert!(matches!(
            doc.group_indices(Group::Test),
            Err(DataioError::MissingIndices { group: Group::Test, .. })
        ));
    }

    #[test]
    fn explicit_path_overrides_default() {
        let project = TestProject::new().expect("project");
        let path = project.layout.cross_population_cohort_path();
        write_json(&path, &json!({"case": {"indices_in_ceu_matrix": [9]}})).expect("write");

        let doc = load_cohorts_or_default(&project.layout, Some(&path)).expect("load");
        assert_eq!(doc.group_indices(Group::Case).expect("case"), vec![9]);
    }

    #[test]
    fn missing_or_malformed_file_is_cohort_read_error() {
        let project = TestProject::new().expect("project");
        assert!(matches!(
            load_cohorts_or_default(&project.layout, None),
            Err(DataioError::CohortRead { .. })
        ));

        let path = project.path().join("broken.json");
        fs::write(&path, "{ not json").expect("write");
        assert!(matches!(load_cohorts(&path), Err(DataioError::CohortRead { .. })));
    }

    #[test]
    fn integer_sample_ids_do_not_block_loading() {
        let project = TestProject::new().expect("project");
        project
            .write_cohorts(&json!({
                "case": {"sample_ids": [101, 102], "indices_in_ceu_matrix": [0, 1]},
                "control": {"sample_ids": [103], "indices_in_ceu_matrix": 5}
            }))
            .expect("write cohorts");

        let doc = load_cohorts_or_default(&project.layout, None).expect("load");
        assert_eq!(doc.group_indices(Group::Case).expect("case"), vec![0, 1]);
        assert_eq!(doc.sample_ids(Group::Case).expect("ids"), ["101", "102"]);
        assert!(matches!(
            doc.group_indices(Group::Control),
            Err(DataioError::InvalidIndices { group: Group::Control, .. })
        ));
    }
}
