//! Cohort membership document and group index extraction.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::keys::Group;
use crate::core::naming::INDICES_FIELD;
use crate::error::{DataioError, Result};

/// Case/control/test split as written by the cohort generator.
///
/// Groups and their fields are optional at parse time, and the fields are
/// kept as raw JSON. Missing or malformed values only become errors when
/// [`CohortDocument::sample_ids`] or [`CohortDocument::group_indices`] asks
/// for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case: Option<CohortGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub control: Option<CohortGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<CohortGroup>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CohortGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_ids: Option<Value>,
    /// Row indices into the reference CEU genotype matrix. JSON `null`
    /// reads as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub indices_in_ceu_matrix: Option<Value>,
}

impl CohortDocument {
    pub fn group(&self, group: Group) -> Option<&CohortGroup> {
        match group {
            Group::Case => self.case.as_ref(),
            Group::Control => self.control.as_ref(),
            Group::Test => self.test.as_ref(),
        }
    }

    /// Sample ids of `group` as text.
    ///
    /// Numeric ids are rendered the way JSON writes them. An absent field is
    /// an empty list; anything other than a list of strings and numbers is
    /// `InvalidSampleIds`.
    pub fn sample_ids(&self, group: Group) -> Result<Vec<String>> {
        let record = self.group(group).ok_or(DataioError::MissingGroup { group })?;
        let Some(raw) = &record.sample_ids else {
            return Ok(Vec::new());
        };
        let invalid = |message: String| DataioError::InvalidSampleIds { group, message };
        let Value::Array(values) = raw else {
            return Err(invalid(format!("expected a list, found {raw}")));
        };
        values
            .iter()
            .enumerate()
            .map(|(pos, value)| match value {
                Value::String(s) => Ok(s.clone()),
                Value::Number(n) => Ok(n.to_string()),
                other => Err(invalid(format!("entry {pos} is {other}"))),
            })
            .collect()
    }

    /// Row indices of `group` in the reference genotype matrix.
    ///
    /// Fails with `MissingIndices` when the index field is absent; there is no
    /// fallback to matching by sample id or position. Indices are not
    /// bounds-checked against any matrix.
    pub fn group_indices(&self, group: Group) -> Result<Vec<i64>> {
        let record = self.group(group).ok_or(DataioError::MissingGroup { group })?;
        let raw = record
            .indices_in_ceu_matrix
            .as_ref()
            .ok_or(DataioError::MissingIndices {
                group,
                field: INDICES_FIELD,
            })?;
        let Value::Array(values) = raw else {
            return Err(DataioError::InvalidIndices {
                group,
                message: format!("expected a list, found {raw}"),
            });
        };
        values
            .iter()
            .enumerate()
            .map(|(pos, value)| {
                json_to_index(value).ok_or_else(|| DataioError::InvalidIndices {
                    group,
                    message: format!("entry {pos} is {value}"),
                })
            })
            .collect()
    }
}

/// Integers pass through; floats are accepted only when integral.
fn json_to_index(value: &Value) -> Option<i64> {
    if let Some(i) = value.as_i64() {
        return Some(i);
    }
    let f = value.as_f64()?;
    if f.fract() == 0.0 && f >= i64::MIN as f64 && f <= i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
