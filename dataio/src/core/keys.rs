//! Closed key types used to name files and look up cohort groups.
//!
//! Parsing is the validation boundary: a value outside the enumerated domain
//! is rejected here, before any path is built or any file is touched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DataioError, Result};

/// HapMap population code.
///
/// Parsing is case-insensitive; display is always uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Population {
    Ceu,
    Yri,
}

impl Population {
    pub const ALL: [Population; 2] = [Population::Ceu, Population::Yri];

    pub fn as_str(self) -> &'static str {
        match self {
            Population::Ceu => "CEU",
            Population::Yri => "YRI",
        }
    }
}

impl FromStr for Population {
    type Err = DataioError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_uppercase().as_str() {
            "CEU" => Ok(Population::Ceu),
            "YRI" => Ok(Population::Yri),
            _ => Err(DataioError::InvalidPopulation {
                value: value.to_string(),
            }),
        }
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived-output method name. Matching is exact (lowercase only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Method1,
    Method2,
    Method3,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Method1, Method::Method2, Method::Method3];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Method1 => "method1",
            Method::Method2 => "method2",
            Method::Method3 => "method3",
        }
    }
}

impl FromStr for Method {
    type Err = DataioError;

    fn from_str(value: &str) -> Result<Self> {
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == value)
            .ok_or_else(|| DataioError::InvalidMethod {
                value: value.to_string(),
            })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cohort group name. Matching is exact (lowercase only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Case,
    Control,
    Test,
}

impl Group {
    pub const ALL: [Group; 3] = [Group::Case, Group::Control, Group::Test];

    pub fn as_str(self) -> &'static str {
        match self {
            Group::Case => "case",
            Group::Control => "control",
            Group::Test => "test",
        }
    }
}

impl FromStr for Group {
    type Err = DataioError;

    fn from_str(value: &str) -> Result<Self> {
        Group::ALL
            .into_iter()
            .find(|g| g.as_str() == value)
            .ok_or_else(|| DataioError::InvalidGroup {
                value: value.to_string(),
            })
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encode a privacy parameter as a filesystem-safe token.
///
/// Uses the shortest decimal rendering of `eps` with every `.` replaced by
/// `_`: `0.1 -> "0_1"`, `10.0 -> "10"`, `2.5 -> "2_5"`. Values below `1e-4`
/// or from `1e16` up switch to exponent form with a signed exponent of at
/// least two digits, the way the producer pipeline names them:
/// `1e-5 -> "1e-05"`, `2.5e-7 -> "2_5e-07"`, `1e16 -> "1e+16"`.
pub fn epsilon_token(eps: f64) -> Result<String> {
    if !eps.is_finite() || eps <= 0.0 {
        return Err(DataioError::InvalidEpsilon { value: eps });
    }
    let text = if (1e-4..1e16).contains(&eps) {
        eps.to_string()
    } else {
        scientific(eps)
    };
    Ok(text.replace('.', "_"))
}

fn scientific(eps: f64) -> String {
    let rendered = format!("{eps:e}");
    let (mantissa, exponent) = rendered.split_once('e').unwrap_or((rendered.as_str(), "0"));
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}
