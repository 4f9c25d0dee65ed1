//! In-memory region archive record and field normalization.
//!
//! An archive is a bag of named arrays. Known fields are coerced into typed,
//! optional slots on [`RegionArchive`]; anything else is kept as-is in
//! [`RegionArchive::extra`]. Absent fields are never an error here.

use std::collections::BTreeMap;
use std::path::Path;

use ndarray::{Array2, Axis, ShapeBuilder};

use crate::error::{DataioError, Result};

pub const GENOTYPES_FIELD: &str = "G";
pub const SAMPLE_IDS_FIELD: &str = "sample_ids";
pub const SNP_IDS_FIELD: &str = "snp_ids";
pub const POSITIONS_FIELD: &str = "positions";
pub const MINOR_ALLELES_FIELD: &str = "minor_alleles";
pub const MAJOR_ALLELES_FIELD: &str = "major_alleles";
pub const COUNTED_ALLELES_FIELD: &str = "counted_alleles";
pub const OTHER_ALLELES_FIELD: &str = "other_alleles";

/// Element storage of a decoded array, widened to one type per kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayData {
    Bool(Vec<bool>),
    Int(Vec<i64>),
    UInt(Vec<u64>),
    Float(Vec<f64>),
    Text(Vec<String>),
}

impl ArrayData {
    pub fn len(&self) -> usize {
        match self {
            ArrayData::Bool(v) => v.len(),
            ArrayData::Int(v) => v.len(),
            ArrayData::UInt(v) => v.len(),
            ArrayData::Float(v) => v.len(),
            ArrayData::Text(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ArrayData::Bool(_) => "bool",
            ArrayData::Int(_) => "int",
            ArrayData::UInt(_) => "uint",
            ArrayData::Float(_) => "float",
            ArrayData::Text(_) => "text",
        }
    }
}

/// One decoded array member: shape, memory order and flat elements.
#[derive(Debug, Clone, PartialEq)]
pub struct RawArray {
    pub shape: Vec<usize>,
    pub fortran_order: bool,
    pub data: ArrayData,
}

impl RawArray {
    /// Elements as text. Numbers are rendered with their shortest decimal form.
    pub fn to_text(&self) -> Vec<String> {
        match &self.data {
            ArrayData::Text(v) => v.clone(),
            ArrayData::Bool(v) => v
                .iter()
                .map(|x| if *x { "True" } else { "False" }.to_string())
                .collect(),
            ArrayData::Int(v) => v.iter().map(ToString::to_string).collect(),
            ArrayData::UInt(v) => v.iter().map(ToString::to_string).collect(),
            ArrayData::Float(v) => v.iter().map(ToString::to_string).collect(),
        }
    }

    /// Elements as `i64`; floats truncate toward zero, text must parse.
    pub fn to_i64(&self) -> std::result::Result<Vec<i64>, String> {
        match &self.data {
            ArrayData::Int(v) => Ok(v.clone()),
            ArrayData::UInt(v) => Ok(v.iter().map(|x| *x as i64).collect()),
            ArrayData::Float(v) => Ok(v.iter().map(|x| *x as i64).collect()),
            ArrayData::Bool(v) => Ok(v.iter().map(|x| i64::from(*x)).collect()),
            ArrayData::Text(v) => v
                .iter()
                .map(|s| {
                    s.trim()
                        .parse::<i64>()
                        .map_err(|_| format!("cannot convert {s:?} to an integer"))
                })
                .collect(),
        }
    }

    /// Elements as a 2-D `i8` matrix. Integers wrap like a C cast.
    pub fn to_i8_matrix(&self) -> std::result::Result<Array2<i8>, String> {
        let &[rows, cols] = self.shape.as_slice() else {
            return Err(format!("expected a 2-D array, found shape {:?}", self.shape));
        };
        let values: Vec<i8> = match &self.data {
            ArrayData::Int(v) => v.iter().map(|x| *x as i8).collect(),
            ArrayData::UInt(v) => v.iter().map(|x| *x as i8).collect(),
            ArrayData::Float(v) => v.iter().map(|x| *x as i64 as i8).collect(),
            ArrayData::Bool(v) => v.iter().map(|x| i8::from(*x)).collect(),
            ArrayData::Text(_) => {
                return Err("text array cannot be a genotype matrix".to_string());
            }
        };
        let shape = (rows, cols).set_f(self.fortran_order);
        Array2::from_shape_vec(shape, values).map_err(|e| e.to_string())
    }
}

/// Genotype archive for one region, with every known field optional.
///
/// Rows of [`genotypes`](Self::genotypes) are samples, columns are SNPs, and
/// values are dosages in {-1 (missing), 0, 1, 2}. The range is a producer
/// invariant and is not enforced on load.
///
/// Both allele-label conventions are kept side by side when present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionArchive {
    pub genotypes: Option<Array2<i8>>,
    pub sample_ids: Option<Vec<String>>,
    pub snp_ids: Option<Vec<String>>,
    pub positions: Option<Vec<i64>>,
    pub minor_alleles: Option<Vec<String>>,
    pub major_alleles: Option<Vec<String>>,
    pub counted_alleles: Option<Vec<String>>,
    pub other_alleles: Option<Vec<String>>,
    /// Members with no dedicated slot (e.g. `chrom`), undecoded beyond dtype.
    pub extra: BTreeMap<String, RawArray>,
}

impl RegionArchive {
    /// Normalize decoded archive members. `path` only labels errors.
    pub fn from_fields(path: &Path, fields: BTreeMap<String, RawArray>) -> Result<Self> {
        let mut archive = RegionArchive::default();
        for (name, array) in fields {
            let field_err = |message: String| {
                DataioError::archive(path, format!("field '{name}': {message}"))
            };
            match name.as_str() {
                GENOTYPES_FIELD => {
                    archive.genotypes = Some(array.to_i8_matrix().map_err(field_err)?);
                }
                POSITIONS_FIELD => {
                    archive.positions = Some(array.to_i64().map_err(field_err)?);
                }
                SAMPLE_IDS_FIELD => archive.sample_ids = Some(array.to_text()),
                SNP_IDS_FIELD => archive.snp_ids = Some(array.to_text()),
                MINOR_ALLELES_FIELD => archive.minor_alleles = Some(array.to_text()),
                MAJOR_ALLELES_FIELD => archive.major_alleles = Some(array.to_text()),
                COUNTED_ALLELES_FIELD => archive.counted_alleles = Some(array.to_text()),
                OTHER_ALLELES_FIELD => archive.other_alleles = Some(array.to_text()),
                _ => {
                    archive.extra.insert(name, array);
                }
            }
        }
        Ok(archive)
    }

    /// `(samples, snps)` of the genotype matrix, if present.
    pub fn dims(&self) -> Option<(usize, usize)> {
        self.genotypes.as_ref().map(|g| g.dim())
    }

    pub fn has_minor_major(&self) -> bool {
        self.minor_alleles.is_some() && self.major_alleles.is_some()
    }

    pub fn has_counted_other(&self) -> bool {
        self.counted_alleles.is_some() && self.other_alleles.is_some()
    }

    /// Check per-sample and per-SNP lengths against the genotype matrix.
    ///
    /// Without a matrix there is nothing to check against and this succeeds.
    pub fn check_shape(&self) -> Result<()> {
        let Some((n_samples, n_snps)) = self.dims() else {
            return Ok(());
        };
        let per_sample = [(SAMPLE_IDS_FIELD, self.sample_ids.as_ref().map(Vec::len))];
        let per_snp = [
            (SNP_IDS_FIELD, self.snp_ids.as_ref().map(Vec::len)),
            (POSITIONS_FIELD, self.positions.as_ref().map(Vec::len)),
            (MINOR_ALLELES_FIELD, self.minor_alleles.as_ref().map(Vec::len)),
            (MAJOR_ALLELES_FIELD, self.major_alleles.as_ref().map(Vec::len)),
            (COUNTED_ALLELES_FIELD, self.counted_alleles.as_ref().map(Vec::len)),
            (OTHER_ALLELES_FIELD, self.other_alleles.as_ref().map(Vec::len)),
        ];
        let checks = per_sample
            .iter()
            .map(|(f, len)| (*f, *len, n_samples))
            .chain(per_snp.iter().map(|(f, len)| (*f, *len, n_snps)));
        for (field, len, expected) in checks {
            let Some(actual) = len else { continue };
            if actual != expected {
                return Err(DataioError::ShapeMismatch {
                    field: field.to_string(),
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Copy out the genotype rows at `indices`, in the given order.
    ///
    /// Negative indices count from the last row. Returns `None` when the
    /// archive has no genotype matrix.
    pub fn sample_rows(&self, indices: &[i64]) -> Result<Option<Array2<i8>>> {
        let Some(genotypes) = self.genotypes.as_ref() else {
            return Ok(None);
        };
        let n_rows = genotypes.nrows();
        let rows = indices
            .iter()
            .map(|&index| resolve_index(index, n_rows))
            .collect::<Result<Vec<_>>>()?;
        Ok(Some(genotypes.select(Axis(0), &rows)))
    }
}

fn resolve_index(index: i64, len: usize) -> Result<usize> {
    let out_of_bounds = || DataioError::IndexOutOfBounds { index, len };
    let len_i = i64::try_from(len).map_err(|_| out_of_bounds())?;
    let resolved = if index < 0 { index + len_i } else { index };
    if resolved < 0 || resolved >= len_i {
        return Err(out_of_bounds());
    }
    Ok(resolved as usize)
}
