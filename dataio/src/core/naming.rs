//! Canonical file names for pipeline artifacts.
//!
//! These builders only produce names; [`crate::io::layout::Layout`] joins them
//! onto the right directory. Producer and consumer code must agree on every
//! string here byte for byte.

use std::path::PathBuf;

use crate::core::keys::{Method, Population, epsilon_token};
use crate::error::Result;

pub const COHORT_SPLIT_FILE: &str = "ceu_case_control_test_split.json";
pub const CROSS_POPULATION_COHORT_FILE: &str = "hapmap_CEU_control_test__YRI_case.json";
pub const MAF_REFERENCE_FILE: &str = "ceu_maf_reference.npz";

/// Name of the cohort field holding row indices into the CEU genotype matrix.
pub const INDICES_FIELD: &str = "indices_in_ceu_matrix";

/// `<region_name>.npz`, e.g. `CEU_chr2_5Mb.npz`.
pub fn region_archive_file(region_name: &str) -> String {
    format!("{region_name}.npz")
}

/// Raw HapMap release 27 genotype dump for one population and chromosome.
pub fn genotype_file(population: Population, chrom: u32) -> String {
    format!("genotypes_chr{chrom}_{population}_r27_nr.b36_fwd.txt.gz")
}

/// Region archive restricted to SNPs shared with `other_pop`.
///
/// Both codes are uppercased but not checked against the known populations.
pub fn aligned_region_file(pop: &str, region_tag: &str, other_pop: &str) -> String {
    format!(
        "{}_{region_tag}.common_with_{}.npz",
        pop.to_uppercase(),
        other_pop.to_uppercase()
    )
}

pub fn blocks_file(region_name: &str) -> String {
    format!("{region_name}.blocks.json")
}

pub fn control_haplotypes_file(region_name: &str, phased_compatible: bool) -> String {
    if phased_compatible {
        format!("{region_name}.control_haplotypes.phased_compatible.json")
    } else {
        format!("{region_name}.control_haplotypes.json")
    }
}

/// `eps_<token>` directory name for a method output variant.
pub fn epsilon_dir(eps: f64) -> Result<String> {
    Ok(format!("eps_{}", epsilon_token(eps)?))
}

/// Relative `<method>/eps_<token>` segment under the derived directory.
pub fn method_segment(method: Method, eps: f64) -> Result<PathBuf> {
    Ok(PathBuf::from(method.as_str()).join(epsilon_dir(eps)?))
}
