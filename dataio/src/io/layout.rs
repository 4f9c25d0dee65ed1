//! Canonical `data/` layout under a project root.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::root::resolve_root;
use crate::core::keys::{Method, Population};
use crate::core::naming;
use crate::error::{DataioError, Result};

/// All canonical data directories for a project root.
///
/// Construction is pure path joining. Nothing touches the filesystem until
/// [`Layout::ensure_all`] or [`Layout::method_dir`] is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub raw_dir: PathBuf,
    pub raw_genotypes_dir: PathBuf,
    pub raw_phasing_dir: PathBuf,
    pub raw_phasing_meta_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub processed_regions_dir: PathBuf,
    pub processed_cohorts_dir: PathBuf,
    pub processed_blocks_dir: PathBuf,
    pub processed_haplotypes_dir: PathBuf,
    pub derived_dir: PathBuf,
    pub derived_method1_dir: PathBuf,
    pub derived_method2_dir: PathBuf,
    pub derived_method3_dir: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let data_dir = root.join("data");
        let raw_dir = data_dir.join("raw").join("hapmap");
        let processed_dir = data_dir.join("processed").join("hapmap");
        let derived_dir = data_dir.join("derived");
        Self {
            root: root.clone(),
            data_dir: data_dir.clone(),
            raw_dir: raw_dir.clone(),
            raw_genotypes_dir: raw_dir.join("genotypes"),
            raw_phasing_dir: raw_dir
                .join("phasing")
                .join("HapMap3_r2")
                .join("CEU")
                .join("UNRELATED"),
            raw_phasing_meta_dir: raw_dir.join("phasing").join("HapMap3_r2_meta"),
            processed_dir: processed_dir.clone(),
            processed_regions_dir: processed_dir.join("regions"),
            processed_cohorts_dir: processed_dir.join("cohorts"),
            processed_blocks_dir: processed_dir.join("blocks"),
            processed_haplotypes_dir: processed_dir.join("haplotypes"),
            derived_dir: derived_dir.clone(),
            derived_method1_dir: derived_dir.join(Method::Method1.as_str()),
            derived_method2_dir: derived_dir.join(Method::Method2.as_str()),
            derived_method3_dir: derived_dir.join(Method::Method3.as_str()),
        }
    }

    /// Layout rooted at the project root found from the working directory.
    pub fn discover() -> Result<Self> {
        Ok(Self::new(resolve_root()?))
    }

    /// Leaf directories created by [`Layout::ensure_all`].
    pub fn directories(&self) -> [&Path; 10] {
        [
            &self.raw_genotypes_dir,
            &self.raw_phasing_dir,
            &self.raw_phasing_meta_dir,
            &self.processed_regions_dir,
            &self.processed_cohorts_dir,
            &self.processed_blocks_dir,
            &self.processed_haplotypes_dir,
            &self.derived_method1_dir,
            &self.derived_method2_dir,
            &self.derived_method3_dir,
        ]
    }

    /// Create every catalog directory with its parents.
    ///
    /// Existing directories and their contents are left alone, so repeated
    /// calls are no-ops.
    pub fn ensure_all(&self) -> Result<()> {
        debug!(root = %self.root.display(), "ensuring data directories");
        for dir in self.directories() {
            create_dir(dir)?;
        }
        Ok(())
    }

    pub fn region_archive_path(&self, region_name: &str) -> PathBuf {
        self.processed_regions_dir
            .join(naming::region_archive_file(region_name))
    }

    pub fn cohort_split_path(&self) -> PathBuf {
        self.processed_cohorts_dir.join(naming::COHORT_SPLIT_FILE)
    }

    pub fn cross_population_cohort_path(&self) -> PathBuf {
        self.processed_cohorts_dir
            .join(naming::CROSS_POPULATION_COHORT_FILE)
    }

    /// Raw genotype dump for `pop` (case-insensitive CEU or YRI) on `chrom`.
    pub fn genotype_path(&self, pop: &str, chrom: u32) -> Result<PathBuf> {
        let population: Population = pop.parse()?;
        Ok(self
            .raw_genotypes_dir
            .join(naming::genotype_file(population, chrom)))
    }

    pub fn aligned_region_path(&self, pop: &str, region_tag: &str, other_pop: &str) -> PathBuf {
        self.processed_regions_dir
            .join(naming::aligned_region_file(pop, region_tag, other_pop))
    }

    pub fn blocks_path(&self, region_name: &str) -> PathBuf {
        self.processed_blocks_dir
            .join(naming::blocks_file(region_name))
    }

    pub fn control_haplotypes_path(&self, region_name: &str, phased_compatible: bool) -> PathBuf {
        self.processed_haplotypes_dir
            .join(naming::control_haplotypes_file(region_name, phased_compatible))
    }

    pub fn maf_reference_path(&self) -> PathBuf {
        self.processed_dir.join(naming::MAF_REFERENCE_FILE)
    }

    /// `derived/<method>/eps_<token>` without creating it.
    pub fn method_output_path(&self, method: &str, eps: f64) -> Result<PathBuf> {
        let method: Method = method.parse()?;
        Ok(self.derived_dir.join(naming::method_segment(method, eps)?))
    }

    /// Output directory for `method` at privacy parameter `eps`, created on
    /// the way out. Validation happens before anything is created.
    pub fn method_dir(&self, method: &str, eps: f64) -> Result<PathBuf> {
        let out = self.method_output_path(method, eps)?;
        create_dir(&out)?;
        Ok(out)
    }
}

fn create_dir(path: &Path) -> Result<()> {
    debug!(dir = %path.display(), "create directory");
    fs::create_dir_all(path).map_err(|e| DataioError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing_dirs(root: &Path) -> Vec<PathBuf> {
        let mut out = Vec::new();
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in fs::read_dir(&dir).expect("read dir") {
                let path = entry.expect("entry").path();
                if path.is_dir() {
                    out.push(path.clone());
                    stack.push(path);
                }
            }
        }
        out.sort();
        out
    }

    #[test]
    fn layout_matches_producer_tree() {
        let layout = Layout::new("/proj");
        assert_eq!(
            layout.raw_genotypes_dir,
            Path::new("/proj/data/raw/hapmap/genotypes")
        );
        assert_eq!(
            layout.raw_phasing_dir,
            Path::new("/proj/data/raw/hapmap/phasing/HapMap3_r2/CEU/UNRELATED")
        );
        assert_eq!(
            layout.raw_phasing_meta_dir,
            Path::new("/proj/data/raw/hapmap/phasing/HapMap3_r2_meta")
        );
        assert_eq!(
            layout.processed_haplotypes_dir,
            Path::new("/proj/data/processed/hapmap/haplotypes")
        );
        assert_eq!(layout.derived_method2_dir, Path::new("/proj/data/derived/method2"));
    }

    #[test]
    fn construction_touches_nothing() {
        let temp = tempfile::tempdir().expect("tempdir");
        let _layout = Layout::new(temp.path());
        assert!(existing_dirs(temp.path()).is_empty());
    }

    #[test]
    fn ensure_all_creates_every_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let layout = Layout::new(temp.path());

        layout.ensure_all().expect("ensure");

        for dir in layout.directories() {
            assert!(dir.is_dir(), "{} missing", dir.display());
        }
    }

    /// Verifies ensure_all is idempotent and leaves existing files alone.
    #[test]
    fn ensure_all_twice_keeps_directories_and_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        let layout = Layout::new(temp.path());
        layout.ensure_all().expect("first ensure");
        let stray = layout.processed_regions_dir.join("CEU_chr2_5Mb.npz");
        fs::write(&stray, b"payload").expect("write stray");
        let before = existing_dirs(temp.path());

        layout.ensure_all().expect("second ensure");

        assert_eq!(existing_dirs(temp.path()), before);
        assert_eq!(fs::read(&stray).expect("read stray"), b"payload");
    }

    #[test]
    fn genotype_path_is_pure_and_case_insensitive() {
        let temp = tempfile::tempdir().expect("tempdir");
        let layout = Layout::new(temp.path());

        let upper = layout.genotype_path("CEU", 2).expect("path");
        let lower = layout.genotype_path("ceu", 2).expect("path");
        assert_eq!(upper, lower);
        assert_eq!(
            upper,
            layout
                .raw_genotypes_dir
                .join("genotypes_chr2_CEU_r27_nr.b36_fwd.txt.gz")
        );
        assert!(existing_dirs(temp.path()).is_empty());
    }

    #[test]
    fn genotype_path_rejects_unknown_population() {
        let layout = Layout::new("/proj");
        let err = layout.genotype_path("CHB", 2).unwrap_err();
        assert!(matches!(err, DataioError::InvalidPopulation { ref value } if value == "CHB"));
    }

    #[test]
    fn artifact_paths_land_in_their_directories() {
        let layout = Layout::new("/proj");
        assert_eq!(
            layout.region_archive_path("CEU_chr10_1Mb"),
            Path::new("/proj/data/processed/hapmap/regions/CEU_chr10_1Mb.npz")
        );
        assert_eq!(
            layout.cohort_split_path(),
            Path::new("/proj/data/processed/hapmap/cohorts/ceu_case_control_test_split.json")
        );
        assert_eq!(
            layout.cross_population_cohort_path(),
            Path::new("/proj/data/processed/hapmap/cohorts/hapmap_CEU_control_test__YRI_case.json")
        );
        assert_eq!(
            layout.aligned_region_path("yri", "chr2_5Mb", "ceu"),
            Path::new("/proj/data/processed/hapmap/regions/YRI_chr2_5Mb.common_with_CEU.npz")
        );
        assert_eq!(
            layout.blocks_path("CEU_chr2_5Mb"),
            Path::new("/proj/data/processed/hapmap/blocks/CEU_chr2_5Mb.blocks.json")
        );
        assert_eq!(
            layout.control_haplotypes_path("CEU_chr2_5Mb", false),
            Path::new("/proj/data/processed/hapmap/haplotypes/CEU_chr2_5Mb.control_haplotypes.json")
        );
        assert_eq!(
            layout.maf_reference_path(),
            Path::new("/proj/data/processed/hapmap/ceu_maf_reference.npz")
        );
    }

    #[test]
    fn method_dir_encodes_epsilon_and_creates_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let layout = Layout::new(temp.path());

        let dir = layout.method_dir("method1", 0.1).expect("method dir");
        assert!(dir.ends_with("method1/eps_0_1"));
        assert!(dir.is_dir());

        let dir = layout.method_dir("method1", 10.0).expect("method dir");
        assert!(dir.ends_with("method1/eps_10"));
        assert!(dir.is_dir());
    }

    #[test]
    fn method_dir_rejects_unknown_method_before_creating_anything() {
        let temp = tempfile::tempdir().expect("tempdir");
        let layout = Layout::new(temp.path());

        let err = layout.method_dir("method9", 1.0).unwrap_err();
        assert!(matches!(err, DataioError::InvalidMethod { .. }));
        assert!(existing_dirs(temp.path()).is_empty());

        let err = layout.method_dir("method1", -1.0).unwrap_err();
        assert!(matches!(err, DataioError::InvalidEpsilon { .. }));
        assert!(existing_dirs(temp.path()).is_empty());
    }
}
