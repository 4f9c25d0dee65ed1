//! Command-line access to the HapMap data layout.
//!
//! Resolves the project root (or takes `--root`), prints canonical paths,
//! creates the directory tree, checks for required files and summarizes
//! archives and cohort splits.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dataio::core::keys::Group;
use dataio::error::DataioError;
use dataio::exit_codes;
use dataio::io::archive::load_region_archive;
use dataio::io::check::{assert_exists, write_layout_summary};
use dataio::io::cohort::load_cohorts_or_default;
use dataio::io::config::{config_path, load_config};
use dataio::io::layout::Layout;
use dataio::logging;

#[derive(Parser)]
#[command(
    name = "dataio",
    version,
    about = "Locate and inspect HapMap pipeline data"
)]
struct Cli {
    /// Project root. Discovered from the working directory when omitted.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print where the project expects inputs and outputs.
    Layout,
    /// Create every data directory (idempotent).
    EnsureDirs,
    /// Print one canonical artifact path.
    Path {
        #[command(subcommand)]
        kind: PathKind,
    },
    /// Check that files exist; falls back to `required_files` in dataio.toml.
    Check {
        /// Paths to check, relative to the project root unless absolute.
        paths: Vec<PathBuf>,
        #[arg(long, default_value = "FILE EXISTENCE CHECK")]
        label: String,
    },
    /// Summarize the fields of a region archive and verify their lengths.
    Inspect { archive: PathBuf },
    /// Print a cohort group's matrix indices as a JSON array.
    Indices {
        /// One of case, control, test.
        group: String,
        /// Cohort file. Defaults to the canonical case/control/test split.
        #[arg(long)]
        cohorts: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum PathKind {
    Region {
        name: String,
    },
    Cohorts,
    CrossCohorts,
    Genotype {
        pop: String,
        chrom: u32,
    },
    Aligned {
        pop: String,
        region_tag: String,
        other_pop: String,
    },
    Blocks {
        name: String,
    },
    Haplotypes {
        name: String,
        /// Select the file not restricted to phased-compatible SNPs.
        #[arg(long)]
        unphased: bool,
    },
    Maf,
    /// Method output directory; created if missing.
    Method {
        method: String,
        eps: f64,
    },
}

fn main() {
    logging::init();
    let code = match run() {
        Ok(()) => exit_codes::OK,
        Err(err) => {
            eprintln!("{:#}", err);
            exit_code(&err)
        }
    };
    std::process::exit(code);
}

fn exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<DataioError>() {
        Some(DataioError::MissingRequiredFiles { .. }) => exit_codes::MISSING_FILES,
        _ => exit_codes::INVALID,
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let layout = || -> Result<Layout> {
        match &cli.root {
            Some(root) => Ok(Layout::new(root)),
            None => Layout::discover().context("resolve project root"),
        }
    };
    let mut out = io::stdout().lock();
    match &cli.command {
        Command::Layout => write_layout_summary(&layout()?, &mut out)?,
        Command::EnsureDirs => layout()?.ensure_all()?,
        Command::Path { kind } => {
            let path = resolve_path(&layout()?, kind)?;
            writeln!(out, "{}", path.display())?;
        }
        Command::Check { paths, label } => cmd_check(&layout()?, paths, label, &mut out)?,
        Command::Inspect { archive } => cmd_inspect(archive, &mut out)?,
        Command::Indices { group, cohorts } => {
            let group: Group = group.parse()?;
            let doc = load_cohorts_or_default(&layout()?, cohorts.as_deref())?;
            let indices = doc.group_indices(group)?;
            writeln!(out, "{}", serde_json::to_string(&indices)?)?;
        }
    }
    Ok(())
}

fn resolve_path(layout: &Layout, kind: &PathKind) -> Result<PathBuf> {
    let path = match kind {
        PathKind::Region { name } => layout.region_archive_path(name),
        PathKind::Cohorts => layout.cohort_split_path(),
        PathKind::CrossCohorts => layout.cross_population_cohort_path(),
        PathKind::Genotype { pop, chrom } => layout.genotype_path(pop, *chrom)?,
        PathKind::Aligned {
            pop,
            region_tag,
            other_pop,
        } => layout.aligned_region_path(pop, region_tag, other_pop),
        PathKind::Blocks { name } => layout.blocks_path(name),
        PathKind::Haplotypes { name, unphased } => layout.control_haplotypes_path(name, !unphased),
        PathKind::Maf => layout.maf_reference_path(),
        PathKind::Method { method, eps } => layout.method_dir(method, *eps)?,
    };
    Ok(path)
}

fn cmd_check(layout: &Layout, paths: &[PathBuf], label: &str, out: &mut impl Write) -> Result<()> {
    let targets = if paths.is_empty() {
        let cfg_path = config_path(&layout.root);
        let cfg = load_config(&cfg_path)?;
        if cfg.required_files.is_empty() {
            anyhow::bail!(
                "no paths given and no required_files in {}",
                cfg_path.display()
            );
        }
        cfg.required_paths(&layout.root)
    } else {
        paths.iter().map(|p| layout.root.join(p)).collect()
    };
    assert_exists(&layout.root, &targets, label, out)?;
    Ok(())
}

fn cmd_inspect(path: &Path, out: &mut impl Write) -> Result<()> {
    let archive = load_region_archive(path)?;
    writeln!(out, "archive: {}", path.display())?;
    match archive.dims() {
        Some((samples, snps)) => writeln!(out, "G: {samples} samples x {snps} snps")?,
        None => writeln!(out, "G: absent")?,
    }
    let columns = [
        ("sample_ids", archive.sample_ids.as_ref().map(Vec::len)),
        ("snp_ids", archive.snp_ids.as_ref().map(Vec::len)),
        ("positions", archive.positions.as_ref().map(Vec::len)),
        ("minor_alleles", archive.minor_alleles.as_ref().map(Vec::len)),
        ("major_alleles", archive.major_alleles.as_ref().map(Vec::len)),
        ("counted_alleles", archive.counted_alleles.as_ref().map(Vec::len)),
        ("other_alleles", archive.other_alleles.as_ref().map(Vec::len)),
    ];
    for (name, len) in columns {
        match len {
            Some(len) => writeln!(out, "{name}: {len}")?,
            None => writeln!(out, "{name}: absent")?,
        }
    }
    for (name, array) in &archive.extra {
        writeln!(out, "{name}: {} {:?}", array.data.kind(), array.shape)?;
    }
    archive
        .check_shape()
        .with_context(|| format!("inspect {}", path.display()))?;
    writeln!(out, "shape: ok")?;
    Ok(())
}
