//! Batch orchestration.
//!
//! Discovers fragment directories for merge batches and content-store
//! target directories for reconcile batches, then drives the core over
//! them. Discovery is sorted by name so every run processes the same
//! stable order; within one merge batch that order is correctness-
//! relevant, since later fragments can match nodes grafted earlier.

use crate::artifact;
use crate::config::MigrationConfig;
use crate::error::{ArtifactError, MigrateError};
use crate::extract::{LinkReferenceExtractor, UrlKeyIndex};
use crate::reconcile::{reconcile, ReconciliationReport};
use crate::tree::merger::{HierarchyMerger, MergeBatchReport};
use crate::tree::HierarchyNode;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Outcome of a multi-target reconcile batch.
#[derive(Debug)]
pub struct BatchOutcome {
    /// Reports for every target that ran, in processing order.
    pub results: Vec<(String, ReconciliationReport)>,
    /// Target whose hard failure aborted the batch, if any. Its report is
    /// the last entry of `results`.
    pub aborted_at: Option<String>,
}

impl BatchOutcome {
    pub fn all_passed(&self) -> bool {
        self.aborted_at.is_none() && self.results.iter().all(|(_, report)| report.verdict)
    }
}

/// Collect fragment (name, tree) pairs from the subdirectories of
/// `fragments_dir`, sorted by directory name. Subdirectories without a
/// tree artifact are not fragments and are skipped with a diagnostic;
/// a malformed tree artifact aborts the whole batch.
pub fn discover_fragments(
    fragments_dir: &Path,
    config: &MigrationConfig,
) -> Result<Vec<(String, HierarchyNode)>, MigrateError> {
    let mut fragments = Vec::new();
    for entry in sorted_subdirectories(fragments_dir)? {
        let tree_path = entry.join(&config.fragment_tree_file);
        if !tree_path.is_file() {
            warn!(dir = %entry.display(), "no tree artifact in directory; not a fragment");
            continue;
        }
        let name = directory_name(&entry);
        let tree = artifact::load_tree(&tree_path)?;
        fragments.push((name, tree));
    }
    Ok(fragments)
}

/// Merge every fragment under `fragments_dir` into the parent tree and
/// write the result to `out_path`.
///
/// The parent input is never overwritten: `out_path` must be a new
/// location, and nothing at all is written when zero merges succeed, so a
/// failed batch cannot masquerade as a merged artifact.
pub fn run_merge(
    parent_path: &Path,
    fragments_dir: &Path,
    out_path: &Path,
    config: &MigrationConfig,
) -> Result<MergeBatchReport, MigrateError> {
    if out_path == parent_path {
        return Err(MigrateError::Config(
            "merge output must be a new location, not the parent input".to_string(),
        ));
    }

    let mut parent = artifact::load_tree(parent_path)?;
    let fragments = discover_fragments(fragments_dir, config)?;
    if fragments.is_empty() {
        return Err(MigrateError::NoMergesSucceeded);
    }

    let merger = HierarchyMerger::new(config.clone());
    let report = merger.merge_batch(&mut parent, &fragments);
    if !report.any_merged() {
        return Err(MigrateError::NoMergesSucceeded);
    }

    artifact::write_tree(out_path, &parent)?;
    info!(
        merged = report.merged.len(),
        skipped = report.skipped.len(),
        out = %out_path.display(),
        "merged tree written"
    );
    Ok(report)
}

/// Load and extract the three link indexes for one target directory.
pub fn load_target_indexes(
    target_dir: &Path,
    config: &MigrationConfig,
) -> Result<(UrlKeyIndex, UrlKeyIndex, UrlKeyIndex), MigrateError> {
    let extractor = LinkReferenceExtractor::new(config);
    let load = |file: &str| -> Result<UrlKeyIndex, MigrateError> {
        let value = artifact::load_value(&target_dir.join(file))?;
        Ok(extractor.extract(&value))
    };
    let primary = load(&config.sources.primary)?;
    let secondary = load(&config.sources.secondary)?;
    let target = load(&config.sources.target)?;
    Ok((primary, secondary, target))
}

/// Reconcile one target directory.
pub fn run_reconcile(
    target_dir: &Path,
    config: &MigrationConfig,
) -> Result<ReconciliationReport, MigrateError> {
    let (primary, secondary, target) = load_target_indexes(target_dir, config)?;
    Ok(reconcile(&primary, &secondary, &target))
}

/// Reconcile every target directory under `root`, in name order.
///
/// A hard failure (count mismatch) aborts the remaining targets
/// immediately; soft presence failures are recorded and the batch
/// continues. A missing or malformed source artifact is a hard stop too.
pub fn run_reconcile_batch(
    root: &Path,
    config: &MigrationConfig,
) -> Result<BatchOutcome, MigrateError> {
    let mut outcome = BatchOutcome {
        results: Vec::new(),
        aborted_at: None,
    };
    for target_dir in discover_targets(root, config)? {
        let name = directory_name(&target_dir);
        let report = run_reconcile(&target_dir, config)?;
        let hard_failure = report.has_hard_failure();
        outcome.results.push((name.clone(), report));
        if hard_failure {
            warn!(target = %name, "hard reconciliation failure; aborting remaining targets");
            outcome.aborted_at = Some(name);
            break;
        }
    }
    Ok(outcome)
}

/// A subdirectory of `root` is a reconcile target when it holds the
/// primary source artifact; the other two artifacts are then required and
/// their absence is a hard failure, not a skip.
fn discover_targets(
    root: &Path,
    config: &MigrationConfig,
) -> Result<Vec<PathBuf>, MigrateError> {
    let targets = sorted_subdirectories(root)?
        .into_iter()
        .filter(|dir| dir.join(&config.sources.primary).is_file())
        .collect();
    Ok(targets)
}

fn sorted_subdirectories(root: &Path) -> Result<Vec<PathBuf>, MigrateError> {
    if !root.is_dir() {
        return Err(ArtifactError::missing(root).into());
    }
    let mut dirs: Vec<PathBuf> = WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_dir())
        .map(|entry| entry.into_path())
        .collect();
    dirs.sort();
    Ok(dirs)
}

fn directory_name(dir: &Path) -> String {
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}
