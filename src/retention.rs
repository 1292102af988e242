use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use log::info;

use crate::error::{PublishError, Result};
use crate::fsops;

/// Snapshot directories are named `pipeline_<id>`.
pub const SNAPSHOT_PREFIX: &str = "pipeline_";

/// Default number of snapshots retained per branch, counting the one the
/// current run is about to publish.
pub const DEFAULT_KEEP: usize = 10;

/// Deletes every directory directly under `archive_root` that does not
/// belong to a live upstream branch.
///
/// `live_slugs` holds sanitized branch names; archive subdirectories were
/// created by the same sanitizer, so names compare directly. Non-directory
/// entries (the root `index.html`) and the root itself are never touched.
/// A failed deletion aborts the run. Returns the removed names, sorted.
pub fn prune_stale_branches(
    archive_root: &Path,
    live_slugs: &HashSet<String>,
) -> Result<Vec<String>> {
    let entries = fs::read_dir(archive_root)
        .map_err(|e| PublishError::filesystem("read directory", archive_root, e))?;

    let mut removed = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| PublishError::filesystem("read directory", archive_root, e))?;

        let file_type = entry
            .file_type()
            .map_err(|e| PublishError::filesystem("inspect", &entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().into_owned();
        if !live_slugs.contains(&name) {
            info!("Deleting stale branch folder: {name}");
            fsops::remove_tree(&entry.path())?;
            removed.push(name);
        }
    }

    removed.sort();
    Ok(removed)
}

/// Deletes the oldest snapshots in `branch_dir` until at most `keep`
/// remain.
///
/// Snapshots are ordered by modification time, so the `keep` most recently
/// written ones always survive. No-op when the branch directory does not
/// exist yet or holds no more than `keep` snapshots. Returns the removed
/// paths, oldest first.
pub fn prune_old_snapshots(branch_dir: &Path, keep: usize) -> Result<Vec<PathBuf>> {
    if !branch_dir.exists() {
        return Ok(Vec::new());
    }

    let mut snapshots = snapshot_entries(branch_dir)?;
    if snapshots.len() <= keep {
        return Ok(Vec::new());
    }

    let cutoff = snapshots.len() - keep;
    let mut removed = Vec::new();
    for (_, path) in snapshots.drain(..cutoff) {
        info!("Removing old snapshot: {}", path.display());
        fsops::remove_tree(&path)?;
        removed.push(path);
    }

    Ok(removed)
}

/// Number of snapshot directories currently present in `branch_dir`.
pub fn snapshot_count(branch_dir: &Path) -> Result<usize> {
    if !branch_dir.exists() {
        return Ok(0);
    }
    Ok(snapshot_entries(branch_dir)?.len())
}

fn snapshot_entries(branch_dir: &Path) -> Result<Vec<(SystemTime, PathBuf)>> {
    let entries = fs::read_dir(branch_dir)
        .map_err(|e| PublishError::filesystem("read directory", branch_dir, e))?;

    let mut snapshots = Vec::new();
    for entry in entries {
        let entry =
            entry.map_err(|e| PublishError::filesystem("read directory", branch_dir, e))?;

        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if !name.starts_with(SNAPSHOT_PREFIX) {
            continue;
        }

        let file_type = entry
            .file_type()
            .map_err(|e| PublishError::filesystem("inspect", &entry.path(), e))?;
        if !file_type.is_dir() {
            continue;
        }

        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .map_err(|e| PublishError::filesystem("inspect", &entry.path(), e))?;
        snapshots.push((modified, entry.path()));
    }

    snapshots.sort_by_key(|(modified, _)| *modified);
    Ok(snapshots)
}
