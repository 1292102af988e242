use std::fs;
use std::path::Path;

use log::info;

use crate::error::{PublishError, Result};
use crate::fsops;

/// Directory the report generator reads trend data from and writes it
/// back into every generated report.
pub const HISTORY_DIR: &str = "history";

/// Alias directory always pointing at the newest snapshot of a branch.
pub const LATEST_DIR: &str = "latest";

/// Copies the branch's accumulated `history/` into the generator input so
/// the new report continues the existing trend charts.
///
/// Returns `false` when the branch has no history yet (first publish).
pub fn seed_history(branch_dir: &Path, generator_input: &Path) -> Result<bool> {
    let source = branch_dir.join(HISTORY_DIR);
    if !source.is_dir() {
        info!("No history collected for this branch yet");
        return Ok(false);
    }

    info!("Seeding report history from {}", source.display());
    fsops::copy_tree(&source, &generator_input.join(HISTORY_DIR))?;
    Ok(true)
}

/// Publishes a generated report into the branch directory.
///
/// The report is copied to `<branch>/<snapshot_name>`, its `history/`
/// subtree is merged back into `<branch>/history` for the next run, and
/// the `latest` alias is replaced with a fresh copy of the report.
pub fn publish_snapshot(report_dir: &Path, branch_dir: &Path, snapshot_name: &str) -> Result<()> {
    fs::create_dir_all(branch_dir)
        .map_err(|e| PublishError::filesystem("create directory", branch_dir, e))?;

    let snapshot = branch_dir.join(snapshot_name);
    info!("Publishing report as {}", snapshot.display());
    fsops::copy_tree(report_dir, &snapshot)?;

    fsops::copy_tree(&report_dir.join(HISTORY_DIR), &branch_dir.join(HISTORY_DIR))?;

    let latest = branch_dir.join(LATEST_DIR);
    if latest.exists() {
        fsops::remove_entry(&latest)?;
    }
    fsops::copy_tree(report_dir, &latest)?;

    Ok(())
}
