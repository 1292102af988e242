use std::collections::HashSet;
use std::fs;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use log::info;
use serde::Serialize;

use crate::config::RunContext;
use crate::error::{PublishError, Result};
use crate::executor::ExecutorInfo;
use crate::generator::ReportGenerator;
use crate::history;
use crate::index;
use crate::retention;
use crate::sanitize;
use crate::scrub;

/// File extensions scrubbed for secrets before a report goes public.
pub const SCRUB_EXTENSIONS: [&str; 3] = ["json", "html", "xml"];

/// Outcome of a publish run, for the terminal summary and JSON output.
#[derive(Debug, Serialize)]
pub struct PublishSummary {
    pub project: String,
    pub branch: String,
    pub snapshot: String,
    pub report_url: String,
    pub published_at: DateTime<Utc>,
    pub pruned_branches: Vec<String>,
    pub pruned_snapshots: Vec<String>,
    pub scrubbed_files: usize,
    pub snapshots_kept: usize,
}

/// Runs the whole publication sequence against prefetched API data.
///
/// Steps, in order: clear archive folders of deleted branches, seed trend
/// history and the executor block into the generator input, prune the
/// retention window, scrub secrets from the input, generate the report,
/// publish it into the branch tree and rebuild the directory indexes.
///
/// Branch names and secret values are fetched before this runs, so a
/// failing API call can never leave the archive half-modified.
pub fn run_publish(
    ctx: &RunContext,
    live_branches: &[String],
    secrets: &IndexSet<String>,
    generator: &dyn ReportGenerator,
) -> Result<PublishSummary> {
    fs::create_dir_all(&ctx.archive_root)
        .map_err(|e| PublishError::filesystem("create directory", &ctx.archive_root, e))?;

    info!("Live branches:");
    let live_slugs: HashSet<String> = live_branches
        .iter()
        .map(|name| {
            info!("> {name}");
            sanitize::branch_slug(name)
        })
        .collect();
    let pruned_branches = retention::prune_stale_branches(&ctx.archive_root, &live_slugs)?;

    history::seed_history(&ctx.branch_dir, &ctx.results_dir)?;

    info!("Writing executor info");
    ExecutorInfo::from_context(ctx).write_to(&ctx.results_dir)?;

    // The retention window must leave room for the snapshot published
    // below, so the budget here is one less than the configured keep.
    let budget = ctx.keep.saturating_sub(1);
    let pruned_snapshots: Vec<String> = retention::prune_old_snapshots(&ctx.branch_dir, budget)?
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();

    let mut scrubbed_files = 0;
    for extension in SCRUB_EXTENSIONS {
        scrubbed_files += scrub::scrub_tree(&ctx.results_dir, secrets, extension)?;
    }
    info!("Scrubbed {scrubbed_files} report files");

    generator.generate(&ctx.results_dir, &ctx.output_dir)?;

    history::publish_snapshot(&ctx.output_dir, &ctx.branch_dir, &ctx.snapshot_name)?;

    let root_label = index::folder_label(&ctx.archive_root, &ctx.archive_root, &ctx.site_label);
    index::rebuild_index(&ctx.archive_root, &root_label)?;
    let branch_label = index::folder_label(&ctx.branch_dir, &ctx.archive_root, &ctx.site_label);
    index::rebuild_index(&ctx.branch_dir, &branch_label)?;

    Ok(PublishSummary {
        project: ctx.project_name.clone(),
        branch: ctx.branch.clone(),
        snapshot: ctx.snapshot_name.clone(),
        report_url: ctx.report_url(),
        published_at: Utc::now(),
        pruned_branches,
        pruned_snapshots,
        scrubbed_files,
        snapshots_kept: retention::snapshot_count(&ctx.branch_dir)?,
    })
}
