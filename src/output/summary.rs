use std::fmt::Write;

use crate::publish::PublishSummary;

use super::styling::{bright, bright_green, bright_yellow, cyan, dim};

/// Prints a human-readable summary of the publish run to stderr.
///
/// Stderr keeps the panel visible in CI job logs while stdout stays
/// reserved for the JSON summary.
pub fn print_summary(summary: &PublishSummary) {
    eprintln!("{}", render_summary(summary));
}

fn add_section_header(output: &mut String, emoji: &str, title: &str) {
    let _ = writeln!(output, "{} {}", bright(emoji), bright(title).underlined());
}

#[allow(clippy::format_push_string)]
fn render_summary(summary: &PublishSummary) -> String {
    let mut output = String::new();

    add_section_header(&mut output, "📤", "Published");

    output.push_str(&format!(
        "  {} {}\n  {} {}\n  {} {}\n  {} {}\n",
        dim("Project:"),
        cyan(&summary.project),
        dim("Branch:"),
        cyan(&summary.branch),
        dim("Snapshot:"),
        bright_yellow(&summary.snapshot),
        dim("Report URL:"),
        bright_green(&summary.report_url),
    ));
    output.push_str(&format!(
        "  {} {}\n  {} {}\n  {} {}\n",
        dim("Snapshots kept:"),
        bright_yellow(summary.snapshots_kept),
        dim("Files scrubbed:"),
        bright_yellow(summary.scrubbed_files),
        dim("Published at:"),
        dim(summary.published_at.format("%Y-%m-%d %H:%M UTC")),
    ));

    if summary.pruned_branches.is_empty() && summary.pruned_snapshots.is_empty() {
        return output;
    }

    output.push('\n');
    add_section_header(&mut output, "🧹", "Pruned");
    if !summary.pruned_branches.is_empty() {
        output.push_str(&format!(
            "  {} {}\n",
            dim("Branches:"),
            cyan(summary.pruned_branches.join(", "))
        ));
    }
    if !summary.pruned_snapshots.is_empty() {
        output.push_str(&format!(
            "  {} {}\n",
            dim("Snapshots:"),
            cyan(summary.pruned_snapshots.join(", "))
        ));
    }

    output
}
