use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

use crate::config::{PublishArgs, RunContext};
use crate::generator::{AllureCli, ReportGenerator};
use crate::gitlab::GitLabProvider;
use crate::output;
use crate::publish;

#[derive(Parser)]
#[command(name = "allure-pages")]
#[command(author, version, about = "Allure Report Publisher for GitLab Pages", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish the current pipeline's Allure report to the Pages tree
    Publish(PublishArgs),
}

impl Cli {
    async fn execute_publish(&self, args: &PublishArgs) -> Result<()> {
        let ctx = RunContext::from_args(args.clone())?;
        info!(
            "Publishing {} for branch {} of {}",
            ctx.snapshot_name, ctx.branch, ctx.project_name
        );

        // API data comes first so a failing call cannot leave the
        // archive half-modified.
        let provider = GitLabProvider::new(&ctx.gitlab_base_url(), ctx.token.clone())?;
        let live_branches = provider.branch_names(&ctx.project_id).await?;
        let secrets = provider.collect_secret_values(&ctx.project_id).await?;

        let generator = AllureCli::new(&ctx.allure_bin);
        match generator.version() {
            Some(version) => info!("Using {} {version}", generator.name()),
            None => info!("{} version could not be detected", generator.name()),
        }

        let summary = publish::run_publish(&ctx, &live_branches, &secrets, &generator)?;

        output::print_summary(&summary);

        let json_output = if self.pretty {
            serde_json::to_string_pretty(&summary)?
        } else {
            serde_json::to_string(&summary)?
        };

        if let Some(output_path) = &self.output {
            std::fs::write(output_path, json_output)?;
            info!("Summary written to: {}", output_path.display());
        } else {
            println!("{}", json_output);
        }

        Ok(())
    }

    pub async fn execute(&self) -> Result<()> {
        match &self.command {
            Commands::Publish(args) => self.execute_publish(args).await,
        }
    }
}
