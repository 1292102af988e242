use std::env;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::auth::Token;
use crate::error::{PublishError, Result};
use crate::retention;
use crate::sanitize;

/// Arguments for the `publish` command.
///
/// Every value a GitLab CI job already exposes through a predefined
/// variable defaults to that variable, so a minimal `.gitlab-ci.yml`
/// invocation needs no flags at all.
#[derive(Args, Debug, Clone)]
pub struct PublishArgs {
    /// GitLab project ID or URL-encoded path
    #[arg(long, env = "CI_PROJECT_ID")]
    pub project_id: String,

    /// Project name, used as the first segment of the archive tree
    #[arg(long, env = "CI_PROJECT_NAME")]
    pub project_name: String,

    /// Pipeline ID naming the published snapshot
    #[arg(long, env = "CI_PIPELINE_ID")]
    pub pipeline_id: u64,

    /// Project-scoped pipeline IID, used as the Allure build order
    #[arg(long, env = "CI_PIPELINE_IID")]
    pub pipeline_iid: u64,

    /// Branch or tag name the report was built from
    #[arg(long = "ref", env = "CI_COMMIT_REF_NAME")]
    pub branch: String,

    /// GitLab instance host, without scheme
    #[arg(long, env = "CI_SERVER_HOST")]
    pub server_host: String,

    /// GitLab API token with read access to the project and its groups
    #[arg(long, env = "GITLAB_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Base URL of the project's Pages site
    #[arg(long, env = "CI_PAGES_URL")]
    pub pages_url: String,

    /// URL of the current pipeline, linked from the Allure executor block
    #[arg(long, env = "CI_PIPELINE_URL")]
    pub pipeline_url: String,

    /// Directory holding the raw Allure results of this run
    #[arg(long, env = "ALLURE_REPORTS")]
    pub results_dir: PathBuf,

    /// Number of snapshots to retain per branch, counting the new one
    #[arg(long, default_value_t = retention::DEFAULT_KEEP)]
    pub keep: usize,

    /// Allure commandline binary used to generate the report
    #[arg(long, default_value = "allure")]
    pub allure_bin: PathBuf,

    /// Label shown in the title of generated directory listings
    #[arg(long, default_value = "gitlab-allure-history")]
    pub site_label: String,
}

/// Resolved, immutable inputs of a publish run.
///
/// Built once at startup; every later step reads from here instead of
/// the process environment.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub project_id: String,
    pub project_name: String,
    pub pipeline_id: u64,
    pub pipeline_iid: u64,

    /// Branch name exactly as GitLab reports it.
    pub branch: String,

    /// Branch name after transliteration, safe as a path segment.
    pub branch_slug: String,

    pub server_host: String,
    pub token: Token,
    pub pages_url: String,
    pub pipeline_url: String,
    pub results_dir: PathBuf,
    pub keep: usize,
    pub allure_bin: PathBuf,
    pub site_label: String,

    /// Root of the Pages tree: `<workdir>/<project_name>/public`.
    pub archive_root: PathBuf,

    /// Archive subtree of the current branch.
    pub branch_dir: PathBuf,

    /// Name of the snapshot this run publishes, `pipeline_<id>`.
    pub snapshot_name: String,

    /// Directory the generator writes the new report into.
    pub output_dir: PathBuf,
}

impl RunContext {
    /// Resolves a context against the current working directory.
    pub fn from_args(args: PublishArgs) -> Result<Self> {
        let workdir = env::current_dir().map_err(|e| {
            PublishError::Config(format!("cannot determine working directory: {e}"))
        })?;
        Ok(Self::new(args, &workdir))
    }

    pub fn new(args: PublishArgs, workdir: &Path) -> Self {
        let branch_slug = sanitize::branch_slug(&args.branch);
        let archive_root = workdir.join(&args.project_name).join("public");
        let branch_dir = archive_root.join(&branch_slug);
        let snapshot_name = format!("pipeline_{}", args.pipeline_id);
        let output_dir = workdir.join(&snapshot_name);
        // join keeps absolute paths as-is and anchors relative ones.
        let results_dir = workdir.join(&args.results_dir);

        Self {
            project_id: args.project_id,
            project_name: args.project_name,
            pipeline_id: args.pipeline_id,
            pipeline_iid: args.pipeline_iid,
            branch: args.branch,
            branch_slug,
            server_host: args.server_host,
            token: Token::from(args.token),
            pages_url: args.pages_url,
            pipeline_url: args.pipeline_url,
            results_dir,
            keep: args.keep,
            allure_bin: args.allure_bin,
            site_label: args.site_label,
            archive_root,
            branch_dir,
            snapshot_name,
            output_dir,
        }
    }

    /// Base URL of the GitLab instance the job runs against.
    pub fn gitlab_base_url(&self) -> String {
        format!("https://{}", self.server_host)
    }

    /// Public URL the published snapshot will be reachable under.
    pub fn report_url(&self) -> String {
        format!(
            "{}/{}/{}/",
            self.pages_url, self.branch_slug, self.snapshot_name
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_args() -> PublishArgs {
        PublishArgs {
            project_id: "42".to_string(),
            project_name: "billing".to_string(),
            pipeline_id: 1388,
            pipeline_iid: 77,
            branch: "feature/тест".to_string(),
            server_host: "gitlab.example.com".to_string(),
            token: "glpat-secret".to_string(),
            pages_url: "https://group.pages.example.com/billing".to_string(),
            pipeline_url: "https://gitlab.example.com/group/billing/-/pipelines/1388".to_string(),
            results_dir: PathBuf::from("allure-results"),
            keep: 10,
            allure_bin: PathBuf::from("allure"),
            site_label: "gitlab-allure-history".to_string(),
        }
    }

    #[test]
    fn test_context_derives_archive_layout() {
        let workdir = Path::new("/builds/group/billing");
        let ctx = RunContext::new(sample_args(), workdir);

        assert_eq!(ctx.branch_slug, "feature_test");
        assert_eq!(
            ctx.archive_root,
            Path::new("/builds/group/billing/billing/public")
        );
        assert_eq!(
            ctx.branch_dir,
            Path::new("/builds/group/billing/billing/public/feature_test")
        );
        assert_eq!(ctx.snapshot_name, "pipeline_1388");
        assert_eq!(
            ctx.output_dir,
            Path::new("/builds/group/billing/pipeline_1388")
        );
        assert_eq!(
            ctx.results_dir,
            Path::new("/builds/group/billing/allure-results")
        );
    }

    #[test]
    fn test_context_urls() {
        let ctx = RunContext::new(sample_args(), Path::new("/builds"));

        assert_eq!(ctx.gitlab_base_url(), "https://gitlab.example.com");
        assert_eq!(
            ctx.report_url(),
            "https://group.pages.example.com/billing/feature_test/pipeline_1388/"
        );
    }

    #[test]
    fn test_context_debug_does_not_leak_token() {
        let ctx = RunContext::new(sample_args(), Path::new("/builds"));
        let debug = format!("{ctx:?}");

        assert!(!debug.contains("glpat-secret"));
        assert!(debug.contains("Token(****)"));
    }
}
