use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::config::RunContext;
use crate::error::{PublishError, Result};

/// File name Allure expects the executor block under, inside the
/// generator input directory.
pub const EXECUTOR_FILE: &str = "executor.json";

/// Executor metadata Allure renders on the report's front page and uses
/// to link trend entries back to CI runs.
///
/// Field names follow the Allure executor schema.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub report_name: String,
    pub report_url: String,
    pub build_url: String,
    pub build_name: String,
    /// Pipeline sequence number; Allure accepts it as a string.
    pub build_order: String,
}

impl ExecutorInfo {
    pub fn from_context(ctx: &RunContext) -> Self {
        Self {
            name: "GitLabCI".to_string(),
            kind: "gitlab".to_string(),
            report_name: "Allure Report with history".to_string(),
            report_url: ctx.report_url(),
            build_url: ctx.pipeline_url.clone(),
            build_name: format!("GitLab Job Run {}", ctx.pipeline_id),
            build_order: ctx.pipeline_iid.to_string(),
        }
    }

    /// Writes the executor block as `executor.json` into `dir`.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        let path = dir.join(EXECUTOR_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).map_err(|e| PublishError::filesystem("write", &path, e))
    }
}
