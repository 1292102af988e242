use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};

use crate::error::{PublishError, Result};

/// Turns a directory of raw test results into a browsable report.
///
/// Implemented by the Allure commandline wrapper; tests substitute their
/// own generator so no external binary is needed.
pub trait ReportGenerator {
    /// Generator name used in log output.
    fn name(&self) -> &str;

    /// Renders the report from `input_dir` into `output_dir`.
    fn generate(&self, input_dir: &Path, output_dir: &Path) -> Result<()>;
}

/// The Allure commandline, driven as an external process.
pub struct AllureCli {
    binary: PathBuf,
}

impl AllureCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Detects the installed Allure version, if the binary responds.
    pub fn version(&self) -> Option<String> {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .ok()
            .filter(|o| o.status.success())
            .and_then(|o| String::from_utf8(o.stdout).ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}

impl ReportGenerator for AllureCli {
    fn name(&self) -> &str {
        "allure"
    }

    fn generate(&self, input_dir: &Path, output_dir: &Path) -> Result<()> {
        info!(
            "Generating report from {} into {}",
            input_dir.display(),
            output_dir.display()
        );

        let mut cmd = Command::new(&self.binary);
        cmd.arg("generate").arg(input_dir).arg("-o").arg(output_dir);
        debug!("Running {cmd:?}");

        let status = cmd.status().map_err(|e| {
            PublishError::Generator(format!("failed to run {}: {e}", self.binary.display()))
        })?;

        if !status.success() {
            return Err(PublishError::Generator(format!(
                "{} generate exited with {status}",
                self.binary.display()
            )));
        }

        Ok(())
    }
}
