use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("GitLab API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Report generator failed: {0}")]
    Generator(String),

    #[error("Filesystem error while trying to {op} {}: {source}", path.display())]
    Filesystem {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PublishError {
    /// Wraps an I/O error with the failed operation and the affected path.
    pub fn filesystem(op: &'static str, path: &Path, source: std::io::Error) -> Self {
        Self::Filesystem {
            op,
            path: path.to_path_buf(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, PublishError>;
