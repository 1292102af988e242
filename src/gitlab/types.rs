use serde::Deserialize;

/// A branch of the GitLab project.
///
/// Only the name is consumed; the archive keeps one folder per live
/// branch and this list decides which folders survive.
#[derive(Debug, Deserialize)]
pub struct Branch {
    /// Branch name as stored in the repository
    pub name: String,
}

/// A group the project belongs to, direct or inherited.
#[derive(Debug, Deserialize)]
pub struct ProjectGroup {
    /// Numeric group ID
    pub id: u64,
    /// Group name, absent on some self-managed instances
    #[serde(default)]
    pub name: Option<String>,
}

/// A CI/CD variable defined on a project or group.
#[derive(Debug, Deserialize)]
pub struct Variable {
    /// Variable key as shown in the CI/CD settings
    pub key: String,
    /// Raw variable value
    pub value: String,
}
