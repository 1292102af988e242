use indexmap::IndexSet;
use log::{debug, info, warn};

use crate::auth::Token;
use crate::error::Result;

use super::client::GitLabClient;

/// High-level GitLab queries a publish run needs.
///
/// Wraps the REST client and flattens API payloads into the plain values
/// the run consumes: live branch names and secret values to scrub.
pub struct GitLabProvider {
    client: GitLabClient,
}

impl GitLabProvider {
    /// Creates a provider for the given GitLab instance.
    ///
    /// # Arguments
    ///
    /// * `base_url` - GitLab instance base URL (e.g., <https://gitlab.com>)
    /// * `token` - API token with read access to the project and its groups
    pub fn new(base_url: &str, token: Token) -> Result<Self> {
        Ok(Self {
            client: GitLabClient::new(base_url, token)?,
        })
    }

    /// Names of all branches currently present in the project.
    pub async fn branch_names(&self, project_id: &str) -> Result<Vec<String>> {
        let branches = self.client.list_branches(project_id).await?;
        info!("Project has {} live branches", branches.len());
        Ok(branches.into_iter().map(|b| b.name).collect())
    }

    /// Values of every CI/CD variable visible to the project.
    ///
    /// Project-level variables come first, then the variables of each
    /// group the project belongs to. Order is preserved so reports are
    /// scrubbed deterministically.
    pub async fn collect_secret_values(&self, project_id: &str) -> Result<IndexSet<String>> {
        let mut values = IndexSet::new();

        for variable in self.client.list_project_variables(project_id).await? {
            debug!("Collected project variable {}", variable.key);
            values.insert(variable.value);
        }

        let groups = self.client.list_project_groups(project_id).await?;
        info!("Project belongs to {} group(s)", groups.len());

        for group in groups {
            let id = group.id;
            let label = group.name.unwrap_or_else(|| id.to_string());
            for variable in self.client.list_group_variables(id).await? {
                debug!("Collected variable {} from group {label}", variable.key);
                values.insert(variable.value);
            }
        }

        if values.is_empty() {
            warn!("No CI/CD variables found; reports will be published unscrubbed");
        }

        Ok(values)
    }
}
