use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{PublishError, Result};

use super::types::{Branch, ProjectGroup, Variable};

/// Page size for list endpoints.
const PAGE_SIZE: usize = 50;

/// Thin client for the GitLab REST API (v4).
pub struct GitLabClient {
    client: Client,
    api_url: Url,
    token: Token,
}

impl GitLabClient {
    pub fn new(base_url: &str, token: Token) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("allure-pages/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PublishError::Config(format!("Failed to create HTTP client: {e}")))?;

        let api_url = Url::parse(base_url)
            .map_err(|e| PublishError::Config(format!("Invalid base URL: {e}")))?
            .join("api/v4/")
            .map_err(|e| PublishError::Config(format!("Invalid API base URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            token,
        })
    }

    /// All branches currently present in the project.
    pub async fn list_branches(&self, project_id: &str) -> Result<Vec<Branch>> {
        self.get_paginated(&format!(
            "projects/{}/repository/branches",
            urlencoding::encode(project_id)
        ))
        .await
    }

    /// CI/CD variables defined directly on the project.
    pub async fn list_project_variables(&self, project_id: &str) -> Result<Vec<Variable>> {
        self.get_paginated(&format!(
            "projects/{}/variables",
            urlencoding::encode(project_id)
        ))
        .await
    }

    /// Groups the project belongs to, ancestors included.
    pub async fn list_project_groups(&self, project_id: &str) -> Result<Vec<ProjectGroup>> {
        self.get_paginated(&format!(
            "projects/{}/groups",
            urlencoding::encode(project_id)
        ))
        .await
    }

    /// CI/CD variables defined on a group.
    pub async fn list_group_variables(&self, group_id: u64) -> Result<Vec<Variable>> {
        self.get_paginated(&format!("groups/{group_id}/variables"))
            .await
    }

    /// Fetches every page of a list endpoint.
    ///
    /// GitLab caps `per_page` at 100; a page shorter than the requested
    /// size marks the end of the collection.
    async fn get_paginated<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let url = self
            .api_url
            .join(path)
            .map_err(|e| PublishError::Config(format!("Invalid API path: {e}")))?;

        let mut items = Vec::new();
        let mut page = 1usize;

        loop {
            let response = self
                .client
                .get(url.clone())
                .query(&[
                    ("page", page.to_string()),
                    ("per_page", PAGE_SIZE.to_string()),
                ])
                .bearer_auth(self.token.as_str())
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(PublishError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let batch: Vec<T> = response.json().await?;
            let batch_len = batch.len();
            items.extend(batch);

            if batch_len < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn page_query(page: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("page".into(), page.into()),
            Matcher::UrlEncoded("per_page".into(), "50".into()),
        ])
    }

    #[tokio::test]
    async fn test_list_branches_sends_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/projects/42/repository/branches")
            .match_query(page_query("1"))
            .match_header("authorization", "Bearer glpat-test")
            .with_header("content-type", "application/json")
            .with_body(r#"[{"name": "main"}, {"name": "feature/тест"}]"#)
            .create_async()
            .await;

        let client = GitLabClient::new(&server.url(), Token::from("glpat-test")).unwrap();
        let branches = client.list_branches("42").await.unwrap();

        mock.assert_async().await;
        let names: Vec<_> = branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["main", "feature/тест"]);
    }

    #[tokio::test]
    async fn test_project_path_is_url_encoded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v4/projects/group%2Fbilling/variables")
            .match_query(page_query("1"))
            .with_header("content-type", "application/json")
            .with_body(r#"[{"key": "API_KEY", "value": "S3CR3T!!"}]"#)
            .create_async()
            .await;

        let client = GitLabClient::new(&server.url(), Token::from("t")).unwrap();
        let variables = client.list_project_variables("group/billing").await.unwrap();

        mock.assert_async().await;
        assert_eq!(variables.len(), 1);
        assert_eq!(variables[0].key, "API_KEY");
        assert_eq!(variables[0].value, "S3CR3T!!");
    }

    #[tokio::test]
    async fn test_pagination_walks_every_page() {
        let full_page: Vec<_> = (0..50)
            .map(|i| serde_json::json!({"name": format!("branch-{i}")}))
            .collect();

        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("GET", "/api/v4/projects/42/repository/branches")
            .match_query(page_query("1"))
            .with_header("content-type", "application/json")
            .with_body(serde_json::to_string(&full_page).unwrap())
            .create_async()
            .await;
        let second = server
            .mock("GET", "/api/v4/projects/42/repository/branches")
            .match_query(page_query("2"))
            .with_header("content-type", "application/json")
            .with_body(r#"[{"name": "tail-1"}, {"name": "tail-2"}]"#)
            .create_async()
            .await;

        let client = GitLabClient::new(&server.url(), Token::from("t")).unwrap();
        let branches = client.list_branches("42").await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(branches.len(), 52);
        assert_eq!(branches[51].name, "tail-2");
    }

    #[tokio::test]
    async fn test_error_status_surfaces_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v4/groups/7/variables")
            .match_query(page_query("1"))
            .with_status(403)
            .with_body(r#"{"message": "403 Forbidden"}"#)
            .create_async()
            .await;

        let client = GitLabClient::new(&server.url(), Token::from("t")).unwrap();
        let err = client.list_group_variables(7).await.unwrap_err();

        match err {
            PublishError::Api { status, message } => {
                assert_eq!(status, 403);
                assert!(message.contains("Forbidden"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}
