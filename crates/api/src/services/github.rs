//! GitHub issue creation for bug reports and feature requests.
//!
//! Feedback that warrants tracking is mirrored into the project's issue
//! tracker. The service is optional: without a token it reports itself as
//! unconfigured and callers skip issue creation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

use crate::config::GithubConfig;

const REQUEST_TIMEOUT_SECS: u64 = 10;
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = "watcha-bringin-api";

/// Errors that can occur when talking to the GitHub API.
#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub integration not configured")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("GitHub API error: {0}")]
    ApiError(String),
}

/// A created issue's identity.
#[derive(Debug, Deserialize)]
pub struct IssueRef {
    pub number: i64,
    pub html_url: String,
}

/// GitHub issue tracker client.
#[derive(Clone)]
pub struct GithubService {
    config: Arc<GithubConfig>,
    client: Client,
}

impl GithubService {
    /// Creates a new GithubService with the given configuration.
    pub fn new(config: GithubConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// Whether issue creation is available.
    pub fn is_configured(&self) -> bool {
        !self.config.token.is_empty()
            && !self.config.repo_owner.is_empty()
            && !self.config.repo_name.is_empty()
    }

    /// Open an issue in the configured repository.
    pub async fn create_issue(
        &self,
        title: &str,
        body: &str,
        labels: &[&str],
    ) -> Result<IssueRef, GithubError> {
        if !self.is_configured() {
            return Err(GithubError::NotConfigured);
        }

        let url = format!(
            "https://api.github.com/repos/{}/{}/issues",
            self.config.repo_owner, self.config.repo_name
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.token)
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(&json!({
                "title": title,
                "body": body,
                "labels": labels,
            }))
            .send()
            .await?;

        if response.status().is_success() {
            let issue: IssueRef = response.json().await?;
            debug!(number = issue.number, "Created GitHub issue");
            return Ok(issue);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error!(status = %status, "GitHub issue creation failed");
        Err(GithubError::ApiError(format!(
            "GitHub returned {}: {}",
            status, body
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_configured_requires_all_fields() {
        let full = GithubService::new(GithubConfig {
            token: "ghp_test".to_string(),
            repo_owner: "whatcha-bringin".to_string(),
            repo_name: "feedback".to_string(),
        });
        assert!(full.is_configured());

        let missing_token = GithubService::new(GithubConfig {
            token: String::new(),
            repo_owner: "whatcha-bringin".to_string(),
            repo_name: "feedback".to_string(),
        });
        assert!(!missing_token.is_configured());

        let missing_repo = GithubService::new(GithubConfig {
            token: "ghp_test".to_string(),
            repo_owner: "whatcha-bringin".to_string(),
            repo_name: String::new(),
        });
        assert!(!missing_repo.is_configured());
    }

    #[tokio::test]
    async fn test_unconfigured_create_issue_errors() {
        let service = GithubService::new(GithubConfig::default());
        let result = service.create_issue("Title", "Body", &["bug"]).await;
        assert!(matches!(result, Err(GithubError::NotConfigured)));
    }

    #[test]
    fn test_issue_ref_parses() {
        let json = r#"{"number": 42, "html_url": "https://github.com/o/r/issues/42", "state": "open"}"#;
        let issue: IssueRef = serde_json::from_str(json).unwrap();
        assert_eq!(issue.number, 42);
        assert_eq!(issue.html_url, "https://github.com/o/r/issues/42");
    }
}
