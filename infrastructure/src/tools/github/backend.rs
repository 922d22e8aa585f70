//! GitHub backend contract and the records it returns.

use crate::http::BackendError;
use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// `owner/name`
    pub full_name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullSummary {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullDetails {
    pub number: u64,
    pub title: String,
    pub state: String,
    pub author: String,
    pub head: String,
    pub base: String,
    pub merged: bool,
    pub url: String,
    pub body: Option<String>,
}

/// Operations the GitHub tools need from the GitHub API
#[async_trait]
pub trait GithubBackend: Send + Sync {
    /// Repositories of `owner`, or of the authenticated user when `None`
    async fn repositories(&self, owner: Option<&str>) -> Result<Vec<Repository>, BackendError>;

    async fn pull_requests(
        &self,
        repo: &str,
        state: &str,
    ) -> Result<Vec<PullSummary>, BackendError>;

    async fn pull_request(&self, repo: &str, number: u64) -> Result<PullDetails, BackendError>;

    /// Comment on an issue or pull request conversation
    async fn comment(&self, repo: &str, number: u64, body: &str) -> Result<(), BackendError>;
}
