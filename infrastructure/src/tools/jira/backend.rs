//! Jira backend contract and the records it returns.

use crate::http::BackendError;
use async_trait::async_trait;
use courier_domain::tracker::Named;

/// One line of a search result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueSummary {
    pub key: String,
    pub summary: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDetails {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub assignee: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub id: String,
    pub name: String,
}

impl Named for Transition {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub author: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprint {
    pub id: i64,
    pub name: String,
    pub state: Option<String>,
}

impl Named for Sprint {
    fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    pub project: String,
    pub summary: String,
    pub description: String,
    pub issue_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSprint {
    pub board_id: i64,
    pub name: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// File to attach to an issue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub content: Vec<u8>,
}

/// Operations the Jira tools need from a Jira site.
///
/// Implemented over REST by [`JiraRestClient`](super::rest::JiraRestClient)
/// and in memory by test fakes.
#[async_trait]
pub trait JiraBackend: Send + Sync {
    async fn search(&self, jql: &str) -> Result<Vec<IssueSummary>, BackendError>;

    async fn issue(&self, key: &str) -> Result<IssueDetails, BackendError>;

    async fn create_issue(&self, issue: &NewIssue) -> Result<String, BackendError>;

    /// Set arbitrary fields, e.g. `{"priority": {"name": "High"}}`
    async fn update_fields(&self, key: &str, fields: serde_json::Value)
    -> Result<(), BackendError>;

    async fn add_comment(&self, key: &str, body: &str) -> Result<(), BackendError>;

    async fn comments(&self, key: &str) -> Result<Vec<Comment>, BackendError>;

    async fn transitions(&self, key: &str) -> Result<Vec<Transition>, BackendError>;

    async fn transition(&self, key: &str, transition_id: &str) -> Result<(), BackendError>;

    async fn assign(&self, key: &str, account_id: &str) -> Result<(), BackendError>;

    async fn attach(&self, key: &str, attachment: Attachment) -> Result<(), BackendError>;

    async fn add_worklog(&self, key: &str, time_spent: &str) -> Result<(), BackendError>;

    async fn projects(&self) -> Result<Vec<Project>, BackendError>;

    async fn link(&self, link_type: &str, inward: &str, outward: &str)
    -> Result<(), BackendError>;

    /// All sprints of a board, across pages
    async fn sprints(&self, board_id: i64) -> Result<Vec<Sprint>, BackendError>;

    async fn create_sprint(&self, sprint: &NewSprint) -> Result<Sprint, BackendError>;

    async fn move_to_sprint(&self, sprint_id: i64, keys: &[String]) -> Result<(), BackendError>;
}
