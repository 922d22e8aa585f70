//! Jira tools: issue tracking, workflow transitions and agile sprints.

pub mod backend;
pub mod provider;
pub mod rest;

pub use backend::JiraBackend;
pub use provider::{JiraProvider, jira_tool_definitions};
pub use rest::JiraRestClient;
