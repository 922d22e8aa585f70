//! Tool adapters for the backend systems
//!
//! ## Providers
//!
//! Tools are organized into one provider per backend:
//! - `jira`: issues, transitions, sprints and backlog
//! - `confluence`: pages, spaces, labels and comments
//! - `github`: repositories and pull requests
//!
//! Each provider talks to its backend through a trait (`JiraBackend`,
//! `ConfluenceBackend`, `GithubBackend`) implemented over REST.

pub mod confluence;
pub mod github;
pub mod jira;

mod registry;
mod support;

pub use confluence::{ConfluenceProvider, ConfluenceRestClient};
pub use github::{GithubProvider, GithubRestClient};
pub use jira::{JiraProvider, JiraRestClient};
pub use registry::{RegistryStats, ToolRegistry};
