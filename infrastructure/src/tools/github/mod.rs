//! GitHub tools: repositories and pull requests.

pub mod backend;
pub mod provider;
pub mod rest;

pub use backend::GithubBackend;
pub use provider::{GithubProvider, github_tool_definitions};
pub use rest::GithubRestClient;
