//! Backend configuration from TOML (`[jira]`, `[confluence]`, `[atlassian]`,
//! `[github]` sections)
//!
//! Every field is optional. A missing value surfaces as
//! `Error: Missing configuration: <ENV_VAR>` from the first tool that needs it.

use serde::{Deserialize, Serialize};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// `[jira]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileJiraConfig {
    /// Site base URL, e.g. `https://example.atlassian.net` (env: `JIRA_URL`)
    pub url: Option<String>,
}

/// `[confluence]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfluenceConfig {
    /// Site base URL, with or without the `/wiki` suffix (env: `CONFLUENCE_URL`)
    pub url: Option<String>,
}

/// `[atlassian]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAtlassianConfig {
    /// Account email for basic auth (env: `ATLASSIAN_EMAIL`)
    pub email: Option<String>,
    /// API token (env: `ATLASSIAN_TOKEN`)
    pub token: Option<String>,
}

/// `[github]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGithubConfig {
    /// REST API root (env: `GITHUB_API_URL`)
    pub api_url: String,
    /// Personal access token (env: `GITHUB_TOKEN`)
    pub token: Option<String>,
}

impl Default for FileGithubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_GITHUB_API_URL.to_string(),
            token: None,
        }
    }
}
