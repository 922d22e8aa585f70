//! Configuration file loading for agent-courier
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment: `JIRA_URL`, `CONFLUENCE_URL`, `ATLASSIAN_EMAIL`,
//!    `ATLASSIAN_TOKEN`, `GITHUB_TOKEN`, `GITHUB_API_URL`, then
//!    `COURIER_<SECTION>__<KEY>` overrides
//! 2. `--config <path>` specified file
//! 3. Project root: `./courier.toml` or `./.courier.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/agent-courier/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, DEFAULT_GITHUB_API_URL, FileAtlassianConfig, FileConfig,
    FileConfluenceConfig, FileExecutionConfig, FileGithubConfig, FileJiraConfig,
    FileLoggingConfig, FileOutputConfig, FileOutputFormat,
};
pub use loader::ConfigLoader;
