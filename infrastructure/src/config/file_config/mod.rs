//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

mod backends;
mod execution;
mod logging;
mod output;

pub use backends::{
    DEFAULT_GITHUB_API_URL, FileAtlassianConfig, FileConfluenceConfig, FileGithubConfig,
    FileJiraConfig,
};
pub use execution::FileExecutionConfig;
pub use logging::FileLoggingConfig;
pub use output::{FileOutputConfig, FileOutputFormat};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("execution.http_timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("execution.max_calls_per_turn cannot be 0")]
    InvalidCallLimit,

    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: &'static str, value: String },
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Jira site
    pub jira: FileJiraConfig,
    /// Confluence site
    pub confluence: FileConfluenceConfig,
    /// Credentials shared by Jira and Confluence
    pub atlassian: FileAtlassianConfig,
    /// GitHub REST API
    pub github: FileGithubConfig,
    /// Tool execution settings
    pub execution: FileExecutionConfig,
    /// Output settings
    pub output: FileOutputConfig,
    /// Conversation log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the configuration.
    ///
    /// Missing credentials are not an error here: they are reported by the
    /// affected tools on first use.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.execution.http_timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout);
        }
        if self.execution.max_calls_per_turn == 0 {
            return Err(ConfigValidationError::InvalidCallLimit);
        }

        let urls = [
            ("jira.url", self.jira.url.as_deref()),
            ("confluence.url", self.confluence.url.as_deref()),
            ("github.api_url", Some(self.github.api_url.as_str())),
        ];
        for (field, value) in urls {
            if let Some(value) = value
                && !(value.starts_with("https://") || value.starts_with("http://"))
            {
                return Err(ConfigValidationError::InvalidUrl {
                    field,
                    value: value.to_string(),
                });
            }
        }

        Ok(())
    }
}
