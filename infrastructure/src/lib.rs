//! Infrastructure layer for agent-courier
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: REST-backed tool providers, the rule-based
//! routing brain, configuration file loading and the JSONL transcript.

pub mod bootstrap;
pub mod config;
pub mod http;
pub mod logging;
pub mod routing;
pub mod tools;

// Re-export commonly used types
pub use bootstrap::{build_coordinator, build_registry};
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileExecutionConfig, FileLoggingConfig,
    FileOutputConfig, FileOutputFormat,
};
pub use http::{Auth, BackendError, RestClient};
pub use logging::JsonlConversationLogger;
pub use routing::RuleBasedBrain;
pub use tools::{
    ConfluenceProvider, GithubProvider, JiraProvider, RegistryStats, ToolRegistry,
};
