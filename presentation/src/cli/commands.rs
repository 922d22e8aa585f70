//! CLI command definitions

use clap::{Parser, ValueEnum};
use courier_domain::OutputFormat as DomainOutputFormat;
use std::path::PathBuf;

/// Output format for coordination results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Only the response text
    Text,
    /// Response, status and trace as JSON
    Json,
    /// Response followed by the per-agent trace
    Trace,
}

impl From<OutputFormat> for DomainOutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => DomainOutputFormat::Text,
            OutputFormat::Json => DomainOutputFormat::Json,
            OutputFormat::Trace => DomainOutputFormat::Trace,
        }
    }
}

/// CLI arguments for agent-courier
#[derive(Parser, Debug)]
#[command(name = "courier")]
#[command(author, version, about = "Route requests across Jira, Confluence and GitHub agents")]
#[command(long_about = r#"
agent-courier hands a natural-language request to the domain agents that can
serve it and threads data from one system into the next.

Each request goes through:
1. Classification: which systems are involved, and in which order
2. Source: the first agent fetches data with its own tools
3. Destination: the next agent receives that output verbatim and acts on it

Configuration files are loaded from (in priority order):
1. Environment          JIRA_URL, CONFLUENCE_URL, ATLASSIAN_EMAIL,
                        ATLASSIAN_TOKEN, GITHUB_TOKEN, GITHUB_API_URL
2. --config <path>      Explicit config file
3. ./courier.toml       Project-level config
4. ~/.config/agent-courier/config.toml   Global config

Example:
  courier "list backlog tickets for project DEMO"
  courier "summarize ticket DEMO-5 into a new Confluence page in space TEAM"
  courier -o trace "comment on PR acme/web#12 with the backlog for project DEMO"
  courier --chat
"#)]
pub struct Cli {
    /// The request to route (not required in chat mode)
    pub request: Option<String>,

    /// Start interactive chat mode
    #[arg(short, long)]
    pub chat: bool,

    /// Output format (defaults to the config file's, then text)
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// List every agent's tools and exit
    #[arg(long)]
    pub list_tools: bool,

    /// Append a JSONL transcript of each request to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_shot_request() {
        let cli = Cli::try_parse_from(["courier", "-o", "trace", "-vv", "list backlog"]).unwrap();
        assert_eq!(cli.request.as_deref(), Some("list backlog"));
        assert_eq!(cli.output, Some(OutputFormat::Trace));
        assert_eq!(cli.verbose, 2);
        assert!(!cli.chat);
    }

    #[test]
    fn test_chat_with_log_file() {
        let cli = Cli::try_parse_from(["courier", "--chat", "--log-file", "/tmp/c.jsonl"]).unwrap();
        assert!(cli.chat);
        assert!(cli.request.is_none());
        assert_eq!(cli.log_file, Some(PathBuf::from("/tmp/c.jsonl")));
    }

    #[test]
    fn test_unknown_output_format_rejected() {
        assert!(Cli::try_parse_from(["courier", "-o", "yaml", "x"]).is_err());
    }

    #[test]
    fn test_output_format_maps_to_domain() {
        assert_eq!(
            DomainOutputFormat::from(OutputFormat::Json),
            DomainOutputFormat::Json
        );
    }
}
