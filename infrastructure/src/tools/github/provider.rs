//! GitHub tool provider

use super::backend::GithubBackend;
use crate::tools::support::{arg, int_arg, lines};
use async_trait::async_trait;
use courier_domain::tool::{
    entities::{ParamType, RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    provider::{ProviderError, ToolProvider},
    value_objects::{ToolError, ToolResult},
};
use std::sync::Arc;
use std::time::Instant;

pub const LIST_REPOSITORIES: &str = "list_repositories";
pub const LIST_PULL_REQUESTS: &str = "list_pull_requests";
pub const GET_PULL_REQUEST: &str = "get_pull_request";
pub const CREATE_ISSUE_COMMENT: &str = "create_issue_comment";

const PR_STATES: [&str; 3] = ["open", "closed", "all"];

pub fn github_tool_definitions() -> Vec<ToolDefinition> {
    fn repo() -> ToolParameter {
        ToolParameter::new("repo", "Repository as 'owner/name'", true)
    }
    fn number() -> ToolParameter {
        ToolParameter::new("number", "Pull request number", true).with_type(ParamType::Integer)
    }

    vec![
        ToolDefinition::new(
            LIST_REPOSITORIES,
            "Lists repositories of an owner, or of the authenticated user.",
            RiskLevel::Low,
        )
        .with_parameter(ToolParameter::new("owner", "User or organization", false)),
        ToolDefinition::new(
            LIST_PULL_REQUESTS,
            "Lists pull requests of a repository ('open', 'closed' or 'all').",
            RiskLevel::Low,
        )
        .with_parameter(repo())
        .with_parameter(ToolParameter::new("state", "Pull request state", false).with_default("open")),
        ToolDefinition::new(
            GET_PULL_REQUEST,
            "Reads one pull request including its description.",
            RiskLevel::Low,
        )
        .with_parameter(repo())
        .with_parameter(number()),
        ToolDefinition::new(
            CREATE_ISSUE_COMMENT,
            "Comments on a pull request or issue conversation.",
            RiskLevel::High,
        )
        .with_parameter(repo())
        .with_parameter(number())
        .with_parameter(ToolParameter::new("body", "Comment text", true).accepting_context()),
    ]
}

/// GitHub tool provider
pub struct GithubProvider {
    backend: Arc<dyn GithubBackend>,
}

impl GithubProvider {
    pub fn new(backend: Arc<dyn GithubBackend>) -> Self {
        Self { backend }
    }

    async fn execute_internal(&self, call: &ToolCall) -> Result<String, ToolError> {
        let github = &self.backend;
        let output = match call.tool_name.as_str() {
            LIST_REPOSITORIES => {
                let repos = github.repositories(call.get_string("owner")).await?;
                if repos.is_empty() {
                    "No repositories found.".to_string()
                } else {
                    lines(&repos, |r| {
                        format!(
                            "{}: {}",
                            r.full_name,
                            r.description.as_deref().unwrap_or("No description")
                        )
                    })
                }
            }
            LIST_PULL_REQUESTS => {
                let repo = repo_arg(call)?;
                let state = call.get_string("state").unwrap_or("open").to_lowercase();
                if !PR_STATES.contains(&state.as_str()) {
                    return Err(ToolError::invalid_argument(format!(
                        "Unknown pull request state '{}'. Use one of: {}",
                        state,
                        PR_STATES.join(", ")
                    )));
                }
                let pulls = github.pull_requests(repo, &state).await?;
                if pulls.is_empty() {
                    format!("No pull requests found in {}.", repo)
                } else {
                    lines(&pulls, |p| {
                        format!("#{} {} ({}) by {}", p.number, p.title, p.state, p.author)
                    })
                }
            }
            GET_PULL_REQUEST => {
                let repo = repo_arg(call)?;
                let pull = github.pull_request(repo, number_arg(call)?).await?;
                format!(
                    "#{} {}\nState: {}{}\nAuthor: {}\nBranch: {} -> {}\nURL: {}\n\n{}",
                    pull.number,
                    pull.title,
                    pull.state,
                    if pull.merged { " (merged)" } else { "" },
                    pull.author,
                    pull.head,
                    pull.base,
                    pull.url,
                    pull.body
                        .as_deref()
                        .filter(|b| !b.trim().is_empty())
                        .unwrap_or("No description provided.")
                )
            }
            CREATE_ISSUE_COMMENT => {
                let repo = repo_arg(call)?;
                let number = number_arg(call)?;
                github.comment(repo, number, arg(call, "body")?).await?;
                format!("Comment added to {}#{}.", repo, number)
            }
            other => {
                return Err(ToolError::not_found(format!("Unknown GitHub tool: {}", other)));
            }
        };

        Ok(output)
    }
}

#[async_trait]
impl ToolProvider for GithubProvider {
    fn id(&self) -> &str {
        "github"
    }

    fn display_name(&self) -> &str {
        "GitHub"
    }

    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError> {
        Ok(github_tool_definitions())
    }

    fn aliases(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("list_repos", LIST_REPOSITORIES),
            ("list_prs", LIST_PULL_REQUESTS),
            ("get_pr", GET_PULL_REQUEST),
        ]
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        let start = Instant::now();
        let result = match self.execute_internal(call).await {
            Ok(output) => ToolResult::success(&call.tool_name, output),
            Err(e) => ToolResult::failure(&call.tool_name, e),
        };
        result.with_duration(start.elapsed().as_millis() as u64)
    }
}

/// `owner/name`, with neither part empty
fn repo_arg(call: &ToolCall) -> Result<&str, ToolError> {
    let repo = arg(call, "repo")?.trim();
    match repo.split_once('/') {
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/') => {
            Ok(repo)
        }
        _ => Err(ToolError::invalid_argument(format!(
            "Repository must be given as 'owner/name', got '{}'",
            repo
        ))),
    }
}

fn number_arg(call: &ToolCall) -> Result<u64, ToolError> {
    let number = int_arg(call, "number")?;
    u64::try_from(number)
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| ToolError::invalid_argument(format!("Invalid pull request number: {}", number)))
}
