//! Jira tool provider
//!
//! Exposes the Jira tools and renders every backend answer as text.
//! Composite tools (`add_issue_to_sprint_by_name`, `get_sprint_id_by_name`,
//! `check_sprint_health`) list candidates first and act on the first
//! case-insensitive exact name match.

use super::backend::{Attachment, IssueSummary, JiraBackend, NewIssue, NewSprint, Sprint};
use crate::http::BackendError;
use crate::tools::support::{arg, int_arg, lines};
use async_trait::async_trait;
use courier_domain::tool::{
    entities::{ParamType, RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    provider::{ProviderError, ToolProvider},
    value_objects::{ToolError, ToolResult},
};
use courier_domain::tracker::{SprintHealth, empty_sprint_message, find_by_name};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

pub const SEARCH_JIRA: &str = "search_jira";
pub const COMMENT_ON_TICKET: &str = "comment_on_ticket";
pub const UPDATE_TICKET_STATUS: &str = "update_ticket_status";
pub const GET_TRANSITIONS: &str = "get_transitions";
pub const CREATE_ISSUE: &str = "create_issue";
pub const GET_ISSUE_DETAILS: &str = "get_issue_details";
pub const ASSIGN_ISSUE: &str = "assign_issue";
pub const ADD_ATTACHMENT: &str = "add_attachment";
pub const GET_ISSUE_COMMENTS: &str = "get_issue_comments";
pub const LOG_WORK: &str = "log_work";
pub const LIST_PROJECTS: &str = "list_projects";
pub const GET_SPRINT_ISSUES: &str = "get_sprint_issues";
pub const UPDATE_ISSUE_PRIORITY: &str = "update_issue_priority";
pub const LINK_ISSUES: &str = "link_issues";
pub const CREATE_SPRINT: &str = "create_sprint";
pub const UPDATE_ISSUE_TYPE: &str = "update_issue_type";
pub const ADD_ISSUE_TO_SPRINT: &str = "add_issue_to_sprint";
pub const ADD_ISSUE_TO_SPRINT_BY_NAME: &str = "add_issue_to_sprint_by_name";
pub const GET_BACKLOG_TICKETS: &str = "get_backlog_tickets";
pub const GET_SPRINT_ID_BY_NAME: &str = "get_sprint_id_by_name";
pub const CHECK_SPRINT_HEALTH: &str = "check_sprint_health";

const TYPE_CHANGE_HINT: &str =
    "Some type changes require a 'Move' operation if status workflows differ.";
const SPRINT_FIELD_HINT: &str = "Ensure the ticket is in a project that has a Scrum board.";

/// All Jira tool definitions, in catalogue order
pub fn jira_tool_definitions() -> Vec<ToolDefinition> {
    fn key() -> ToolParameter {
        ToolParameter::new("issue_key", "The ticket key (e.g., 'PROJ-123')", true)
    }
    fn board_id() -> ToolParameter {
        ToolParameter::new("board_id", "The ID of the Scrum board (e.g., 1)", true)
            .with_type(ParamType::Integer)
    }
    fn sprint_name() -> ToolParameter {
        ToolParameter::new("sprint_name", "Name of the sprint (e.g., 'Sprint 1')", true)
    }

    vec![
        ToolDefinition::new(
            SEARCH_JIRA,
            "Search for Jira tickets using JQL. Example: assignee = 'user@email.com'",
            RiskLevel::Low,
        )
        .with_parameter(ToolParameter::new("jql_query", "JQL query", true)),
        ToolDefinition::new(COMMENT_ON_TICKET, "Adds a comment to a Jira ticket.", RiskLevel::High)
            .with_parameter(key())
            .with_parameter(
                ToolParameter::new("comment", "Comment text", true).accepting_context(),
            ),
        ToolDefinition::new(
            UPDATE_TICKET_STATUS,
            "Moves a ticket to a new status. Use 'get_transitions' first to see valid names.",
            RiskLevel::High,
        )
        .with_parameter(key())
        .with_parameter(ToolParameter::new("status_name", "Target transition name", true)),
        ToolDefinition::new(
            GET_TRANSITIONS,
            "Lists the available status changes (transitions) for a specific ticket.",
            RiskLevel::Low,
        )
        .with_parameter(key()),
        ToolDefinition::new(
            CREATE_ISSUE,
            "Creates a new Jira issue. Default type is 'Story'.",
            RiskLevel::High,
        )
        .with_parameter(ToolParameter::new("project", "Project key", true))
        .with_parameter(ToolParameter::new("summary", "One-line summary", true))
        .with_parameter(
            ToolParameter::new("description", "Issue description", true).accepting_context(),
        )
        .with_parameter(
            ToolParameter::new("issuetype", "Issue type name", false).with_default("Story"),
        ),
        ToolDefinition::new(
            GET_ISSUE_DETAILS,
            "Fetches full details of a specific issue including description and assignee.",
            RiskLevel::Low,
        )
        .with_parameter(key()),
        ToolDefinition::new(
            ASSIGN_ISSUE,
            "Assigns an issue to a specific user using their Account ID.",
            RiskLevel::High,
        )
        .with_parameter(key())
        .with_parameter(ToolParameter::new("account_id", "Assignee account ID", true)),
        ToolDefinition::new(ADD_ATTACHMENT, "Attaches a file to a Jira ticket.", RiskLevel::High)
            .with_parameter(key())
            .with_parameter(ToolParameter::new("file_path", "Local path of the file", true)),
        ToolDefinition::new(
            GET_ISSUE_COMMENTS,
            "Retrieves all comments for a specific issue.",
            RiskLevel::Low,
        )
        .with_parameter(key()),
        ToolDefinition::new(
            LOG_WORK,
            "Logs work on an issue. Format: '2h', '30m', '1d'.",
            RiskLevel::High,
        )
        .with_parameter(key())
        .with_parameter(ToolParameter::new("time_spent", "Time spent, e.g. '2h'", true)),
        ToolDefinition::new(
            LIST_PROJECTS,
            "Returns a list of all accessible Jira projects.",
            RiskLevel::Low,
        ),
        ToolDefinition::new(
            GET_SPRINT_ISSUES,
            "Lists all issues within a specific sprint ID.",
            RiskLevel::Low,
        )
        .with_parameter(
            ToolParameter::new("sprint_id", "Numerical sprint ID", true)
                .with_type(ParamType::Integer),
        ),
        ToolDefinition::new(
            UPDATE_ISSUE_PRIORITY,
            "Updates the priority of an issue (e.g., 'Highest', 'High', 'Low').",
            RiskLevel::High,
        )
        .with_parameter(key())
        .with_parameter(ToolParameter::new("priority_name", "Priority name", true)),
        ToolDefinition::new(
            LINK_ISSUES,
            "Links two issues together (e.g., 'Blocks', 'Relates', 'Duplicate').",
            RiskLevel::High,
        )
        .with_parameter(ToolParameter::new("inward_key", "Inward issue key", true))
        .with_parameter(ToolParameter::new("outward_key", "Outward issue key", true))
        .with_parameter(
            ToolParameter::new("link_type", "Link type name", false).with_default("Relates"),
        ),
        ToolDefinition::new(
            CREATE_SPRINT,
            "Creates a new sprint within a specific board.",
            RiskLevel::High,
        )
        .with_parameter(board_id())
        .with_parameter(sprint_name())
        .with_parameter(ToolParameter::new(
            "start_date",
            "Optional. Format: 'YYYY-MM-DDTHH:MM:SS.000+0000'",
            false,
        ))
        .with_parameter(ToolParameter::new(
            "end_date",
            "Optional. Same format as start_date.",
            false,
        )),
        ToolDefinition::new(
            UPDATE_ISSUE_TYPE,
            "Changes the issue type of an existing ticket (e.g., from 'Bug' to 'Task').",
            RiskLevel::High,
        )
        .with_parameter(key())
        .with_parameter(ToolParameter::new(
            "new_type",
            "New issue type (e.g., 'Story', 'Bug', 'Task', 'Epic')",
            true,
        )),
        ToolDefinition::new(
            ADD_ISSUE_TO_SPRINT,
            "Moves an existing Jira ticket into a specific sprint.",
            RiskLevel::High,
        )
        .with_parameter(key())
        .with_parameter(
            ToolParameter::new("sprint_id", "Numerical sprint ID (e.g., 42)", true)
                .with_type(ParamType::Integer),
        ),
        ToolDefinition::new(
            ADD_ISSUE_TO_SPRINT_BY_NAME,
            "Finds a sprint by name on a specific board and adds the ticket to it.",
            RiskLevel::High,
        )
        .with_parameter(key())
        .with_parameter(board_id())
        .with_parameter(sprint_name()),
        ToolDefinition::new(
            GET_BACKLOG_TICKETS,
            "Retrieves all unresolved tickets of a project that are not in any sprint.",
            RiskLevel::Low,
        )
        .with_parameter(ToolParameter::new("project_key", "Project key", true)),
        ToolDefinition::new(
            GET_SPRINT_ID_BY_NAME,
            "Finds the internal ID for a sprint based on its name.",
            RiskLevel::Low,
        )
        .with_parameter(board_id())
        .with_parameter(sprint_name()),
        ToolDefinition::new(
            CHECK_SPRINT_HEALTH,
            "Analyzes the health of a sprint by checking the status of all its issues.",
            RiskLevel::Low,
        )
        .with_parameter(board_id())
        .with_parameter(sprint_name()),
    ]
}

/// Jira tool provider
pub struct JiraProvider {
    backend: Arc<dyn JiraBackend>,
}

impl JiraProvider {
    pub fn new(backend: Arc<dyn JiraBackend>) -> Self {
        Self { backend }
    }

    async fn execute_internal(&self, call: &ToolCall) -> Result<String, ToolError> {
        let jira = &self.backend;
        let output = match call.tool_name.as_str() {
            SEARCH_JIRA => {
                let issues = jira.search(arg(call, "jql_query")?).await?;
                if issues.is_empty() {
                    "No tickets found.".to_string()
                } else {
                    lines(&issues, |i| format!("{}: {} ({})", i.key, i.summary, i.status))
                }
            }
            COMMENT_ON_TICKET => {
                let key = arg(call, "issue_key")?;
                jira.add_comment(key, arg(call, "comment")?).await?;
                format!("Comment added to {}.", key)
            }
            UPDATE_TICKET_STATUS => {
                let key = arg(call, "issue_key")?;
                let status = arg(call, "status_name")?;
                let transitions = jira.transitions(key).await?;
                let Some(transition) = find_by_name(&transitions, status) else {
                    let available = transitions
                        .iter()
                        .map(|t| t.name.as_str())
                        .collect::<Vec<_>>()
                        .join(", ");
                    return Err(BackendError::Rejected(format!(
                        "Transition '{}' is not available for {}. Available transitions: {}",
                        status,
                        key,
                        if available.is_empty() { "none" } else { &available }
                    ))
                    .into());
                };
                jira.transition(key, &transition.id).await?;
                format!("{} moved to {}.", key, status)
            }
            GET_TRANSITIONS => {
                let key = arg(call, "issue_key")?;
                let transitions = jira.transitions(key).await?;
                if transitions.is_empty() {
                    format!("No transitions available for {}.", key)
                } else {
                    lines(&transitions, |t| format!("ID: {} - Name: {}", t.id, t.name))
                }
            }
            CREATE_ISSUE => {
                let issue = NewIssue {
                    project: arg(call, "project")?.to_string(),
                    summary: arg(call, "summary")?.to_string(),
                    description: arg(call, "description")?.to_string(),
                    issue_type: call.get_string("issuetype").unwrap_or("Story").to_string(),
                };
                let key = jira.create_issue(&issue).await?;
                format!("Issue created: {}", key)
            }
            GET_ISSUE_DETAILS => {
                let issue = jira.issue(arg(call, "issue_key")?).await?;
                format!(
                    "Key: {}\nSummary: {}\nStatus: {}\nAssignee: {}\nDescription: {}",
                    issue.key,
                    issue.summary,
                    issue.status,
                    issue.assignee.as_deref().unwrap_or("Unassigned"),
                    issue.description.as_deref().unwrap_or("None"),
                )
            }
            ASSIGN_ISSUE => {
                let key = arg(call, "issue_key")?;
                let account_id = arg(call, "account_id")?;
                jira.assign(key, account_id).await?;
                format!("{} assigned to {}.", key, account_id)
            }
            ADD_ATTACHMENT => {
                let key = arg(call, "issue_key")?;
                let attachment = read_attachment(arg(call, "file_path")?).await?;
                jira.attach(key, attachment).await?;
                format!("File attached to {}.", key)
            }
            GET_ISSUE_COMMENTS => {
                let comments = jira.comments(arg(call, "issue_key")?).await?;
                if comments.is_empty() {
                    "No comments found.".to_string()
                } else {
                    comments
                        .iter()
                        .map(|c| format!("{}: {}", c.author, c.body))
                        .collect::<Vec<_>>()
                        .join("\n---\n")
                }
            }
            LOG_WORK => {
                let key = arg(call, "issue_key")?;
                let time_spent = arg(call, "time_spent")?;
                jira.add_worklog(key, time_spent).await?;
                format!("Logged {} to {}.", time_spent, key)
            }
            LIST_PROJECTS => {
                let projects = jira.projects().await?;
                if projects.is_empty() {
                    "No projects found.".to_string()
                } else {
                    lines(&projects, |p| format!("{}: {}", p.key, p.name))
                }
            }
            GET_SPRINT_ISSUES => {
                let sprint_id = int_arg(call, "sprint_id")?;
                let issues = self.sprint_issues(sprint_id).await?;
                if issues.is_empty() {
                    format!("No issues found in sprint {}.", sprint_id)
                } else {
                    lines(&issues, |i| format!("{}: {}", i.key, i.summary))
                }
            }
            UPDATE_ISSUE_PRIORITY => {
                let key = arg(call, "issue_key")?;
                let priority = arg(call, "priority_name")?;
                jira.update_fields(key, json!({ "priority": { "name": priority } }))
                    .await?;
                format!("Priority updated to {} for {}.", priority, key)
            }
            LINK_ISSUES => {
                let inward = arg(call, "inward_key")?;
                let outward = arg(call, "outward_key")?;
                let link_type = call.get_string("link_type").unwrap_or("Relates");
                jira.link(link_type, inward, outward).await?;
                format!("Linked {} as {} {}.", inward, link_type, outward)
            }
            CREATE_SPRINT => {
                let sprint = NewSprint {
                    board_id: int_arg(call, "board_id")?,
                    name: arg(call, "sprint_name")?.to_string(),
                    start_date: call.get_string("start_date").map(str::to_string),
                    end_date: call.get_string("end_date").map(str::to_string),
                };
                let created = jira.create_sprint(&sprint).await?;
                format!(
                    "Sprint '{}' created successfully! ID: {}",
                    sprint.name, created.id
                )
            }
            UPDATE_ISSUE_TYPE => {
                let key = arg(call, "issue_key")?;
                let new_type = arg(call, "new_type")?;
                jira.update_fields(key, json!({ "issuetype": { "name": new_type } }))
                    .await
                    .map_err(|e| e.into_tool_error().with_details(TYPE_CHANGE_HINT))?;
                format!("{} has been successfully changed to a '{}'.", key, new_type)
            }
            ADD_ISSUE_TO_SPRINT => {
                let key = arg(call, "issue_key")?;
                let sprint_id = int_arg(call, "sprint_id")?;
                jira.move_to_sprint(sprint_id, &[key.to_string()])
                    .await
                    .map_err(|e| e.into_tool_error().with_details(SPRINT_FIELD_HINT))?;
                format!("{} has been added to sprint {}.", key, sprint_id)
            }
            ADD_ISSUE_TO_SPRINT_BY_NAME => {
                let key = arg(call, "issue_key")?;
                let board_id = int_arg(call, "board_id")?;
                let name = arg(call, "sprint_name")?;
                let sprint = self.find_sprint(board_id, name).await?;
                jira.move_to_sprint(sprint.id, &[key.to_string()]).await?;
                format!("{} successfully added to '{}' (ID: {}).", key, sprint.name, sprint.id)
            }
            GET_BACKLOG_TICKETS => {
                let project = arg(call, "project_key")?;
                let issues = jira.search(&backlog_jql(project)).await?;
                if issues.is_empty() {
                    format!("No backlog tickets found for project {}.", project)
                } else {
                    format!(
                        "Backlog for {}:\n{}",
                        project,
                        lines(&issues, |i| format!("{}: {} [{}]", i.key, i.summary, i.status))
                    )
                }
            }
            GET_SPRINT_ID_BY_NAME => {
                let board_id = int_arg(call, "board_id")?;
                let name = arg(call, "sprint_name")?;
                let sprint = self.find_sprint(board_id, name).await?;
                format!("Sprint '{}' has ID {}.", sprint.name, sprint.id)
            }
            CHECK_SPRINT_HEALTH => {
                let board_id = int_arg(call, "board_id")?;
                let name = arg(call, "sprint_name")?;
                let sprint = self.find_sprint(board_id, name).await?;
                let issues = self.sprint_issues(sprint.id).await?;
                match SprintHealth::from_statuses(name, issues.iter().map(|i| i.status.as_str())) {
                    Some(health) => health.report(),
                    None => empty_sprint_message(name),
                }
            }
            other => return Err(ToolError::not_found(format!("Unknown Jira tool: {}", other))),
        };

        Ok(output)
    }

    async fn sprint_issues(&self, sprint_id: i64) -> Result<Vec<IssueSummary>, BackendError> {
        self.backend.search(&format!("sprint = {}", sprint_id)).await
    }

    /// List the board's sprints and pick the first exact, case-insensitive match
    async fn find_sprint(&self, board_id: i64, name: &str) -> Result<Sprint, ToolError> {
        let sprints = self.backend.sprints(board_id).await?;
        debug!(board_id, candidates = sprints.len(), wanted = name, "Looking up sprint by name");
        find_by_name(&sprints, name).cloned().ok_or_else(|| {
            ToolError::not_found(format!(
                "Could not find a sprint named '{}' on board {}.",
                name, board_id
            ))
        })
    }
}

#[async_trait]
impl ToolProvider for JiraProvider {
    fn id(&self) -> &str {
        "jira"
    }

    fn display_name(&self) -> &str {
        "Jira"
    }

    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError> {
        Ok(jira_tool_definitions())
    }

    fn aliases(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("jql_search", SEARCH_JIRA),
            ("get_ticket_details", GET_ISSUE_DETAILS),
            ("move_ticket", UPDATE_TICKET_STATUS),
            ("get_backlog", GET_BACKLOG_TICKETS),
            ("sprint_health", CHECK_SPRINT_HEALTH),
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

/// JQL for unresolved issues of a project that are in no sprint
pub fn backlog_jql(project_key: &str) -> String {
    format!(
        "project = '{}' AND sprint is EMPTY AND resolution is EMPTY",
        project_key.replace('\'', "\\'")
    )
}

async fn read_attachment(file_path: &str) -> Result<Attachment, BackendError> {
    let content = tokio::fs::read(file_path)
        .await
        .map_err(|e| BackendError::File {
            path: file_path.to_string(),
            message: e.to_string(),
        })?;
    let file_name = Path::new(file_path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "attachment".to_string());
    Ok(Attachment { file_name, content })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::jira::backend::{
        Comment, IssueDetails, NewIssue, NewSprint, Project, Transition,
    };
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::Mutex;

    /// In-memory Jira site
    #[derive(Default)]
    struct FakeJira {
        /// JQL → result
        searches: HashMap<String, Vec<IssueSummary>>,
        issues: HashMap<String, IssueDetails>,
        transitions: Vec<Transition>,
        sprints: Vec<Sprint>,
        comments: Vec<Comment>,
        fail_with: Option<BackendError>,
        log: Mutex<Vec<String>>,
    }

    impl FakeJira {
        fn record(&self, entry: String) -> Result<(), BackendError> {
            if let Some(err) = &self.fail_with {
                return Err(err.clone());
            }
            self.log.lock().unwrap().push(entry);
            Ok(())
        }

        fn log(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    fn issue(key: &str, summary: &str, status: &str) -> IssueSummary {
        IssueSummary {
            key: key.to_string(),
            summary: summary.to_string(),
            status: status.to_string(),
        }
    }

    fn sprint_record(id: i64, name: &str) -> Sprint {
        Sprint {
            id,
            name: name.to_string(),
            state: Some("active".to_string()),
        }
    }

    #[async_trait]
    impl JiraBackend for FakeJira {
        async fn search(&self, jql: &str) -> Result<Vec<IssueSummary>, BackendError> {
            self.record(format!("search {}", jql))?;
            Ok(self.searches.get(jql).cloned().unwrap_or_default())
        }

        async fn issue(&self, key: &str) -> Result<IssueDetails, BackendError> {
            self.record(format!("issue {}", key))?;
            self.issues
                .get(key)
                .cloned()
                .ok_or_else(|| BackendError::NotFound(format!("Issue {} does not exist", key)))
        }

        async fn create_issue(&self, issue: &NewIssue) -> Result<String, BackendError> {
            self.record(format!("create {} {}", issue.project, issue.issue_type))?;
            Ok(format!("{}-100", issue.project))
        }

        async fn update_fields(
            &self,
            key: &str,
            fields: serde_json::Value,
        ) -> Result<(), BackendError> {
            self.record(format!("update {} {}", key, fields))
        }

        async fn add_comment(&self, key: &str, body: &str) -> Result<(), BackendError> {
            self.record(format!("comment {} {}", key, body))
        }

        async fn comments(&self, _key: &str) -> Result<Vec<Comment>, BackendError> {
            Ok(self.comments.clone())
        }

        async fn transitions(&self, _key: &str) -> Result<Vec<Transition>, BackendError> {
            self.record("transitions".to_string())?;
            Ok(self.transitions.clone())
        }

        async fn transition(&self, key: &str, transition_id: &str) -> Result<(), BackendError> {
            self.record(format!("transition {} {}", key, transition_id))
        }

        async fn assign(&self, key: &str, account_id: &str) -> Result<(), BackendError> {
            self.record(format!("assign {} {}", key, account_id))
        }

        async fn attach(&self, key: &str, attachment: Attachment) -> Result<(), BackendError> {
            self.record(format!(
                "attach {} {} {}",
                key,
                attachment.file_name,
                attachment.content.len()
            ))
        }

        async fn add_worklog(&self, key: &str, time_spent: &str) -> Result<(), BackendError> {
            self.record(format!("worklog {} {}", key, time_spent))
        }

        async fn projects(&self) -> Result<Vec<Project>, BackendError> {
            self.record("projects".to_string())?;
            Ok(vec![Project {
                key: "DEMO".to_string(),
                name: "Demo project".to_string(),
            }])
        }

        async fn link(
            &self,
            link_type: &str,
            inward: &str,
            outward: &str,
        ) -> Result<(), BackendError> {
            self.record(format!("link {} {} {}", link_type, inward, outward))
        }

        async fn sprints(&self, _board_id: i64) -> Result<Vec<Sprint>, BackendError> {
            self.record("sprints".to_string())?;
            Ok(self.sprints.clone())
        }

        async fn create_sprint(&self, sprint: &NewSprint) -> Result<Sprint, BackendError> {
            self.record(format!("create_sprint {}", sprint.name))?;
            Ok(sprint_record(77, &sprint.name))
        }

        async fn move_to_sprint(
            &self,
            sprint_id: i64,
            keys: &[String],
        ) -> Result<(), BackendError> {
            self.record(format!("move {} {}", sprint_id, keys.join(",")))
        }
    }

    fn provider(fake: FakeJira) -> (JiraProvider, Arc<FakeJira>) {
        let fake = Arc::new(fake);
        (JiraProvider::new(fake.clone()), fake)
    }

    async fn run(provider: &JiraProvider, call: ToolCall) -> ToolResult {
        provider.execute(&call).await
    }

    #[tokio::test]
    async fn test_discover_full_catalogue() {
        let (provider, _) = provider(FakeJira::default());
        let tools = provider.discover_tools().await.unwrap();
        assert_eq!(tools.len(), 21);
        assert!(tools.iter().any(|t| t.name == CHECK_SPRINT_HEALTH));
        let search = tools.iter().find(|t| t.name == SEARCH_JIRA).unwrap();
        assert!(search.is_read_only());
    }

    #[tokio::test]
    async fn test_backlog_tickets() {
        let mut fake = FakeJira::default();
        fake.searches.insert(
            backlog_jql("DEMO"),
            vec![issue("DEMO-1", "Login fails", "To Do"), issue("DEMO-4", "Dark mode", "Open")],
        );
        let (provider, fake) = provider(fake);

        let result = run(
            &provider,
            ToolCall::new(GET_BACKLOG_TICKETS).with_arg("project_key", "DEMO"),
        )
        .await;

        assert_eq!(
            result.text(),
            "Backlog for DEMO:\nDEMO-1: Login fails [To Do]\nDEMO-4: Dark mode [Open]"
        );
        assert_eq!(
            fake.log(),
            vec!["search project = 'DEMO' AND sprint is EMPTY AND resolution is EMPTY"]
        );
    }

    #[tokio::test]
    async fn test_backlog_empty() {
        let (provider, _) = provider(FakeJira::default());
        let result = run(
            &provider,
            ToolCall::new(GET_BACKLOG_TICKETS).with_arg("project_key", "DEMO"),
        )
        .await;
        assert!(result.is_success());
        assert_eq!(result.text(), "No backlog tickets found for project DEMO.");
    }

    #[tokio::test]
    async fn test_search_formats_lines() {
        let mut fake = FakeJira::default();
        fake.searches.insert(
            "assignee = currentUser()".to_string(),
            vec![issue("DEMO-2", "Crash on start", "In Progress")],
        );
        let (provider, _) = provider(fake);

        let result = run(
            &provider,
            ToolCall::new(SEARCH_JIRA).with_arg("jql_query", "assignee = currentUser()"),
        )
        .await;
        assert_eq!(result.text(), "DEMO-2: Crash on start (In Progress)");

        let empty = run(&provider, ToolCall::new(SEARCH_JIRA).with_arg("jql_query", "x")).await;
        assert_eq!(empty.text(), "No tickets found.");
    }

    #[tokio::test]
    async fn test_issue_details_block() {
        let mut fake = FakeJira::default();
        fake.issues.insert(
            "DEMO-5".to_string(),
            IssueDetails {
                key: "DEMO-5".to_string(),
                summary: "Login fails on Safari".to_string(),
                status: "In Progress".to_string(),
                assignee: None,
                description: Some("Steps to reproduce".to_string()),
            },
        );
        let (provider, _) = provider(fake);

        let result = run(
            &provider,
            ToolCall::new(GET_ISSUE_DETAILS).with_arg("issue_key", "DEMO-5"),
        )
        .await;
        assert_eq!(
            result.text(),
            "Key: DEMO-5\nSummary: Login fails on Safari\nStatus: In Progress\nAssignee: Unassigned\nDescription: Steps to reproduce"
        );

        let missing = run(
            &provider,
            ToolCall::new(GET_ISSUE_DETAILS).with_arg("issue_key", "DEMO-9"),
        )
        .await;
        assert!(!missing.is_success());
        assert_eq!(missing.text(), "Error: Not found: Issue DEMO-9 does not exist");
    }

    #[tokio::test]
    async fn test_update_status_resolves_transition_case_insensitively() {
        let fake = FakeJira {
            transitions: vec![
                Transition {
                    id: "11".to_string(),
                    name: "To Do".to_string(),
                },
                Transition {
                    id: "31".to_string(),
                    name: "Done".to_string(),
                },
            ],
            ..Default::default()
        };
        let (provider, fake) = provider(fake);

        let result = run(
            &provider,
            ToolCall::new(UPDATE_TICKET_STATUS)
                .with_arg("issue_key", "DEMO-1")
                .with_arg("status_name", "done"),
        )
        .await;
        assert_eq!(result.text(), "DEMO-1 moved to done.");
        assert!(fake.log().contains(&"transition DEMO-1 31".to_string()));

        let unknown = run(
            &provider,
            ToolCall::new(UPDATE_TICKET_STATUS)
                .with_arg("issue_key", "DEMO-1")
                .with_arg("status_name", "Shipped"),
        )
        .await;
        assert!(!unknown.is_success());
        assert!(unknown.text().contains("Available transitions: To Do, Done"));
    }

    #[tokio::test]
    async fn test_sprint_lookup_is_exact() {
        let fake = FakeJira {
            sprints: vec![sprint_record(1, "Sprint 1"), sprint_record(12, "Sprint 12")],
            ..Default::default()
        };
        let (provider, fake) = provider(fake);

        let found = run(
            &provider,
            ToolCall::new(GET_SPRINT_ID_BY_NAME)
                .with_arg("board_id", 3)
                .with_arg("sprint_name", "sprint 12"),
        )
        .await;
        assert_eq!(found.text(), "Sprint 'Sprint 12' has ID 12.");

        let substring = run(
            &provider,
            ToolCall::new(ADD_ISSUE_TO_SPRINT_BY_NAME)
                .with_arg("issue_key", "DEMO-1")
                .with_arg("board_id", 3)
                .with_arg("sprint_name", "Sprint"),
        )
        .await;
        assert!(!substring.is_success());
        assert_eq!(
            substring.text(),
            "Error: Could not find a sprint named 'Sprint' on board 3."
        );
        assert!(!fake.log().iter().any(|e| e.starts_with("move")));
    }

    #[tokio::test]
    async fn test_add_issue_to_sprint_by_name() {
        let fake = FakeJira {
            sprints: vec![sprint_record(1, "Sprint 1"), sprint_record(2, "Sprint 2")],
            ..Default::default()
        };
        let (provider, fake) = provider(fake);

        let result = run(
            &provider,
            ToolCall::new(ADD_ISSUE_TO_SPRINT_BY_NAME)
                .with_arg("issue_key", "DEMO-1")
                .with_arg("board_id", 3)
                .with_arg("sprint_name", "SPRINT 2"),
        )
        .await;
        assert_eq!(result.text(), "DEMO-1 successfully added to 'Sprint 2' (ID: 2).");
        assert_eq!(fake.log(), vec!["sprints", "move 2 DEMO-1"]);
    }

    #[tokio::test]
    async fn test_sprint_health_report() {
        let mut fake = FakeJira {
            sprints: vec![sprint_record(7, "Sprint 7")],
            ..Default::default()
        };
        fake.searches.insert(
            "sprint = 7".to_string(),
            vec![
                issue("A-1", "a", "Done"),
                issue("A-2", "b", "closed"),
                issue("A-3", "c", "In Progress"),
                issue("A-4", "d", "To Do"),
                issue("A-5", "e", "Blocked"),
                issue("A-6", "f", "Resolved"),
            ],
        );
        let (provider, _) = provider(fake);

        let result = run(
            &provider,
            ToolCall::new(CHECK_SPRINT_HEALTH)
                .with_arg("board_id", 1)
                .with_arg("sprint_name", "Sprint 7"),
        )
        .await;
        assert_eq!(
            result.text(),
            "Health Report for Sprint 7\n- Completion: 50.0%\n- Done: 3\n- In Progress: 1\n- To Do: 2\n- Total Issues: 6"
        );
    }

    #[tokio::test]
    async fn test_sprint_health_empty_sprint() {
        let fake = FakeJira {
            sprints: vec![sprint_record(8, "Sprint 8")],
            ..Default::default()
        };
        let (provider, _) = provider(fake);

        let result = run(
            &provider,
            ToolCall::new(CHECK_SPRINT_HEALTH)
                .with_arg("board_id", 1)
                .with_arg("sprint_name", "Sprint 8"),
        )
        .await;
        assert!(result.is_success());
        assert_eq!(result.text(), "Sprint 'Sprint 8' is empty.");
    }

    #[tokio::test]
    async fn test_backend_error_becomes_text() {
        let fake = FakeJira {
            fail_with: Some(BackendError::MissingConfig("JIRA_URL")),
            ..Default::default()
        };
        let (provider, _) = provider(fake);

        let result = run(&provider, ToolCall::new(LIST_PROJECTS)).await;
        assert!(!result.is_success());
        assert_eq!(result.text(), "Error: Missing configuration: JIRA_URL");
        assert!(result.metadata.duration_ms.is_some());
    }

    #[tokio::test]
    async fn test_update_issue_type_error_has_hint() {
        let fake = FakeJira {
            fail_with: Some(BackendError::Status {
                status: 400,
                message: "issuetype: invalid".to_string(),
            }),
            ..Default::default()
        };
        let (provider, _) = provider(fake);

        let result = run(
            &provider,
            ToolCall::new(UPDATE_ISSUE_TYPE)
                .with_arg("issue_key", "DEMO-1")
                .with_arg("new_type", "Epic"),
        )
        .await;
        assert!(result.text().starts_with("Error: HTTP 400: issuetype: invalid"));
        assert!(result.text().contains("'Move' operation"));
    }

    #[tokio::test]
    async fn test_mutating_tools_report_success() {
        let (provider, fake) = provider(FakeJira::default());

        let cases = vec![
            (
                ToolCall::new(COMMENT_ON_TICKET)
                    .with_arg("issue_key", "DEMO-1")
                    .with_arg("comment", "Looks good"),
                "Comment added to DEMO-1.",
            ),
            (
                ToolCall::new(CREATE_ISSUE)
                    .with_arg("project", "DEMO")
                    .with_arg("summary", "New")
                    .with_arg("description", "Body")
                    .with_arg("issuetype", "Bug"),
                "Issue created: DEMO-100",
            ),
            (
                ToolCall::new(LOG_WORK)
                    .with_arg("issue_key", "DEMO-1")
                    .with_arg("time_spent", "2h"),
                "Logged 2h to DEMO-1.",
            ),
            (
                ToolCall::new(LINK_ISSUES)
                    .with_arg("inward_key", "DEMO-1")
                    .with_arg("outward_key", "DEMO-2")
                    .with_arg("link_type", "Blocks"),
                "Linked DEMO-1 as Blocks DEMO-2.",
            ),
            (
                ToolCall::new(CREATE_SPRINT)
                    .with_arg("board_id", 1)
                    .with_arg("sprint_name", "Sprint 9"),
                "Sprint 'Sprint 9' created successfully! ID: 77",
            ),
            (
                ToolCall::new(ADD_ISSUE_TO_SPRINT)
                    .with_arg("issue_key", "DEMO-1")
                    .with_arg("sprint_id", "42"),
                "DEMO-1 has been added to sprint 42.",
            ),
            (
                ToolCall::new(UPDATE_ISSUE_PRIORITY)
                    .with_arg("issue_key", "DEMO-1")
                    .with_arg("priority_name", "High"),
                "Priority updated to High for DEMO-1.",
            ),
        ];

        for (call, expected) in cases {
            assert_eq!(run(&provider, call).await.text(), expected);
        }
        assert!(fake.log().contains(&"create DEMO Bug".to_string()));
    }

    #[tokio::test]
    async fn test_add_attachment_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "log line").unwrap();
        let path = file.path().to_str().unwrap().to_string();
        let (provider, fake) = provider(FakeJira::default());

        let result = run(
            &provider,
            ToolCall::new(ADD_ATTACHMENT)
                .with_arg("issue_key", "DEMO-1")
                .with_arg("file_path", path.as_str()),
        )
        .await;
        assert_eq!(result.text(), "File attached to DEMO-1.");
        assert!(fake.log()[0].ends_with(" 8"));

        let missing = run(
            &provider,
            ToolCall::new(ADD_ATTACHMENT)
                .with_arg("issue_key", "DEMO-1")
                .with_arg("file_path", "/no/such/file.txt"),
        )
        .await;
        assert!(missing.text().starts_with("Error: Cannot read /no/such/file.txt"));
    }

    #[tokio::test]
    async fn test_comments_joined() {
        let fake = FakeJira {
            comments: vec![
                Comment {
                    author: "Ann".to_string(),
                    body: "First".to_string(),
                },
                Comment {
                    author: "Bo".to_string(),
                    body: "Second".to_string(),
                },
            ],
            ..Default::default()
        };
        let (provider, _) = provider(fake);

        let result = run(
            &provider,
            ToolCall::new(GET_ISSUE_COMMENTS).with_arg("issue_key", "DEMO-1"),
        )
        .await;
        assert_eq!(result.text(), "Ann: First\n---\nBo: Second");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let (provider, _) = provider(FakeJira::default());
        let result = run(&provider, ToolCall::new("drop_database")).await;
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
    }
}
