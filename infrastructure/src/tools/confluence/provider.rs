//! Confluence tool provider

use super::backend::{ConfluenceBackend, PageRef, PageUpdate};
use crate::tools::support::{arg, comma_list, lines};
use async_trait::async_trait;
use courier_domain::tool::{
    entities::{RiskLevel, ToolCall, ToolDefinition, ToolParameter},
    provider::{ProviderError, ToolProvider},
    value_objects::{ToolError, ToolResult},
};
use std::sync::Arc;
use std::time::Instant;

pub const READ_CONFLUENCE_PAGE: &str = "read_confluence_page";
pub const SEARCH_CONFLUENCE: &str = "search_confluence";
pub const CREATE_CONFLUENCE_PAGE: &str = "create_confluence_page";
pub const CREATE_CONFLUENCE_SPACE: &str = "create_confluence_space";
pub const LIST_ALL_CONFLUENCE_SPACES: &str = "list_all_confluence_spaces";
pub const ADD_LABEL_TO_PAGE: &str = "add_label_to_page";
pub const GET_PAGE_LABELS: &str = "get_page_labels";
pub const ADD_COMMENT_TO_PAGE: &str = "add_comment_to_page";
pub const LIST_PAGE_ATTACHMENTS: &str = "list_page_attachments";
pub const DELETE_CONFLUENCE_PAGE: &str = "delete_confluence_page";
pub const UPDATE_PAGE_CONTENT: &str = "update_page_content";
pub const GET_ALL_PAGES_IN_SPACE: &str = "get_all_pages_in_space";
pub const MOVE_CONFLUENCE_PAGE: &str = "move_confluence_page";
pub const SEARCH_BY_LABEL: &str = "search_by_label";
pub const GET_CONFLUENCE_USER_DETAILS: &str = "get_confluence_user_details";

const SEARCH_LIMIT: usize = 5;
const LABEL_SEARCH_LIMIT: usize = 50;

pub fn confluence_tool_definitions() -> Vec<ToolDefinition> {
    fn page_id() -> ToolParameter {
        ToolParameter::new("page_id", "Numeric ID of the page", true)
    }

    vec![
        ToolDefinition::new(
            READ_CONFLUENCE_PAGE,
            "Reads the content of a Confluence page by ID.",
            RiskLevel::Low,
        )
        .with_parameter(page_id()),
        ToolDefinition::new(
            SEARCH_CONFLUENCE,
            "Searches Confluence pages. Provide only the search keyword.",
            RiskLevel::Low,
        )
        .with_parameter(ToolParameter::new("query", "Search keyword", true)),
        ToolDefinition::new(
            CREATE_CONFLUENCE_PAGE,
            "Creates a new page in a specific Confluence space.",
            RiskLevel::High,
        )
        .with_parameter(ToolParameter::new("space", "Space key", true))
        .with_parameter(ToolParameter::new("title", "Page title", true))
        .with_parameter(
            ToolParameter::new("body", "Page body (storage format)", true).accepting_context(),
        ),
        ToolDefinition::new(
            CREATE_CONFLUENCE_SPACE,
            "Creates a new Confluence space.",
            RiskLevel::High,
        )
        .with_parameter(ToolParameter::new(
            "space_key",
            "Short uppercase identifier (e.g., 'PROJ')",
            true,
        ))
        .with_parameter(ToolParameter::new(
            "space_name",
            "Full display name (e.g., 'Project Forge')",
            true,
        )),
        ToolDefinition::new(
            LIST_ALL_CONFLUENCE_SPACES,
            "Retrieves a list of all accessible spaces.",
            RiskLevel::Low,
        ),
        ToolDefinition::new(
            ADD_LABEL_TO_PAGE,
            "Adds a label (tag) to a Confluence page.",
            RiskLevel::High,
        )
        .with_parameter(page_id())
        .with_parameter(ToolParameter::new("label", "Label name", true)),
        ToolDefinition::new(
            GET_PAGE_LABELS,
            "Retrieves all labels attached to a page.",
            RiskLevel::Low,
        )
        .with_parameter(page_id()),
        ToolDefinition::new(
            ADD_COMMENT_TO_PAGE,
            "Adds a comment to a Confluence page.",
            RiskLevel::High,
        )
        .with_parameter(page_id())
        .with_parameter(ToolParameter::new("text", "Comment text", true).accepting_context()),
        ToolDefinition::new(
            LIST_PAGE_ATTACHMENTS,
            "Lists all files attached to a page.",
            RiskLevel::Low,
        )
        .with_parameter(page_id()),
        ToolDefinition::new(
            DELETE_CONFLUENCE_PAGE,
            "Deletes a page (moves it to trash).",
            RiskLevel::High,
        )
        .with_parameter(page_id()),
        ToolDefinition::new(
            UPDATE_PAGE_CONTENT,
            "Updates the title and content of an existing page.",
            RiskLevel::High,
        )
        .with_parameter(page_id())
        .with_parameter(ToolParameter::new("title", "New title", true))
        .with_parameter(
            ToolParameter::new("body", "New body (storage format)", true).accepting_context(),
        ),
        ToolDefinition::new(
            GET_ALL_PAGES_IN_SPACE,
            "Lists the titles and IDs of all pages within a space.",
            RiskLevel::Low,
        )
        .with_parameter(ToolParameter::new("space_key", "Space key", true)),
        ToolDefinition::new(
            MOVE_CONFLUENCE_PAGE,
            "Moves a page under a new parent page.",
            RiskLevel::High,
        )
        .with_parameter(page_id())
        .with_parameter(ToolParameter::new("target_parent_id", "ID of the new parent", true)),
        ToolDefinition::new(
            SEARCH_BY_LABEL,
            "Finds all pages that share a specific label.",
            RiskLevel::Low,
        )
        .with_parameter(ToolParameter::new("label", "Label name", true)),
        ToolDefinition::new(
            GET_CONFLUENCE_USER_DETAILS,
            "Gets details about a Confluence user.",
            RiskLevel::Low,
        )
        .with_parameter(ToolParameter::new(
            "username_or_email",
            "Display name or email of the user",
            true,
        )),
    ]
}

/// Confluence tool provider
pub struct ConfluenceProvider {
    backend: Arc<dyn ConfluenceBackend>,
}

impl ConfluenceProvider {
    pub fn new(backend: Arc<dyn ConfluenceBackend>) -> Self {
        Self { backend }
    }

    async fn execute_internal(&self, call: &ToolCall) -> Result<String, ToolError> {
        let confluence = &self.backend;
        let output = match call.tool_name.as_str() {
            READ_CONFLUENCE_PAGE => confluence.page(arg(call, "page_id")?).await?.body,
            SEARCH_CONFLUENCE => {
                let query = arg(call, "query")?;
                let pages = confluence.search(&site_search_cql(query), SEARCH_LIMIT).await?;
                if pages.is_empty() {
                    format!("No pages found matching '{}'.", query)
                } else {
                    page_lines(&pages)
                }
            }
            CREATE_CONFLUENCE_PAGE => {
                let space = arg(call, "space")?;
                let title = arg(call, "title")?;
                confluence
                    .create_page(space, title, arg(call, "body")?)
                    .await?;
                format!("Page '{}' created in space {}.", title, space)
            }
            CREATE_CONFLUENCE_SPACE => {
                let key = arg(call, "space_key")?.to_uppercase();
                let name = arg(call, "space_name")?;
                confluence.create_space(&key, name).await?;
                format!("Space '{}' ({}) created successfully!", name, key)
            }
            LIST_ALL_CONFLUENCE_SPACES => {
                let spaces = confluence.spaces().await?;
                if spaces.is_empty() {
                    "No spaces found or you do not have permission to view them.".to_string()
                } else {
                    format!(
                        "Available Spaces:\n{}",
                        lines(&spaces, |s| format!("Key: {} | Name: {}", s.key, s.name))
                    )
                }
            }
            ADD_LABEL_TO_PAGE => {
                let page_id = arg(call, "page_id")?;
                let label = arg(call, "label")?;
                confluence.add_label(page_id, label).await?;
                format!("Label '{}' added to page {}.", label, page_id)
            }
            GET_PAGE_LABELS => {
                let page_id = arg(call, "page_id")?;
                let labels = confluence.labels(page_id).await?;
                format!("Labels for {}: {}", page_id, comma_list(&labels))
            }
            ADD_COMMENT_TO_PAGE => {
                let page_id = arg(call, "page_id")?;
                confluence.add_comment(page_id, arg(call, "text")?).await?;
                format!("Comment added to page {}.", page_id)
            }
            LIST_PAGE_ATTACHMENTS => {
                let files = confluence.attachments(arg(call, "page_id")?).await?;
                format!("Attachments: {}", comma_list(&files))
            }
            DELETE_CONFLUENCE_PAGE => {
                let page_id = arg(call, "page_id")?;
                confluence.delete_page(page_id).await?;
                format!("Page {} moved to trash.", page_id)
            }
            UPDATE_PAGE_CONTENT => {
                let page_id = arg(call, "page_id")?;
                let current = confluence.page(page_id).await?;
                let update = PageUpdate::next(&current, arg(call, "title")?, arg(call, "body")?);
                confluence.update_page(&update).await?;
                format!("Page {} updated successfully.", page_id)
            }
            GET_ALL_PAGES_IN_SPACE => {
                let space_key = arg(call, "space_key")?;
                let pages = confluence.pages_in_space(space_key).await?;
                if pages.is_empty() {
                    format!("No pages found in space {}.", space_key)
                } else {
                    format!("Pages in {}:\n{}", space_key, page_lines(&pages))
                }
            }
            MOVE_CONFLUENCE_PAGE => {
                let page_id = arg(call, "page_id")?;
                let parent_id = arg(call, "target_parent_id")?;
                // Title and body are resent unchanged; only the ancestor moves
                let current = confluence.page(page_id).await?;
                let update = PageUpdate::next(&current, current.title.clone(), current.body.clone())
                    .with_parent(parent_id);
                confluence.update_page(&update).await?;
                format!("Page {} moved under parent {}.", page_id, parent_id)
            }
            SEARCH_BY_LABEL => {
                let label = arg(call, "label")?;
                let pages = confluence
                    .search(&label_cql(label), LABEL_SEARCH_LIMIT)
                    .await?;
                if pages.is_empty() {
                    format!("No pages found with label '{}'.", label)
                } else {
                    format!("Pages with label '{}':\n{}", label, page_lines(&pages))
                }
            }
            GET_CONFLUENCE_USER_DETAILS => {
                let user = confluence.user(arg(call, "username_or_email")?).await?;
                format!("User: {} | AccountID: {}", user.display_name, user.account_id)
            }
            other => {
                return Err(ToolError::not_found(format!(
                    "Unknown Confluence tool: {}",
                    other
                )));
            }
        };

        Ok(output)
    }
}

#[async_trait]
impl ToolProvider for ConfluenceProvider {
    fn id(&self) -> &str {
        "confluence"
    }

    fn display_name(&self) -> &str {
        "Confluence"
    }

    async fn discover_tools(&self) -> Result<Vec<ToolDefinition>, ProviderError> {
        Ok(confluence_tool_definitions())
    }

    fn aliases(&self) -> Vec<(&'static str, &'static str)> {
        vec![
            ("read_page", READ_CONFLUENCE_PAGE),
            ("create_page", CREATE_CONFLUENCE_PAGE),
            ("search_pages", SEARCH_CONFLUENCE),
            ("list_spaces", LIST_ALL_CONFLUENCE_SPACES),
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

fn page_lines(pages: &[PageRef]) -> String {
    lines(pages, |p| format!("ID: {} | Title: {}", p.id, p.title))
}

fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\\\""))
}

pub fn site_search_cql(query: &str) -> String {
    format!("siteSearch ~ {}", quoted(query))
}

pub fn label_cql(label: &str) -> String {
    format!("label = {} AND type = page", quoted(label))
}
