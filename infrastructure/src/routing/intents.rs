//! Per-system tool selection.
//!
//! Each function walks its system's intents from most to least specific and
//! stops at the first that applies. A missing argument becomes a question for
//! the user rather than a guess.
//!
//! Parameters that accept context (a page body, a comment) are left unset when
//! the sub-request carries a hand-off; the agent runner binds them verbatim.

use super::cues::Cues;
use crate::tools::confluence::provider as confluence;
use crate::tools::github::provider as github;
use crate::tools::jira::provider as jira;
use courier_domain::{ToolCall, ToolSelection};

pattern!(
    pub(super) jira_write_re,
    r"(?i)\b(?:create|open|file|raise)\s+(?:a\s+|an\s+)?(?:new\s+)?(?:jira\s+)?(?:ticket|issue|bug|story|task)\b|\b(?:into|to|as)\s+(?:a\s+|an\s+)?(?:new\s+)?jira\s+(?:ticket|issue)\b|\bcomment\s+on\s+(?:the\s+)?(?:jira\s+)?(?:ticket\b|[a-z][a-z0-9]+-\d+)"
);
pattern!(
    pub(super) confluence_write_re,
    r"(?i)\b(?:into|to|in|on|as)\s+(?:a\s+|the\s+)?(?:new\s+)?(?:confluence\s+)?(?:page|wiki)\b|\b(?:create|write|publish|make|post)\s+(?:a\s+|the\s+)?(?:new\s+)?(?:confluence\s+)?page\b"
);
pattern!(
    pub(super) github_write_re,
    r"(?i)\bcomment\s+on\s+(?:the\s+)?(?:github\s+)?(?:pr\b|pull\s+request|[\w.-]+/[\w.-]+)|\b(?:to|on|into)\s+(?:the\s+)?(?:github\s+)?(?:pr|pull\s+request)\b"
);
pattern!(create_issue_re, r"(?i)\b(?:create|open|file|raise)\s+(?:a\s+|an\s+)?(?:new\s+)?(?:jira\s+)?(?:ticket|issue|bug|story|task)\b|\b(?:into|as)\s+(?:a\s+|an\s+)?(?:new\s+)?jira\s+(?:ticket|issue)\b");
pattern!(issue_type_word_re, r"(?i)\b(bug|story|task|epic)\b");

const MY_OPEN_ISSUES_JQL: &str = "assignee = currentUser() AND resolution is EMPTY ORDER BY updated DESC";
const TITLE_LIMIT: usize = 120;

fn one(call: ToolCall) -> ToolSelection {
    ToolSelection::calls(vec![call])
}

fn ask(question: impl Into<String>) -> ToolSelection {
    ToolSelection::clarify(question)
}

pub(super) fn jira(c: &Cues, context: Option<&str>) -> ToolSelection {
    let from_context = context.map(Cues::new);
    let keys: Vec<String> = c.issue_keys().into_iter().map(str::to_string).collect();
    let key = keys.first().cloned().or_else(|| {
        from_context
            .as_ref()
            .and_then(|cx| cx.issue_key())
            .map(str::to_string)
    });

    if c.has("health") {
        let Some(board) = c.board_id() else {
            return ask("Which board is the sprint on? Give the board ID, e.g. 'board 3'.");
        };
        let Some(name) = c.first_quoted() else {
            return ask("Which sprint should I check? Put the sprint name in quotes.");
        };
        return one(
            ToolCall::new(jira::CHECK_SPRINT_HEALTH)
                .with_arg("board_id", board)
                .with_arg("sprint_name", name),
        );
    }

    if c.has("backlog") {
        let Some(project) = c.project_key() else {
            return ask("Which project key should I list the backlog for?");
        };
        return one(ToolCall::new(jira::GET_BACKLOG_TICKETS).with_arg("project_key", project));
    }

    if c.has_any(&["sprint", "sprints"]) {
        if let Some(selection) = jira_sprint(c, key.as_deref()) {
            return selection;
        }
    }

    if c.has("transitions") {
        let Some(key) = key else {
            return ask("Which ticket should I list transitions for?");
        };
        return one(ToolCall::new(jira::GET_TRANSITIONS).with_arg("issue_key", key));
    }

    if let Some(key) = &key {
        if c.has_any(&["move", "transition", "mark", "status", "close", "resolve", "reopen"]) {
            return match c.status_target() {
                Some(status) => one(
                    ToolCall::new(jira::UPDATE_TICKET_STATUS)
                        .with_arg("issue_key", key.as_str())
                        .with_arg("status_name", status),
                ),
                // Show what is possible so the user can pick
                None => one(ToolCall::new(jira::GET_TRANSITIONS).with_arg("issue_key", key.as_str())),
            };
        }
    }

    if c.has("comments") || (c.has("comment") && c.has_any(&["list", "show", "read", "get"])) {
        let Some(key) = key else {
            return ask("Which ticket's comments should I show?");
        };
        return one(ToolCall::new(jira::GET_ISSUE_COMMENTS).with_arg("issue_key", key));
    }

    if c.has("comment") && (key.is_some() || c.matches(jira_write_re())) {
        let Some(key) = key else {
            return ask("Which ticket should I comment on?");
        };
        let call = ToolCall::new(jira::COMMENT_ON_TICKET).with_arg("issue_key", key.as_str());
        return match (c.first_quoted(), context) {
            (Some(text), _) => one(call.with_arg("comment", text)),
            (None, Some(_)) => one(call),
            (None, None) => ask(format!("What should the comment on {} say?", key)),
        };
    }

    if c.has("assign") {
        let Some(key) = key else {
            return ask("Which ticket should I assign?");
        };
        let Some(account) = c.account_id() else {
            return ask(format!("Who should {} be assigned to? Give their account ID.", key));
        };
        return one(
            ToolCall::new(jira::ASSIGN_ISSUE)
                .with_arg("issue_key", key)
                .with_arg("account_id", account),
        );
    }

    if c.has_any(&["attach", "attachment"]) {
        let Some(key) = key else {
            return ask("Which ticket should the file be attached to?");
        };
        let Some(path) = c.file_path() else {
            return ask("Which file should I attach? Give its path.");
        };
        return one(
            ToolCall::new(jira::ADD_ATTACHMENT)
                .with_arg("issue_key", key)
                .with_arg("file_path", path),
        );
    }

    if c.has_any(&["log", "worklog", "spent"]) {
        if let Some(key) = &key {
            let Some(time) = c.time_spent() else {
                return ask(format!("How much time should I log on {}? e.g. '2h'", key));
            };
            return one(
                ToolCall::new(jira::LOG_WORK)
                    .with_arg("issue_key", key.as_str())
                    .with_arg("time_spent", time),
            );
        }
    }

    if c.has("priority") {
        let Some(key) = key else {
            return ask("Which ticket's priority should I change?");
        };
        let Some(priority) = c.priority() else {
            return ask(format!("Which priority should {} get?", key));
        };
        return one(
            ToolCall::new(jira::UPDATE_ISSUE_PRIORITY)
                .with_arg("issue_key", key)
                .with_arg("priority_name", priority),
        );
    }

    if keys.len() >= 2 && (c.has("link") || c.link_type().is_some()) {
        let mut call = ToolCall::new(jira::LINK_ISSUES)
            .with_arg("inward_key", keys[0].as_str())
            .with_arg("outward_key", keys[1].as_str());
        if let Some(link_type) = c.link_type() {
            call = call.with_arg("link_type", link_type);
        }
        return one(call);
    }

    if c.has("type") && !c.matches(create_issue_re()) {
        if let Some(key) = &key {
            let Some(new_type) = c.issue_type() else {
                return ask(format!("Which issue type should {} become?", key));
            };
            return one(
                ToolCall::new(jira::UPDATE_ISSUE_TYPE)
                    .with_arg("issue_key", key.as_str())
                    .with_arg("new_type", new_type),
            );
        }
    }

    if c.matches(create_issue_re()) {
        return jira_create_issue(c, context, from_context.as_ref());
    }

    if c.has("projects") {
        return one(ToolCall::new(jira::LIST_PROJECTS));
    }

    if let Some(jql) = c.jql() {
        return one(ToolCall::new(jira::SEARCH_JIRA).with_arg("jql_query", jql));
    }

    if !keys.is_empty() {
        return ToolSelection::calls(
            dedup(keys)
                .into_iter()
                .map(|k| ToolCall::new(jira::GET_ISSUE_DETAILS).with_arg("issue_key", k))
                .collect(),
        );
    }

    if c.phrase("assigned to me") || c.phrase("my tickets") || c.phrase("my issues") {
        return one(ToolCall::new(jira::SEARCH_JIRA).with_arg("jql_query", MY_OPEN_ISSUES_JQL));
    }

    if let Some(project) = c.project_key() {
        if c.has_any(&["tickets", "issues", "list", "show", "search"]) {
            return one(ToolCall::new(jira::SEARCH_JIRA).with_arg(
                "jql_query",
                format!("project = '{}' ORDER BY created DESC", project.replace('\'', "\\'")),
            ));
        }
    }

    ask("Which ticket or project do you mean? Give an issue key like DEMO-5 or a project key.")
}

/// Sprint intents; `None` when the text mentions a sprint without asking for one
fn jira_sprint(c: &Cues, key: Option<&str>) -> Option<ToolSelection> {
    let board = c.board_id();
    let name = c.first_quoted();

    if let Some(key) = key.filter(|_| c.has_any(&["add", "move", "put", "into"])) {
        if let Some(sprint_id) = c.sprint_id() {
            return Some(one(
                ToolCall::new(jira::ADD_ISSUE_TO_SPRINT)
                    .with_arg("issue_key", key)
                    .with_arg("sprint_id", sprint_id),
            ));
        }
        let Some(name) = name else {
            return Some(ask(format!(
                "Which sprint should {} go into? Give the sprint ID or its name in quotes.",
                key
            )));
        };
        let Some(board) = board else {
            return Some(ask(format!("Which board is sprint '{}' on?", name)));
        };
        return Some(one(
            ToolCall::new(jira::ADD_ISSUE_TO_SPRINT_BY_NAME)
                .with_arg("issue_key", key)
                .with_arg("board_id", board)
                .with_arg("sprint_name", name),
        ));
    }

    if c.has_any(&["create", "new", "start"]) {
        let Some(name) = name else {
            return Some(ask("What should the new sprint be called? Put the name in quotes."));
        };
        let Some(board) = board else {
            return Some(ask(format!("Which board should sprint '{}' be created on?", name)));
        };
        return Some(one(
            ToolCall::new(jira::CREATE_SPRINT)
                .with_arg("board_id", board)
                .with_arg("sprint_name", name),
        ));
    }

    if c.has("id") {
        if let Some(name) = name {
            let Some(board) = board else {
                return Some(ask(format!("Which board is sprint '{}' on?", name)));
            };
            return Some(one(
                ToolCall::new(jira::GET_SPRINT_ID_BY_NAME)
                    .with_arg("board_id", board)
                    .with_arg("sprint_name", name),
            ));
        }
    }

    c.sprint_id().map(|id| one(ToolCall::new(jira::GET_SPRINT_ISSUES).with_arg("sprint_id", id)))
}

fn jira_create_issue(c: &Cues, context: Option<&str>, from_context: Option<&Cues>) -> ToolSelection {
    let Some(project) = c
        .project_key()
        .or_else(|| from_context.and_then(|cx| cx.project_key()))
    else {
        return ask("Which project should the ticket be created in?");
    };

    let summary = c
        .titled()
        .or_else(|| c.first_quoted())
        .map(str::to_string)
        .or_else(|| context.and_then(summary_line));
    let Some(summary) = summary else {
        return ask("What should the ticket's summary be? Put it in quotes.");
    };

    let mut call = ToolCall::new(jira::CREATE_ISSUE)
        .with_arg("project", project)
        .with_arg("summary", summary.as_str());
    if context.is_none() {
        call = call.with_arg("description", summary.as_str());
    }
    if let Some(kind) = issue_type_word_re()
        .captures(c.text())
        .and_then(|m| m.get(1))
        .map(|m| m.as_str().to_lowercase())
        .filter(|k| k != "story")
    {
        let mut chars = kind.chars();
        let kind: String = chars
            .next()
            .map(|f| f.to_uppercase().chain(chars).collect())
            .unwrap_or_default();
        call = call.with_arg("issuetype", kind);
    }
    one(call)
}

pub(super) fn confluence(c: &Cues, context: Option<&str>) -> ToolSelection {
    let page_id = c.page_id();

    if c.has("user") {
        let Some(user) = c.user() else {
            return ask("Which Confluence user should I look up? Give a name or email.");
        };
        return one(
            ToolCall::new(confluence::GET_CONFLUENCE_USER_DETAILS)
                .with_arg("username_or_email", user),
        );
    }

    if c.has("spaces") && !c.has("create") {
        return one(ToolCall::new(confluence::LIST_ALL_CONFLUENCE_SPACES));
    }

    if c.has("create") && c.has("space") && !c.has_any(&["page", "wiki"]) {
        let Some(key) = c.space_key() else {
            return ask("What key should the new space have? e.g. 'space PROJ'");
        };
        let Some(name) = c.titled().or_else(|| c.first_quoted()) else {
            return ask(format!("What should space {} be called? Put the name in quotes.", key));
        };
        return one(
            ToolCall::new(confluence::CREATE_CONFLUENCE_SPACE)
                .with_arg("space_key", key)
                .with_arg("space_name", name),
        );
    }

    if c.has("move") {
        if let Some(page_id) = &page_id {
            let Some(parent) = c.parent_id() else {
                return ask(format!("Which page should page {} be moved under?", page_id));
            };
            return one(
                ToolCall::new(confluence::MOVE_CONFLUENCE_PAGE)
                    .with_arg("page_id", page_id.as_str())
                    .with_arg("target_parent_id", parent),
            );
        }
    }

    if c.has_any(&["delete", "remove", "trash"]) && !c.has("label") {
        let Some(page_id) = page_id else {
            return ask("Which page should I delete? Give its page ID.");
        };
        return one(ToolCall::new(confluence::DELETE_CONFLUENCE_PAGE).with_arg("page_id", page_id));
    }

    if c.has_any(&["update", "edit", "rewrite", "replace"]) {
        let Some(page_id) = page_id else {
            return ask("Which page should I update? Give its page ID.");
        };
        let Some(title) = c.titled().or_else(|| c.first_quoted()) else {
            return ask(format!("What title should page {} have? Put it in quotes.", page_id));
        };
        let call = ToolCall::new(confluence::UPDATE_PAGE_CONTENT)
            .with_arg("page_id", page_id.as_str())
            .with_arg("title", title);
        return match (context, c.quoted().get(1)) {
            (Some(_), _) => one(call),
            (None, Some(body)) => one(call.with_arg("body", *body)),
            (None, None) => ask(format!("What should page {} say?", page_id)),
        };
    }

    if c.has("attachments") || c.has("attachment") {
        let Some(page_id) = page_id else {
            return ask("Which page's attachments should I list?");
        };
        return one(ToolCall::new(confluence::LIST_PAGE_ATTACHMENTS).with_arg("page_id", page_id));
    }

    if let (true, Some(page_id)) = (c.has("labels"), &page_id) {
        return one(ToolCall::new(confluence::GET_PAGE_LABELS).with_arg("page_id", page_id.as_str()));
    }

    if c.has_any(&["label", "labeled", "labelled", "tag"]) {
        if let (Some(page_id), true) = (&page_id, c.has_any(&["add", "tag", "set", "put"])) {
            let Some(label) = c.label() else {
                return ask(format!("Which label should page {} get?", page_id));
            };
            return one(
                ToolCall::new(confluence::ADD_LABEL_TO_PAGE)
                    .with_arg("page_id", page_id.as_str())
                    .with_arg("label", label),
            );
        }
        if let Some(label) = c.label() {
            return one(ToolCall::new(confluence::SEARCH_BY_LABEL).with_arg("label", label));
        }
    }

    if c.has("comment") {
        let Some(page_id) = page_id else {
            return ask("Which page should I comment on? Give its page ID.");
        };
        let call = ToolCall::new(confluence::ADD_COMMENT_TO_PAGE).with_arg("page_id", page_id.as_str());
        return match (c.first_quoted(), context) {
            (Some(text), _) => one(call.with_arg("text", text)),
            (None, Some(_)) => one(call),
            (None, None) => ask(format!("What should the comment on page {} say?", page_id)),
        };
    }

    let writes_page = c.matches(confluence_write_re())
        || (c.has_any(&["create", "new", "publish", "write"]) && c.has_any(&["page", "wiki"]));
    if writes_page {
        return confluence_create_page(c, context);
    }

    if c.has("pages") {
        if let Some(space) = c.space_key() {
            return one(ToolCall::new(confluence::GET_ALL_PAGES_IN_SPACE).with_arg("space_key", space));
        }
    }

    if let Some(page_id) = page_id {
        return one(ToolCall::new(confluence::READ_CONFLUENCE_PAGE).with_arg("page_id", page_id));
    }

    if let Some(query) = c.search_query() {
        return one(ToolCall::new(confluence::SEARCH_CONFLUENCE).with_arg("query", query));
    }

    ask("What should I look for in Confluence? Give a page ID or search keywords.")
}

fn confluence_create_page(c: &Cues, context: Option<&str>) -> ToolSelection {
    let Some(space) = c.space_key() else {
        return ask("Which space should the page go in? e.g. 'space TEAM'");
    };

    let key_in_play = c
        .issue_key()
        .map(str::to_string)
        .or_else(|| context.and_then(|cx| Cues::new(cx).issue_key().map(str::to_string)));
    let title = c
        .titled()
        .or_else(|| c.first_quoted())
        .map(str::to_string)
        .or_else(|| key_in_play.map(|k| format!("Summary of {}", k)))
        .or_else(|| context.and_then(summary_line));
    let Some(title) = title else {
        return ask("What should the page be titled? Put the title in quotes.");
    };

    let call = ToolCall::new(confluence::CREATE_CONFLUENCE_PAGE)
        .with_arg("space", space)
        .with_arg("title", title.as_str());
    if context.is_some() {
        return one(call);
    }
    match c.quoted().into_iter().find(|q| *q != title) {
        Some(body) => one(call.with_arg("body", body)),
        None => ask(format!("What should the page '{}' say?", title)),
    }
}

pub(super) fn github(c: &Cues, context: Option<&str>) -> ToolSelection {
    let repo = c.repo();
    let number = c.pr_number();

    if c.has("comment") || c.matches(github_write_re()) {
        let Some(repo) = repo else {
            return ask("Which repository is the pull request in? Give it as owner/name.");
        };
        let Some(number) = number else {
            return ask(format!("Which pull request in {} should I comment on?", repo));
        };
        let call = ToolCall::new(github::CREATE_ISSUE_COMMENT)
            .with_arg("repo", repo.as_str())
            .with_arg("number", number);
        return match (c.first_quoted(), context) {
            (Some(body), _) => one(call.with_arg("body", body)),
            (None, Some(_)) => one(call),
            (None, None) => ask(format!("What should the comment on {}#{} say?", repo, number)),
        };
    }

    if let (Some(repo), Some(number)) = (&repo, number) {
        return one(
            ToolCall::new(github::GET_PULL_REQUEST)
                .with_arg("repo", repo.as_str())
                .with_arg("number", number),
        );
    }

    if c.has_any(&["pr", "prs", "pull", "pulls"]) || repo.is_some() {
        let Some(repo) = repo else {
            return ask("Which repository's pull requests? Give it as owner/name.");
        };
        return one(
            ToolCall::new(github::LIST_PULL_REQUESTS)
                .with_arg("repo", repo)
                .with_arg("state", c.pr_state()),
        );
    }

    if c.has_any(&["repo", "repos", "repository", "repositories"]) {
        let mut call = ToolCall::new(github::LIST_REPOSITORIES);
        if let Some(owner) = c.owner() {
            call = call.with_arg("owner", owner);
        }
        return one(call);
    }

    ask("Which repository do you mean? Give it as owner/name.")
}

/// `Summary: ...` line of a ticket block, else the first non-empty line
fn summary_line(text: &str) -> Option<String> {
    let lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
    let line = lines
        .clone()
        .find_map(|l| l.strip_prefix("Summary:").map(str::trim))
        .or_else(|| lines.clone().next())?;
    let line = line.trim_start_matches(['#', '-', '*', ' ']);
    (!line.is_empty()).then(|| line.chars().take(TITLE_LIMIT).collect())
}

fn dedup(keys: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for key in keys {
        if !seen.contains(&key) {
            seen.push(key);
        }
    }
    seen
}
