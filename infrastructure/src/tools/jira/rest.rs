//! Jira Cloud REST client (`/rest/api/2`, `/rest/agile/1.0`).

use super::backend::{
    Attachment, Comment, IssueDetails, IssueSummary, JiraBackend, NewIssue, NewSprint, Project,
    Sprint, Transition,
};
use crate::http::{BackendError, RestClient, segment};
use async_trait::async_trait;
use reqwest::Method;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const SEARCH_PAGE_SIZE: usize = 100;
const SPRINT_PAGE_SIZE: i64 = 50;

/// [`JiraBackend`] over HTTP with basic auth
pub struct JiraRestClient {
    http: RestClient,
}

impl JiraRestClient {
    pub fn new(http: RestClient) -> Self {
        Self { http }
    }
}

// ==================== Wire types ====================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    start_at: usize,
    total: Option<usize>,
    #[serde(default)]
    issues: Vec<RawIssue>,
}

impl SearchResponse {
    /// Offset of the following page, or `None` when every match is fetched
    fn next_start(&self) -> Option<usize> {
        let next = self.start_at + self.issues.len();
        match self.total {
            Some(total) if !self.issues.is_empty() && next < total => Some(next),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
struct RawIssue {
    key: String,
    fields: RawFields,
}

#[derive(Deserialize)]
struct RawFields {
    #[serde(default)]
    summary: String,
    status: Option<RawStatus>,
    assignee: Option<RawUser>,
    description: Option<String>,
}

#[derive(Deserialize)]
struct RawStatus {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUser {
    display_name: Option<String>,
    account_id: Option<String>,
}

impl RawUser {
    fn label(self) -> String {
        self.display_name
            .or(self.account_id)
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

#[derive(Deserialize)]
struct CreatedIssue {
    key: String,
}

#[derive(Deserialize)]
struct CommentsResponse {
    #[serde(default)]
    comments: Vec<RawComment>,
}

#[derive(Deserialize)]
struct RawComment {
    author: Option<RawUser>,
    #[serde(default)]
    body: String,
}

#[derive(Deserialize)]
struct TransitionsResponse {
    #[serde(default)]
    transitions: Vec<RawTransition>,
}

#[derive(Deserialize)]
struct RawTransition {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct RawProject {
    key: String,
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SprintPage {
    #[serde(default)]
    values: Vec<RawSprint>,
    #[serde(default = "default_true")]
    is_last: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Deserialize)]
struct RawSprint {
    id: i64,
    name: String,
    state: Option<String>,
}

impl From<RawSprint> for Sprint {
    fn from(raw: RawSprint) -> Self {
        Sprint {
            id: raw.id,
            name: raw.name,
            state: raw.state,
        }
    }
}

fn status_name(status: Option<RawStatus>) -> String {
    status.map(|s| s.name).unwrap_or_else(|| "Unknown".to_string())
}

// ==================== Backend ====================

#[async_trait]
impl JiraBackend for JiraRestClient {
    async fn search(&self, jql: &str) -> Result<Vec<IssueSummary>, BackendError> {
        let mut issues = Vec::new();
        let mut start_at = 0usize;

        loop {
            let page: SearchResponse = self
                .http
                .get_json(
                    "/rest/api/2/search",
                    &[
                        ("jql", jql.to_string()),
                        ("fields", "summary,status".to_string()),
                        ("startAt", start_at.to_string()),
                        ("maxResults", SEARCH_PAGE_SIZE.to_string()),
                    ],
                )
                .await?;

            let next = page.next_start();
            issues.extend(page.issues.into_iter().map(|issue| IssueSummary {
                key: issue.key,
                summary: issue.fields.summary,
                status: status_name(issue.fields.status),
            }));
            match next {
                Some(next) => start_at = next,
                None => break,
            }
        }

        debug!(count = issues.len(), "Fetched search results");
        Ok(issues)
    }

    async fn issue(&self, key: &str) -> Result<IssueDetails, BackendError> {
        let issue: RawIssue = self
            .http
            .get_json(
                &format!("/rest/api/2/issue/{}", segment(key)),
                &[("fields", "summary,status,assignee,description".to_string())],
            )
            .await?;

        Ok(IssueDetails {
            key: issue.key,
            summary: issue.fields.summary,
            status: status_name(issue.fields.status),
            assignee: issue.fields.assignee.map(RawUser::label),
            description: issue.fields.description,
        })
    }

    async fn create_issue(&self, issue: &NewIssue) -> Result<String, BackendError> {
        let body = json!({
            "fields": {
                "project": { "key": issue.project },
                "summary": issue.summary,
                "description": issue.description,
                "issuetype": { "name": issue.issue_type },
            }
        });
        let created: CreatedIssue = self.http.post_json("/rest/api/2/issue", &body).await?;
        Ok(created.key)
    }

    async fn update_fields(
        &self,
        key: &str,
        fields: serde_json::Value,
    ) -> Result<(), BackendError> {
        self.http
            .put(&format!("/rest/api/2/issue/{}", segment(key)), &json!({ "fields": fields }))
            .await
    }

    async fn add_comment(&self, key: &str, body: &str) -> Result<(), BackendError> {
        self.http
            .post(
                &format!("/rest/api/2/issue/{}/comment", segment(key)),
                &json!({ "body": body }),
            )
            .await
    }

    async fn comments(&self, key: &str) -> Result<Vec<Comment>, BackendError> {
        let response: CommentsResponse = self
            .http
            .get_json(&format!("/rest/api/2/issue/{}/comment", segment(key)), &[])
            .await?;

        Ok(response
            .comments
            .into_iter()
            .map(|c| Comment {
                author: c
                    .author
                    .map(RawUser::label)
                    .unwrap_or_else(|| "Unknown".to_string()),
                body: c.body,
            })
            .collect())
    }

    async fn transitions(&self, key: &str) -> Result<Vec<Transition>, BackendError> {
        let response: TransitionsResponse = self
            .http
            .get_json(&format!("/rest/api/2/issue/{}/transitions", segment(key)), &[])
            .await?;

        Ok(response
            .transitions
            .into_iter()
            .map(|t| Transition {
                id: t.id,
                name: t.name,
            })
            .collect())
    }

    async fn transition(&self, key: &str, transition_id: &str) -> Result<(), BackendError> {
        self.http
            .post(
                &format!("/rest/api/2/issue/{}/transitions", segment(key)),
                &json!({ "transition": { "id": transition_id } }),
            )
            .await
    }

    async fn assign(&self, key: &str, account_id: &str) -> Result<(), BackendError> {
        self.http
            .put(
                &format!("/rest/api/2/issue/{}/assignee", segment(key)),
                &json!({ "accountId": account_id }),
            )
            .await
    }

    async fn attach(&self, key: &str, attachment: Attachment) -> Result<(), BackendError> {
        let part = Part::bytes(attachment.content).file_name(attachment.file_name);
        let builder = self
            .http
            .request(Method::POST, &format!("/rest/api/2/issue/{}/attachments", segment(key)))?
            .header("X-Atlassian-Token", "no-check")
            .multipart(Form::new().part("file", part));
        self.http.send(builder).await.map(|_| ())
    }

    async fn add_worklog(&self, key: &str, time_spent: &str) -> Result<(), BackendError> {
        self.http
            .post(
                &format!("/rest/api/2/issue/{}/worklog", segment(key)),
                &json!({ "timeSpent": time_spent }),
            )
            .await
    }

    async fn projects(&self) -> Result<Vec<Project>, BackendError> {
        let projects: Vec<RawProject> = self.http.get_json("/rest/api/2/project", &[]).await?;
        Ok(projects
            .into_iter()
            .map(|p| Project {
                key: p.key,
                name: p.name,
            })
            .collect())
    }

    async fn link(
        &self,
        link_type: &str,
        inward: &str,
        outward: &str,
    ) -> Result<(), BackendError> {
        self.http
            .post(
                "/rest/api/2/issueLink",
                &json!({
                    "type": { "name": link_type },
                    "inwardIssue": { "key": inward },
                    "outwardIssue": { "key": outward },
                }),
            )
            .await
    }

    async fn sprints(&self, board_id: i64) -> Result<Vec<Sprint>, BackendError> {
        let path = format!("/rest/agile/1.0/board/{}/sprint", board_id);
        let mut sprints = Vec::new();
        let mut start_at = 0i64;

        loop {
            let page: SprintPage = self
                .http
                .get_json(
                    &path,
                    &[
                        ("startAt", start_at.to_string()),
                        ("maxResults", SPRINT_PAGE_SIZE.to_string()),
                    ],
                )
                .await?;

            let fetched = page.values.len() as i64;
            sprints.extend(page.values.into_iter().map(Sprint::from));
            if page.is_last || fetched == 0 {
                break;
            }
            start_at += fetched;
        }

        debug!(board_id, count = sprints.len(), "Fetched sprints");
        Ok(sprints)
    }

    async fn create_sprint(&self, sprint: &NewSprint) -> Result<Sprint, BackendError> {
        let mut body = json!({
            "name": sprint.name,
            "originBoardId": sprint.board_id,
        });
        if let Some(start) = &sprint.start_date {
            body["startDate"] = json!(start);
        }
        if let Some(end) = &sprint.end_date {
            body["endDate"] = json!(end);
        }

        let created: RawSprint = self.http.post_json("/rest/agile/1.0/sprint", &body).await?;
        Ok(created.into())
    }

    async fn move_to_sprint(&self, sprint_id: i64, keys: &[String]) -> Result<(), BackendError> {
        self.http
            .post(
                &format!("/rest/agile/1.0/sprint/{}/issue", sprint_id),
                &json!({ "issues": keys }),
            )
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Auth;
    use std::time::Duration;

    #[test]
    fn test_decode_search_response() {
        let body = r#"{
            "issues": [
                {"key": "DEMO-1", "fields": {"summary": "Login fails", "status": {"name": "To Do"}}},
                {"key": "DEMO-2", "fields": {"summary": "Crash", "status": null}}
            ]
        }"#;
        let response: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.issues.len(), 2);
        assert_eq!(response.issues[0].key, "DEMO-1");
        assert_eq!(status_name(response.issues.into_iter().nth(1).unwrap().fields.status), "Unknown");
    }

    #[test]
    fn test_search_pages_until_total() {
        let issue = r#"{"key": "DEMO-1", "fields": {"summary": "A", "status": {"name": "Done"}}}"#;
        let issues = |n: usize| vec![issue; n].join(",");

        let first = format!(r#"{{"startAt": 0, "maxResults": 100, "total": 150, "issues": [{}]}}"#, issues(100));
        let first: SearchResponse = serde_json::from_str(&first).unwrap();
        assert_eq!(first.next_start(), Some(100));

        let second = format!(r#"{{"startAt": 100, "maxResults": 100, "total": 150, "issues": [{}]}}"#, issues(50));
        let second: SearchResponse = serde_json::from_str(&second).unwrap();
        assert_eq!(second.issues.len(), 50);
        assert_eq!(second.next_start(), None);
    }

    #[test]
    fn test_search_stops_on_empty_or_untotalled_page() {
        let empty: SearchResponse =
            serde_json::from_str(r#"{"startAt": 100, "total": 150, "issues": []}"#).unwrap();
        assert_eq!(empty.next_start(), None);

        let untotalled: SearchResponse = serde_json::from_str(
            r#"{"issues": [{"key": "DEMO-1", "fields": {"summary": "A"}}]}"#,
        )
        .unwrap();
        assert_eq!(untotalled.next_start(), None);
    }

    #[test]
    fn test_decode_sprint_page() {
        let body = r#"{"maxResults":50,"startAt":0,"isLast":false,"values":[{"id":7,"name":"Sprint 7","state":"active"}]}"#;
        let page: SprintPage = serde_json::from_str(body).unwrap();
        assert!(!page.is_last);
        assert_eq!(Sprint::from(page.values.into_iter().next().unwrap()).id, 7);
    }

    #[test]
    fn test_decode_comment_author_fallback() {
        let body = r#"{"comments":[{"author":{"accountId":"abc"},"body":"hi"},{"body":"anon"}]}"#;
        let response: CommentsResponse = serde_json::from_str(body).unwrap();
        let authors: Vec<String> = response
            .comments
            .into_iter()
            .map(|c| c.author.map(RawUser::label).unwrap_or_else(|| "Unknown".to_string()))
            .collect();
        assert_eq!(authors, vec!["abc", "Unknown"]);
    }

    #[tokio::test]
    async fn test_unconfigured_client_fails_without_network() {
        let client = JiraRestClient::new(RestClient::new(
            None,
            "JIRA_URL",
            Auth::Basic {
                email: None,
                token: None,
            },
            Duration::from_secs(1),
        ));
        assert_eq!(
            client.projects().await.unwrap_err(),
            BackendError::MissingConfig("JIRA_URL")
        );
    }
}
