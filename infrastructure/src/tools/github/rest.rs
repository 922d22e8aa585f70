//! GitHub REST client (`api.github.com` or an Enterprise API root).

use super::backend::{GithubBackend, PullDetails, PullSummary, Repository};
use crate::http::{BackendError, RestClient, repo_path, segment};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const PER_PAGE: &str = "100";

/// [`GithubBackend`] over HTTP with a bearer token
pub struct GithubRestClient {
    http: RestClient,
}

impl GithubRestClient {
    pub fn new(http: RestClient) -> Self {
        Self { http }
    }
}

#[derive(Deserialize)]
struct RawRepository {
    full_name: String,
    description: Option<String>,
}

#[derive(Deserialize)]
struct RawUser {
    login: String,
}

#[derive(Deserialize)]
struct RawRef {
    #[serde(rename = "ref")]
    name: String,
}

#[derive(Deserialize)]
struct RawPull {
    number: u64,
    title: String,
    state: String,
    user: Option<RawUser>,
    head: Option<RawRef>,
    base: Option<RawRef>,
    #[serde(default)]
    merged: bool,
    #[serde(default)]
    html_url: String,
    body: Option<String>,
}

impl RawPull {
    fn author(&self) -> String {
        self.user
            .as_ref()
            .map(|u| u.login.clone())
            .unwrap_or_else(|| "ghost".to_string())
    }
}

fn branch(raw: Option<RawRef>) -> String {
    raw.map(|r| r.name).unwrap_or_default()
}

#[async_trait]
impl GithubBackend for GithubRestClient {
    async fn repositories(&self, owner: Option<&str>) -> Result<Vec<Repository>, BackendError> {
        let path = match owner {
            Some(owner) => format!("/users/{}/repos", segment(owner)),
            None => "/user/repos".to_string(),
        };
        let repos: Vec<RawRepository> = self
            .http
            .get_json(&path, &[("per_page", PER_PAGE.to_string())])
            .await?;
        Ok(repos
            .into_iter()
            .map(|r| Repository {
                full_name: r.full_name,
                description: r.description,
            })
            .collect())
    }

    async fn pull_requests(
        &self,
        repo: &str,
        state: &str,
    ) -> Result<Vec<PullSummary>, BackendError> {
        let pulls: Vec<RawPull> = self
            .http
            .get_json(
                &format!("/repos/{}/pulls", repo_path(repo)),
                &[
                    ("state", state.to_string()),
                    ("per_page", PER_PAGE.to_string()),
                ],
            )
            .await?;
        Ok(pulls
            .into_iter()
            .map(|p| PullSummary {
                author: p.author(),
                number: p.number,
                title: p.title,
                state: p.state,
            })
            .collect())
    }

    async fn pull_request(&self, repo: &str, number: u64) -> Result<PullDetails, BackendError> {
        let p: RawPull = self
            .http
            .get_json(&format!("/repos/{}/pulls/{}", repo_path(repo), number), &[])
            .await?;
        Ok(PullDetails {
            author: p.author(),
            number: p.number,
            title: p.title,
            state: p.state,
            head: branch(p.head),
            base: branch(p.base),
            merged: p.merged,
            url: p.html_url,
            body: p.body,
        })
    }

    async fn comment(&self, repo: &str, number: u64, body: &str) -> Result<(), BackendError> {
        self.http
            .post(
                &format!("/repos/{}/issues/{}/comments", repo_path(repo), number),
                &json!({ "body": body }),
            )
            .await
    }
}
