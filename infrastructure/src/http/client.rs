//! Thin authenticated JSON client over `reqwest`.
//!
//! One [`RestClient`] per backend. Endpoint and credentials are optional at
//! construction and checked on every request, so a missing `JIRA_URL` only
//! affects the tools that need it.

use super::error::BackendError;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Maximum length of a backend error message kept in the error text
const MAX_ERROR_MESSAGE: usize = 300;

const USER_AGENT: &str = concat!("agent-courier/", env!("CARGO_PKG_VERSION"));

/// How requests are authenticated
#[derive(Debug, Clone)]
pub enum Auth {
    /// Atlassian Cloud: account email + API token
    Basic {
        email: Option<String>,
        token: Option<String>,
    },
    /// GitHub: personal access token
    Bearer { token: Option<String> },
}

impl Auth {
    fn apply(&self, builder: RequestBuilder) -> Result<RequestBuilder, BackendError> {
        match self {
            Auth::Basic { email, token } => {
                let email = present(email.as_deref())
                    .ok_or(BackendError::MissingConfig("ATLASSIAN_EMAIL"))?;
                let token = present(token.as_deref())
                    .ok_or(BackendError::MissingConfig("ATLASSIAN_TOKEN"))?;
                Ok(builder.basic_auth(email, Some(token)))
            }
            Auth::Bearer { token } => {
                let token =
                    present(token.as_deref()).ok_or(BackendError::MissingConfig("GITHUB_TOKEN"))?;
                Ok(builder.bearer_auth(token))
            }
        }
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Authenticated client bound to one base URL
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: Option<String>,
    /// Name of the setting that provides `base_url`, for error messages
    url_key: &'static str,
    auth: Auth,
}

impl RestClient {
    pub fn new(
        base_url: Option<String>,
        url_key: &'static str,
        auth: Auth,
        timeout: Duration,
    ) -> Self {
        // Builder only fails on TLS backend initialization; fall back to defaults
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: base_url.map(|u| u.trim().trim_end_matches('/').to_string()),
            url_key,
            auth,
        }
    }

    /// Base URL, or the missing-configuration error naming its setting
    pub fn base_url(&self) -> Result<&str, BackendError> {
        present(self.base_url.as_deref()).ok_or(BackendError::MissingConfig(self.url_key))
    }

    /// Start an authenticated request to `path` (relative to the base URL).
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, BackendError> {
        let url = format!("{}{}", self.base_url()?, path);
        debug!(%method, %url, "Backend request");
        let builder = self
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        self.auth.apply(builder)
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, BackendError> {
        let builder = self.request(Method::GET, path)?.query(query);
        self.send_json(builder).await
    }

    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, BackendError> {
        let builder = self.request(Method::POST, path)?.json(body);
        self.send_json(builder).await
    }

    /// POST where the response body is irrelevant
    pub async fn post(&self, path: &str, body: &serde_json::Value) -> Result<(), BackendError> {
        let builder = self.request(Method::POST, path)?.json(body);
        self.send(builder).await.map(|_| ())
    }

    pub async fn put(&self, path: &str, body: &serde_json::Value) -> Result<(), BackendError> {
        let builder = self.request(Method::PUT, path)?.json(body);
        self.send(builder).await.map(|_| ())
    }

    pub async fn delete(&self, path: &str) -> Result<(), BackendError> {
        let builder = self.request(Method::DELETE, path)?;
        self.send(builder).await.map(|_| ())
    }

    /// Send and decode a JSON body
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, BackendError> {
        let body = self.send(builder).await?.text().await?;
        serde_json::from_str(&body).map_err(|e| BackendError::Decode(e.to_string()))
    }

    /// Send a request, mapping non-success statuses to [`BackendError`]
    pub async fn send(&self, builder: RequestBuilder) -> Result<Response, BackendError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, &body))
    }
}

/// Percent-encode one URL path segment
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// `owner/name` repository path with each side encoded separately
pub fn repo_path(repo: &str) -> String {
    match repo.split_once('/') {
        Some((owner, name)) => format!("{}/{}", segment(owner), segment(name)),
        None => segment(repo),
    }
}

/// Map an HTTP error status and body to a [`BackendError`]
pub fn status_error(status: StatusCode, body: &str) -> BackendError {
    let message = error_message(body)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
    let message = courier_domain::util::preview(&message, MAX_ERROR_MESSAGE);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => BackendError::Unauthorized {
            status: status.as_u16(),
            message,
        },
        StatusCode::NOT_FOUND => BackendError::NotFound(message),
        _ => BackendError::Status {
            status: status.as_u16(),
            message,
        },
    }
}

/// Pull a readable message out of an Atlassian or GitHub error body.
///
/// Atlassian: `{"errorMessages": [...], "errors": {"field": "msg"}}` or
/// `{"message": "..."}`. GitHub: `{"message": "..."}`.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    let mut parts: Vec<String> = value["errorMessages"]
        .as_array()
        .map(|msgs| {
            msgs.iter()
                .filter_map(|m| m.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();

    if let Some(errors) = value["errors"].as_object() {
        parts.extend(
            errors
                .iter()
                .filter_map(|(field, msg)| msg.as_str().map(|m| format!("{}: {}", field, m))),
        );
    }

    if let Some(message) = value["message"].as_str() {
        parts.push(message.to_string());
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rest_client(base: Option<&str>, auth: Auth) -> RestClient {
        RestClient::new(
            base.map(str::to_string),
            "JIRA_URL",
            auth,
            Duration::from_secs(5),
        )
    }

    #[test]
    fn test_path_segments_are_encoded() {
        assert_eq!(segment("DEMO-5"), "DEMO-5");
        assert_eq!(segment("12345"), "12345");
        assert_eq!(segment("../../admin"), "..%2F..%2Fadmin");
        assert_eq!(segment("DEMO-5?expand=all"), "DEMO-5%3Fexpand%3Dall");
        assert_eq!(segment("Team Space"), "Team%20Space");
    }

    #[test]
    fn test_repo_path_keeps_single_separator() {
        assert_eq!(repo_path("acme/web"), "acme/web");
        assert_eq!(repo_path("acme/web/../../user"), "acme/web%2F..%2F..%2Fuser");
        assert_eq!(repo_path("web"), "web");
    }

    #[test]
    fn test_missing_base_url() {
        let client = rest_client(
            None,
            Auth::Basic {
                email: Some("a@b.c".into()),
                token: Some("t".into()),
            },
        );
        assert_eq!(
            client.request(Method::GET, "/rest/api/2/project").unwrap_err(),
            BackendError::MissingConfig("JIRA_URL")
        );
    }

    #[test]
    fn test_missing_credentials() {
        let client = rest_client(
            Some("https://example.atlassian.net"),
            Auth::Basic {
                email: Some("a@b.c".into()),
                token: Some("  ".into()),
            },
        );
        assert_eq!(
            client.request(Method::GET, "/rest/api/2/project").unwrap_err(),
            BackendError::MissingConfig("ATLASSIAN_TOKEN")
        );

        let github = rest_client(Some("https://api.github.com"), Auth::Bearer { token: None });
        assert_eq!(
            github.request(Method::GET, "/user/repos").unwrap_err(),
            BackendError::MissingConfig("GITHUB_TOKEN")
        );
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = rest_client(Some("https://example.atlassian.net/"), Auth::Bearer { token: None });
        assert_eq!(client.base_url().unwrap(), "https://example.atlassian.net");
    }

    #[test]
    fn test_status_error_mapping() {
        let body = r#"{"errorMessages":["Issue does not exist or you do not have permission to see it."],"errors":{}}"#;
        assert_eq!(
            status_error(StatusCode::NOT_FOUND, body),
            BackendError::NotFound(
                "Issue does not exist or you do not have permission to see it.".to_string()
            )
        );

        let err = status_error(StatusCode::UNAUTHORIZED, "");
        assert!(matches!(err, BackendError::Unauthorized { status: 401, .. }));

        let body = r#"{"errorMessages":[],"errors":{"summary":"Summary is required."}}"#;
        assert_eq!(
            status_error(StatusCode::BAD_REQUEST, body).to_string(),
            "HTTP 400: summary: Summary is required."
        );

        let body = r#"{"message":"Validation Failed"}"#;
        assert_eq!(
            status_error(StatusCode::UNPROCESSABLE_ENTITY, body).to_string(),
            "HTTP 422: Validation Failed"
        );
    }
}
