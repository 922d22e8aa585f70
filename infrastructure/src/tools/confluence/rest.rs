//! Confluence Cloud REST client (`/rest/api`).

use super::backend::{ConfluenceBackend, Page, PageRef, PageUpdate, Space, User};
use crate::http::{BackendError, RestClient, segment};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

const LIST_LIMIT: &str = "50";

/// [`ConfluenceBackend`] over HTTP with basic auth.
///
/// The base URL includes the `/wiki` context path on Atlassian Cloud.
pub struct ConfluenceRestClient {
    http: RestClient,
}

impl ConfluenceRestClient {
    pub fn new(http: RestClient) -> Self {
        Self { http }
    }
}

#[derive(Deserialize)]
struct Results<T> {
    #[serde(default = "Vec::new")]
    results: Vec<T>,
}

#[derive(Deserialize)]
struct RawPageRef {
    id: String,
    title: String,
}

impl From<RawPageRef> for PageRef {
    fn from(raw: RawPageRef) -> Self {
        PageRef {
            id: raw.id,
            title: raw.title,
        }
    }
}

#[derive(Deserialize)]
struct RawPage {
    id: String,
    title: String,
    space: Option<RawSpaceKey>,
    version: Option<RawVersion>,
    body: Option<RawBody>,
}

#[derive(Deserialize)]
struct RawSpaceKey {
    key: String,
}

#[derive(Deserialize)]
struct RawVersion {
    number: u64,
}

#[derive(Deserialize)]
struct RawBody {
    storage: Option<RawStorage>,
}

#[derive(Deserialize)]
struct RawStorage {
    #[serde(default)]
    value: String,
}

impl From<RawPage> for Page {
    fn from(raw: RawPage) -> Self {
        Page {
            id: raw.id,
            title: raw.title,
            space_key: raw.space.map(|s| s.key).unwrap_or_default(),
            version: raw.version.map(|v| v.number).unwrap_or(1),
            body: raw
                .body
                .and_then(|b| b.storage)
                .map(|s| s.value)
                .unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
struct RawSpace {
    key: String,
    name: String,
}

#[derive(Deserialize)]
struct RawLabel {
    name: String,
}

#[derive(Deserialize)]
struct RawAttachment {
    title: String,
}

#[derive(Deserialize)]
struct RawUserHit {
    user: RawUser,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUser {
    display_name: Option<String>,
    account_id: Option<String>,
}

fn storage(body: &str) -> serde_json::Value {
    json!({ "storage": { "value": body, "representation": "storage" } })
}

#[async_trait]
impl ConfluenceBackend for ConfluenceRestClient {
    async fn page(&self, page_id: &str) -> Result<Page, BackendError> {
        let raw: RawPage = self
            .http
            .get_json(
                &format!("/rest/api/content/{}", segment(page_id)),
                &[("expand", "body.storage,version,space".to_string())],
            )
            .await?;
        Ok(raw.into())
    }

    async fn search(&self, cql: &str, limit: usize) -> Result<Vec<PageRef>, BackendError> {
        let found: Results<RawPageRef> = self
            .http
            .get_json(
                "/rest/api/content/search",
                &[("cql", cql.to_string()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(found.results.into_iter().map(PageRef::from).collect())
    }

    async fn create_page(
        &self,
        space_key: &str,
        title: &str,
        body: &str,
    ) -> Result<PageRef, BackendError> {
        let created: RawPageRef = self
            .http
            .post_json(
                "/rest/api/content",
                &json!({
                    "type": "page",
                    "title": title,
                    "space": { "key": space_key },
                    "body": storage(body),
                }),
            )
            .await?;
        Ok(created.into())
    }

    async fn update_page(&self, update: &PageUpdate) -> Result<(), BackendError> {
        let mut body = json!({
            "id": update.id,
            "type": "page",
            "title": update.title,
            "space": { "key": update.space_key },
            "body": storage(&update.body),
            "version": { "number": update.version },
        });
        if let Some(parent) = &update.parent_id {
            body["ancestors"] = json!([{ "id": parent }]);
        }
        self.http
            .put(&format!("/rest/api/content/{}", segment(&update.id)), &body)
            .await
    }

    async fn delete_page(&self, page_id: &str) -> Result<(), BackendError> {
        self.http
            .delete(&format!("/rest/api/content/{}", segment(page_id)))
            .await
    }

    async fn create_space(&self, key: &str, name: &str) -> Result<(), BackendError> {
        self.http
            .post("/rest/api/space", &json!({ "key": key, "name": name }))
            .await
    }

    async fn spaces(&self) -> Result<Vec<Space>, BackendError> {
        let found: Results<RawSpace> = self
            .http
            .get_json("/rest/api/space", &[("limit", LIST_LIMIT.to_string())])
            .await?;
        Ok(found
            .results
            .into_iter()
            .map(|s| Space {
                key: s.key,
                name: s.name,
            })
            .collect())
    }

    async fn pages_in_space(&self, space_key: &str) -> Result<Vec<PageRef>, BackendError> {
        let found: Results<RawPageRef> = self
            .http
            .get_json(
                &format!("/rest/api/space/{}/content/page", segment(space_key)),
                &[("limit", LIST_LIMIT.to_string())],
            )
            .await?;
        Ok(found.results.into_iter().map(PageRef::from).collect())
    }

    async fn add_label(&self, page_id: &str, label: &str) -> Result<(), BackendError> {
        self.http
            .post(
                &format!("/rest/api/content/{}/label", segment(page_id)),
                &json!([{ "prefix": "global", "name": label }]),
            )
            .await
    }

    async fn labels(&self, page_id: &str) -> Result<Vec<String>, BackendError> {
        let found: Results<RawLabel> = self
            .http
            .get_json(&format!("/rest/api/content/{}/label", segment(page_id)), &[])
            .await?;
        Ok(found.results.into_iter().map(|l| l.name).collect())
    }

    async fn add_comment(&self, page_id: &str, body: &str) -> Result<(), BackendError> {
        self.http
            .post(
                "/rest/api/content",
                &json!({
                    "type": "comment",
                    "container": { "id": page_id, "type": "page" },
                    "body": storage(body),
                }),
            )
            .await
    }

    async fn attachments(&self, page_id: &str) -> Result<Vec<String>, BackendError> {
        let found: Results<RawAttachment> = self
            .http
            .get_json(
                &format!("/rest/api/content/{}/child/attachment", segment(page_id)),
                &[],
            )
            .await?;
        Ok(found.results.into_iter().map(|a| a.title).collect())
    }

    async fn user(&self, username_or_email: &str) -> Result<User, BackendError> {
        let cql = format!(
            "user.fullname ~ \"{}\"",
            username_or_email.replace('"', "\\\"")
        );
        let found: Results<RawUserHit> = self
            .http
            .get_json("/rest/api/search/user", &[("cql", cql), ("limit", "1".to_string())])
            .await?;

        let hit = found
            .results
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(format!("User '{}'", username_or_email)))?;
        Ok(User {
            display_name: hit.user.display_name.unwrap_or_else(|| "Unknown".to_string()),
            account_id: hit.user.account_id.unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Auth;
    use std::time::Duration;

    #[test]
    fn test_decode_page_with_version() {
        let body = r#"{
            "id": "123", "title": "Runbook",
            "space": {"key": "TEAM"},
            "version": {"number": 4},
            "body": {"storage": {"value": "<p>hi</p>", "representation": "storage"}}
        }"#;
        let page: Page = serde_json::from_str::<RawPage>(body).unwrap().into();
        assert_eq!(page.version, 4);
        assert_eq!(page.space_key, "TEAM");
        assert_eq!(page.body, "<p>hi</p>");
    }

    #[test]
    fn test_decode_page_without_expansions() {
        let page: Page = serde_json::from_str::<RawPage>(r#"{"id":"1","title":"T"}"#)
            .unwrap()
            .into();
        assert_eq!(page.version, 1);
        assert!(page.body.is_empty());
    }

    #[test]
    fn test_decode_empty_results() {
        let found: Results<RawSpace> = serde_json::from_str(r#"{"size":0}"#).unwrap();
        assert!(found.results.is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_client_fails_without_network() {
        let client = ConfluenceRestClient::new(RestClient::new(
            Some("https://example.atlassian.net/wiki".to_string()),
            "CONFLUENCE_URL",
            Auth::Basic {
                email: None,
                token: Some("t".to_string()),
            },
            Duration::from_secs(1),
        ));
        assert_eq!(
            client.spaces().await.unwrap_err(),
            BackendError::MissingConfig("ATLASSIAN_EMAIL")
        );
    }
}
