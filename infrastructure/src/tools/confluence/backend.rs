//! Confluence backend contract and the records it returns.

use crate::http::BackendError;
use async_trait::async_trait;

/// Page identity as listed by searches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    pub id: String,
    pub title: String,
}

/// A page with the data needed to rewrite it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: String,
    pub title: String,
    pub space_key: String,
    /// Current version number; updates must send `version + 1`
    pub version: u64,
    /// Storage-format body
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Space {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub display_name: String,
    pub account_id: String,
}

/// Full replacement of a page's title, body and optionally its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageUpdate {
    pub id: String,
    pub space_key: String,
    pub title: String,
    pub body: String,
    pub version: u64,
    pub parent_id: Option<String>,
}

impl PageUpdate {
    /// Rewrite `page` with a new title and body at the next version
    pub fn next(page: &Page, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: page.id.clone(),
            space_key: page.space_key.clone(),
            title: title.into(),
            body: body.into(),
            version: page.version + 1,
            parent_id: None,
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }
}

/// Operations the Confluence tools need from a Confluence site
#[async_trait]
pub trait ConfluenceBackend: Send + Sync {
    async fn page(&self, page_id: &str) -> Result<Page, BackendError>;

    /// Run a CQL query, returning at most `limit` pages
    async fn search(&self, cql: &str, limit: usize) -> Result<Vec<PageRef>, BackendError>;

    async fn create_page(
        &self,
        space_key: &str,
        title: &str,
        body: &str,
    ) -> Result<PageRef, BackendError>;

    async fn update_page(&self, update: &PageUpdate) -> Result<(), BackendError>;

    /// Move to trash
    async fn delete_page(&self, page_id: &str) -> Result<(), BackendError>;

    async fn create_space(&self, key: &str, name: &str) -> Result<(), BackendError>;

    async fn spaces(&self) -> Result<Vec<Space>, BackendError>;

    async fn pages_in_space(&self, space_key: &str) -> Result<Vec<PageRef>, BackendError>;

    async fn add_label(&self, page_id: &str, label: &str) -> Result<(), BackendError>;

    async fn labels(&self, page_id: &str) -> Result<Vec<String>, BackendError>;

    async fn add_comment(&self, page_id: &str, body: &str) -> Result<(), BackendError>;

    /// Attachment file names
    async fn attachments(&self, page_id: &str) -> Result<Vec<String>, BackendError>;

    async fn user(&self, username_or_email: &str) -> Result<User, BackendError>;
}
