//! Confluence tools: pages, spaces, labels and comments.

pub mod backend;
pub mod provider;
pub mod rest;

pub use backend::ConfluenceBackend;
pub use provider::{ConfluenceProvider, confluence_tool_definitions};
pub use rest::ConfluenceRestClient;
