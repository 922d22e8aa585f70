//! HTTP plumbing shared by the backend REST clients.

mod client;
mod error;

pub use client::{Auth, RestClient, repo_path, segment, status_error};
pub use error::BackendError;
