//! Core domain concepts shared across all subdomains.
//!
//! - [`request::Request`] — one user turn handed to the coordinator
//! - [`error::DomainError`] — domain-level errors

pub mod error;
pub mod request;
