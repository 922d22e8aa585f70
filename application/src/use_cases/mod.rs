//! Use cases (application services)

pub mod coordinate;
pub mod run_domain_agent;
