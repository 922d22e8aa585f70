//! Built-in domain agent profiles, one per backend system.

use super::entities::{BackendSystem, DomainAgent};

/// Profile of the Jira specialist
pub fn jira_agent() -> DomainAgent {
    DomainAgent::new(
        BackendSystem::Jira,
        "Jira_Expert",
        "Specialist in Jira. Can search, comment, and move tickets, and manage sprints and backlogs.",
        "You are a Jira expert. Use JQL for searching. \
         Before moving a ticket, check available transitions if you aren't sure of the name. \
         ALWAYS stick to the data you have found and answer on that basis only.",
    )
}

/// Profile of the Confluence specialist
pub fn confluence_agent() -> DomainAgent {
    DomainAgent::new(
        BackendSystem::Confluence,
        "Confluence_Expert",
        "Specialist in Confluence. Can search, read, and create documentation.",
        "You are a documentation expert. Use 'search_confluence' to find info; when searching, \
         provide only the search keyword as a simple string. Use 'read_confluence_page' to get \
         details and format content clearly. Other Confluence tools may be used as needed. \
         ALWAYS stick to the data you have found and answer on that basis only.",
    )
}

/// Profile of the GitHub specialist
pub fn github_agent() -> DomainAgent {
    DomainAgent::new(
        BackendSystem::GitHub,
        "Github_Expert",
        "Specialist in GitHub. Can list repos and read Pull Requests.",
        "You are a GitHub expert. Always answer questions related to GitHub using the right tools. \
         ALWAYS stick to the data you have found and answer on that basis only.",
    )
}

/// Profile for a given backend system
pub fn profile_for(system: BackendSystem) -> DomainAgent {
    match system {
        BackendSystem::Jira => jira_agent(),
        BackendSystem::Confluence => confluence_agent(),
        BackendSystem::GitHub => github_agent(),
    }
}
