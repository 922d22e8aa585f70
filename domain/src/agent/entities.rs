//! Agent domain entities

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Backend system a domain agent is scoped to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendSystem {
    Jira,
    Confluence,
    #[serde(rename = "github")]
    GitHub,
}

impl BackendSystem {
    pub const ALL: [BackendSystem; 3] = [
        BackendSystem::Jira,
        BackendSystem::Confluence,
        BackendSystem::GitHub,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            BackendSystem::Jira => "jira",
            BackendSystem::Confluence => "confluence",
            BackendSystem::GitHub => "github",
        }
    }

    pub fn display_name(&self) -> &str {
        match self {
            BackendSystem::Jira => "Jira",
            BackendSystem::Confluence => "Confluence",
            BackendSystem::GitHub => "GitHub",
        }
    }
}

impl std::fmt::Display for BackendSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for BackendSystem {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jira" => Ok(BackendSystem::Jira),
            "confluence" | "wiki" => Ok(BackendSystem::Confluence),
            "github" | "gh" => Ok(BackendSystem::GitHub),
            other => Err(DomainError::UnknownSystem(other.to_string())),
        }
    }
}

/// A domain agent: a tool-using component bounded to one backend system.
///
/// The profile carries identity and routing policy only. The tools it owns
/// live in a per-agent registry wired up by the application layer, and the
/// agent holds no state across requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainAgent {
    system: BackendSystem,
    name: String,
    description: String,
    instruction: String,
}

impl DomainAgent {
    pub fn new(
        system: BackendSystem,
        name: impl Into<String>,
        description: impl Into<String>,
        instruction: impl Into<String>,
    ) -> Self {
        Self {
            system,
            name: name.into(),
            description: description.into(),
            instruction: instruction.into(),
        }
    }

    pub fn system(&self) -> BackendSystem {
        self.system
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Short capability summary, used when classifying requests
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Natural-language policy describing when and how to use the tools
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instruction = instruction.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_system_parse() {
        assert_eq!("Jira".parse::<BackendSystem>().unwrap(), BackendSystem::Jira);
        assert_eq!("wiki".parse::<BackendSystem>().unwrap(), BackendSystem::Confluence);
        assert_eq!(" GH ".parse::<BackendSystem>().unwrap(), BackendSystem::GitHub);
        assert!("trello".parse::<BackendSystem>().is_err());
    }

    #[test]
    fn test_backend_system_serde() {
        let json = serde_json::to_string(&BackendSystem::GitHub).unwrap();
        assert_eq!(json, "\"github\"");
        let parsed: BackendSystem = serde_json::from_str("\"confluence\"").unwrap();
        assert_eq!(parsed, BackendSystem::Confluence);
    }

    #[test]
    fn test_domain_agent_accessors() {
        let agent = DomainAgent::new(
            BackendSystem::Jira,
            "Jira_Expert",
            "Searches tickets",
            "Use JQL",
        )
        .with_instruction("Use JQL for searching.");

        assert_eq!(agent.system(), BackendSystem::Jira);
        assert_eq!(agent.name(), "Jira_Expert");
        assert_eq!(agent.instruction(), "Use JQL for searching.");
    }
}
