//! Keyword-scoring routing brain.
//!
//! # Classification
//!
//! Every system scores the request by the vocabulary it mentions; explicit
//! system names and identifiers (an issue key, an `owner/repo`) weigh more.
//! When two or more systems qualify and the text says where the result should
//! be written ("into a Confluence page", "comment on the PR"), the plan is a
//! chain from the strongest other system to that destination. Otherwise each
//! qualifying system becomes an independent step.
//!
//! A follow-up with no cues of its own ("and move it to Done") is read
//! together with the previous user turn.

use super::cues::Cues;
use super::intents::{self, confluence_write_re, github_write_re, jira_write_re};
use async_trait::async_trait;
use courier_application::ports::routing_brain::{BrainError, RoutingBrain};
use courier_domain::{
    BackendSystem, DomainAgent, PlannedStep, Request, RoutePlan, Speaker, SubRequest,
    ToolSelection, ToolSpec,
};
use tracing::debug;

const JIRA_WORDS: &[&str] = &[
    "jira", "ticket", "tickets", "issue", "issues", "backlog", "sprint", "sprints", "jql",
    "transition", "transitions", "epic", "story", "bug", "worklog", "assign", "project",
    "projects", "board",
];
const CONFLUENCE_WORDS: &[&str] = &[
    "confluence", "page", "pages", "wiki", "space", "spaces", "documentation", "doc", "docs",
    "label", "labels", "labeled",
];
const GITHUB_WORDS: &[&str] = &[
    "github", "repo", "repos", "repository", "repositories", "pr", "prs", "pull", "commit",
    "commits", "branch",
];

/// Naming a system outright counts this much on top of the keyword itself
const NAME_BONUS: u32 = 2;
const IDENTIFIER_BONUS: u32 = 2;
/// A system that is not the strongest needs this score to join the plan
const SECONDARY_THRESHOLD: u32 = 2;

/// Deterministic brain built on keyword scores and regex extraction
#[derive(Debug, Clone, Default)]
pub struct RuleBasedBrain;

impl RuleBasedBrain {
    pub fn new() -> Self {
        Self
    }

    fn score(system: BackendSystem, cues: &Cues) -> u32 {
        let (words, name) = match system {
            BackendSystem::Jira => (JIRA_WORDS, "jira"),
            BackendSystem::Confluence => (CONFLUENCE_WORDS, "confluence"),
            BackendSystem::GitHub => (GITHUB_WORDS, "github"),
        };
        let mut score = words.iter().filter(|w| cues.has(w)).count() as u32;
        if cues.has(name) {
            score += NAME_BONUS;
        }
        let identified = match system {
            BackendSystem::Jira => cues.issue_key().is_some(),
            BackendSystem::Confluence => cues.page_id().is_some(),
            BackendSystem::GitHub => cues.repo().is_some(),
        };
        if identified {
            score += IDENTIFIER_BONUS;
        }
        score
    }

    /// Systems worth a step, strongest first; ties keep the canonical order
    fn rank(cues: &Cues, available: &[BackendSystem]) -> Vec<(BackendSystem, u32)> {
        let mut scored: Vec<(BackendSystem, u32)> = BackendSystem::ALL
            .iter()
            .copied()
            .filter(|s| available.contains(s))
            .map(|s| (s, Self::score(s, cues)))
            .filter(|(_, score)| *score > 0)
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1));

        let Some(top) = scored.first().map(|(_, score)| *score) else {
            return scored;
        };
        scored.retain(|(_, score)| *score == top || *score >= SECONDARY_THRESHOLD);
        scored
    }

    /// Earliest destination phrase among the ranked systems
    fn destination(cues: &Cues, ranked: &[(BackendSystem, u32)]) -> Option<BackendSystem> {
        ranked
            .iter()
            .filter_map(|(system, _)| {
                let re = match system {
                    BackendSystem::Jira => jira_write_re(),
                    BackendSystem::Confluence => confluence_write_re(),
                    BackendSystem::GitHub => github_write_re(),
                };
                cues.find(re).map(|at| (at, *system))
            })
            .min_by_key(|(at, _)| *at)
            .map(|(_, system)| system)
    }

    fn plan_for(text: &str, ranked: &[(BackendSystem, u32)], cues: &Cues) -> Result<RoutePlan, BrainError> {
        let plan = match ranked {
            [] => return Err(BrainError::NoMatchingSystem),
            [(system, _)] => Ok(RoutePlan::single(*system, text)),
            _ => match Self::destination(cues, ranked) {
                Some(destination) => {
                    let source = ranked
                        .iter()
                        .map(|(system, _)| *system)
                        .find(|s| *s != destination)
                        .ok_or(BrainError::NoMatchingSystem)?;
                    RoutePlan::chain((source, text.to_string()), (destination, text.to_string()))
                }
                None => RoutePlan::new(
                    ranked
                        .iter()
                        .map(|(system, _)| PlannedStep::new(*system, text))
                        .collect(),
                ),
            },
        };
        plan.map_err(|e| BrainError::Unintelligible(e.to_string()))
    }
}

#[async_trait]
impl RoutingBrain for RuleBasedBrain {
    async fn classify(
        &self,
        request: &Request,
        agents: &[DomainAgent],
    ) -> Result<RoutePlan, BrainError> {
        let available: Vec<BackendSystem> = agents.iter().map(|a| a.system()).collect();

        let cues = Cues::new(request.text());
        let ranked = Self::rank(&cues, &available);
        if !ranked.is_empty() {
            debug!(?ranked, "Classified request");
            return Self::plan_for(request.text(), &ranked, &cues);
        }

        let previous = request
            .history()
            .iter()
            .rev()
            .find(|turn| turn.speaker == Speaker::User);
        let Some(previous) = previous else {
            return Err(BrainError::NoMatchingSystem);
        };

        let combined = format!("{} {}", previous.text.trim(), request.text().trim());
        let cues = Cues::new(&combined);
        let ranked = Self::rank(&cues, &available);
        debug!(?ranked, "Classified follow-up with previous turn");
        Self::plan_for(&combined, &ranked, &cues)
    }

    async fn select_tools(
        &self,
        agent: &DomainAgent,
        sub_request: &SubRequest,
        tools: &ToolSpec,
    ) -> Result<ToolSelection, BrainError> {
        let cues = Cues::new(&sub_request.text);
        let context = sub_request.context_text();
        let selection = match agent.system() {
            BackendSystem::Jira => intents::jira(&cues, context),
            BackendSystem::Confluence => intents::confluence(&cues, context),
            BackendSystem::GitHub => intents::github(&cues, context),
        };

        if let ToolSelection::Calls { calls } = &selection {
            if let Some(missing) = calls.iter().find(|c| tools.get_resolved(&c.tool_name).is_none()) {
                return Err(BrainError::Unintelligible(format!(
                    "{} has no tool named '{}'",
                    agent.name(),
                    missing.tool_name
                )));
            }
        }
        Ok(selection)
    }
}
