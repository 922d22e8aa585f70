//! Wiring: configuration in, a ready coordinator out.
//!
//! One [`ToolRegistry`] per backend system, each holding only that system's
//! provider, so an agent can never reach another system's tools.

use crate::config::FileConfig;
use crate::http::{Auth, RestClient};
use crate::tools::{
    ConfluenceProvider, ConfluenceRestClient, GithubProvider, GithubRestClient, JiraProvider,
    JiraRestClient, ToolRegistry,
};
use courier_application::{
    ConversationLogger, CoordinateUseCase, DomainAgentRunner, RoutingBrain,
};
use courier_domain::{BackendSystem, profiles};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

fn atlassian_auth(config: &FileConfig) -> Auth {
    Auth::Basic {
        email: config.atlassian.email.clone(),
        token: config.atlassian.token.clone(),
    }
}

/// Unregistered registry holding the provider for `system`
fn registry_for(system: BackendSystem, config: &FileConfig) -> ToolRegistry {
    let timeout = Duration::from_secs(config.execution.http_timeout_seconds);
    match system {
        BackendSystem::Jira => {
            let http = RestClient::new(
                config.jira.url.clone(),
                "JIRA_URL",
                atlassian_auth(config),
                timeout,
            );
            ToolRegistry::new().register(JiraProvider::new(Arc::new(JiraRestClient::new(http))))
        }
        BackendSystem::Confluence => {
            let http = RestClient::new(
                config.confluence.url.clone(),
                "CONFLUENCE_URL",
                atlassian_auth(config),
                timeout,
            );
            ToolRegistry::new().register(ConfluenceProvider::new(Arc::new(
                ConfluenceRestClient::new(http),
            )))
        }
        BackendSystem::GitHub => {
            let http = RestClient::new(
                Some(config.github.api_url.clone()),
                "GITHUB_API_URL",
                Auth::Bearer {
                    token: config.github.token.clone(),
                },
                timeout,
            );
            ToolRegistry::new().register(GithubProvider::new(Arc::new(GithubRestClient::new(http))))
        }
    }
}

/// Discovered tool registry for one backend system.
pub async fn build_registry(
    system: BackendSystem,
    config: &FileConfig,
) -> Result<ToolRegistry, String> {
    let mut registry = registry_for(system, config);
    registry.discover().await?;
    debug!(%system, tools = registry.stats().total_tools, "Tool registry ready");
    Ok(registry)
}

/// Coordinator with one agent per backend system.
pub async fn build_coordinator(
    config: &FileConfig,
    brain: Arc<dyn RoutingBrain>,
    conversation_logger: Option<Arc<dyn ConversationLogger>>,
) -> Result<CoordinateUseCase, String> {
    let mut coordinator =
        CoordinateUseCase::new(brain.clone()).with_params(config.execution.to_params());

    for system in BackendSystem::ALL {
        let registry = build_registry(system, config).await?;
        let mut runner =
            DomainAgentRunner::new(profiles::profile_for(system), Arc::new(registry), brain.clone());
        if let Some(logger) = &conversation_logger {
            runner = runner.with_conversation_logger(logger.clone());
        }
        coordinator = coordinator.with_agent(runner);
    }

    if let Some(logger) = conversation_logger {
        coordinator = coordinator.with_conversation_logger(logger);
    }

    info!(agents = coordinator.agents().len(), "Coordinator ready");
    Ok(coordinator)
}
