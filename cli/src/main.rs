//! CLI entrypoint for agent-courier
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use courier_application::{ConversationLogger, CoordinationProgress, NoProgress};
use courier_domain::{CoordinationStatus, Request};
use courier_infrastructure::{
    ConfigLoader, JsonlConversationLogger, RuleBasedBrain, build_coordinator,
};
use courier_presentation::{ChatRepl, Cli, ConsoleFormatter, ProgressReporter};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Log to stderr so stdout carries only the response
fn init_logging(verbose: u8) -> WorkerGuard {
    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"), // -vvv or more
    });

    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // A missing .env file is fine
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    let _guard = init_logging(cli.verbose);
    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .map_err(|e| anyhow!("Failed to load configuration: {}", e))?;
    config.validate().context("Invalid configuration")?;

    if !config.output.color {
        ConsoleFormatter::disable_color();
    }

    let log_path = cli.log_file.clone().or_else(|| config.logging.conversation_log.clone());
    let conversation_logger = log_path.and_then(|path| {
        let logger = JsonlConversationLogger::new(&path);
        if logger.is_none() {
            warn!(path = %path.display(), "Conversation log disabled");
        }
        logger.map(|l| Arc::new(l) as Arc<dyn ConversationLogger>)
    });

    // === Dependency Injection ===
    let brain = Arc::new(RuleBasedBrain::new());
    let coordinator = build_coordinator(&config, brain, conversation_logger)
        .await
        .map_err(|e| anyhow!("Failed to set up agents: {}", e))?;

    if cli.list_tools {
        for agent in coordinator.agents() {
            if let Some(runner) = coordinator.runner(agent.system()) {
                print!("{}", ConsoleFormatter::format_tools(&agent, runner.tool_spec()));
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let format = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();

    // Chat mode
    if cli.chat {
        ChatRepl::new(coordinator)
            .with_progress(!cli.quiet)
            .with_format(format)
            .run()
            .await?;
        return Ok(ExitCode::SUCCESS);
    }

    // Single request mode - request is required
    let Some(text) = cli.request else {
        bail!("A request is required. Use --chat for interactive mode.");
    };
    let request = Request::new(text)?;

    let progress: Box<dyn CoordinationProgress> = if cli.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };
    let outcome = coordinator.execute(&request, progress.as_ref()).await;

    println!("{}", ConsoleFormatter::format(&outcome, format));

    Ok(match outcome.status {
        CoordinationStatus::Completed | CoordinationStatus::AwaitingInput { .. } => {
            ExitCode::SUCCESS
        }
        CoordinationStatus::Halted { .. } | CoordinationStatus::Unrouted => ExitCode::FAILURE,
    })
}
