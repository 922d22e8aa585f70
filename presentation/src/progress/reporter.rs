//! Progress reporting while a request is coordinated

use colored::Colorize;
use courier_application::CoordinationProgress;
use courier_domain::{BackendSystem, ReplyStatus, RoutePlan, ToolCall};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports progress with one spinner per agent step
pub struct ProgressReporter {
    multi: MultiProgress,
    agent_bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            agent_bar: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn status_mark(status: ReplyStatus) -> colored::ColoredString {
        match status {
            ReplyStatus::Answered => "v".green(),
            ReplyStatus::Partial | ReplyStatus::NeedsInput | ReplyStatus::NoAction => "?".yellow(),
            ReplyStatus::Failed => "x".red(),
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CoordinationProgress for ProgressReporter {
    fn on_agent_start(&self, agent: BackendSystem, _input: &str) {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(agent.display_name().to_string());
        pb.set_message("Thinking...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut bar) = self.agent_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_tool_start(&self, _agent: BackendSystem, call: &ToolCall) {
        if let Ok(bar) = self.agent_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.set_message(format!("{}...", call.tool_name));
        }
    }

    fn on_tool_complete(&self, _agent: BackendSystem, tool: &str, success: bool) {
        if let Ok(bar) = self.agent_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let mark = if success { "v".green() } else { "x".red() };
            pb.set_message(format!("{} {}", mark, tool));
        }
    }

    fn on_agent_complete(&self, _agent: BackendSystem, status: ReplyStatus) {
        if let Ok(mut bar) = self.agent_bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_with_message(format!("{} {}", Self::status_mark(status), status.as_str()));
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl CoordinationProgress for SimpleProgress {
    fn on_plan(&self, plan: &RoutePlan) {
        let route = plan
            .steps()
            .iter()
            .map(|s| s.system.display_name())
            .collect::<Vec<_>>()
            .join(" -> ");
        eprintln!("{} {}", "->".cyan(), route.bold());
    }

    fn on_tool_complete(&self, agent: BackendSystem, tool: &str, success: bool) {
        if success {
            eprintln!("  {} {} {}", "v".green(), agent, tool);
        } else {
            eprintln!("  {} {} {} (failed)", "x".red(), agent, tool);
        }
    }
}
