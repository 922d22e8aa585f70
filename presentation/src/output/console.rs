//! Console output formatter for coordination outcomes

use colored::Colorize;
use courier_domain::{
    CoordinationOutcome, CoordinationStatus, DomainAgent, OutputFormat, ReplyStatus, ToolSpec,
};

/// Formats coordination outcomes for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    pub fn format(outcome: &CoordinationOutcome, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => Self::format_text(outcome),
            OutputFormat::Json => Self::format_json(outcome),
            OutputFormat::Trace => Self::format_trace(outcome),
        }
    }

    /// The response text only
    pub fn format_text(outcome: &CoordinationOutcome) -> String {
        outcome.response.clone()
    }

    /// Format as JSON
    pub fn format_json(outcome: &CoordinationOutcome) -> String {
        serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
    }

    /// Response followed by every agent step
    pub fn format_trace(outcome: &CoordinationOutcome) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Response"));
        output.push('\n');
        output.push_str(&outcome.response);
        output.push('\n');

        output.push_str(&Self::section_header("Trace"));
        if outcome.trace.is_empty() {
            output.push_str(&format!("{}\n", "No agent was invoked.".dimmed()));
        }
        for (i, step) in outcome.trace.steps().iter().enumerate() {
            let title = format!("── {}. {} ({}) ──", i + 1, step.agent.display_name(), step.status.as_str());
            let title = match step.status {
                ReplyStatus::Answered => title.green().bold(),
                ReplyStatus::Partial | ReplyStatus::NeedsInput | ReplyStatus::NoAction => {
                    title.yellow().bold()
                }
                ReplyStatus::Failed => title.red().bold(),
            };
            output.push_str(&format!(
                "\n{}\n{}\n{}\n{}\n{}\n",
                title,
                "Input:".cyan(),
                Self::indent(&step.input, "  "),
                "Output:".cyan(),
                Self::indent(&step.output, "  ")
            ));
        }

        output.push_str(&format!(
            "\n{} {}\n",
            "Status:".cyan().bold(),
            Self::status_label(&outcome.status)
        ));
        output.push_str(&Self::footer());

        output
    }

    /// Tool catalogue of one agent
    pub fn format_tools(agent: &DomainAgent, tools: &ToolSpec) -> String {
        let mut output = Self::section_header(&format!("{} ({})", agent.name(), agent.system()));
        let mut definitions: Vec<_> = tools.all().collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));

        for tool in definitions {
            let params = tool
                .parameters
                .iter()
                .map(|p| if p.required { p.name.clone() } else { format!("[{}]", p.name) })
                .collect::<Vec<_>>()
                .join(", ");
            let marker = if tool.is_read_only() { " " } else { "*" };
            output.push_str(&format!(
                "{} {}({})\n    {}\n",
                marker,
                tool.name.bold(),
                params,
                tool.description.dimmed()
            ));
        }
        output
    }

    pub fn status_label(status: &CoordinationStatus) -> String {
        match status {
            CoordinationStatus::Completed => "completed".green().to_string(),
            CoordinationStatus::AwaitingInput { agent } => {
                format!("waiting for input ({})", agent.display_name()).yellow().to_string()
            }
            CoordinationStatus::Halted { agent, skipped } if skipped.is_empty() => {
                format!("failed at {}", agent.display_name()).red().to_string()
            }
            CoordinationStatus::Halted { agent, skipped } => format!(
                "halted at {}, skipped {}",
                agent.display_name(),
                skipped
                    .iter()
                    .map(|s| s.display_name())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
            .red()
            .to_string(),
            CoordinationStatus::Unrouted => "unrouted".yellow().to_string(),
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Plain output regardless of the terminal
    pub fn disable_color() {
        colored::control::set_override(false);
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use courier_domain::{BackendSystem, ExecutionTrace, TraceStep};

    fn outcome() -> CoordinationOutcome {
        let mut trace = ExecutionTrace::new();
        trace.record(TraceStep {
            agent: BackendSystem::Jira,
            input: "summarize ticket DEMO-5".to_string(),
            output: "Key: DEMO-5\nSummary: Login fails".to_string(),
            status: ReplyStatus::Answered,
        });
        trace.record(TraceStep {
            agent: BackendSystem::Confluence,
            input: "create page".to_string(),
            output: "Page 'Summary of DEMO-5' created with ID 42.".to_string(),
            status: ReplyStatus::Answered,
        });
        CoordinationOutcome {
            response: "Page 'Summary of DEMO-5' created with ID 42.".to_string(),
            status: CoordinationStatus::Completed,
            trace,
        }
    }

    #[test]
    fn test_text_is_the_response() {
        let outcome = outcome();
        assert_eq!(
            ConsoleFormatter::format(&outcome, OutputFormat::Text),
            outcome.response
        );
    }

    #[test]
    fn test_json_round_trips_response() {
        let json = ConsoleFormatter::format(&outcome(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value["response"],
            "Page 'Summary of DEMO-5' created with ID 42."
        );
    }

    #[test]
    fn test_trace_lists_each_step() {
        let trace = ConsoleFormatter::format(&outcome(), OutputFormat::Trace);
        assert!(trace.contains("1. Jira (answered)"));
        assert!(trace.contains("2. Confluence (answered)"));
        assert!(trace.contains("  Summary: Login fails"));
        assert!(trace.contains("completed"));
    }

    #[test]
    fn test_halted_label_names_skipped_agents() {
        let label = ConsoleFormatter::status_label(&CoordinationStatus::Halted {
            agent: BackendSystem::Jira,
            skipped: vec![BackendSystem::Confluence],
        });
        assert!(label.contains("halted at Jira, skipped Confluence"));
    }

    #[test]
    fn test_indent() {
        assert_eq!(ConsoleFormatter::indent("a\nb", "  "), "  a\n  b");
    }
}
