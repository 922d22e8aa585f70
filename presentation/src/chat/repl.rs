//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::{ConsoleFormatter, ProgressReporter};
use courier_application::{CoordinateUseCase, NoProgress};
use courier_domain::{ConversationTurn, OutputFormat, Request};
use reedline::{DefaultPrompt, DefaultPromptSegment, Reedline, Signal};

/// Turns kept as context for the routing brain
const MAX_HISTORY_TURNS: usize = 20;

/// Interactive chat REPL
///
/// Conversation history lives in memory for the session only.
pub struct ChatRepl {
    coordinator: CoordinateUseCase,
    format: OutputFormat,
    show_progress: bool,
    history: Vec<ConversationTurn>,
}

impl ChatRepl {
    pub fn new(coordinator: CoordinateUseCase) -> Self {
        Self {
            coordinator,
            format: OutputFormat::Text,
            show_progress: true,
            history: Vec::new(),
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = Reedline::create();
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("courier".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        if self.handle_command(line) {
                            break;
                        }
                        continue;
                    }

                    self.process_request(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                _ => {
                    println!("Bye!");
                    break;
                }
            }
        }

        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│          agent-courier - Chat Mode          │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Agents: {}", self.agent_names());
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?    - Show this help");
        println!("  /agents          - Show the available agents");
        println!("  /clear           - Forget the conversation so far");
        println!("  /quit, /exit, /q - Exit chat");
        println!();
    }

    fn agent_names(&self) -> String {
        self.coordinator
            .agents()
            .iter()
            .map(|a| a.name().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Handle slash commands. Returns true if should exit.
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                true
            }
            "/help" | "/h" | "/?" => {
                println!();
                Self::print_help();
                false
            }
            "/agents" => {
                println!();
                for agent in self.coordinator.agents() {
                    println!("  - {}: {}", agent.name(), agent.description());
                }
                println!();
                false
            }
            "/clear" => {
                self.history.clear();
                println!("Conversation cleared.");
                false
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                false
            }
        }
    }

    async fn process_request(&mut self, text: &str) {
        println!();

        let request = match Request::new(text) {
            Ok(request) => request.with_history(self.history.clone()),
            Err(e) => {
                eprintln!("Error: {}", e);
                return;
            }
        };

        let outcome = if self.show_progress {
            let progress = ProgressReporter::new();
            self.coordinator.execute(&request, &progress).await
        } else {
            self.coordinator.execute(&request, &NoProgress).await
        };

        println!("{}", ConsoleFormatter::format(&outcome, self.format));
        println!();

        self.remember(text, &outcome.response);
    }

    fn remember(&mut self, request: &str, response: &str) {
        self.history.push(ConversationTurn::user(request));
        self.history.push(ConversationTurn::assistant(response));
        if self.history.len() > MAX_HISTORY_TURNS {
            let excess = self.history.len() - MAX_HISTORY_TURNS;
            self.history.drain(..excess);
        }
    }
}
