//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use crate::ProgressReporter;
use andy_application::WorkflowOrchestrator;
use andy_domain::ConversationState;
use colored::Colorize;
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::path::PathBuf;
use tracing::warn;

const HISTORY_CAPACITY: usize = 1000;

/// What the loop should do after a slash command
#[derive(Debug, PartialEq)]
enum CommandOutcome {
    Print(String),
    Quit,
}

/// Interactive chat REPL
pub struct ChatRepl {
    orchestrator: WorkflowOrchestrator,
    state: ConversationState,
    show_progress: bool,
    history_path: Option<PathBuf>,
}

impl ChatRepl {
    /// Create a new ChatRepl
    pub fn new(orchestrator: WorkflowOrchestrator) -> Self {
        Self {
            orchestrator,
            state: ConversationState::new(),
            show_progress: true,
            history_path: dirs::data_dir().map(|p| p.join("audience-andy").join("history.txt")),
        }
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&mut self) -> std::io::Result<()> {
        let mut editor = Reedline::create();
        if let Some(path) = &self.history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_CAPACITY, path.clone()) {
                Ok(history) => editor = editor.with_history(Box::new(history)),
                Err(e) => warn!(error = %e, "Chat history is unavailable"),
            }
        }
        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("andy".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();
        let greeting = self.orchestrator.start(&mut self.state);
        println!("{}", ConsoleFormatter::format_reply(&greeting));

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();

                    // Skip empty lines
                    if line.is_empty() {
                        continue;
                    }

                    if line.starts_with('/') {
                        match self.handle_command(line) {
                            CommandOutcome::Print(text) => println!("{}", text),
                            CommandOutcome::Quit => {
                                println!("Bye!");
                                break;
                            }
                        }
                        continue;
                    }

                    self.process_message(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                    continue;
                }
                Signal::CtrlD => {
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
        println!("│        Audience Andy - Audience Research     │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("Model: {}", self.orchestrator.gateway().model());
        println!();
        println!("{}", Self::help_text());
    }

    fn help_text() -> String {
        [
            "Commands:",
            "  /status         - Show what the analysis has found so far",
            "  /summary        - Show the analysis summary",
            "  /tools          - Show tools and whether they can run",
            "  /reset          - Start over with a new product",
            "  /help, /h, /?   - Show this help",
            "  /quit, /exit, /q - Exit chat",
        ]
        .join("\n")
    }

    fn handle_command(&mut self, cmd: &str) -> CommandOutcome {
        match cmd {
            "/quit" | "/exit" | "/q" => CommandOutcome::Quit,
            "/help" | "/h" | "/?" => CommandOutcome::Print(Self::help_text()),
            "/status" => {
                let status = self.orchestrator.status(&self.state);
                CommandOutcome::Print(ConsoleFormatter::format_status(&status))
            }
            "/summary" => CommandOutcome::Print(
                self.orchestrator
                    .summary(&self.state)
                    .unwrap_or_else(|| "Nothing analyzed yet. Share a product URL first.".to_string()),
            ),
            "/tools" => {
                let tools = self.orchestrator.tools();
                CommandOutcome::Print(ConsoleFormatter::format_tools(
                    tools.tool_spec(),
                    &tools.availability(),
                ))
            }
            "/reset" => {
                let reply = self.orchestrator.reset(&mut self.state);
                CommandOutcome::Print(ConsoleFormatter::format_reply(&reply))
            }
            _ => CommandOutcome::Print(format!(
                "Unknown command: {}\nType /help for available commands",
                cmd
            )),
        }
    }

    async fn process_message(&mut self, line: &str) {
        println!();
        let progress = ProgressReporter::start(self.state.stage(), self.show_progress);
        let reply = self.orchestrator.process_message(&mut self.state, line).await;
        progress.finish();

        println!("{}", ConsoleFormatter::format_reply(&reply));
        if let Some(error) = self.orchestrator.status(&self.state).last_error {
            println!("{} {}\n", "Tip:".yellow().bold(), Self::retry_hint(&error));
        }
    }

    fn retry_hint(error: &str) -> String {
        if error.contains("is not set") {
            "run `audience-andy check` to see which keys are missing.".to_string()
        } else {
            "send any message to retry, or /reset to start over.".to_string()
        }
    }
}
