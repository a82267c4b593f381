//! Interactive advisor chat
//!
//! The conversation is created on the first message and reused until
//! `/reset`, which rebuilds it from the current task list.

use colored::Colorize;
use eyre::{Context, Result};
use prismastore::RecordStore;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::{debug, warn};

use crate::advisor::{Advisor, CHAT_FAILED_MESSAGE, Conversation};

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}

/// Chat REPL bound to one store and advisor
pub struct ChatSession<'a> {
    advisor: &'a Advisor,
    store: &'a RecordStore,
    conversation: Option<Conversation>,
}

impl<'a> ChatSession<'a> {
    pub fn new(advisor: &'a Advisor, store: &'a RecordStore) -> Self {
        Self {
            advisor,
            store,
            conversation: None,
        }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_magenta()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input) {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.send(input).await?;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C - just show new prompt
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D - exit
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Neural link closed.");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "PrismaFlow Neural Assistant".bright_magenta().bold());
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let cmd = input.split_whitespace().next().unwrap_or("");
        debug!(%cmd, "handle_slash_command: called");

        match cmd {
            "/help" | "/h" => {
                println!("  {}   rebuild the conversation from your current tasks", "/reset".yellow());
                println!("  {}    exit the chat", "/quit".yellow());
                SlashResult::Continue
            }
            "/reset" => {
                self.conversation = None;
                println!("{}", "Conversation reset.".dimmed());
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            other => {
                println!("Unknown command: {}", other);
                SlashResult::Continue
            }
        }
    }

    async fn send(&mut self, input: &str) -> Result<()> {
        if self.conversation.is_none() {
            let tasks = self.store.list_tasks().await.context("Failed to load tasks for chat")?;
            let conversation = self.advisor.create_chat(&tasks).context("Failed to start conversation")?;
            self.conversation = Some(conversation);
        }
        let Some(conversation) = self.conversation.as_mut() else {
            return Ok(());
        };

        match conversation.send_message(input).await {
            Ok(reply) => println!("{}\n", reply.display_text()),
            Err(e) => {
                warn!(error = %e, "send: chat message failed");
                println!("{}\n", CHAT_FAILED_MESSAGE.red());
            }
        }
        Ok(())
    }
}
