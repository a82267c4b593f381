//! PrismaFlow - task pipeline tracker with a generative-AI advisor
//!
//! Records (accounts, tasks, the session) live in the `prismastore` crate.
//! This crate adds the advisory side and the `pf` command-line front end.
//!
//! # Modules
//!
//! - [`advisor`] - Pipeline analysis, subtask suggestions, chat conversations
//! - [`llm`] - LLM client trait and Gemini implementation
//! - [`prompts`] - Handlebars prompt templates with override directory
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface
//! - [`repl`] - Interactive chat loop

pub mod advisor;
pub mod cli;
pub mod config;
pub mod llm;
pub mod prompts;
pub mod repl;

pub use advisor::{Advisor, ChatReply, Conversation};
pub use config::Config;
