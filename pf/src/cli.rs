//! CLI command definitions and subcommands

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use prismastore::Priority;
use std::path::PathBuf;

/// PrismaFlow - task pipeline tracker with an AI advisor
#[derive(Parser)]
#[command(
    name = "pf",
    about = "Track an operational pipeline of tasks and ask an AI advisor about it",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a new account and sign in
    Register {
        /// Display name
        username: String,

        /// Email, used as the login key
        email: String,
    },

    /// Sign in with an existing email
    Login {
        email: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in account
    Whoami,

    /// List tasks and pipeline stats
    List,

    /// Create a task
    Add {
        /// Task title
        title: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: NaiveDate,

        /// Free-text description
        #[arg(short, long, default_value = "")]
        description: String,

        /// Priority (low, medium, high)
        #[arg(short, long, default_value = "medium")]
        priority: Priority,
    },

    /// Change fields of a task
    Update {
        /// Task ID
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        priority: Option<Priority>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,
    },

    /// Mark a task completed
    Done {
        id: String,
    },

    /// Mark a task pending again
    Undo {
        id: String,
    },

    /// Delete a task
    Delete {
        id: String,
    },

    /// Ask the advisor for a pipeline summary
    Analyze,

    /// Ask the advisor to break a task into subtasks
    Subtasks {
        /// Task ID
        id: String,
    },

    /// Chat with the advisor about your tasks
    Chat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_add_defaults() {
        let cli = Cli::try_parse_from(["pf", "add", "Audit", "--due", "2024-06-01"]).unwrap();
        match cli.command {
            Command::Add {
                title,
                due,
                description,
                priority,
            } => {
                assert_eq!(title, "Audit");
                assert_eq!(due, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
                assert_eq!(description, "");
                assert_eq!(priority, Priority::Medium);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_add_rejects_bad_date() {
        assert!(Cli::try_parse_from(["pf", "add", "Audit", "--due", "June 1st"]).is_err());
    }

    #[test]
    fn test_parse_update_priority() {
        let cli = Cli::try_parse_from(["pf", "--log-level", "debug", "update", "task-1", "--priority", "HIGH"]).unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Command::Update {
                id, priority, title, ..
            } => {
                assert_eq!(id, "task-1");
                assert_eq!(priority, Some(Priority::High));
                assert!(title.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["pf"]).is_err());
    }
}
