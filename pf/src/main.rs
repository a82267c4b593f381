use std::fs;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use prismastore::{Backend, FileBackend, MemoryBackend, Priority, RecordStore, StoreError, Task, TaskPatch};
use tracing::{debug, info, warn};

use prismaflow::advisor::{ANALYSIS_UNAVAILABLE_MESSAGE, Advisor};
use prismaflow::cli::{Cli, Command};
use prismaflow::config::{Config, StorageBackend};
use prismaflow::repl::ChatSession;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>, log_dir: &Path) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("prismaflow.log"))
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    setup_logging(
        cli.log_level.as_deref(),
        config.log_level.as_deref(),
        &config.storage.log_dir(),
    )
    .context("Failed to setup logging")?;

    let store = open_store(&config).await.context("Failed to open record store")?;

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Register { username, email } => cmd_register(&store, &username, &email).await,
        Command::Login { email } => cmd_login(&store, &email).await,
        Command::Logout => cmd_logout(&store).await,
        Command::Whoami => cmd_whoami(&store),
        Command::List => cmd_list(&store).await,
        Command::Add {
            title,
            due,
            description,
            priority,
        } => cmd_add(&store, &title, &description, priority, due).await,
        Command::Update {
            id,
            title,
            description,
            priority,
            due,
        } => {
            let patch = TaskPatch {
                title,
                description,
                priority,
                due_date: due,
                completed: None,
            };
            cmd_update(&store, &id, patch).await
        }
        Command::Done { id } => cmd_update(&store, &id, TaskPatch::completed(true)).await,
        Command::Undo { id } => cmd_update(&store, &id, TaskPatch::completed(false)).await,
        Command::Delete { id } => cmd_delete(&store, &id).await,
        Command::Analyze => cmd_analyze(&config, &store).await,
        Command::Subtasks { id } => cmd_subtasks(&config, &store, &id).await,
        Command::Chat => cmd_chat(&config, &store).await,
    }
}

async fn open_store(config: &Config) -> Result<RecordStore> {
    let backend: Arc<dyn Backend> = match config.storage.backend {
        StorageBackend::File => Arc::new(FileBackend::open(&config.storage.data_dir)?),
        StorageBackend::Memory => {
            info!("Using in-memory backend; records end with this process");
            Arc::new(MemoryBackend::new())
        }
    };
    Ok(RecordStore::open(backend, Arc::new(prismastore::RandomIds)).await?)
}

async fn cmd_register(store: &RecordStore, username: &str, email: &str) -> Result<()> {
    let account = store.register(username, email).await?;
    println!(
        "{} Neural ID {} registered ({})",
        "✓".green(),
        account.email.bold(),
        account.id.dimmed()
    );
    Ok(())
}

async fn cmd_login(store: &RecordStore, email: &str) -> Result<()> {
    let account = store.login(email).await?;
    println!("{} Signed in as {} <{}>", "✓".green(), account.username.bold(), account.email);
    Ok(())
}

async fn cmd_logout(store: &RecordStore) -> Result<()> {
    store.logout().await?;
    println!("Signed out.");
    Ok(())
}

fn cmd_whoami(store: &RecordStore) -> Result<()> {
    match store.session() {
        Some(account) => println!("{} <{}> ({})", account.username.bold(), account.email, account.id.dimmed()),
        None => println!("not signed in"),
    }
    Ok(())
}

async fn cmd_list(store: &RecordStore) -> Result<()> {
    if store.session().is_none() {
        println!("not signed in");
        return Ok(());
    }

    let tasks = store.list_tasks().await?;
    let (completed, pending): (Vec<&Task>, Vec<&Task>) = tasks.iter().partition(|t| t.completed);

    println!("{}", "Operational Core".bright_cyan().bold());
    if pending.is_empty() {
        println!("  {}", "No pending objectives.".dimmed());
    }
    for task in &pending {
        print_task(task);
    }

    println!();
    println!("{}", "History Log".bright_cyan().bold());
    if completed.is_empty() {
        println!("  {}", "Nothing completed yet.".dimmed());
    }
    for task in &completed {
        print_task(task);
    }

    let stats = store.stats().await?;
    println!();
    println!(
        "Total: {}  Workload: {}  Completed: {}  Efficiency: {}%",
        stats.total, stats.pending, stats.completed, stats.efficiency_percent
    );
    Ok(())
}

fn print_task(task: &Task) {
    let priority = match task.priority {
        Priority::High => task.priority.to_string().red(),
        Priority::Medium => task.priority.to_string().yellow(),
        Priority::Low => task.priority.to_string().green(),
    };
    let title = if task.completed {
        task.title.strikethrough()
    } else {
        task.title.bold()
    };
    println!("  {}  {}  [{}]  due {}", task.id.dimmed(), title, priority, task.due_date);
    if !task.description.is_empty() {
        println!("      {}", task.description.dimmed());
    }
}

async fn cmd_add(
    store: &RecordStore,
    title: &str,
    description: &str,
    priority: Priority,
    due: chrono::NaiveDate,
) -> Result<()> {
    let task = store.create_task(title, description, priority, due).await?;
    println!("{} Created {} ({})", "✓".green(), task.title.bold(), task.id);
    Ok(())
}

async fn cmd_update(store: &RecordStore, id: &str, patch: TaskPatch) -> Result<()> {
    if patch.is_empty() {
        eyre::bail!("Nothing to update: pass at least one of --title, --description, --priority, --due");
    }
    let task = store.update_task(id, patch).await?;
    println!("{} Updated {}", "✓".green(), task.title.bold());
    Ok(())
}

async fn cmd_delete(store: &RecordStore, id: &str) -> Result<()> {
    store.delete_task(id).await?;
    println!("Deleted {}", id);
    Ok(())
}

fn advisor(config: &Config) -> Result<Advisor> {
    config.validate()?;
    Advisor::from_config(config).context("Failed to create advisor")
}

async fn cmd_analyze(config: &Config, store: &RecordStore) -> Result<()> {
    let advisor = advisor(config)?;
    let tasks = store.list_tasks().await?;

    match advisor.analyze_tasks(&tasks).await {
        Ok(summary) => println!("{}", summary),
        Err(e) if e.is_configuration() => return Err(e).context("Analysis could not be prepared"),
        Err(e) => {
            warn!(error = %e, "cmd_analyze: analysis failed");
            println!("{}", ANALYSIS_UNAVAILABLE_MESSAGE.red());
        }
    }
    Ok(())
}

async fn cmd_subtasks(config: &Config, store: &RecordStore, id: &str) -> Result<()> {
    let advisor = advisor(config)?;
    let tasks = store.list_tasks().await?;
    let task = tasks
        .iter()
        .find(|t| t.id == id)
        .ok_or_else(|| StoreError::RecordNotFound(id.to_string()))?;

    match advisor.suggest_subtasks(task).await {
        Ok(subtasks) => {
            println!("{}", task.title.bold());
            for (i, subtask) in subtasks.iter().enumerate() {
                println!("  {}. {}", i + 1, subtask);
            }
        }
        Err(e) if e.is_configuration() => return Err(e).context("Subtasks could not be prepared"),
        Err(e) => {
            warn!(error = %e, "cmd_subtasks: suggestion failed");
            println!("{}", ANALYSIS_UNAVAILABLE_MESSAGE.red());
        }
    }
    Ok(())
}

async fn cmd_chat(config: &Config, store: &RecordStore) -> Result<()> {
    if store.session().is_none() {
        eyre::bail!(StoreError::Unauthorized);
    }
    let advisor = advisor(config)?;
    ChatSession::new(&advisor, store).run().await
}
