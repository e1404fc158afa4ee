use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tokio::runtime::Runtime;
use tokio::sync::RwLock;
use tracing_appender::non_blocking::WorkerGuard;

use dayplan::client::HttpTaskApi;
use dayplan::commands::*;
use dayplan::config::{Config, Overrides};
use dayplan::models::TimeBlock;
use dayplan::planner::Planner;
use dayplan::server;
use dayplan::store::TaskStore;
use dayplan::tui::run_tui;

#[derive(Parser)]
#[command(name = "dayplan")]
#[command(about = "Daily structured to-do list", long_about = None)]
struct Cli {
    /// Task collection URL of the API server
    #[arg(long, global = true, env = "DAYPLAN_API_URL")]
    api_url: Option<String>,
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Log filter, e.g. info or dayplan=debug
    #[arg(long, global = true, env = "DAYPLAN_LOG")]
    log_level: Option<String>,
    /// Log file of the terminal UI
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API server
    Serve {
        /// Address to bind, e.g. 0.0.0.0:5000
        #[arg(short, long, env = "DAYPLAN_ADDR")]
        bind: Option<String>,
        /// Start with an empty store instead of a sample day
        #[arg(long)]
        no_seed: bool,
    },
    /// List a day's tasks per time block
    List {
        /// Day in YYYY-MM-DD, defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Only show one block (morning, afternoon, evening)
        #[arg(short, long)]
        block: Option<TimeBlock>,
    },
    /// Add a task
    Add {
        /// Task title (quoted if it has spaces)
        title: String,
        /// Time block (morning, afternoon, evening)
        #[arg(short, long, default_value = "morning")]
        block: TimeBlock,
        /// Day in YYYY-MM-DD, defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Mark as priority
        #[arg(short, long)]
        priority: bool,
    },
    /// Mark a task as complete
    Complete {
        id: u64,
        /// Mark as pending again instead
        #[arg(long)]
        undo: bool,
    },
    /// Toggle a task's priority flag
    Priority {
        id: u64,
    },
    /// Change a task's title
    Rename {
        id: u64,
        title: String,
    },
    /// Move a task to another time block
    Move {
        id: u64,
        block: TimeBlock,
    },
    /// Remove a task
    Remove {
        id: u64,
    },
    /// Generate the daily routine of a future day
    Routine {
        /// Day in YYYY-MM-DD
        date: String,
    },
    /// Print the month calendar or the week around a day
    Calendar {
        /// Day in YYYY-MM-DD, defaults to today
        #[arg(short, long)]
        date: Option<String>,
        /// Show the week instead of the month
        #[arg(short, long)]
        week: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,
    },
    /// Open interactive TUI
    Ui,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let (bind, no_seed) = match &cli.command {
        Some(Commands::Serve { bind, no_seed }) => (bind.clone(), *no_seed),
        _ => (None, false),
    };
    let overrides = Overrides {
        config_path: cli.config.clone(),
        bind_addr: bind,
        api_url: cli.api_url.clone(),
        log_level: cli.log_level.clone(),
        log_file: cli.log_file.clone(),
        seed_sample_tasks: no_seed.then_some(false),
    };
    let config = Config::load(&overrides)?;
    let rt = Runtime::new().context("failed to start the async runtime")?;

    match cli.command {
        Some(Commands::Serve { .. }) => {
            init_stdout_logging(&config.log_level);
            let today = Local::now().date_naive();
            let store = if config.seed_sample_tasks {
                TaskStore::with_sample_day(today)
            } else {
                TaskStore::new()
            };
            let store = Arc::new(RwLock::new(store));
            rt.block_on(server::serve(&config.bind_addr, store))
                .with_context(|| format!("server on {} failed", config.bind_addr))?;
        }
        Some(Commands::Completions { shell }) => {
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "powershell" => Shell::PowerShell,
                "elvish" => Shell::Elvish,
                _ => return Err(anyhow!("Unsupported shell: {}", shell)),
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "dayplan", &mut io::stdout());
        }
        Some(Commands::Ui) | None => {
            let _guard = init_file_logging(&config.log_level, &config.ui_log_path());
            let api = HttpTaskApi::new(&config.api_url);
            let planner = Planner::new(api, Local::now().date_naive());
            if let Err(e) = run_tui(&rt, planner) {
                return Err(anyhow!("Error running TUI: {}", e));
            }
        }
        Some(command) => {
            init_stderr_logging(&config.log_level);
            let api = HttpTaskApi::new(&config.api_url);
            rt.block_on(run_command(&api, command))?;
        }
    }
    Ok(())
}

async fn run_command(api: &HttpTaskApi, command: Commands) -> Result<()> {
    match command {
        Commands::List { date, block } => cmd_list(api, parse_date(date.as_deref())?, block).await,
        Commands::Add { title, block, date, priority } => {
            cmd_add(api, &title, block, parse_date(date.as_deref())?, priority).await.map(drop)
        }
        Commands::Complete { id, undo } => cmd_complete(api, id, !undo).await.map(drop),
        Commands::Priority { id } => cmd_priority(api, id).await.map(drop),
        Commands::Rename { id, title } => cmd_rename(api, id, &title).await.map(drop),
        Commands::Move { id, block } => cmd_move(api, id, block).await.map(drop),
        Commands::Remove { id } => cmd_remove(api, id).await.map(drop),
        Commands::Routine { date } => cmd_routine(api, parse_date(Some(&date))?).await.map(drop),
        Commands::Calendar { date, week } => cmd_calendar(api, parse_date(date.as_deref())?, week).await,
        Commands::Serve { .. } | Commands::Completions { .. } | Commands::Ui => Ok(()),
    }
}

fn env_filter(level: &str) -> tracing_subscriber::EnvFilter {
    tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level))
}

fn init_stdout_logging(level: &str) {
    tracing_subscriber::fmt().with_env_filter(env_filter(level)).init();
}

/// One-shot commands print their own output; only problems go to stderr.
fn init_stderr_logging(level: &str) {
    let level = if level == "info" { "warn" } else { level };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(env_filter(level))
        .init();
}

/// The TUI owns the terminal, so its logs go to a file.
fn init_file_logging(level: &str, log_path: &Path) -> Option<WorkerGuard> {
    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter(level))
        .with_ansi(false)
        .init();

    Some(guard)
}
