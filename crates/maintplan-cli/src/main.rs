mod config;
mod organize_cmd;
mod tui;
mod view;

#[cfg(test)]
mod test_util;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing_subscriber::EnvFilter;

use maintplan_core::structuring::{GeminiStructurer, PlanStructurer};

use config::ModelOverrides;

#[derive(Parser)]
#[command(
    name = "maintplan",
    about = "Organize free-text maintenance notes into a structured plan"
)]
struct Cli {
    /// Model API key (overrides GEMINI_API_KEY / API_KEY env vars)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Model name (overrides MAINTPLAN_MODEL env var)
    #[arg(long, global = true)]
    model: Option<String>,

    /// API base URL (overrides MAINTPLAN_ENDPOINT env var)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a maintplan config file with the model API key
    Init {
        /// API key to store
        #[arg(long)]
        key: String,
        /// Model name to store (default: gemini-3-flash-preview)
        #[arg(long = "default-model")]
        default_model: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Launch the interactive organizer (default)
    Tui {
        /// Pre-fill the input pane from this file instead of the sample notes
        file: Option<PathBuf>,
    },
    /// Organize notes from a file (or stdin) and print the plan
    Organize {
        /// Notes file; omit or use `-` for stdin
        file: Option<PathBuf>,
        /// Print the plan as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        /// Target shell
        shell: Shell,
    },
}

impl Cli {
    fn overrides(&self) -> ModelOverrides {
        ModelOverrides {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to stderr.
fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}

/// Log to a file, since the TUI owns the terminal.
fn init_file_logging() -> anyhow::Result<PathBuf> {
    let path = config::log_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(path)
}

/// Execute the `maintplan init` command: write config file.
fn cmd_init(key: &str, model: Option<&str>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }
    if key.trim().is_empty() {
        anyhow::bail!("API key must not be empty");
    }

    let cfg = config::ConfigFile {
        model: config::ModelSection {
            api_key: key.to_string(),
            model: model.map(str::to_string),
            endpoint: None,
        },
    };
    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    if let Some(m) = model {
        println!("  model.model = {m}");
    }
    println!();
    println!("Next: run `maintplan` to open the organizer.");

    Ok(())
}

/// Build the structuring client. A missing API key fails here, before any
/// request is attempted.
fn build_structurer(overrides: &ModelOverrides) -> anyhow::Result<Arc<dyn PlanStructurer>> {
    let model_config = config::resolve(overrides)?;
    tracing::info!(model = %model_config.model, endpoint = %model_config.endpoint, "using model");
    Ok(Arc::new(GeminiStructurer::new(model_config)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let overrides = cli.overrides();

    match cli.command {
        Some(Commands::Init {
            key,
            default_model,
            force,
        }) => {
            init_stderr_logging();
            cmd_init(&key, default_model.as_deref(), force)?;
        }
        Some(Commands::Organize { file, json }) => {
            init_stderr_logging();
            let structurer = build_structurer(&overrides)?;
            organize_cmd::run_organize(structurer.as_ref(), file.as_deref(), json).await?;
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "maintplan",
                &mut std::io::stdout(),
            );
        }
        Some(Commands::Tui { file }) => {
            run_tui_command(&overrides, file).await?;
        }
        None => {
            run_tui_command(&overrides, None).await?;
        }
    }

    Ok(())
}

async fn run_tui_command(overrides: &ModelOverrides, file: Option<PathBuf>) -> anyhow::Result<()> {
    let log_path = init_file_logging()?;
    let structurer = build_structurer(overrides)?;
    let initial_input = match file {
        Some(path) => organize_cmd::read_input(Some(&path))?,
        None => tui::app::SAMPLE_NOTES.to_string(),
    };
    tracing::info!(log = %log_path.display(), "starting organizer");
    tui::run_tui(structurer, initial_input).await
}
