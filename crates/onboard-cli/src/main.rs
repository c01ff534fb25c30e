//! Onboarding copilot command line tool
//!
//! Front end over onboard-core: an interactive chat REPL plus small
//! inspection commands for the tool catalog and the task digest.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use dialoguer::Input;
use uuid::Uuid;

use onboard_core::{
    render, summarize, ChatRequest, Config, ContactsStore, DocStore, GenAiClient, ModelClient,
    Orchestrator, SessionStore, TaskStore, ToolRegistryBuilder,
};

#[derive(Parser)]
#[command(name = "onboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Employee onboarding assistant", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to the TOML config file
    #[arg(short, long, default_value = "onboard.toml")]
    config: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Execute a single message and exit (non-interactive mode)
    #[arg(long)]
    one_shot: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat mode
    Chat,

    /// Show available tools
    Tools,

    /// Print the pending-task digest
    Tasks,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Warn-level by default so logs do not interfere with the prompt
    tracing_subscriber::fmt()
        .with_env_filter(if cli.verbose {
            "info,onboard_core=debug"
        } else {
            "warn"
        })
        .init();

    let config = Config::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    match cli.command {
        Some(Commands::Tools) => run_tools(&config),
        Some(Commands::Tasks) => run_tasks(&config),
        _ => {
            let orchestrator = build_orchestrator(&config)?;
            match cli.one_shot {
                Some(message) => run_one_shot(&orchestrator, &message).await,
                None => run_chat(&orchestrator).await,
            }
        }
    }
}

fn load_stores(config: &Config) -> anyhow::Result<(Arc<DocStore>, Arc<ContactsStore>, Arc<TaskStore>)> {
    let root = &config.stores.documents_root;
    let docs = Arc::new(DocStore::load(root).context("loading document store")?);
    let contacts = Arc::new(ContactsStore::load(root).context("loading contact directory")?);

    let mut tasks = TaskStore::with_seed_tasks();
    if let Some(tasks_file) = &config.stores.tasks_file {
        tasks
            .load_markdown(tasks_file)
            .with_context(|| format!("loading tasks from {}", tasks_file.display()))?;
    }

    Ok((docs, contacts, Arc::new(tasks)))
}

fn build_orchestrator(config: &Config) -> anyhow::Result<Orchestrator> {
    let (docs, contacts, tasks) = load_stores(config)?;

    let registry = ToolRegistryBuilder::new()
        .with_docs(docs)
        .with_contacts(contacts)
        .with_tasks(tasks)
        .build();

    let model: Arc<dyn ModelClient> = match config.provider.api_key() {
        Some(key) => Arc::new(GenAiClient::with_api_key(&config.provider.model, &key)),
        None => Arc::new(GenAiClient::new(&config.provider.model)),
    };

    Ok(Orchestrator::new(model, registry)
        .with_sessions(SessionStore::new(config.chat.max_messages))
        .with_max_tool_rounds(config.chat.max_tool_rounds))
}

fn run_tools(config: &Config) -> anyhow::Result<()> {
    let (docs, contacts, tasks) = load_stores(config)?;
    let registry = ToolRegistryBuilder::new()
        .with_docs(docs)
        .with_contacts(contacts)
        .with_tasks(tasks)
        .build();

    println!("{}", style("Available tools:").bold());
    for def in registry.list() {
        println!("  {} - {}", style(&def.name).cyan(), def.description);
    }
    Ok(())
}

fn run_tasks(config: &Config) -> anyhow::Result<()> {
    let (_, _, tasks) = load_stores(config)?;
    let pending = tasks.list_pending();
    let today = chrono::Local::now().date_naive();
    let summary = summarize(&pending, today);
    println!("{}", render(&summary));
    Ok(())
}

async fn run_one_shot(orchestrator: &Orchestrator, message: &str) -> anyhow::Result<()> {
    let response = orchestrator.chat(ChatRequest::new(message)).await?;
    if !response.tool_calls.is_empty() {
        eprintln!(
            "{} {}",
            style("tools:").dim(),
            style(response.tool_calls.join(", ")).dim()
        );
    }
    println!("{}", response.answer);
    Ok(())
}

async fn run_chat(orchestrator: &Orchestrator) -> anyhow::Result<()> {
    println!(
        "{}",
        style("Onboarding assistant ready. Type 'exit' to quit.").bold()
    );
    let session_id = Uuid::new_v4().to_string();

    loop {
        let input: String = Input::new().with_prompt("you").interact_text()?;
        let trimmed = input.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
            break;
        }

        let request = ChatRequest::new(trimmed).with_session(session_id.clone());
        match orchestrator.chat(request).await {
            Ok(response) => {
                if !response.tool_calls.is_empty() {
                    println!(
                        "{} {}",
                        style("tools:").dim(),
                        style(response.tool_calls.join(", ")).dim()
                    );
                }
                println!("{} {}", style("bot:").green().bold(), response.answer);
            }
            Err(e) => {
                eprintln!("{} {}", style("error:").red().bold(), e);
            }
        }
    }

    Ok(())
}
