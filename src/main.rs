//! # RuleBased CLI (`rulebased`)
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `rulebased init` | Create `.rulebased/config.json` and a seed rule |
//! | `rulebased sync` | Report the status of every configured source |
//! | `rulebased get "<keywords>"` | Search rule documents |
//! | `rulebased mcp` | Serve the tools over MCP (stdio) |
//! | `rulebased completions <shell>` | Print a shell completion script |
//!
//! Hard failures (no configuration, corrupt configuration, refused
//! initialization, I/O) are logged and exit with status 1. "No matches"
//! and unavailable sources are warnings and exit with status 0.

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;
use std::process::ExitCode;

use rulebased::config::{OutputFormat, SourceKind};
use rulebased::format::render;
use rulebased::init::{init_project, InitOptions, DEFAULT_RULES_PATH};
use rulebased::logging::init_logging;
use rulebased::mcp::run_stdio_server;
use rulebased::search::search_rules;
use rulebased::sync::{sync_sources, SourceSync};
use rulebased::workspace::Workspace;

/// RuleBased CLI — manage and apply rule sets in projects.
#[derive(Parser)]
#[command(
    name = "rulebased",
    about = "RuleBased CLI - Manage and apply rule sets in projects",
    version,
    long_about = "RuleBased keeps a per-project list of rule sources (local directories or git \
    repositories) in .rulebased/config.json and lets you search their markdown rule documents \
    from the command line or from an MCP client."
)]
struct Cli {
    /// Project directory (defaults to the current directory).
    ///
    /// The configuration is read from `<dir>/.rulebased/config.json` and
    /// relative source paths are resolved against it.
    #[arg(long, short = 'C', global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize .rulebased directory and create initial configuration.
    ///
    /// Refuses to run when the project is already initialized.
    Init {
        /// Configuration type.
        #[arg(short = 't', long = "type", default_value = "local")]
        kind: SourceKind,

        /// Git repository URL for rules (required with `--type git`).
        #[arg(short, long)]
        repo: Option<String>,

        /// Local path for rules.
        #[arg(short, long, default_value = DEFAULT_RULES_PATH)]
        path: String,
    },

    /// Sync rule sets from repository to local storage.
    ///
    /// No transport is implemented yet: git sources are reported as
    /// pending and local sources are checked for availability.
    Sync {
        /// Force sync even if local changes exist.
        #[arg(short, long)]
        force: bool,
    },

    /// Get rules related to specific keywords.
    ///
    /// The keywords are matched as one case-insensitive phrase.
    Get {
        /// Keywords to search for in rules.
        keywords: String,

        /// Output format (json|markdown). Defaults to `settings.defaultFormat`.
        #[arg(short, long)]
        format: Option<OutputFormat>,
    },

    /// Start MCP server for rule-based context (stdio).
    Mcp,

    /// Generate a shell completion script.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn workspace_for(dir: Option<PathBuf>) -> anyhow::Result<Workspace> {
    let cwd = std::env::current_dir().context("cannot determine the working directory")?;
    Ok(match dir {
        Some(d) if d.is_absolute() => Workspace::new(d),
        Some(d) => Workspace::new(cwd.join(d)),
        None => Workspace::new(cwd),
    })
}

fn run_init(
    ws: &Workspace,
    kind: SourceKind,
    repo: Option<String>,
    path: String,
) -> anyhow::Result<()> {
    tracing::info!("Initializing RuleBased project...");
    let opts = InitOptions {
        kind,
        path,
        repository: repo,
    };
    let outcome = init_project(ws, &opts)?;
    println!("{}", outcome);
    Ok(())
}

fn run_sync(ws: &Workspace, force: bool) -> anyhow::Result<()> {
    tracing::info!("Syncing rules...");
    let report = sync_sources(ws, force)?;

    for status in &report.sources {
        if let SourceSync::NotFound { name, .. } = status {
            tracing::warn!("source {} is unavailable", name);
        }
    }
    println!("{}", report);

    if force {
        tracing::warn!("Force sync option was used");
    }
    tracing::info!("Sync completed");
    Ok(())
}

fn run_get(ws: &Workspace, keywords: &str, format: Option<OutputFormat>) -> anyhow::Result<()> {
    tracing::info!("Searching for rules with keywords: \"{}\"", keywords);
    let outcome = search_rules(ws, keywords)?;

    if outcome.matches.is_empty() {
        tracing::warn!("No rules found matching \"{}\"", keywords);
    } else {
        tracing::info!(
            "Found {} rule(s) matching \"{}\"",
            outcome.matches.len(),
            keywords
        );
    }

    let format = format.unwrap_or(outcome.default_format);
    println!("{}", render(&outcome.matches, format)?);
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        println!();
        tracing::info!("Start with: rulebased init");
        return Ok(());
    };

    match command {
        // Needs no project
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
        Commands::Init { kind, repo, path } => run_init(&workspace_for(cli.dir)?, kind, repo, path),
        Commands::Sync { force } => run_sync(&workspace_for(cli.dir)?, force),
        Commands::Get { keywords, format } => run_get(&workspace_for(cli.dir)?, &keywords, format),
        Commands::Mcp => run_stdio_server(workspace_for(cli.dir)?).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}
