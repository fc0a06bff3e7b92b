mod commands;
mod editor;
mod error;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{completions, poc, ticket, Context};
use crate::error::{exit_code_for, report_error};
use regmate_config as config;
use regmate_store::{paths, TicketCache};

#[derive(Debug, Parser)]
#[command(name = "regmate", version, about = "Reg-RWS registration client")]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Directory holding cached tickets and working templates
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,
    /// API key for the registration service (overrides the config file)
    #[arg(long, global = true)]
    api_key: Option<String>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Point of contact records
    #[command(subcommand)]
    Poc(poc::PocCommand),
    /// Support tickets
    #[command(subcommand)]
    Ticket(ticket::TicketCommand),
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let verbose = cli.verbose;
    init_logging(verbose);
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err, verbose);
            exit_code_for(&err)
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let Cli {
        config: config_path,
        workspace,
        api_key,
        json,
        verbose,
        command,
    } = cli;

    match command {
        Command::Completions(args) => completions::emit(args),
        command => {
            let mut app_config =
                config::load(config_path.clone()).with_context(|| "load config")?;
            if let Some(api_key) = api_key {
                app_config.api_key = Some(api_key.to_ascii_uppercase());
            }
            if verbose {
                match config::resolve_config_path(config_path) {
                    Ok(path) => {
                        if path.exists() {
                            debug!(path = %path.display(), "config resolved");
                        } else {
                            debug!(path = %path.display(), "config missing, using defaults");
                        }
                    }
                    Err(err) => {
                        debug!(error = %err, "config unavailable");
                    }
                }
            }

            let workspace = paths::resolve_workspace(workspace)
                .with_context(|| "resolve workspace directory")?;
            if verbose {
                debug!(path = %workspace.display(), "workspace resolved");
            }
            let cache = TicketCache::open(&workspace)
                .with_context(|| format!("open workspace {}", workspace.display()))?;

            let ctx = Context {
                config: &app_config,
                cache: &cache,
                json,
            };

            match command {
                Command::Poc(cmd) => match cmd {
                    poc::PocCommand::Show(args) => poc::show(&ctx, args),
                    poc::PocCommand::Template(args) => poc::template(&ctx, args),
                    poc::PocCommand::Create(args) => poc::create(&ctx, args),
                    poc::PocCommand::Modify(args) => poc::modify(&ctx, args),
                    poc::PocCommand::Delete(args) => poc::delete(&ctx, args),
                },
                Command::Ticket(cmd) => match cmd {
                    ticket::TicketCommand::List(args) => ticket::list(&ctx, args),
                    ticket::TicketCommand::Fetch(args) => ticket::fetch(&ctx, args),
                    ticket::TicketCommand::Show(args) => ticket::show(&ctx, args),
                },
                Command::Completions(_) => {
                    unreachable!("completions command handled before workspace setup")
                }
            }
        }
    }
}

fn init_logging(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .try_init();
}
