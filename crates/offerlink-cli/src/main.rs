mod commands;
mod error;
mod util;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

use crate::commands::{
    candidates, completions, employees, matching, offers, run, Context,
};
use crate::error::{exit_code_for, report_error};
use offerlink_config as config;
use offerlink_store::{paths, Store};

#[derive(Debug, Parser)]
#[command(
    name = "offerlink",
    version,
    about = "Match onboarding candidates to employee records"
)]
struct Cli {
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(long, global = true)]
    json: bool,
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate shell completions
    Completions(completions::CompletionsArgs),
    /// List candidates in the configured workflow states
    Candidates(candidates::CandidatesArgs),
    /// Download offer letters for candidates
    Offers(offers::OffersArgs),
    #[command(subcommand)]
    Employee(employees::EmployeeCommand),
    /// Match candidates to active employees
    Match(matching::MatchArgs),
    /// Fetch candidates and offer letters, then match
    Run(run::RunArgs),
}

fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
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
        db_path,
        config: config_path,
        json,
        verbose,
        command,
    } = cli;

    if let Command::Completions(args) = command {
        return completions::emit(args);
    }

    let app_config = config::load(config_path.clone()).with_context(|| "load config")?;
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

    let db_path = paths::resolve_db_path(db_path).with_context(|| "resolve database path")?;
    if verbose {
        debug!(path = %db_path.display(), "database path resolved");
    }

    let store =
        Store::open(&db_path).with_context(|| format!("open database {}", db_path.display()))?;
    store.migrate().with_context(|| "run migrations")?;

    let ctx = Context {
        store: &store,
        json,
        config: &app_config,
    };

    match command {
        Command::Candidates(args) => candidates::list_candidates(&ctx, args),
        Command::Offers(args) => offers::fetch_offers(&ctx, args),
        Command::Employee(cmd) => match cmd {
            employees::EmployeeCommand::Add(args) => employees::add_employee(&ctx, args),
            employees::EmployeeCommand::Show(args) => employees::show_employee(&ctx, args),
            employees::EmployeeCommand::Ls(args) => employees::list_employees(&ctx, args),
            employees::EmployeeCommand::Import(args) => employees::import_employees(&ctx, args),
            employees::EmployeeCommand::Terminate(args) => {
                employees::terminate_employee(&ctx, args)
            }
        },
        Command::Match(args) => matching::match_candidates(&ctx, args),
        Command::Run(args) => run::run_job(&ctx, args),
        Command::Completions(_) => {
            unreachable!("completions command handled before store initialization")
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
        .with_writer(std::io::stderr)
        .try_init();
}
