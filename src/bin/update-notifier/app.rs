use std::path::PathBuf;

use thiserror::Error;
use tracing::info;
use update_notifier::checker::CommandChecker;
use update_notifier::config::{Config, DEFAULT_CONFIG_PATH};
use update_notifier::error::{Error as NotifierError, StageError};
use update_notifier::notifier::Notifier;
use update_notifier::orchestrator::Orchestrator;
use update_notifier::state::StateStore;
use update_notifier::telemetry::init_tracing;
use update_notifier::types::Outcome;

use super::cli::Cli;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("startup failed")]
    Setup(#[from] NotifierError),
    #[error(transparent)]
    Run(#[from] StageError),
}

pub async fn run(cli: Cli) -> Result<Outcome, AppError> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let config_path = cli
        .config
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut config = Config::from_env_and_file(&config_path)?;
    if let Some(path) = cli.state_file {
        config.state_file = path;
    }

    info!(
        config = %config_path.display(),
        state_file = %config.state_file.display(),
        checker = %config.checker.program,
        dry_run = cli.dry_run,
        "starting update check"
    );

    let orchestrator = Orchestrator::new(
        StateStore::new(config.state_file),
        CommandChecker::from_settings(&config.checker),
        Notifier::from_settings(config.notify, cli.dry_run),
    );
    let outcome = orchestrator.run().await?;

    match outcome {
        Outcome::UpToDate => info!("done: no pending updates"),
        Outcome::Unchanged { count } => info!(count, "done: count unchanged, no notification"),
        Outcome::Notified { count } => info!(count, "done: notification sent"),
    }
    Ok(outcome)
}
