use std::path::PathBuf;

use clap::{ArgAction, Parser};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Desktop notification when the number of pending package updates changes",
    long_about = None
)]
pub struct Cli {
    /// TOML configuration file; missing files are ignored.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Overrides the state file path from the configuration.
    #[arg(long, value_name = "PATH")]
    pub state_file: Option<PathBuf>,

    /// Log the notification instead of showing it.
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Emit JSON logs (requires the `json-logs` feature).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Explicit log filter, e.g. "update_notifier=debug".
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
