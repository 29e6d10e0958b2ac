use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::Result;
use crate::error::Error as NotifierError;
use crate::types::{NotifyBackend, Urgency};

mod defaults;
mod env;
mod raw;
mod serde;

use self::serde::HumantimeDuration;

/// Default location of the optional TOML configuration file.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/update-notifier/config.toml";

#[derive(Debug, Clone)]
pub struct Config {
    pub state_file: PathBuf,
    pub checker: CheckerSettings,
    pub notify: NotifySettings,
}

#[derive(Debug, Clone)]
pub struct CheckerSettings {
    pub program: String,
    pub args: Vec<String>,
    pub no_updates_exit_code: i32,
    pub updates_exit_code: i32,
    /// Stdout lines starting with one of these are headers, not packages.
    pub ignore_prefixes: Vec<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct NotifySettings {
    pub backend: NotifyBackend,
    pub program: String,
    pub title: String,
    pub appname: String,
    pub icon: Option<String>,
    pub urgency: Option<Urgency>,
    pub expire_ms: Option<u32>,
    pub command_timeout: Duration,
}

impl Config {
    /// Load configuration from a file and the environment.
    ///
    /// A missing file is not an error; every setting has a default.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration file cannot be parsed,
    /// when environment overrides are invalid, or when the resulting values
    /// fail validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path).map_err(NotifierError::from)?;
        raw.apply_env_overrides().map_err(NotifierError::from)?;
        raw.validate_and_build()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_file: defaults::default_state_file(),
            checker: CheckerSettings {
                program: defaults::default_check_program(),
                args: defaults::default_check_args(),
                no_updates_exit_code: defaults::default_no_updates_exit_code(),
                updates_exit_code: defaults::default_updates_exit_code(),
                ignore_prefixes: defaults::default_ignore_prefixes(),
                timeout: defaults::default_check_timeout(),
            },
            notify: NotifySettings {
                backend: defaults::default_notify_backend(),
                program: defaults::default_notify_program(),
                title: defaults::default_notify_title(),
                appname: defaults::default_notify_appname(),
                icon: None,
                urgency: None,
                expire_ms: None,
                command_timeout: defaults::default_notify_command_timeout(),
            },
        }
    }
}
