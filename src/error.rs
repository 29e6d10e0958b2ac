use std::fmt::{self, Display};
use std::num::ParseIntError;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Check(#[from] CheckError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
    #[error("telemetry initialization failed: {0}")]
    Telemetry(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    #[error("invalid configuration for {field}: {message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },
    #[error("configuration error: {0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to {op} state file {path}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("state file {path} does not hold a package count: {contents:?}")]
    Parse {
        path: PathBuf,
        contents: String,
        #[source]
        source: ParseIntError,
    },
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("failed to start `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to collect output of `{program}`")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` exited with {}: {}", describe_code(.code), .stderr.trim())]
    UnexpectedStatus {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("`{program}` did not finish within {after:?}")]
    TimedOut { program: String, after: Duration },
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to start notification dispatcher `{program}`")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to collect output of notification dispatcher `{program}`")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("notification dispatcher `{program}` exited with {}: {}", describe_code(.code), .stderr.trim())]
    Status {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
    #[error("notification dispatcher `{program}` did not finish within {after:?}")]
    TimedOut { program: String, after: Duration },
    #[error("notification backend failed: {0}")]
    Backend(String),
}

/// Step of a run during which a fatal error occurred.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Stage {
    Init,
    Check,
    Decide,
    Notify,
    Persist,
    Clear,
}

impl Stage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Check => "check",
            Self::Decide => "decide",
            Self::Notify => "notify",
            Self::Persist => "persist",
            Self::Clear => "clear",
        }
    }
}

impl Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("{stage} stage failed")]
pub struct StageError {
    pub stage: Stage,
    #[source]
    pub source: Error,
}

impl StageError {
    pub fn new(stage: Stage, source: impl Into<Error>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}

#[allow(clippy::ref_option)]
fn describe_code(code: &Option<i32>) -> String {
    code.map_or_else(
        || "no exit code (terminated by signal)".to_string(),
        |c| format!("exit code {c}"),
    )
}
