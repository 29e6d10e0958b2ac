use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use crate::Result;
use crate::error::ConfigError;
use crate::types::{NotifyBackend, Urgency};

use super::defaults::{
    default_check_args, default_check_program, default_check_timeout, default_ignore_prefixes,
    default_no_updates_exit_code, default_notify_appname, default_notify_backend,
    default_notify_command_timeout, default_notify_program, default_notify_title,
    default_state_file, default_updates_exit_code,
};
use super::env::{env_duration, env_parse, env_string};
use super::{CheckerSettings, Config, HumantimeDuration, NotifySettings};

const ENV_PREFIX: &str = "UPDATE_NOTIFIER";

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawConfig, ConfigError> {
    let mut builder = ::config::Config::builder();
    let path = path.as_ref();
    builder = builder.add_source(
        ::config::File::from(path)
            .format(::config::FileFormat::Toml)
            .required(false),
    );
    builder = builder.add_source(
        ::config::Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    builder
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[derive(Debug, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default = "default_state_file")]
    pub(super) state_file: PathBuf,
    #[serde(default)]
    pub(super) checker: RawChecker,
    #[serde(default)]
    pub(super) notify: RawNotify,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawChecker {
    #[serde(default = "default_check_program")]
    pub(super) program: String,
    #[serde(default = "default_check_args")]
    pub(super) args: Vec<String>,
    #[serde(default = "default_no_updates_exit_code")]
    pub(super) no_updates_exit_code: i32,
    #[serde(default = "default_updates_exit_code")]
    pub(super) updates_exit_code: i32,
    #[serde(default = "default_ignore_prefixes")]
    pub(super) ignore_prefixes: Vec<String>,
    #[serde(default = "default_check_timeout")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) timeout: Duration,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawNotify {
    #[serde(default = "default_notify_backend")]
    pub(super) backend: NotifyBackend,
    #[serde(default = "default_notify_program")]
    pub(super) program: String,
    #[serde(default = "default_notify_title")]
    pub(super) title: String,
    #[serde(default = "default_notify_appname")]
    pub(super) appname: String,
    #[serde(default)]
    pub(super) icon: Option<String>,
    #[serde(default)]
    pub(super) urgency: Option<Urgency>,
    #[serde(default)]
    #[serde_as(as = "Option<HumantimeDuration>")]
    pub(super) expire: Option<Duration>,
    #[serde(default = "default_notify_command_timeout")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) command_timeout: Duration,
}

impl RawConfig {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        if let Some(path) =
            env_string("UPDATE_NOTIFIER_STATE_FILE")?.filter(|p| !p.trim().is_empty())
        {
            self.state_file = PathBuf::from(path);
        }
        if let Some(timeout) = env_duration("UPDATE_NOTIFIER_CHECK_TIMEOUT")? {
            self.checker.timeout = timeout;
        }
        if let Some(backend) = env_parse::<NotifyBackend>("UPDATE_NOTIFIER_NOTIFY_BACKEND")? {
            self.notify.backend = backend;
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<Config> {
        if self.state_file.as_os_str().is_empty() {
            return Err(invalid("state_file", "path cannot be empty"));
        }
        if self.checker.program.trim().is_empty() {
            return Err(invalid("checker.program", "program cannot be empty"));
        }
        if self.checker.no_updates_exit_code == self.checker.updates_exit_code {
            return Err(invalid(
                "checker.updates_exit_code",
                format!(
                    "must differ from checker.no_updates_exit_code ({})",
                    self.checker.no_updates_exit_code
                ),
            ));
        }
        if self.checker.ignore_prefixes.iter().any(|p| p.trim().is_empty()) {
            return Err(invalid(
                "checker.ignore_prefixes",
                "an empty prefix would discard every line",
            ));
        }
        if self.checker.timeout.is_zero() {
            return Err(invalid(
                "checker.timeout",
                "timeout must be greater than zero",
            ));
        }
        if self.notify.backend == NotifyBackend::Command && self.notify.program.trim().is_empty()
        {
            return Err(invalid("notify.program", "program cannot be empty"));
        }
        if self.notify.title.trim().is_empty() {
            return Err(invalid("notify.title", "title cannot be empty"));
        }
        if self.notify.command_timeout.is_zero() {
            return Err(invalid(
                "notify.command_timeout",
                "timeout must be greater than zero",
            ));
        }
        let expire_ms = match self.notify.expire {
            Some(expire) => Some(u32::try_from(expire.as_millis()).map_err(|_| {
                invalid(
                    "notify.expire",
                    format!("{} ms does not fit in 32 bits", expire.as_millis()),
                )
            })?),
            None => None,
        };

        Ok(Config {
            state_file: self.state_file,
            checker: CheckerSettings {
                program: self.checker.program,
                args: self.checker.args,
                no_updates_exit_code: self.checker.no_updates_exit_code,
                updates_exit_code: self.checker.updates_exit_code,
                ignore_prefixes: self.checker.ignore_prefixes,
                timeout: self.checker.timeout,
            },
            notify: NotifySettings {
                backend: self.notify.backend,
                program: self.notify.program,
                title: self.notify.title,
                appname: self.notify.appname,
                icon: self.notify.icon.filter(|icon| !icon.trim().is_empty()),
                urgency: self.notify.urgency,
                expire_ms,
                command_timeout: self.notify.command_timeout,
            },
        })
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> crate::error::Error {
    ConfigError::InvalidField {
        field,
        message: message.into(),
    }
    .into()
}

impl Default for RawConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            checker: RawChecker::default(),
            notify: RawNotify::default(),
        }
    }
}

impl Default for RawChecker {
    fn default() -> Self {
        Self {
            program: default_check_program(),
            args: default_check_args(),
            no_updates_exit_code: default_no_updates_exit_code(),
            updates_exit_code: default_updates_exit_code(),
            ignore_prefixes: default_ignore_prefixes(),
            timeout: default_check_timeout(),
        }
    }
}

impl Default for RawNotify {
    fn default() -> Self {
        Self {
            backend: default_notify_backend(),
            program: default_notify_program(),
            title: default_notify_title(),
            appname: default_notify_appname(),
            icon: None,
            urgency: None,
            expire: None,
            command_timeout: default_notify_command_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::RawConfig;
    use crate::error::{ConfigError, Error};
    use crate::types::NotifyBackend;

    fn invalid_field(raw: RawConfig) -> &'static str {
        match raw.validate_and_build() {
            Err(Error::Config(ConfigError::InvalidField { field, .. })) => field,
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("configuration unexpectedly validated"),
        }
    }

    #[test]
    fn defaults_validate() {
        let config = match RawConfig::default().validate_and_build() {
            Ok(config) => config,
            Err(err) => panic!("defaults rejected: {err}"),
        };
        assert_eq!(config.checker.program, "dnf");
        assert_eq!(config.checker.args, ["check-upgrade"]);
        assert_eq!(config.checker.updates_exit_code, 100);
        assert_eq!(config.notify.backend, NotifyBackend::Command);
        assert_eq!(config.notify.title, "DNF Update Check");
        assert!(config.notify.expire_ms.is_none());
    }

    #[test]
    fn identical_exit_codes_are_rejected() {
        let mut raw = RawConfig::default();
        raw.checker.updates_exit_code = 0;
        assert_eq!(invalid_field(raw), "checker.updates_exit_code");
    }

    #[test]
    fn empty_ignore_prefix_is_rejected() {
        let mut raw = RawConfig::default();
        raw.checker.ignore_prefixes.push("  ".to_string());
        assert_eq!(invalid_field(raw), "checker.ignore_prefixes");
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut raw = RawConfig::default();
        raw.checker.timeout = Duration::ZERO;
        assert_eq!(invalid_field(raw), "checker.timeout");
    }

    #[test]
    fn dbus_backend_does_not_need_a_program() {
        let mut raw = RawConfig::default();
        raw.notify.backend = NotifyBackend::Dbus;
        raw.notify.program = String::new();
        assert!(raw.validate_and_build().is_ok());
    }

    #[test]
    fn expire_is_converted_to_milliseconds() {
        let mut raw = RawConfig::default();
        raw.notify.expire = Some(Duration::from_secs(10));
        let config = match raw.validate_and_build() {
            Ok(config) => config,
            Err(err) => panic!("rejected: {err}"),
        };
        assert_eq!(config.notify.expire_ms, Some(10_000));
    }
}
