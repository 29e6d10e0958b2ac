use std::path::PathBuf;
use std::time::Duration;

use crate::types::NotifyBackend;

pub(super) fn default_state_file() -> PathBuf {
    PathBuf::from("/var/tmp/update-notifier.state")
}

pub(super) fn default_check_program() -> String {
    "dnf".to_string()
}

pub(super) fn default_check_args() -> Vec<String> {
    vec!["check-upgrade".to_string()]
}

pub(super) const fn default_no_updates_exit_code() -> i32 {
    0
}

pub(super) const fn default_updates_exit_code() -> i32 {
    100
}

pub(super) fn default_ignore_prefixes() -> Vec<String> {
    vec!["Last metadata".to_string(), "Obsoleting package".to_string()]
}

pub(super) const fn default_check_timeout() -> Duration {
    Duration::from_secs(300)
}

pub(super) const fn default_notify_backend() -> NotifyBackend {
    NotifyBackend::Command
}

pub(super) fn default_notify_program() -> String {
    "notify-send".to_string()
}

pub(super) fn default_notify_title() -> String {
    "DNF Update Check".to_string()
}

pub(super) fn default_notify_appname() -> String {
    "update-notifier".to_string()
}

pub(super) const fn default_notify_command_timeout() -> Duration {
    Duration::from_secs(30)
}
