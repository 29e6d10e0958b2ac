use std::time::Duration;

use crate::error::NotifyError;
use crate::process::{RunFailure, run_captured};
use crate::types::Urgency;

pub(super) struct ToastParams<'a> {
    pub title: &'a str,
    pub body: &'a str,
    pub appname: &'a str,
    pub icon: Option<&'a str>,
    pub urgency: Option<Urgency>,
    pub expire_ms: Option<u32>,
}

/// `notify-send`-compatible argument list: options first, then `--` so a
/// title or body starting with a dash is never read as a flag.
pub(super) fn command_args(params: &ToastParams<'_>) -> Vec<String> {
    let mut args = Vec::with_capacity(7);
    if !params.appname.trim().is_empty() {
        args.push(format!("--app-name={}", params.appname));
    }
    if let Some(icon) = params.icon {
        args.push(format!("--icon={icon}"));
    }
    if let Some(urgency) = params.urgency {
        args.push(format!("--urgency={urgency}"));
    }
    if let Some(ms) = params.expire_ms {
        args.push(format!("--expire-time={ms}"));
    }
    args.push("--".to_string());
    args.push(params.title.to_string());
    args.push(params.body.to_string());
    args
}

pub(super) async fn send_command(
    program: &str,
    limit: Duration,
    params: &ToastParams<'_>,
) -> std::result::Result<(), NotifyError> {
    let output = run_captured(program, command_args(params), limit)
        .await
        .map_err(|failure| dispatch_failure(program, limit, failure))?;

    if output.status.success() {
        return Ok(());
    }
    Err(NotifyError::Status {
        program: program.to_string(),
        code: output.status.code(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

fn dispatch_failure(program: &str, limit: Duration, failure: RunFailure) -> NotifyError {
    let program = program.to_string();
    match failure {
        RunFailure::Spawn(source) => NotifyError::Spawn { program, source },
        RunFailure::Io(source) => NotifyError::Io { program, source },
        RunFailure::TimedOut => NotifyError::TimedOut {
            program,
            after: limit,
        },
    }
}

#[cfg(target_os = "linux")]
pub(super) fn send_dbus(params: &ToastParams<'_>) -> std::result::Result<(), NotifyError> {
    linux::send_dbus(params)
}

#[cfg(not(target_os = "linux"))]
pub(super) fn send_dbus(params: &ToastParams<'_>) -> std::result::Result<(), NotifyError> {
    let _ = params;
    Err(NotifyError::Backend(
        "the dbus backend is only available on Linux".to_string(),
    ))
}

#[cfg(target_os = "linux")]
mod linux {
    use notify_rust::{Notification, Timeout as LibTimeout, Urgency as LibUrgency};
    use tracing::trace;

    use super::ToastParams;
    use crate::error::NotifyError;
    use crate::types::Urgency;

    pub fn send_dbus(params: &ToastParams<'_>) -> std::result::Result<(), NotifyError> {
        let mut builder = Notification::new();
        builder
            .summary(params.title)
            .body(params.body)
            .appname(params.appname)
            .timeout(params.expire_ms.map_or(LibTimeout::Default, LibTimeout::Milliseconds));

        if let Some(urgency) = params.urgency {
            builder.urgency(map_urgency(urgency));
        }
        if let Some(icon) = params.icon {
            builder.icon(icon);
        }

        let handle = builder
            .show()
            .map_err(|err| NotifyError::Backend(err.to_string()))?;
        trace!(id = handle.id(), "notification shown over dbus");
        Ok(())
    }

    const fn map_urgency(urgency: Urgency) -> LibUrgency {
        match urgency {
            Urgency::Low => LibUrgency::Low,
            Urgency::Normal => LibUrgency::Normal,
            Urgency::Critical => LibUrgency::Critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::time::Duration;

    use super::{ToastParams, command_args, dispatch_failure};
    use crate::error::NotifyError;
    use crate::process::RunFailure;
    use crate::types::Urgency;

    #[test]
    fn broken_pipe_is_reported_as_io_not_spawn() {
        let failure = RunFailure::Io(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"));
        match dispatch_failure("notify-send", Duration::from_secs(30), failure) {
            NotifyError::Io { program, source } => {
                assert_eq!(program, "notify-send");
                assert_eq!(source.kind(), io::ErrorKind::BrokenPipe);
            }
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn spawn_and_timeout_keep_their_variants() {
        let spawn = RunFailure::Spawn(io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(
            dispatch_failure("notify-send", Duration::from_secs(30), spawn),
            NotifyError::Spawn { .. }
        ));
        match dispatch_failure("notify-send", Duration::from_secs(2), RunFailure::TimedOut) {
            NotifyError::TimedOut { after, .. } => assert_eq!(after, Duration::from_secs(2)),
            other => panic!("expected timeout, got {other:?}"),
        }
    }

    #[test]
    fn minimal_args_carry_app_name_title_and_body() {
        let params = ToastParams {
            title: "DNF Update Check",
            body: "3 package(s) available",
            appname: "update-notifier",
            icon: None,
            urgency: None,
            expire_ms: None,
        };
        assert_eq!(
            command_args(&params),
            [
                "--app-name=update-notifier",
                "--",
                "DNF Update Check",
                "3 package(s) available"
            ]
        );
    }

    #[test]
    fn optional_settings_become_flags() {
        let params = ToastParams {
            title: "t",
            body: "-b",
            appname: "",
            icon: Some("software-update-available"),
            urgency: Some(Urgency::Critical),
            expire_ms: Some(8_000),
        };
        assert_eq!(
            command_args(&params),
            [
                "--icon=software-update-available",
                "--urgency=critical",
                "--expire-time=8000",
                "--",
                "t",
                "-b"
            ]
        );
    }
}
