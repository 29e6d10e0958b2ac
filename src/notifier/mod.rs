mod backends;

use std::future::Future;

use tracing::{info, warn};

use crate::config::NotifySettings;
use crate::error::NotifyError;
use crate::types::NotifyBackend;

use backends::ToastParams;

/// Destination for the "updates pending" message.
pub trait NotificationSink {
    fn notify(&self, message: &str) -> impl Future<Output = Result<(), NotifyError>>;
}

impl<T: NotificationSink + ?Sized> NotificationSink for &T {
    fn notify(&self, message: &str) -> impl Future<Output = Result<(), NotifyError>> {
        (**self).notify(message)
    }
}

/// Shows the message on the desktop through the configured backend.
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    settings: NotifySettings,
}

impl DesktopNotifier {
    #[must_use]
    pub const fn new(settings: NotifySettings) -> Self {
        Self { settings }
    }

    /// # Errors
    ///
    /// Returns a [`NotifyError`] when the dispatcher cannot be started,
    /// exits non-zero, times out, or the notification service rejects the
    /// notification.
    pub async fn send(&self, message: &str) -> Result<(), NotifyError> {
        let settings = &self.settings;
        let params = ToastParams {
            title: &settings.title,
            body: message,
            appname: &settings.appname,
            icon: settings.icon.as_deref(),
            urgency: settings.urgency,
            expire_ms: settings.expire_ms,
        };

        match settings.backend {
            NotifyBackend::Command => {
                backends::send_command(&settings.program, settings.command_timeout, &params)
                    .await?;
            }
            NotifyBackend::Dbus => backends::send_dbus(&params)?,
        }
        info!(backend = %settings.backend, body = message, "notification sent");
        Ok(())
    }
}

impl NotificationSink for DesktopNotifier {
    fn notify(&self, message: &str) -> impl Future<Output = Result<(), NotifyError>> {
        self.send(message)
    }
}

/// Logs what would have been shown instead of showing it.
#[derive(Debug, Clone)]
pub struct DryRunNotifier {
    title: String,
}

impl DryRunNotifier {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
        }
    }
}

impl NotificationSink for DryRunNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        warn!(title = %self.title, body = message, "dry-run: would emit notification");
        Ok(())
    }
}

/// Either a real or a dry-run notifier, picked at startup.
#[derive(Debug, Clone)]
pub enum Notifier {
    Desktop(DesktopNotifier),
    DryRun(DryRunNotifier),
}

impl Notifier {
    #[must_use]
    pub fn from_settings(settings: NotifySettings, dry_run: bool) -> Self {
        if dry_run {
            Self::DryRun(DryRunNotifier::new(settings.title))
        } else {
            Self::Desktop(DesktopNotifier::new(settings))
        }
    }
}

impl NotificationSink for Notifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        match self {
            Self::Desktop(inner) => inner.send(message).await,
            Self::DryRun(inner) => inner.notify(message).await,
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::{DesktopNotifier, NotificationSink, Notifier};
    use crate::config::Config;
    use crate::error::NotifyError;

    fn notifier(program: &str) -> DesktopNotifier {
        let mut settings = Config::default().notify;
        settings.program = program.to_string();
        DesktopNotifier::new(settings)
    }

    #[tokio::test]
    async fn zero_exit_is_success() {
        assert!(notifier("true").send("1 package(s) available").await.is_ok());
    }

    #[tokio::test]
    async fn non_zero_exit_is_an_error() {
        match notifier("false").send("1 package(s) available").await {
            Err(NotifyError::Status { code, .. }) => assert_eq!(code, Some(1)),
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_dispatcher_is_an_error() {
        assert!(matches!(
            notifier("/nonexistent/notify-send").send("x").await,
            Err(NotifyError::Spawn { .. })
        ));
    }

    #[tokio::test]
    async fn dry_run_never_spawns() {
        let mut settings = Config::default().notify;
        settings.program = "/nonexistent/notify-send".to_string();
        let notifier = Notifier::from_settings(settings, true);
        assert!(notifier.notify("2 package(s) available").await.is_ok());
    }
}
