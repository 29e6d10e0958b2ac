mod classify;

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info};

use crate::config::CheckerSettings;
use crate::error::CheckError;
use crate::process::{RunFailure, run_captured};

pub use classify::{LineClassifier, PrefixClassifier, count_pending};

/// Anything able to report how many packages have an update pending.
pub trait UpdateSource {
    fn pending_updates(&self) -> impl Future<Output = Result<u32, CheckError>>;
}

impl<T: UpdateSource + ?Sized> UpdateSource for &T {
    fn pending_updates(&self) -> impl Future<Output = Result<u32, CheckError>> {
        (**self).pending_updates()
    }
}

/// Runs the package manager's upgrade check (`dnf check-upgrade` by default)
/// and counts the packages it lists.
#[derive(Debug, Clone)]
pub struct CommandChecker<C = PrefixClassifier> {
    program: String,
    args: Vec<String>,
    no_updates_exit_code: i32,
    updates_exit_code: i32,
    timeout: Duration,
    classifier: C,
}

impl CommandChecker {
    #[must_use]
    pub fn from_settings(settings: &CheckerSettings) -> Self {
        Self {
            program: settings.program.clone(),
            args: settings.args.clone(),
            no_updates_exit_code: settings.no_updates_exit_code,
            updates_exit_code: settings.updates_exit_code,
            timeout: settings.timeout,
            classifier: PrefixClassifier::new(settings.ignore_prefixes.iter().cloned()),
        }
    }
}

impl<C: LineClassifier> CommandChecker<C> {
    /// Swap the line heuristic while keeping the command settings.
    pub fn with_classifier<N: LineClassifier>(self, classifier: N) -> CommandChecker<N> {
        CommandChecker {
            program: self.program,
            args: self.args,
            no_updates_exit_code: self.no_updates_exit_code,
            updates_exit_code: self.updates_exit_code,
            timeout: self.timeout,
            classifier,
        }
    }

    /// # Errors
    ///
    /// Returns a [`CheckError`] when the command cannot be started, does not
    /// finish in time, or exits with a status that is neither the
    /// "no updates" nor the "updates available" code.
    pub async fn check(&self) -> Result<u32, CheckError> {
        debug!(program = %self.program, args = ?self.args, "checking for updates");
        let output = run_captured(&self.program, &self.args, self.timeout)
            .await
            .map_err(|failure| match failure {
                RunFailure::Spawn(source) => CheckError::Spawn {
                    program: self.program.clone(),
                    source,
                },
                RunFailure::Io(source) => CheckError::Io {
                    program: self.program.clone(),
                    source,
                },
                RunFailure::TimedOut => CheckError::TimedOut {
                    program: self.program.clone(),
                    after: self.timeout,
                },
            })?;

        match output.status.code() {
            Some(code) if code == self.no_updates_exit_code => {
                info!("no pending updates");
                Ok(0)
            }
            Some(code) if code == self.updates_exit_code => {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let count = count_pending(&stdout, &self.classifier);
                info!(count, "updates available");
                Ok(count)
            }
            code => Err(CheckError::UnexpectedStatus {
                program: self.program.clone(),
                code,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            }),
        }
    }
}

impl<C: LineClassifier> UpdateSource for CommandChecker<C> {
    fn pending_updates(&self) -> impl Future<Output = Result<u32, CheckError>> {
        self.check()
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Duration;

    use super::CommandChecker;
    use crate::config::Config;
    use crate::error::CheckError;

    fn shell(script: &str) -> CommandChecker {
        let mut settings = Config::default().checker;
        settings.program = "sh".to_string();
        settings.args = vec!["-c".to_string(), script.to_string()];
        settings.timeout = Duration::from_secs(10);
        CommandChecker::from_settings(&settings)
    }

    #[tokio::test]
    async fn exit_zero_means_nothing_pending() {
        let checker = shell("echo 'Last metadata expiration check: now'; exit 0");
        assert_eq!(checker.check().await.ok(), Some(0));
    }

    #[tokio::test]
    async fn exit_hundred_counts_package_lines() {
        let checker = shell(
            "printf 'Last metadata expiration check: now\\n\\n\
             a.x86_64 1 updates\\nb.x86_64 2 updates\\nObsoleting packages\\n'; exit 100",
        );
        assert_eq!(checker.check().await.ok(), Some(2));
    }

    #[tokio::test]
    async fn stderr_is_not_counted() {
        let checker = shell("echo 'a.x86_64 1 updates'; echo 'warning: noise' >&2; exit 100");
        assert_eq!(checker.check().await.ok(), Some(1));
    }

    #[tokio::test]
    async fn other_exit_codes_fail_with_stderr() {
        let checker = shell("echo 'Error: Failed to download metadata' >&2; exit 7");
        match checker.check().await {
            Err(CheckError::UnexpectedStatus { code, stderr, .. }) => {
                assert_eq!(code, Some(7));
                assert!(stderr.contains("Failed to download metadata"));
            }
            other => panic!("expected unexpected status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_program_fails_to_spawn() {
        let mut settings = Config::default().checker;
        settings.program = "/nonexistent/update-checker".to_string();
        let checker = CommandChecker::from_settings(&settings);
        assert!(matches!(
            checker.check().await,
            Err(CheckError::Spawn { .. })
        ));
    }

    #[tokio::test]
    async fn slow_checks_time_out() {
        let mut checker = shell("sleep 5; exit 0");
        checker.timeout = Duration::from_millis(100);
        assert!(matches!(
            checker.check().await,
            Err(CheckError::TimedOut { .. })
        ));
    }

    #[tokio::test]
    async fn custom_classifier_is_used() {
        let checker = shell("printf 'a.x86_64 1\\nb.noarch 1\\n'; exit 100")
            .with_classifier(|line: &str| line.ends_with('1') && line.contains("x86_64"));
        assert_eq!(checker.check().await.ok(), Some(1));
    }
}
