use std::ffi::OsStr;
use std::process::{Output, Stdio};
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;
use tracing::trace;

/// Why an external command produced no exit status.
#[derive(Debug)]
pub(crate) enum RunFailure {
    Spawn(std::io::Error),
    Io(std::io::Error),
    TimedOut,
}

/// Run `program` to completion with stdin closed, capturing stdout and
/// stderr separately. The child is killed if `limit` elapses first.
pub(crate) async fn run_captured<I, S>(
    program: &str,
    args: I,
    limit: Duration,
) -> Result<Output, RunFailure>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    trace!(program, "spawning external command");
    let child = command.spawn().map_err(RunFailure::Spawn)?;

    match timeout(limit, child.wait_with_output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(err)) => Err(RunFailure::Io(err)),
        Err(_) => Err(RunFailure::TimedOut),
    }
}
