use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

use crate::Result;
use crate::error::Error;

/// Install the global tracing subscriber, writing to stderr.
///
/// The filter is the first valid one among `explicit_filter`, `RUST_LOG`
/// and `info`. A rejected `explicit_filter` is reported once the subscriber
/// is installed.
///
/// # Errors
///
/// Returns an error if JSON output is requested from a binary built without
/// the `json-logs` feature, or if a global subscriber is already installed.
pub fn init_tracing(explicit_filter: Option<&str>, use_json: bool) -> Result<()> {
    let filter = filter_candidates(explicit_filter, std::env::var("RUST_LOG").ok())
        .into_iter()
        .find_map(|candidate| EnvFilter::try_new(candidate).ok())
        .ok_or_else(|| Error::Telemetry("invalid log filter".to_string()))?;
    let rejected = rejected_filter(explicit_filter);

    #[cfg(feature = "json-logs")]
    if use_json {
        let subscriber = Registry::default().with(filter).with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .json()
                .flatten_event(true),
        );
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|err| Error::Telemetry(err.to_string()))?;
        warn_rejected(rejected);
        return Ok(());
    }

    #[cfg(not(feature = "json-logs"))]
    if use_json {
        return Err(Error::Telemetry(
            "binary was built without the `json-logs` feature".to_string(),
        ));
    }

    let subscriber = Registry::default().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false),
    );
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| Error::Telemetry(err.to_string()))?;
    warn_rejected(rejected);
    Ok(())
}

fn rejected_filter(explicit: Option<&str>) -> Option<&str> {
    explicit.filter(|filter| EnvFilter::try_new(filter).is_err())
}

fn warn_rejected(rejected: Option<&str>) {
    if let Some(filter) = rejected {
        tracing::warn!(filter, "ignoring invalid --log-filter, falling back to RUST_LOG or info");
    }
}

fn filter_candidates(explicit: Option<&str>, env: Option<String>) -> Vec<String> {
    explicit
        .map(str::to_string)
        .into_iter()
        .chain(env)
        .chain(std::iter::once("info".to_string()))
        .collect()
}
