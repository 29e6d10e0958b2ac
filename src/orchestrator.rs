use tracing::{debug, info};

use crate::checker::UpdateSource;
use crate::error::{Stage, StageError};
use crate::gate::should_notify;
use crate::notifier::NotificationSink;
use crate::state::StateStore;
use crate::types::Outcome;

/// Body of the notification announcing `count` pending updates.
#[must_use]
pub fn pending_message(count: u32) -> String {
    format!("{count} package(s) available")
}

/// One pass of check → gate → notify/persist, or clear when up to date.
pub struct Orchestrator<S, N> {
    store: StateStore,
    source: S,
    sink: N,
}

impl<S, N> Orchestrator<S, N>
where
    S: UpdateSource,
    N: NotificationSink,
{
    pub const fn new(store: StateStore, source: S, sink: N) -> Self {
        Self {
            store,
            source,
            sink,
        }
    }

    pub const fn store(&self) -> &StateStore {
        &self.store
    }

    /// Run once. Side effects already performed are not rolled back when a
    /// later step fails: a sent notification whose count could not be
    /// stored is announced again on the next run.
    ///
    /// # Errors
    ///
    /// Returns a [`StageError`] naming the step that failed.
    pub async fn run(&self) -> Result<Outcome, StageError> {
        self.store
            .ensure_exists()
            .map_err(|err| StageError::new(Stage::Init, err))?;

        let count = self
            .source
            .pending_updates()
            .await
            .map_err(|err| StageError::new(Stage::Check, err))?;

        if count == 0 {
            self.store
                .clear()
                .map_err(|err| StageError::new(Stage::Clear, err))?;
            info!("system is up to date");
            return Ok(Outcome::UpToDate);
        }

        let stored = self
            .store
            .read()
            .map_err(|err| StageError::new(Stage::Decide, err))?;
        if !should_notify(count, stored) {
            debug!(count, ?stored, "count already announced");
            return Ok(Outcome::Unchanged { count });
        }

        self.sink
            .notify(&pending_message(count))
            .await
            .map_err(|err| StageError::new(Stage::Notify, err))?;
        self.store
            .write(count)
            .map_err(|err| StageError::new(Stage::Persist, err))?;
        info!(count, previous = ?stored, "announced pending updates");
        Ok(Outcome::Notified { count })
    }
}
