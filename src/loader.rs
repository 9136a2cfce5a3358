use crate::catalog::{CatalogState, FetchOutcome};
use crate::domain::normalize_rows;
use crate::metrics;
use crate::source::{CatalogSource, FetchRequest, OrderBy};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info_span, Instrument};

/// Fetches a catalog from its source and applies it to the shared page state.
///
/// Loads may overlap (for example on rapid re-navigation). Each load takes a
/// ticket before awaiting the source, and only the most recently started load
/// is allowed to replace the records. A load dropped mid-fetch marks itself
/// abandoned so the state does not stay in `Loading`.
#[derive(Clone)]
pub struct CatalogLoader {
    source: Arc<dyn CatalogSource>,
    state: Arc<Mutex<CatalogState>>,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn CatalogSource>, state: Arc<Mutex<CatalogState>>) -> Self {
        Self { source, state }
    }

    pub fn state(&self) -> Arc<Mutex<CatalogState>> {
        Arc::clone(&self.state)
    }

    pub async fn load(&self, order_by: Option<OrderBy>) -> FetchOutcome {
        let (ticket, kind) = {
            let mut state = self.state.lock().await;
            (state.begin_fetch(), state.kind())
        };
        let span = info_span!(
            "catalog_load",
            kind = %kind,
            source = self.source.name(),
            generation = ticket.generation()
        );

        let mut pending = PendingLoad {
            state: &self.state,
            generation: ticket.generation(),
            finished: false,
        };

        async move {
            let request = FetchRequest { kind, order_by };
            // the lock is not held while the source is awaited
            let result = self.source.fetch(&request).await.map(|rows| {
                let batch = normalize_rows(kind, rows);
                metrics::record_batch(kind, &batch);
                batch.records
            });

            let outcome = self.state.lock().await.complete_fetch(ticket, result);
            pending.finished = true;
            metrics::record_outcome(kind, &outcome);
            outcome
        }
        .instrument(span)
        .await
    }
}

/// Abandons the fetch on drop unless `load` reached `complete_fetch`.
struct PendingLoad<'a> {
    state: &'a Mutex<CatalogState>,
    generation: u64,
    finished: bool,
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        // the lock is free while the source is awaited, which is where drops land
        if let Ok(mut state) = self.state.try_lock() {
            state.abandon_fetch(self.generation);
        }
    }
}
