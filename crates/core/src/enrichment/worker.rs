use std::sync::Arc;

use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info, warn};

use super::{details_to_changes, EnrichmentHandle, EnrichmentJob};
use crate::metadata::MetadataSource;
use crate::metrics;
use crate::song::SongStore;

/// How an enrichment job resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentOutcome {
    /// Details were found and written.
    Enriched,
    /// The source answered with no fields; nothing was written.
    NoDetails,
    /// The lookup itself failed.
    LookupFailed,
    /// The source answered with details that could not be applied.
    InvalidDetails,
    /// Writing the details failed (including the song being gone).
    StoreFailed,
}

impl EnrichmentOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentOutcome::Enriched => "enriched",
            EnrichmentOutcome::NoDetails => "no_details",
            EnrichmentOutcome::LookupFailed => "lookup_failed",
            EnrichmentOutcome::InvalidDetails => "invalid_details",
            EnrichmentOutcome::StoreFailed => "store_failed",
        }
    }
}

/// Run one enrichment job to completion. Exactly one lookup is made.
pub async fn enrich(
    store: &dyn SongStore,
    source: &dyn MetadataSource,
    job: EnrichmentJob,
) -> EnrichmentOutcome {
    let outcome = run_job(store, source, &job).await;
    metrics::ENRICHMENT_OUTCOMES
        .with_label_values(&[outcome.as_str()])
        .inc();
    outcome
}

async fn run_job(
    store: &dyn SongStore,
    source: &dyn MetadataSource,
    job: &EnrichmentJob,
) -> EnrichmentOutcome {
    let song_id = job.song_id;

    let details = match source.lookup(&job.group, &job.title).await {
        Ok(details) => details,
        Err(e) => {
            warn!(song_id, source = source.name(), "Metadata lookup failed: {}", e);
            return EnrichmentOutcome::LookupFailed;
        }
    };

    let changes = match details_to_changes(details) {
        Ok(Some(changes)) => changes,
        Ok(None) => {
            debug!(song_id, "Metadata source returned no details");
            return EnrichmentOutcome::NoDetails;
        }
        Err(e) => {
            warn!(song_id, "Metadata source returned invalid details: {}", e);
            return EnrichmentOutcome::InvalidDetails;
        }
    };

    let mutation = match changes.into_mutation() {
        Ok(mutation) => mutation,
        Err(_) => return EnrichmentOutcome::NoDetails,
    };

    match store.update_fields(song_id, &mutation) {
        Ok(_) => {
            info!(song_id, "Song details added");
            EnrichmentOutcome::Enriched
        }
        Err(e) => {
            error!(song_id, "Failed to store song details: {}", e);
            EnrichmentOutcome::StoreFailed
        }
    }
}

/// Background task that receives enrichment jobs and runs them.
pub struct EnrichmentWorker {
    rx: mpsc::Receiver<EnrichmentJob>,
    store: Arc<dyn SongStore>,
    source: Arc<dyn MetadataSource>,
    max_concurrent: usize,
}

impl EnrichmentWorker {
    /// Create a new enrichment worker.
    pub fn new(
        rx: mpsc::Receiver<EnrichmentJob>,
        store: Arc<dyn SongStore>,
        source: Arc<dyn MetadataSource>,
        max_concurrent: usize,
    ) -> Self {
        Self {
            rx,
            store,
            source,
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Run the worker until every handle is dropped and the queue is drained.
    ///
    /// Each job runs as its own task, at most `max_concurrent` at a time.
    /// Returns once in-flight jobs have finished.
    pub async fn run(mut self) {
        info!(
            source = self.source.name(),
            max_concurrent = self.max_concurrent,
            "Enrichment worker started"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent));

        while let Some(job) = self.rx.recv().await {
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };

            let store = Arc::clone(&self.store);
            let source = Arc::clone(&self.source);
            tokio::spawn(async move {
                let _permit = permit;
                enrich(store.as_ref(), source.as_ref(), job).await;
            });
        }

        let permits = u32::try_from(self.max_concurrent).unwrap_or(u32::MAX);
        let _ = semaphore.acquire_many(permits).await;

        info!("Enrichment worker shutting down");
    }
}

/// Create a complete enrichment system.
///
/// Returns:
/// - `EnrichmentHandle` - for queuing jobs (clone this to share across tasks)
/// - `EnrichmentWorker` - spawn this as a background task with `tokio::spawn(worker.run())`
pub fn create_enrichment_system(
    store: Arc<dyn SongStore>,
    source: Arc<dyn MetadataSource>,
    queue_size: usize,
    max_concurrent: usize,
) -> (EnrichmentHandle, EnrichmentWorker) {
    let (tx, rx) = mpsc::channel(queue_size.max(1));
    let handle = EnrichmentHandle::new(tx);
    let worker = EnrichmentWorker::new(rx, store, source, max_concurrent);
    (handle, worker)
}
