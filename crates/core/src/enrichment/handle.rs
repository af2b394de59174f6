use tokio::sync::mpsc;

use super::EnrichmentJob;
use crate::metrics;

/// Handle for submitting enrichment jobs.
///
/// Cheaply cloneable. Submitting never waits: when the queue is full or the
/// worker is gone the job is logged and dropped.
#[derive(Clone)]
pub struct EnrichmentHandle {
    tx: mpsc::Sender<EnrichmentJob>,
}

impl EnrichmentHandle {
    /// Create a new handle from a channel sender.
    pub fn new(tx: mpsc::Sender<EnrichmentJob>) -> Self {
        Self { tx }
    }

    /// Queue a job without blocking.
    ///
    /// Returns true if the job was queued, false if it was dropped.
    pub fn enqueue(&self, job: EnrichmentJob) -> bool {
        let song_id = job.song_id;
        match self.tx.try_send(job) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(song_id, "Dropping enrichment job: {}", e);
                metrics::ENRICHMENT_DROPPED.inc();
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(song_id: i64) -> EnrichmentJob {
        EnrichmentJob {
            song_id,
            group: "Rammstein".to_string(),
            title: "Weit Weg".to_string(),
        }
    }

    #[tokio::test]
    async fn test_enqueue_delivers_job() {
        let (tx, mut rx) = mpsc::channel(10);
        let handle = EnrichmentHandle::new(tx);

        assert!(handle.enqueue(job(1)));

        let received = rx.recv().await.unwrap();
        assert_eq!(received, job(1));
    }

    #[test]
    fn test_enqueue_full_queue_drops_job() {
        let (tx, _rx) = mpsc::channel(1);
        let handle = EnrichmentHandle::new(tx);

        assert!(handle.enqueue(job(1)));
        assert!(!handle.enqueue(job(2)));
    }

    #[test]
    fn test_enqueue_closed_queue_drops_job() {
        let (tx, rx) = mpsc::channel(10);
        drop(rx);
        let handle = EnrichmentHandle::new(tx);

        assert!(!handle.enqueue(job(1)));
    }
}
