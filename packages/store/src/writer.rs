//! Sequential write queue for the dataset file.
//!
//! A single spawned task owns the output path and applies batches one
//! after another, so consecutive appends can never interleave. Producers
//! hand batches off through a bounded channel and move on.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use trip_dataset_models::TripRecord;

use crate::StoreError;
use crate::accumulator::{AppendOutcome, append_trips};

/// Number of batches that may wait in the queue before `submit` blocks.
const WRITE_QUEUE_BUFFER: usize = 16;

/// Totals reported by the writer task once it has drained its queue.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterStats {
    /// Batches successfully appended.
    pub batches_written: u64,
    /// Trips successfully appended.
    pub trips_written: u64,
    /// Batches whose append failed.
    pub failed_batches: u64,
    /// Trips lost because their batch failed to append.
    pub trips_lost: u64,
}

/// Handle to the background task that appends batches to the dataset.
pub struct DatasetWriter {
    path: PathBuf,
    tx: mpsc::Sender<Vec<TripRecord>>,
    handle: JoinHandle<WriterStats>,
}

impl DatasetWriter {
    /// Spawns the writer task for the dataset file at `path`.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn(path: PathBuf) -> Self {
        let (tx, mut rx) = mpsc::channel::<Vec<TripRecord>>(WRITE_QUEUE_BUFFER);
        let task_path = path.clone();

        let handle = tokio::spawn(async move {
            let mut stats = WriterStats::default();

            while let Some(batch) = rx.recv().await {
                let count = batch.len() as u64;

                match append_trips(&task_path, &batch).await {
                    Ok(AppendOutcome::Skipped) => {}
                    Ok(outcome) => {
                        stats.batches_written += 1;
                        stats.trips_written += count;
                        log::debug!(
                            "{}: {outcome:?} with {count} trip(s)",
                            task_path.display()
                        );
                    }
                    Err(e) => {
                        stats.failed_batches += 1;
                        stats.trips_lost += count;
                        log::error!(
                            "Failed to write {count} trip(s) to {}: {e}",
                            task_path.display()
                        );
                    }
                }
            }

            stats
        });

        Self { path, tx, handle }
    }

    /// Queues a batch for appending. Returns once the batch is queued, not
    /// once it is written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::WriterClosed`] if the writer task has stopped.
    pub async fn submit(&self, batch: Vec<TripRecord>) -> Result<(), StoreError> {
        self.tx
            .send(batch)
            .await
            .map_err(|_| StoreError::WriterClosed {
                path: self.path.display().to_string(),
            })
    }

    /// Closes the queue, waits for every queued batch to be written and
    /// returns the totals.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::WriterTask`] if the writer task panicked.
    pub async fn finish(self) -> Result<WriterStats, StoreError> {
        drop(self.tx);
        Ok(self.handle.await?)
    }
}
