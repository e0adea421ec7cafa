//! Batch driver.
//!
//! Runs `batch_count` batches. Each batch samples `pairs_per_batch` city
//! pairs, extracts them with at most `concurrency` in flight, and hands
//! the successful trips to the [`DatasetWriter`] before starting the next
//! batch.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::stream::{self, StreamExt as _};
use rand::SeedableRng as _;
use rand::rngs::StdRng;
use trip_dataset_catalog::Catalog;
use trip_dataset_catalog::sampler::sample_pairs;
use trip_dataset_extractor::TripExtractor;
use trip_dataset_models::{CityPair, TripResult};
use trip_dataset_store::writer::{DatasetWriter, WriterStats};

use crate::GenerateError;
use crate::config::GenerateConfig;
use crate::progress::ProgressCallback;

/// Totals for a completed run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Extractions attempted.
    pub attempted: u64,
    /// Extractions that produced a duration.
    pub successful: u64,
    /// Failed extractions, keyed by failure kind (e.g., `"selector_missing"`).
    pub failures: BTreeMap<String, u64>,
    /// What the dataset writer actually persisted.
    pub writer: WriterStats,
}

/// Orchestrates sampling, extraction and accumulation for one run.
pub struct BatchDriver {
    config: GenerateConfig,
    catalog: Catalog,
    extractor: Arc<dyn TripExtractor>,
    progress: Arc<dyn ProgressCallback>,
}

impl BatchDriver {
    /// Creates a driver that draws pairs from `catalog` and appends
    /// successful trips to `config.output_path`.
    #[must_use]
    pub fn new(
        config: GenerateConfig,
        catalog: Catalog,
        extractor: Arc<dyn TripExtractor>,
        progress: Arc<dyn ProgressCallback>,
    ) -> Self {
        Self {
            config,
            catalog,
            extractor,
            progress,
        }
    }

    /// Runs every batch, then closes the extractor and drains the writer.
    ///
    /// The extractor is closed and every queued batch is flushed even if
    /// queueing a batch fails part-way through.
    ///
    /// # Errors
    ///
    /// Returns [`GenerateError::Store`] if the writer stops accepting
    /// batches or its task fails.
    pub async fn run(&self) -> Result<RunSummary, GenerateError> {
        log::info!(
            "Generating {} batches of {} city pairs",
            self.config.batch_count,
            self.config.pairs_per_batch
        );

        let mut rng = self
            .config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let writer = DatasetWriter::spawn(self.config.output_path.clone());
        let mut summary = RunSummary::default();

        self.progress.set_total(self.config.batch_count as u64);

        let batches = self.run_batches(&mut rng, &writer, &mut summary).await;

        self.progress.finish(format!(
            "{}/{} successful extractions",
            summary.successful, summary.attempted
        ));
        self.extractor.close().await;
        summary.writer = writer.finish().await?;
        batches?;

        log::info!("Data extraction done");
        log::info!(
            "{}/{} successful extractions",
            summary.successful,
            summary.attempted
        );
        if !summary.failures.is_empty() {
            log::info!("Failures by kind: {:?}", summary.failures);
        }
        if summary.writer.trips_lost > 0 {
            log::error!(
                "{} trip(s) could not be written to {}",
                summary.writer.trips_lost,
                self.config.output_path.display()
            );
        }

        Ok(summary)
    }

    async fn run_batches(
        &self,
        rng: &mut StdRng,
        writer: &DatasetWriter,
        summary: &mut RunSummary,
    ) -> Result<(), GenerateError> {
        for batch in 0..self.config.batch_count {
            self.progress.set_message(format!(
                "Batch {}/{}",
                batch + 1,
                self.config.batch_count
            ));
            let pairs = sample_pairs(rng, &self.catalog, self.config.pairs_per_batch);
            let results = self.extract_batch(pairs).await;

            let mut records = Vec::with_capacity(results.len());
            for result in &results {
                summary.attempted += 1;
                match &result.outcome {
                    Ok(_) => records.extend(result.to_record()),
                    Err(failure) => {
                        log::debug!(
                            "{} -> {}: {failure}",
                            result.pair.start.name,
                            result.pair.end.name
                        );
                        *summary
                            .failures
                            .entry(failure.kind().to_string())
                            .or_default() += 1;
                    }
                }
            }

            summary.successful += records.len() as u64;
            log::debug!(
                "Batch {}/{}: {}/{} extracted",
                batch + 1,
                self.config.batch_count,
                records.len(),
                results.len()
            );

            if !records.is_empty() {
                writer.submit(records).await?;
            }

            self.progress.inc(1);
        }

        Ok(())
    }

    /// Extracts every pair of one batch, keeping at most `concurrency`
    /// extractions in flight. Results come back in pair order.
    async fn extract_batch(&self, pairs: Vec<CityPair>) -> Vec<TripResult> {
        let extractor = &self.extractor;

        stream::iter(pairs)
            .map(|pair| async move { extractor.extract(&pair).await })
            .buffered(self.config.concurrency())
            .collect()
            .await
    }
}
