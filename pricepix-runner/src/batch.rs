//! Batch orchestrator: generates and persists images over a run of dates.
//!
//! Each date runs the full pipeline independently. What happens after a failed
//! date is an explicit [`FailurePolicy`]: stop the batch, or record the error
//! and move on. In parallel mode, grids are generated on the rayon pool but
//! persisted strictly in date order, so fail-fast never leaves an image for a
//! date after the one that failed.

use crate::generator::{ArtGenerator, GenerateError, GeneratedArt};
use crate::sink::ImageSink;
use chrono::{Days, NaiveDate};
use pricepix_core::data::DataError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// What to do with the rest of a batch after one date fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort on the first failing date.
    #[default]
    FailFast,
    /// Record the failure and continue with the next date.
    Continue,
}

#[derive(Debug, Error)]
pub enum BatchError {
    #[error("generation failed for {date}: {source}")]
    DateFailed {
        date: NaiveDate,
        #[source]
        source: GenerateError,
    },
}

/// Progress callbacks for batch runs.
pub trait BatchProgress: Send + Sync {
    fn on_start(&self, date: NaiveDate, index: usize, total: usize);

    fn on_complete(
        &self,
        date: NaiveDate,
        index: usize,
        total: usize,
        result: &Result<PathBuf, GenerateError>,
    );

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize);
}

/// Prints one line per date to stdout.
pub struct StdoutProgress;

impl BatchProgress for StdoutProgress {
    fn on_start(&self, date: NaiveDate, index: usize, total: usize) {
        println!("[{}/{}] Generating {date}...", index + 1, total);
    }

    fn on_complete(
        &self,
        date: NaiveDate,
        _index: usize,
        _total: usize,
        result: &Result<PathBuf, GenerateError>,
    ) {
        match result {
            Ok(path) => println!("  OK: {date} -> {}", path.display()),
            Err(e) => println!("  FAIL: {date}: {e}"),
        }
    }

    fn on_batch_complete(&self, succeeded: usize, failed: usize, total: usize) {
        println!("\nBatch complete: {succeeded}/{total} succeeded, {failed} failed");
    }
}

/// Reports nothing.
pub struct SilentProgress;

impl BatchProgress for SilentProgress {
    fn on_start(&self, _date: NaiveDate, _index: usize, _total: usize) {}

    fn on_complete(
        &self,
        _date: NaiveDate,
        _index: usize,
        _total: usize,
        _result: &Result<PathBuf, GenerateError>,
    ) {
    }

    fn on_batch_complete(&self, _succeeded: usize, _failed: usize, _total: usize) {}
}

/// Summary of a batch run.
#[derive(Debug, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub written: Vec<(NaiveDate, PathBuf)>,
    pub errors: Vec<(NaiveDate, GenerateError)>,
}

impl BatchSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}

/// The `num_days` dates before `end_exclusive`, oldest first.
pub fn window_dates(end_exclusive: NaiveDate, num_days: u32) -> Vec<NaiveDate> {
    (1..=num_days as u64)
        .rev()
        .filter_map(|k| end_exclusive.checked_sub_days(Days::new(k)))
        .collect()
}

pub struct BatchRunner<'a> {
    generator: &'a ArtGenerator<'a>,
    sink: &'a dyn ImageSink,
    progress: &'a dyn BatchProgress,
    policy: FailurePolicy,
    parallel: bool,
}

impl<'a> BatchRunner<'a> {
    /// Sequential, fail-fast runner.
    pub fn new(
        generator: &'a ArtGenerator<'a>,
        sink: &'a dyn ImageSink,
        progress: &'a dyn BatchProgress,
    ) -> Self {
        Self {
            generator,
            sink,
            progress,
            policy: FailurePolicy::default(),
            parallel: false,
        }
    }

    /// Set what happens after a failed date.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Generate dates on the rayon pool. Persistence stays in date order.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Generate and persist one date (the "yesterday" mode).
    pub fn run_single(&self, date: NaiveDate) -> Result<BatchSummary, BatchError> {
        self.run_dates(&[date])
    }

    /// Generate and persist the `num_days` dates ending the day before
    /// `end_exclusive`, oldest first.
    pub fn run_window(
        &self,
        end_exclusive: NaiveDate,
        num_days: u32,
    ) -> Result<BatchSummary, BatchError> {
        self.run_dates(&window_dates(end_exclusive, num_days))
    }

    /// Generate and persist `dates` in the order given.
    pub fn run_dates(&self, dates: &[NaiveDate]) -> Result<BatchSummary, BatchError> {
        tracing::info!(
            days = dates.len(),
            policy = ?self.policy,
            parallel = self.parallel,
            "starting batch"
        );

        let mut generated: Box<dyn Iterator<Item = Result<GeneratedArt, GenerateError>> + '_> =
            if self.parallel {
                let all: Vec<_> = dates
                    .par_iter()
                    .map(|&date| self.generator.generate_for_date(date))
                    .collect();
                Box::new(all.into_iter())
            } else {
                Box::new(
                    dates
                        .iter()
                        .map(|&date| self.generator.generate_for_date(date)),
                )
            };

        let total = dates.len();
        let mut summary = BatchSummary {
            total,
            ..Default::default()
        };

        for (i, &date) in dates.iter().enumerate() {
            self.progress.on_start(date, i, total);

            let result = match generated.next() {
                Some(art) => art.and_then(|art| self.persist(art)),
                None => break,
            };
            self.progress.on_complete(date, i, total, &result);

            match result {
                Ok(path) => {
                    tracing::info!(%date, path = %path.display(), "image generated");
                    summary.succeeded += 1;
                    summary.written.push((date, path));
                }
                Err(source) => {
                    tracing::warn!(%date, error = %source, "date failed");
                    summary.failed += 1;
                    if self.policy == FailurePolicy::FailFast {
                        self.progress
                            .on_batch_complete(summary.succeeded, summary.failed, total);
                        return Err(BatchError::DateFailed { date, source });
                    }
                    summary.errors.push((date, source));

                    // No point asking a provider that has locked us out.
                    if !self.parallel && !self.generator.provider_available() {
                        tracing::warn!(
                            skipped = total - i - 1,
                            "provider unavailable, skipping rest of batch"
                        );
                        for (j, &rest) in dates.iter().enumerate().skip(i + 1) {
                            self.progress.on_start(rest, j, total);
                            let skipped: Result<PathBuf, GenerateError> =
                                Err(GenerateError::Fetch(DataError::CircuitBreakerTripped));
                            self.progress.on_complete(rest, j, total, &skipped);
                            if let Err(source) = skipped {
                                summary.errors.push((rest, source));
                            }
                            summary.failed += 1;
                        }
                        break;
                    }
                }
            }
        }

        self.progress
            .on_batch_complete(summary.succeeded, summary.failed, total);
        Ok(summary)
    }

    fn persist(&self, art: GeneratedArt) -> Result<PathBuf, GenerateError> {
        Ok(self.sink.store(art.date, &art.pixels, &art.manifest)?)
    }
}
