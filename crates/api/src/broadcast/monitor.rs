//! The periodic sample, classify and publish loop.
//!
//! One cycle runs the (blocking) metric source and the classifier on the
//! blocking thread pool, wraps both results in a [`HealthRecord`] and
//! publishes it. A cycle that fails for any reason, including a panic in
//! the source or classifier, is logged and skipped; the loop itself never
//! stops. After every cycle it sleeps the full interval, however long the
//! cycle took.

use std::sync::Arc;
use std::time::Duration;

use khm_core::error::CollectError;
use khm_core::hardware::analyzer::{evaluate, AnalysisResult};
use khm_core::metrics::{HealthRecord, MetricSample, MetricSource};
use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinHandle};

use super::registry::SubscriberRegistry;
use super::update::LiveUpdate;

/// Pure function turning a sample into its analysis.
pub type Classifier = fn(&MetricSample) -> AnalysisResult;

/// Why a single cycle produced nothing.
#[derive(Debug, thiserror::Error)]
pub enum CycleError {
    #[error("metric collection failed: {0}")]
    Collect(#[from] CollectError),

    /// The blocking task panicked or was cancelled.
    #[error("sampling task aborted: {0}")]
    Task(#[from] JoinError),
}

/// Owns the metric source and drives the broadcast cadence.
pub struct BroadcastLoop<S> {
    source: Arc<Mutex<S>>,
    classify: Classifier,
    registry: Arc<SubscriberRegistry>,
    interval: Duration,
}

impl<S> BroadcastLoop<S>
where
    S: MetricSource + 'static,
{
    /// Build a loop using the standard threshold classifier.
    pub fn new(source: S, registry: Arc<SubscriberRegistry>, interval: Duration) -> Self {
        Self {
            source: Arc::new(Mutex::new(source)),
            classify: evaluate,
            registry,
            interval,
        }
    }

    /// Replace the classifier.
    pub fn with_classifier(mut self, classify: Classifier) -> Self {
        self.classify = classify;
        self
    }

    /// Spawn the loop on the runtime. It runs until the handle is aborted.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Run cycles forever.
    pub async fn run(self) {
        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Broadcast loop started");

        loop {
            match self.run_cycle().await {
                Ok(delivered) => {
                    tracing::trace!(delivered, "Broadcast cycle complete");
                }
                Err(e) => {
                    tracing::error!(error = %e, "Broadcast cycle failed");
                }
            }
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Sample, classify and publish once. Returns the number of
    /// subscribers that accepted the record.
    pub async fn run_cycle(&self) -> Result<usize, CycleError> {
        let source = Arc::clone(&self.source);
        let classify = self.classify;

        let record = tokio::task::spawn_blocking(move || -> Result<HealthRecord, CollectError> {
            let mut source = source.blocking_lock();
            let metrics = source.sample()?;
            let analysis = classify(&metrics);
            Ok(HealthRecord { metrics, analysis })
        })
        .await??;

        Ok(self.registry.publish(&LiveUpdate::new(record)).await)
    }
}
