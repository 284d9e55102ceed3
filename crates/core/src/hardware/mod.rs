//! Host health classification.
//!
//! Contains the threshold table and the evaluation engine that turns a
//! [`MetricSample`](crate::metrics::MetricSample) into an
//! [`AnalysisResult`](analyzer::AnalysisResult). All logic in this module is
//! pure (no I/O) so it can be tested in isolation.

pub mod analyzer;
pub mod thresholds;
