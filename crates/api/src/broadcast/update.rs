//! The unit handed to subscribers once per tick.

use std::sync::{Arc, OnceLock};

use axum::extract::ws::Utf8Bytes;
use khm_core::metric_names::MSG_TYPE_METRICS_UPDATE;
use khm_core::metrics::HealthRecord;
use serde::Serialize;

use super::subscriber::DeliveryError;

/// Wire format of a live update: `{"type": "metrics_update", "data": {...}}`.
#[derive(Debug, Serialize)]
pub struct MetricsEnvelope<'a> {
    #[serde(rename = "type")]
    pub msg_type: &'static str,
    pub data: &'a HealthRecord,
}

impl<'a> MetricsEnvelope<'a> {
    pub fn metrics_update(record: &'a HealthRecord) -> Self {
        Self {
            msg_type: MSG_TYPE_METRICS_UPDATE,
            data: record,
        }
    }
}

/// One published record plus its JSON text frame.
///
/// The frame is encoded on first request and shared by every transport
/// subscriber of the same tick.
#[derive(Debug)]
pub struct LiveUpdate {
    record: Arc<HealthRecord>,
    text: OnceLock<Result<Utf8Bytes, String>>,
}

impl LiveUpdate {
    pub fn new(record: impl Into<Arc<HealthRecord>>) -> Self {
        Self {
            record: record.into(),
            text: OnceLock::new(),
        }
    }

    pub fn record(&self) -> &Arc<HealthRecord> {
        &self.record
    }

    /// The `metrics_update` envelope as a text frame payload.
    pub fn text_frame(&self) -> Result<Utf8Bytes, DeliveryError> {
        self.text
            .get_or_init(|| {
                serde_json::to_string(&MetricsEnvelope::metrics_update(&self.record))
                    .map(Utf8Bytes::from)
                    .map_err(|e| e.to_string())
            })
            .clone()
            .map_err(DeliveryError::Encode)
    }
}

impl From<HealthRecord> for LiveUpdate {
    fn from(record: HealthRecord) -> Self {
        Self::new(record)
    }
}
