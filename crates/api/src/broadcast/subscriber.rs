use std::sync::Arc;

use khm_core::metrics::HealthRecord;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::update::LiveUpdate;

/// Why a record could not be handed to a subscriber.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// The receiving side is gone.
    #[error("subscriber channel closed")]
    Closed,
    /// The outbound queue is full; the consumer is not keeping up.
    #[error("subscriber queue full")]
    Full,
    /// The record could not be turned into the transport's wire format.
    #[error("failed to encode record: {0}")]
    Encode(String),
}

impl<T> From<TrySendError<T>> for DeliveryError {
    fn from(err: TrySendError<T>) -> Self {
        match err {
            TrySendError::Full(_) => DeliveryError::Full,
            TrySendError::Closed(_) => DeliveryError::Closed,
        }
    }
}

/// A delivery target registered with the [`SubscriberRegistry`].
///
/// `send` is called from the broadcast tick and must not block: queue the
/// record or fail. A failure removes the subscriber.
///
/// [`SubscriberRegistry`]: super::SubscriberRegistry
pub trait Subscriber: Send + Sync {
    fn id(&self) -> &str;

    fn send(&self, update: &LiveUpdate) -> Result<(), DeliveryError>;
}

/// In-process subscriber backed by a bounded channel.
pub struct ChannelSubscriber {
    id: String,
    tx: mpsc::Sender<Arc<HealthRecord>>,
}

impl ChannelSubscriber {
    /// Create a subscriber and the receiver that drains it.
    pub fn channel(
        id: impl Into<String>,
        capacity: usize,
    ) -> (Self, mpsc::Receiver<Arc<HealthRecord>>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { id: id.into(), tx }, rx)
    }
}

impl Subscriber for ChannelSubscriber {
    fn id(&self) -> &str {
        &self.id
    }

    fn send(&self, update: &LiveUpdate) -> Result<(), DeliveryError> {
        self.tx.try_send(Arc::clone(update.record()))?;
        Ok(())
    }
}
