//! Connection set of the broadcast loop.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;

use super::subscriber::Subscriber;
use super::update::LiveUpdate;

struct Entry {
    /// Distinguishes successive registrations under the same id.
    generation: u64,
    subscriber: Box<dyn Subscriber>,
}

/// Tracks every live delivery target, keyed by subscriber id.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared between the broadcast loop and connection handlers.
#[derive(Default)]
pub struct SubscriberRegistry {
    subscribers: RwLock<HashMap<String, Entry>>,
    next_generation: AtomicU64,
}

impl SubscriberRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber. Registering an id that is already present replaces
    /// the previous target, so each id receives at most one copy per tick.
    pub async fn register(&self, subscriber: Box<dyn Subscriber>) {
        let id = subscriber.id().to_string();
        let entry = Entry {
            generation: self.next_generation.fetch_add(1, Ordering::Relaxed),
            subscriber,
        };
        let replaced = self
            .subscribers
            .write()
            .await
            .insert(id.clone(), entry)
            .is_some();
        tracing::debug!(subscriber_id = %id, replaced, "Subscriber registered");
    }

    /// Remove a subscriber. Returns `false` if the id was unknown.
    pub async fn unregister(&self, id: &str) -> bool {
        let removed = self.subscribers.write().await.remove(id).is_some();
        if removed {
            tracing::debug!(subscriber_id = %id, "Subscriber unregistered");
        }
        removed
    }

    /// Deliver `update` to every subscriber and return how many accepted it.
    ///
    /// Each delivery is independent. Subscribers that fail are removed
    /// before this returns, so they never see the next update. A subscriber
    /// registered under a failed id while delivery was in progress is kept.
    pub async fn publish(&self, update: &LiveUpdate) -> usize {
        let mut delivered = 0;
        let mut failed = Vec::new();

        {
            let subscribers = self.subscribers.read().await;
            for (id, entry) in subscribers.iter() {
                match entry.subscriber.send(update) {
                    Ok(()) => delivered += 1,
                    Err(e) => {
                        tracing::debug!(subscriber_id = %id, error = %e, "Delivery failed, dropping subscriber");
                        failed.push((id.clone(), entry.generation));
                    }
                }
            }
        }

        if !failed.is_empty() {
            let mut subscribers = self.subscribers.write().await;
            for (id, generation) in &failed {
                if subscribers
                    .get(id)
                    .is_some_and(|entry| entry.generation == *generation)
                {
                    subscribers.remove(id);
                }
            }
        }

        delivered
    }

    /// Return the current number of registered subscribers.
    pub async fn subscriber_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Whether `id` is currently registered.
    pub async fn contains(&self, id: &str) -> bool {
        self.subscribers.read().await.contains_key(id)
    }

    /// Drop every subscriber. Their receivers observe a closed channel,
    /// which WebSocket connections turn into a Close frame.
    pub async fn clear(&self) {
        let mut subscribers = self.subscribers.write().await;
        let count = subscribers.len();
        subscribers.clear();
        tracing::info!(count, "Dropped all subscribers");
    }
}
