use axum::extract::ws::Message;
use tokio::sync::mpsc;

use crate::broadcast::{DeliveryError, LiveUpdate, Subscriber};

/// A connected browser. Each tick's shared text frame is queued on the
/// connection's bounded outbound channel.
pub struct WsSubscriber {
    id: String,
    tx: mpsc::Sender<Message>,
}

impl WsSubscriber {
    pub fn new(id: String, tx: mpsc::Sender<Message>) -> Self {
        Self { id, tx }
    }
}

impl Subscriber for WsSubscriber {
    fn id(&self) -> &str {
        &self.id
    }

    fn send(&self, update: &LiveUpdate) -> Result<(), DeliveryError> {
        self.tx.try_send(Message::Text(update.text_frame()?))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use khm_core::hardware::analyzer::evaluate;
    use khm_core::metrics::{CpuMetrics, HealthRecord, KernelCounters, MetricSample};

    fn update() -> LiveUpdate {
        let metrics = MetricSample {
            timestamp: 5.0,
            cpu: CpuMetrics {
                usage_percent: 10.0,
                temperature_celsius: 40.0,
            },
            gpu: None,
            kernel: KernelCounters::default(),
        };
        let analysis = evaluate(&metrics);
        LiveUpdate::new(HealthRecord { metrics, analysis })
    }

    #[tokio::test]
    async fn send_queues_metrics_update_frame() {
        let (tx, mut rx) = mpsc::channel(1);
        let subscriber = WsSubscriber::new("ws-1".to_string(), tx);

        subscriber.send(&update()).unwrap();

        let Some(Message::Text(text)) = rx.recv().await else {
            panic!("expected a text frame");
        };
        let json: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
        assert_eq!(json["type"], "metrics_update");
        assert_eq!(json["data"]["metrics"]["timestamp"], 5.0);
        assert_eq!(json["data"]["analysis"]["overall_status"], "SAFE");
    }

    #[tokio::test]
    async fn connections_share_one_encoded_frame() {
        let (tx_a, mut rx_a) = mpsc::channel(1);
        let (tx_b, mut rx_b) = mpsc::channel(1);
        let a = WsSubscriber::new("ws-a".to_string(), tx_a);
        let b = WsSubscriber::new("ws-b".to_string(), tx_b);
        let update = update();

        a.send(&update).unwrap();
        b.send(&update).unwrap();

        let (Some(Message::Text(text_a)), Some(Message::Text(text_b))) =
            (rx_a.recv().await, rx_b.recv().await)
        else {
            panic!("expected text frames on both connections");
        };
        assert_eq!(text_a.as_str().as_ptr(), text_b.as_str().as_ptr());
    }

    #[tokio::test]
    async fn full_outbound_queue_is_reported() {
        let (tx, _rx) = mpsc::channel(1);
        let subscriber = WsSubscriber::new("ws-1".to_string(), tx);

        subscriber.send(&update()).unwrap();
        assert_eq!(subscriber.send(&update()), Err(DeliveryError::Full));
    }
}
