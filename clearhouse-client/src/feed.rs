//! Change-feed hub
//!
//! One broadcast channel per table. Subscribers get every message
//! published after they subscribe; a lagged subscriber loses the
//! oldest messages, which matches the delivery guarantees of the
//! hosted feed (none beyond per-connection ordering).

use dashmap::DashMap;
use tokio::sync::broadcast;

use shared::ChangeMessage;

const CHANNEL_CAPACITY: usize = 256;

/// Per-table change notification fan-out
#[derive(Debug, Default)]
pub struct FeedHub {
    channels: DashMap<String, broadcast::Sender<ChangeMessage>>,
}

impl FeedHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn sender(&self, table: &str) -> broadcast::Sender<ChangeMessage> {
        self.channels
            .entry(table.to_string())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }

    /// Subscribe to one table's change stream
    pub fn subscribe(&self, table: &str) -> broadcast::Receiver<ChangeMessage> {
        self.sender(table).subscribe()
    }

    /// Publish a change message to its table's subscribers
    pub fn publish(&self, message: ChangeMessage) {
        let sender = self.sender(&message.table);
        // A send error only means nobody is listening yet
        if sender.send(message).is_err() {
            tracing::trace!("Change message dropped: no subscribers");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shared::ChangeKind;

    #[tokio::test]
    async fn test_subscribers_receive_table_messages() {
        let hub = FeedHub::new();
        let mut rx = hub.subscribe("clients");

        hub.publish(ChangeMessage::insert("clients", json!({"ain": "A1"})));
        hub.publish(ChangeMessage::insert("duty_payments", json!({"id": "d1"})));

        let msg = rx.recv().await.unwrap();
        assert_eq!(msg.table, "clients");
        assert_eq!(msg.kind, ChangeKind::Insert);
        // The duty_payments message went to a different channel
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_publish_without_subscribers_is_silent() {
        let hub = FeedHub::new();
        hub.publish(ChangeMessage::delete("assessments", json!({"id": "a1"})));
    }
}
