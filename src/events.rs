use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::services::ledger::Stream;

/// Events emitted by stockbook services after a successful mutation.
///
/// Hosts receive these on the channel returned by `Stockbook::connect` and
/// can use them to refresh views or drive notifications. Emission happens
/// after the rows are committed; a delivery failure surfaces as
/// `ServiceError::EventError` but never rolls back the write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ProductCreated {
        product_id: i64,
    },
    ProductUpdated {
        product_id: i64,
    },
    CostCenterCreated {
        cost_center_id: i64,
    },
    TransactionRecorded {
        stream: Stream,
        header_id: i64,
        line_count: usize,
    },
    UserCreated {
        user_id: i64,
    },
    UserUpdated {
        user_id: i64,
    },
    UserDeleted {
        user_id: i64,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Creates a bounded event channel; the sender side is handed to services,
/// the receiver to the host. Dropping the receiver makes subsequent
/// mutations fail with `EventError`, so hosts should keep it alive.
pub fn channel(capacity: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(capacity);
    (EventSender::new(tx), rx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_flow_through_the_channel() {
        let (sender, mut rx) = channel(4);
        sender
            .send(Event::TransactionRecorded {
                stream: Stream::Incoming,
                header_id: 7,
                line_count: 2,
            })
            .await
            .unwrap();

        let event = rx.recv().await.unwrap();
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("TransactionRecorded"));
        assert!(json.contains("Incoming"));
    }

    #[tokio::test]
    async fn dropped_receiver_fails_send() {
        let (sender, rx) = channel(1);
        drop(rx);
        assert!(sender
            .send(Event::ProductCreated { product_id: 1 })
            .await
            .is_err());
    }
}
