use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Change-tracking notifications emitted by token saves and revision
/// bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Event {
    TokenCreated {
        name: String,
        context: String,
    },
    TokenUpdated {
        name: String,
        context: String,
        fields: Vec<String>,
    },
    TokenDeleted {
        name: String,
        context: String,
    },
    TokenDeprecated {
        name: String,
        context: String,
    },
    RevisionRecorded {
        option: String,
        id: String,
    },
    RevisionRestored {
        option: String,
        id: String,
    },
    #[serde(other)]
    Unknown,
}

pub struct EventBus {
    sender: broadcast::Sender<Event>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: Event) -> usize {
        self.sender.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("receivers", &self.sender.receiver_count())
            .finish()
    }
}
