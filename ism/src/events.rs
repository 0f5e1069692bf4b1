//! Externally observable events. The log is append-only.

use oism_types::{Address, Domain, MessageId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum IsmEvent {
    /// The fraud window was set (also emitted once at construction).
    FraudWindowSet { fraud_window: u64 },
    /// An origin was routed to a delegate.
    SubmoduleSet { delegate: Address, origin: Domain },
    /// A delegate accepted a message; its fraud window starts at `timestamp`.
    PreVerified {
        id: MessageId,
        delegate: Address,
        timestamp: Timestamp,
    },
    /// A pre-verified message passed the finalization gate.
    Finalized { id: MessageId, delegate: Address },
    /// A watcher accused a delegate; `accusations` is the new total.
    MarkedFraudulent {
        watcher: Address,
        delegate: Address,
        accusations: u32,
    },
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}

#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<IsmEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: IsmEvent) {
        self.events.push(event);
    }

    pub fn all(&self) -> &[IsmEvent] {
        &self.events
    }

    /// Events appended at or after position `cursor`.
    pub fn since(&self, cursor: usize) -> &[IsmEvent] {
        self.events.get(cursor..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
