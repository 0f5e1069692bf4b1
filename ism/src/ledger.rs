//! Pre-verification ledger: which delegate vouched for a message, and when.
//!
//! A record goes through two states. It is *provisional* from the moment
//! pre-verification writes it until the delegate's verdict is known, and
//! *committed* afterwards. Provisional records already block a second
//! pre-verification of the same message, but cannot be finalized and are
//! removed without trace if the delegate rejects.

use oism_types::{Address, MessageId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::IsmError;

/// A committed pre-verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreVerification {
    /// Delegate that accepted the message.
    pub delegate: Address,
    /// When pre-verification started. Always after the epoch.
    pub timestamp: Timestamp,
}

#[derive(Clone, Copy, Debug)]
struct Slot {
    record: PreVerification,
    committed: bool,
}

#[derive(Debug, Default)]
pub struct PreVerificationLedger {
    slots: HashMap<MessageId, Slot>,
    committed: usize,
}

impl PreVerificationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `id` has a record in either state.
    pub fn is_occupied(&self, id: &MessageId) -> bool {
        self.slots.contains_key(id)
    }

    /// Write a provisional record.
    pub fn reserve(&mut self, id: MessageId, record: PreVerification) -> Result<(), IsmError> {
        if self.is_occupied(&id) {
            return Err(IsmError::DuplicateRecord(id));
        }
        if record.timestamp.is_epoch() {
            return Err(IsmError::InvalidTimestamp);
        }
        self.slots.insert(
            id,
            Slot {
                record,
                committed: false,
            },
        );
        Ok(())
    }

    /// Promote a provisional record. Returns the committed record.
    pub fn commit(&mut self, id: &MessageId) -> Option<PreVerification> {
        let slot = self.slots.get_mut(id).filter(|s| !s.committed)?;
        slot.committed = true;
        self.committed += 1;
        Some(slot.record)
    }

    /// Drop a provisional record. Committed records are left alone.
    pub fn release(&mut self, id: &MessageId) -> bool {
        if self.slots.get(id).is_some_and(|s| !s.committed) {
            self.slots.remove(id);
            return true;
        }
        false
    }

    /// The committed record for `id`, if any.
    pub fn get(&self, id: &MessageId) -> Option<&PreVerification> {
        self.slots
            .get(id)
            .filter(|s| s.committed)
            .map(|s| &s.record)
    }

    /// Remove and return the committed record for `id`.
    pub fn take(&mut self, id: &MessageId) -> Option<PreVerification> {
        self.get(id)?;
        let slot = self.slots.remove(id)?;
        self.committed -= 1;
        Some(slot.record)
    }

    /// Insert an already-committed record (snapshot restore).
    pub fn restore(&mut self, id: MessageId, record: PreVerification) -> Result<(), IsmError> {
        self.reserve(id, record)?;
        self.commit(&id);
        Ok(())
    }

    /// Committed records, unordered.
    pub fn iter(&self) -> impl Iterator<Item = (&MessageId, &PreVerification)> {
        self.slots
            .iter()
            .filter(|(_, s)| s.committed)
            .map(|(id, s)| (id, &s.record))
    }

    /// Number of committed records.
    pub fn len(&self) -> usize {
        self.committed
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
