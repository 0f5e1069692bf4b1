use oism_messages::MessageError;
use oism_modules::WatcherSetError;
use oism_types::{Address, MessageId, Timestamp};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IsmError {
    #[error("message {0} already has a pre-verification record")]
    DuplicateRecord(MessageId),

    #[error("delegate {delegate} did not verify message {id}: {reason}")]
    DelegateVerificationFailed {
        id: MessageId,
        delegate: Address,
        reason: String,
    },

    #[error("message {0} has not been pre-verified")]
    NotPreVerified(MessageId),

    #[error("fraud window for message {id} open until {open_until}, now {now}")]
    WindowNotElapsed {
        id: MessageId,
        open_until: Timestamp,
        now: Timestamp,
    },

    #[error("delegate {delegate} accused {accusations} times, threshold {threshold}")]
    DelegateFraudulent {
        delegate: Address,
        accusations: u32,
        threshold: u8,
    },

    #[error("{0} is not a watcher")]
    NotAWatcher(Address),

    #[error("watcher {watcher} already accused delegate {delegate}")]
    DuplicateAccusation { watcher: Address, delegate: Address },

    #[error("{0} is not the owner")]
    Unauthorized(Address),

    #[error("fraud window must be positive, got {0}")]
    InvalidFraudWindow(u64),

    #[error("new owner must not be the zero address")]
    ZeroOwner,

    #[error("clock reported the epoch; record timestamps must be positive")]
    InvalidTimestamp,

    #[error("message decoding: {0}")]
    Message(#[from] MessageError),

    #[error("watcher set: {0}")]
    WatcherSet(#[from] WatcherSetError),

    #[error("snapshot: {0}")]
    Snapshot(String),

    #[error("config: {0}")]
    Config(String),
}
