//! Persisting and restoring module state.
//!
//! Only committed state is captured: provisional records belong to a
//! pre-verification still in progress and the event log is not replayed.
//! Accusation counts are recomputed from the accusation pairs on restore.

use oism_modules::{DelegateResolver, WatcherSetSource};
use oism_types::{Address, Clock, Domain, MessageId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::IsmError;
use crate::events::EventLog;
use crate::ism::{IsmState, OptimisticIsm};
use crate::ledger::{PreVerification, PreVerificationLedger};
use crate::ownership::Ownership;
use crate::registry::FraudRegistry;
use crate::router::SubmoduleRouter;

/// Serializable module state. Collections are sorted so equal states encode
/// to equal bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsmSnapshot {
    pub owner: Address,
    pub fraud_window: u64,
    pub routes: Vec<(Domain, Address)>,
    pub records: Vec<(MessageId, PreVerification)>,
    /// (watcher, delegate) pairs.
    pub accusations: Vec<(Address, Address)>,
}

impl IsmSnapshot {
    pub fn to_bytes(&self) -> Result<Vec<u8>, IsmError> {
        bincode::serialize(self).map_err(|e| IsmError::Snapshot(e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IsmError> {
        bincode::deserialize(bytes).map_err(|e| IsmError::Snapshot(e.to_string()))
    }
}

impl OptimisticIsm {
    /// Capture committed state.
    pub fn snapshot(&self) -> IsmSnapshot {
        self.with_state(|state| {
            let mut records: Vec<_> = state.ledger.iter().map(|(id, r)| (*id, *r)).collect();
            records.sort_unstable_by_key(|(id, _)| *id);
            let mut accusations: Vec<_> = state.registry.accusations().copied().collect();
            accusations.sort_unstable();
            IsmSnapshot {
                owner: state.ownership.owner(),
                fraud_window: state.fraud_window,
                routes: state.router.routes(),
                records,
                accusations,
            }
        })
    }

    /// Rebuild an instance from a snapshot.
    ///
    /// The snapshot is checked against the same rules live operations
    /// enforce: positive fraud window, non-zero owner, one record per
    /// message, one accusation per pair, and accusers drawn from the
    /// current watcher set.
    pub fn restore(
        snapshot: IsmSnapshot,
        watchers: Arc<dyn WatcherSetSource>,
        delegates: Arc<dyn DelegateResolver>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, IsmError> {
        if snapshot.fraud_window == 0 {
            return Err(IsmError::InvalidFraudWindow(0));
        }
        let set = watchers.watchers_and_threshold()?;
        set.validate()?;

        let mut router = SubmoduleRouter::new();
        let mut origins = HashSet::new();
        for (origin, delegate) in snapshot.routes {
            if !origins.insert(origin) {
                return Err(IsmError::Snapshot(format!("origin {origin} routed twice")));
            }
            router.set(origin, delegate);
        }

        let mut ledger = PreVerificationLedger::new();
        for (id, record) in snapshot.records {
            ledger.restore(id, record)?;
        }

        let mut registry = FraudRegistry::new();
        for (watcher, delegate) in snapshot.accusations {
            if !set.contains(&watcher) {
                return Err(IsmError::NotAWatcher(watcher));
            }
            registry.accuse(watcher, delegate)?;
        }

        tracing::info!(
            pending = ledger.len(),
            accused_delegates = registry.accused_delegates(),
            "restored module state from snapshot"
        );

        Ok(Self::from_state(
            IsmState {
                ownership: Ownership::new(snapshot.owner)?,
                fraud_window: snapshot.fraud_window,
                router,
                ledger,
                registry,
                events: EventLog::new(),
            },
            watchers,
            delegates,
            clock,
        ))
    }
}
