//! The optimistic verification module.
//!
//! Messages are accepted in two steps:
//! 1. **Pre-verification**: the delegate routed for the message's origin
//!    checks it, and the module records which delegate vouched and when.
//! 2. **Finalization**: once the fraud window has strictly elapsed, and as
//!    long as fewer than `threshold` watchers have accused that delegate,
//!    the record is consumed and the message counts as verified.
//!
//! Every operation runs under the instance lock, but collaborators (the
//! delegate, the watcher-set provider, the clock) are only ever called with
//! the lock released, so any of them may call back into the module. The
//! record is written before the delegate call so a delegate that re-enters
//! the module for the same message is turned away as a duplicate.

use oism_messages::{MessageDecoder, PackedMessageDecoder};
use oism_modules::{
    DelegateError, DelegateResolver, VerificationDelegate, WatcherSet, WatcherSetSource,
};
use oism_types::{Address, Clock, Domain, MessageId, Timestamp};
use oism_utils::{format_duration, format_remaining};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::IsmError;
use crate::events::{EventLog, IsmEvent};
use crate::ledger::{PreVerification, PreVerificationLedger};
use crate::ownership::Ownership;
use crate::registry::FraudRegistry;
use crate::router::SubmoduleRouter;
use crate::spans::{accusation_span, finalize_span, pre_verify_span};

/// Mutable per-instance state. Only reachable through the instance lock.
#[derive(Debug)]
pub(crate) struct IsmState {
    pub(crate) ownership: Ownership,
    pub(crate) fraud_window: u64,
    pub(crate) router: SubmoduleRouter,
    pub(crate) ledger: PreVerificationLedger,
    pub(crate) registry: FraudRegistry,
    pub(crate) events: EventLog,
}

pub struct OptimisticIsm {
    state: Mutex<IsmState>,
    watchers: Arc<dyn WatcherSetSource>,
    delegates: Arc<dyn DelegateResolver>,
    clock: Arc<dyn Clock>,
    decoder: Arc<dyn MessageDecoder>,
}

impl OptimisticIsm {
    /// Create an instance owned by `owner` with an initial fraud window.
    ///
    /// The watcher set is read once here to fail fast on a misconfigured
    /// provider; afterwards it is re-read on every use.
    pub fn new(
        owner: Address,
        fraud_window: u64,
        watchers: Arc<dyn WatcherSetSource>,
        delegates: Arc<dyn DelegateResolver>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, IsmError> {
        if fraud_window == 0 {
            return Err(IsmError::InvalidFraudWindow(fraud_window));
        }
        watchers.watchers_and_threshold()?.validate()?;

        let mut events = EventLog::new();
        events.push(IsmEvent::FraudWindowSet { fraud_window });

        Ok(Self::from_state(
            IsmState {
                ownership: Ownership::new(owner)?,
                fraud_window,
                router: SubmoduleRouter::new(),
                ledger: PreVerificationLedger::new(),
                registry: FraudRegistry::new(),
                events,
            },
            watchers,
            delegates,
            clock,
        ))
    }

    pub(crate) fn from_state(
        state: IsmState,
        watchers: Arc<dyn WatcherSetSource>,
        delegates: Arc<dyn DelegateResolver>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state: Mutex::new(state),
            watchers,
            delegates,
            clock,
            decoder: Arc::new(PackedMessageDecoder),
        }
    }

    /// Replace the default packed-layout message decoder.
    pub fn with_decoder(mut self, decoder: Arc<dyn MessageDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    fn lock(&self) -> MutexGuard<'_, IsmState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // ── Pre-verification ───────────────────────────────────────────────

    /// Have the routed delegate check `message` and start its fraud window.
    ///
    /// All-or-nothing: if the delegate rejects, errors, or cannot be
    /// resolved, no record survives and no event is emitted.
    pub fn pre_verify(&self, metadata: &[u8], message: &[u8]) -> Result<bool, IsmError> {
        let id = self.decoder.message_id(message);
        let span = pre_verify_span(&id);
        let _enter = span.enter();

        let origin = self.decoder.origin(message)?;
        let timestamp = self.clock.now();

        // Written before the delegate runs; released again if it rejects.
        let record = {
            let mut state = self.lock();
            let record = PreVerification {
                delegate: state.router.resolve(origin),
                timestamp,
            };
            if let Err(err) = state.ledger.reserve(id, record) {
                tracing::debug!(%origin, "pre-verification refused: {err}");
                return Err(err);
            }
            record
        };
        let reservation = Reservation::new(self, id);

        let verdict = self.invoke_delegate(&record.delegate, metadata, message);

        match verdict {
            Ok(()) => {
                let mut state = self.lock();
                reservation.keep();
                state.ledger.commit(&id);
                state.events.push(IsmEvent::PreVerified {
                    id,
                    delegate: record.delegate,
                    timestamp: record.timestamp,
                });
                tracing::info!(
                    %origin,
                    delegate = %record.delegate,
                    timestamp = %record.timestamp,
                    "message pre-verified"
                );
                Ok(true)
            }
            Err(reason) => {
                drop(reservation);
                tracing::warn!(
                    %origin,
                    delegate = %record.delegate,
                    "delegate did not verify message, record rolled back: {reason}"
                );
                Err(IsmError::DelegateVerificationFailed {
                    id,
                    delegate: record.delegate,
                    reason,
                })
            }
        }
    }

    /// Call the delegate with no lock held. Any outcome but `Ok(true)` is a
    /// rejection, described by the returned reason.
    fn invoke_delegate(
        &self,
        delegate: &Address,
        metadata: &[u8],
        message: &[u8],
    ) -> Result<(), String> {
        let Some(module) = self.delegates.resolve(delegate) else {
            return Err(format!("no delegate deployed at {delegate}"));
        };
        match module.verify(metadata, message) {
            Ok(true) => Ok(()),
            Ok(false) => Err("delegate returned false".to_string()),
            Err(e) => Err(e.to_string()),
        }
    }

    // ── Finalization ───────────────────────────────────────────────────

    /// Final verdict on a pre-verified message. Consumes the record.
    ///
    /// Checks, in order: a committed record exists, the fraud window has
    /// strictly elapsed, and the recorded delegate has fewer accusations than
    /// the current threshold. The delegate is not consulted again.
    pub fn finalize(&self, _metadata: &[u8], message: &[u8]) -> Result<bool, IsmError> {
        let id = self.decoder.message_id(message);
        let span = finalize_span(&id);
        let _enter = span.enter();

        let now = self.clock.now();
        // Read before locking; a provider failure only surfaces once the
        // record and window checks have passed.
        let watcher_set = self.watchers.watchers_and_threshold();

        let mut state = self.lock();

        let Some(record) = state.ledger.get(&id).copied() else {
            tracing::debug!("finalize refused: not pre-verified");
            return Err(IsmError::NotPreVerified(id));
        };

        if !record.timestamp.strictly_exceeded(state.fraud_window, now) {
            let open_until = record.timestamp.saturating_add(state.fraud_window);
            tracing::debug!(
                %open_until,
                %now,
                "finalize refused: fraud window {}",
                format_remaining(open_until.as_secs(), now.as_secs())
            );
            return Err(IsmError::WindowNotElapsed { id, open_until, now });
        }

        let threshold = watcher_set?.threshold;
        let accusations = state.registry.count(&record.delegate);
        if accusations >= u32::from(threshold) {
            tracing::warn!(
                delegate = %record.delegate,
                accusations,
                threshold,
                "finalize refused: delegate marked fraudulent"
            );
            return Err(IsmError::DelegateFraudulent {
                delegate: record.delegate,
                accusations,
                threshold,
            });
        }

        state.ledger.take(&id);
        state.events.push(IsmEvent::Finalized {
            id,
            delegate: record.delegate,
        });
        tracing::info!(
            delegate = %record.delegate,
            waited = %format_duration(record.timestamp.elapsed_since(now)),
            "message finalized"
        );
        Ok(true)
    }

    // ── Fraud accusations ──────────────────────────────────────────────

    /// Record `caller`'s accusation of `delegate`. Returns the new count.
    pub fn mark_fraudulent(&self, caller: Address, delegate: Address) -> Result<u32, IsmError> {
        let span = accusation_span(&caller, &delegate);
        let _enter = span.enter();

        if !self.watchers.watchers_and_threshold()?.contains(&caller) {
            tracing::debug!("accusation refused: caller is not a watcher");
            return Err(IsmError::NotAWatcher(caller));
        }

        let mut state = self.lock();
        let accusations = state.registry.accuse(caller, delegate).inspect_err(|err| {
            tracing::debug!("accusation refused: {err}");
        })?;
        state.events.push(IsmEvent::MarkedFraudulent {
            watcher: caller,
            delegate,
            accusations,
        });
        tracing::info!(accusations, "delegate accused of fraud");
        Ok(accusations)
    }

    // ── Administration ─────────────────────────────────────────────────

    pub fn set_fraud_window(&self, caller: Address, fraud_window: u64) -> Result<(), IsmError> {
        let mut state = self.lock();
        state.ownership.ensure_owner(&caller)?;
        if fraud_window == 0 {
            return Err(IsmError::InvalidFraudWindow(fraud_window));
        }
        state.fraud_window = fraud_window;
        state.events.push(IsmEvent::FraudWindowSet { fraud_window });
        tracing::info!(fraud_window = %format_duration(fraud_window), "fraud window set");
        Ok(())
    }

    /// Route `origin` to `delegate`. The delegate is not validated.
    pub fn set_route(&self, caller: Address, delegate: Address, origin: Domain) -> Result<(), IsmError> {
        let mut state = self.lock();
        state.ownership.ensure_owner(&caller)?;
        let previous = state.router.set(origin, delegate);
        state.events.push(IsmEvent::SubmoduleSet { delegate, origin });
        tracing::info!(%origin, %delegate, ?previous, "submodule route set");
        Ok(())
    }

    pub fn transfer_ownership(&self, caller: Address, new_owner: Address) -> Result<(), IsmError> {
        let mut state = self.lock();
        let previous_owner = state.ownership.transfer(&caller, new_owner)?;
        state.events.push(IsmEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        tracing::info!(%previous_owner, %new_owner, "ownership transferred");
        Ok(())
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// Delegate currently routed for `message`'s origin.
    pub fn route_for(&self, message: &[u8]) -> Result<Option<Address>, IsmError> {
        let origin = self.decoder.origin(message)?;
        Ok(self.route(origin))
    }

    pub fn route(&self, origin: Domain) -> Option<Address> {
        self.lock().router.get(origin)
    }

    pub fn routes(&self) -> Vec<(Domain, Address)> {
        self.lock().router.routes()
    }

    pub fn owner(&self) -> Address {
        self.lock().ownership.owner()
    }

    pub fn fraud_window(&self) -> u64 {
        self.lock().fraud_window
    }

    pub fn watchers_and_threshold(&self) -> Result<WatcherSet, IsmError> {
        Ok(self.watchers.watchers_and_threshold()?)
    }

    /// Committed pre-verification record for `id`, if any.
    pub fn pre_verification(&self, id: &MessageId) -> Option<PreVerification> {
        self.lock().ledger.get(id).copied()
    }

    /// Number of committed records awaiting finalization.
    pub fn pending_count(&self) -> usize {
        self.lock().ledger.len()
    }

    /// Earliest time `finalize` can pass the window check for `id` under the
    /// current fraud window.
    pub fn ready_at(&self, id: &MessageId) -> Option<Timestamp> {
        let state = self.lock();
        let record = state.ledger.get(id)?;
        Some(
            record
                .timestamp
                .saturating_add(state.fraud_window)
                .saturating_add(1),
        )
    }

    pub fn fraudulent_count(&self, delegate: &Address) -> u32 {
        self.lock().registry.count(delegate)
    }

    pub fn has_accused(&self, watcher: &Address, delegate: &Address) -> bool {
        self.lock().registry.has_accused(watcher, delegate)
    }

    /// Whether `delegate` has reached the current accusation threshold.
    pub fn is_fraudulent(&self, delegate: &Address) -> Result<bool, IsmError> {
        let threshold = self.watchers.watchers_and_threshold()?.threshold;
        Ok(self.fraudulent_count(delegate) >= u32::from(threshold))
    }

    pub fn events(&self) -> Vec<IsmEvent> {
        self.lock().events.all().to_vec()
    }

    /// Events appended at or after position `cursor`.
    pub fn events_since(&self, cursor: usize) -> Vec<IsmEvent> {
        self.lock().events.since(cursor).to_vec()
    }

    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&IsmState) -> R) -> R {
        f(&self.lock())
    }
}

/// A provisional record held while its delegate runs. Dropping it without
/// [`keep`](Reservation::keep) releases the record, including when the
/// delegate panics.
struct Reservation<'a> {
    ism: &'a OptimisticIsm,
    id: MessageId,
    armed: bool,
}

impl<'a> Reservation<'a> {
    fn new(ism: &'a OptimisticIsm, id: MessageId) -> Self {
        Self {
            ism,
            id,
            armed: true,
        }
    }

    /// Leave the record in place for the caller to commit.
    fn keep(mut self) {
        self.armed = false;
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.ism.lock().ledger.release(&self.id);
        if std::thread::panicking() {
            tracing::warn!(id = %self.id, "delegate panicked, record rolled back");
        }
    }
}

/// The module is itself a verification delegate: its verdict is the
/// finalization gate, so it can be routed to or composed like any other.
impl VerificationDelegate for OptimisticIsm {
    fn verify(&self, metadata: &[u8], message: &[u8]) -> Result<bool, DelegateError> {
        self.finalize(metadata, message)
            .map_err(|e| DelegateError::Rejected(e.to_string()))
    }
}

impl fmt::Debug for OptimisticIsm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("OptimisticIsm")
            .field("owner", &state.ownership.owner())
            .field("fraud_window", &state.fraud_window)
            .field("pending", &state.ledger.len())
            .finish_non_exhaustive()
    }
}
