//! Scripted replay of module operations against scripted delegates.
//!
//! A script lists delegates with fixed verdicts and a sequence of timed
//! steps. Each step runs against a module built from the TOML configuration
//! with a controllable clock, and its outcome is recorded rather than
//! aborting the run, so rejected operations are part of the report.
//!
//! ```json
//! {
//!   "start": 1000,
//!   "delegates": [{ "address": "0x…", "verdict": "accept" }],
//!   "steps": [
//!     { "op": "pre_verify", "message": { "nonce": 1, "origin": 5 } },
//!     { "at": 1101, "op": "finalize", "message": { "nonce": 1, "origin": 5 } }
//!   ]
//! }
//! ```

use anyhow::{ensure, Context};
use oism_ism::{IsmConfig, IsmError, IsmEvent, IsmSnapshot, OptimisticIsm};
use oism_messages::Message;
use oism_modules::DelegateDirectory;
use oism_nullables::{NullClock, NullDelegate, Verdict};
use oism_types::{Address, Domain, MessageId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct Script {
    /// Clock reading before the first step.
    #[serde(default = "default_start")]
    pub start: u64,
    #[serde(default)]
    pub delegates: Vec<DelegateSpec>,
    pub steps: Vec<Step>,
}

fn default_start() -> u64 {
    1
}

#[derive(Debug, Deserialize)]
pub struct DelegateSpec {
    pub address: Address,
    #[serde(default)]
    pub verdict: VerdictSpec,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerdictSpec {
    #[default]
    Accept,
    Reject,
    Fail(String),
}

impl From<VerdictSpec> for Verdict {
    fn from(spec: VerdictSpec) -> Self {
        match spec {
            VerdictSpec::Accept => Verdict::Accept,
            VerdictSpec::Reject => Verdict::Reject,
            VerdictSpec::Fail(reason) => Verdict::Fail(reason),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Step {
    /// Move the clock here before running the step. Must not go backwards.
    #[serde(default)]
    pub at: Option<u64>,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Action {
    PreVerify {
        message: MessageSpec,
    },
    Finalize {
        message: MessageSpec,
    },
    MarkFraudulent {
        watcher: Address,
        delegate: Address,
    },
    SetFraudWindow {
        caller: Address,
        fraud_window: u64,
    },
    SetRoute {
        caller: Address,
        delegate: Address,
        origin: Domain,
    },
    TransferOwnership {
        caller: Address,
        new_owner: Address,
    },
}

impl Action {
    fn name(&self) -> &'static str {
        match self {
            Self::PreVerify { .. } => "pre_verify",
            Self::Finalize { .. } => "finalize",
            Self::MarkFraudulent { .. } => "mark_fraudulent",
            Self::SetFraudWindow { .. } => "set_fraud_window",
            Self::SetRoute { .. } => "set_route",
            Self::TransferOwnership { .. } => "transfer_ownership",
        }
    }
}

/// Message fields; anything omitted is zero or empty.
#[derive(Debug, Deserialize)]
pub struct MessageSpec {
    pub nonce: u32,
    pub origin: Domain,
    #[serde(default)]
    pub sender: Address,
    #[serde(default)]
    pub destination: Domain,
    #[serde(default)]
    pub recipient: Address,
    #[serde(default)]
    pub body: String,
}

impl MessageSpec {
    fn encode(&self) -> Vec<u8> {
        Message::new(
            self.nonce,
            self.origin,
            self.sender,
            self.destination,
            self.recipient,
            self.body.as_bytes(),
        )
        .encode()
    }
}

#[derive(Debug, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub at: u64,
    pub op: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<MessageId>,
    pub ok: bool,
    pub detail: String,
}

#[derive(Debug, Serialize)]
pub struct Report {
    pub outcomes: Vec<StepOutcome>,
    pub events: Vec<IsmEvent>,
    pub pending: usize,
}

/// Run `script` against a fresh module built from `config`.
///
/// Returns the report and the final module state.
pub fn run(config: &IsmConfig, script: Script) -> anyhow::Result<(Report, IsmSnapshot)> {
    let directory = Arc::new(DelegateDirectory::new());
    for spec in script.delegates {
        let delegate = Arc::new(NullDelegate::new(spec.verdict.into()));
        let previous = directory.register(spec.address, delegate);
        ensure!(previous.is_none(), "delegate {} listed twice", spec.address);
    }

    let clock = Arc::new(NullClock::new(script.start));
    let ism = OptimisticIsm::from_config(config, directory, clock.clone())
        .context("building module from configuration")?;

    let mut now = script.start;
    let mut outcomes = Vec::with_capacity(script.steps.len());
    for (index, step) in script.steps.into_iter().enumerate() {
        if let Some(at) = step.at {
            ensure!(at >= now, "step {index}: clock moves backwards ({at} < {now})");
            now = at;
            clock.set(now);
        }
        let outcome = run_step(&ism, index, now, step.action);
        if outcome.ok {
            tracing::debug!(step = index, op = outcome.op, "{}", outcome.detail);
        } else {
            tracing::info!(step = index, op = outcome.op, "step refused: {}", outcome.detail);
        }
        outcomes.push(outcome);
    }

    let report = Report {
        outcomes,
        events: ism.events(),
        pending: ism.pending_count(),
    };
    Ok((report, ism.snapshot()))
}

fn run_step(ism: &OptimisticIsm, step: usize, at: u64, action: Action) -> StepOutcome {
    let op = action.name();
    let (message_id, result): (_, Result<String, IsmError>) = match action {
        Action::PreVerify { message } => {
            let bytes = message.encode();
            (
                Some(oism_crypto::hash_message(&bytes)),
                ism.pre_verify(&[], &bytes).map(|_| "pre-verified".to_string()),
            )
        }
        Action::Finalize { message } => {
            let bytes = message.encode();
            (
                Some(oism_crypto::hash_message(&bytes)),
                ism.finalize(&[], &bytes).map(|_| "finalized".to_string()),
            )
        }
        Action::MarkFraudulent { watcher, delegate } => (
            None,
            ism.mark_fraudulent(watcher, delegate)
                .map(|count| format!("{count} accusation(s) against {delegate}")),
        ),
        Action::SetFraudWindow {
            caller,
            fraud_window,
        } => (
            None,
            ism.set_fraud_window(caller, fraud_window)
                .map(|()| format!("fraud window is {fraud_window}s")),
        ),
        Action::SetRoute {
            caller,
            delegate,
            origin,
        } => (
            None,
            ism.set_route(caller, delegate, origin)
                .map(|()| format!("origin {origin} routed to {delegate}")),
        ),
        Action::TransferOwnership { caller, new_owner } => (
            None,
            ism.transfer_ownership(caller, new_owner)
                .map(|()| format!("owner is {new_owner}")),
        ),
    };

    let (ok, detail) = match result {
        Ok(detail) => (true, detail),
        Err(err) => (false, err.to_string()),
    };
    StepOutcome {
        step,
        at,
        op,
        message_id,
        ok,
        detail,
    }
}
