//! Nullable verification delegate: scripted verdicts for testing.

use oism_modules::{DelegateError, VerificationDelegate};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

/// What a [`NullDelegate`] answers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject,
    /// Fail with [`DelegateError::Unavailable`] carrying this reason.
    Fail(String),
}

/// A delegate whose verdict is set by the test and which counts its calls.
#[derive(Debug)]
pub struct NullDelegate {
    verdict: Mutex<Verdict>,
    calls: AtomicUsize,
}

impl NullDelegate {
    pub fn new(verdict: Verdict) -> Self {
        Self {
            verdict: Mutex::new(verdict),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn accepting() -> Self {
        Self::new(Verdict::Accept)
    }

    pub fn rejecting() -> Self {
        Self::new(Verdict::Reject)
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self::new(Verdict::Fail(reason.into()))
    }

    pub fn set_verdict(&self, verdict: Verdict) {
        *self.verdict.lock().unwrap_or_else(PoisonError::into_inner) = verdict;
    }

    /// How many times `verify` has been called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VerificationDelegate for NullDelegate {
    fn verify(&self, _metadata: &[u8], _message: &[u8]) -> Result<bool, DelegateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &*self.verdict.lock().unwrap_or_else(PoisonError::into_inner) {
            Verdict::Accept => Ok(true),
            Verdict::Reject => Ok(false),
            Verdict::Fail(reason) => Err(DelegateError::Unavailable(reason.clone())),
        }
    }
}
