//! Verification delegates and the directory that resolves them.

use oism_types::Address;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DelegateError {
    #[error("delegate rejected the message: {0}")]
    Rejected(String),

    #[error("delegate unavailable: {0}")]
    Unavailable(String),
}

/// A pluggable verification module.
///
/// Implementations might include signature-threshold checks, light-client
/// proofs or anything else that can judge a `(metadata, message)` pair.
/// The delegate may call back into the module that invoked it.
pub trait VerificationDelegate: Send + Sync {
    /// Judge a message. `Ok(false)` and `Err(_)` both count as rejection.
    fn verify(&self, metadata: &[u8], message: &[u8]) -> Result<bool, DelegateError>;
}

/// Resolves a delegate identity to a callable delegate.
///
/// Routes only store identities; an identity nothing answers to resolves to
/// `None`, which the caller treats as a failed verification.
pub trait DelegateResolver: Send + Sync {
    fn resolve(&self, delegate: &Address) -> Option<Arc<dyn VerificationDelegate>>;
}

/// In-process delegate registry.
#[derive(Default)]
pub struct DelegateDirectory {
    delegates: RwLock<HashMap<Address, Arc<dyn VerificationDelegate>>>,
}

impl DelegateDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `delegate` callable under `address`, returning any delegate it replaces.
    pub fn register(
        &self,
        address: Address,
        delegate: Arc<dyn VerificationDelegate>,
    ) -> Option<Arc<dyn VerificationDelegate>> {
        self.delegates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(address, delegate)
    }

    pub fn unregister(&self, address: &Address) -> Option<Arc<dyn VerificationDelegate>> {
        self.delegates
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(address)
    }

    pub fn len(&self) -> usize {
        self.delegates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DelegateResolver for DelegateDirectory {
    fn resolve(&self, delegate: &Address) -> Option<Arc<dyn VerificationDelegate>> {
        self.delegates
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(delegate)
            .cloned()
    }
}

impl fmt::Debug for DelegateDirectory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegateDirectory")
            .field("delegates", &self.len())
            .finish()
    }
}
