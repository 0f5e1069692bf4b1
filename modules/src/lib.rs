//! Pluggable capabilities the optimistic verification module depends on.
//!
//! The module does not specify *how* a message is verified, only *that* a
//! delegate accepted it. Delegates and watcher-set providers are traits so
//! different deployments can plug in their own variants:
//!
//! - [`VerificationDelegate`]: the semantic check of a message.
//! - [`DelegateResolver`]: maps a routed delegate identity to something callable.
//! - [`WatcherSetSource`]: the identities allowed to accuse delegates, plus the
//!   accusation threshold.

pub mod delegate;
pub mod watchers;

pub use delegate::{DelegateDirectory, DelegateError, DelegateResolver, VerificationDelegate};
pub use watchers::{StaticWatcherSet, WatcherSet, WatcherSetError, WatcherSetSource};
