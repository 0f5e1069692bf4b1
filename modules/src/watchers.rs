//! Watcher sets: the identities allowed to accuse delegates of fraud.

use oism_types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WatcherSetError {
    #[error("watcher set is empty")]
    Empty,

    #[error("threshold {threshold} out of range 1..={watchers}")]
    InvalidThreshold { threshold: u8, watchers: usize },

    #[error("watcher {0} listed more than once")]
    DuplicateWatcher(Address),

    #[error("watcher set encoding: {0}")]
    Encoding(String),
}

/// An ordered list of watchers plus the accusation threshold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatcherSet {
    pub watchers: Vec<Address>,
    pub threshold: u8,
}

impl WatcherSet {
    pub fn new(watchers: Vec<Address>, threshold: u8) -> Result<Self, WatcherSetError> {
        let set = Self { watchers, threshold };
        set.validate()?;
        Ok(set)
    }

    /// Check `1 <= threshold <= |watchers|` and that no watcher repeats.
    pub fn validate(&self) -> Result<(), WatcherSetError> {
        if self.watchers.is_empty() {
            return Err(WatcherSetError::Empty);
        }
        if self.threshold == 0 || usize::from(self.threshold) > self.watchers.len() {
            return Err(WatcherSetError::InvalidThreshold {
                threshold: self.threshold,
                watchers: self.watchers.len(),
            });
        }
        let mut seen = HashSet::with_capacity(self.watchers.len());
        for watcher in &self.watchers {
            if !seen.insert(watcher) {
                return Err(WatcherSetError::DuplicateWatcher(*watcher));
            }
        }
        Ok(())
    }

    /// Linear scan; watcher sets are small and checked rarely.
    pub fn contains(&self, identity: &Address) -> bool {
        self.watchers.iter().any(|w| w == identity)
    }

    pub fn len(&self) -> usize {
        self.watchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }
}

/// Supplies the watcher set and threshold.
///
/// Must be read-only and deterministic for a configured instance; callers
/// read it on every use rather than caching it. The module never holds its
/// state lock while reading, so implementations may query the module.
pub trait WatcherSetSource: Send + Sync {
    fn watchers_and_threshold(&self) -> Result<WatcherSet, WatcherSetError>;
}

/// Watcher set fixed at instantiation.
///
/// Holds only the encoded configuration; the list is decoded on each read.
/// Two instances built from the same configuration share a
/// [`deployment_id`](StaticWatcherSet::deployment_id).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticWatcherSet {
    encoded: Vec<u8>,
}

impl StaticWatcherSet {
    pub fn new(watchers: Vec<Address>, threshold: u8) -> Result<Self, WatcherSetError> {
        let set = WatcherSet::new(watchers, threshold)?;
        let encoded =
            bincode::serialize(&set).map_err(|e| WatcherSetError::Encoding(e.to_string()))?;
        Ok(Self { encoded })
    }

    /// Rebuild from a previously encoded configuration, validating it.
    pub fn from_encoded(encoded: Vec<u8>) -> Result<Self, WatcherSetError> {
        let this = Self { encoded };
        this.watchers_and_threshold()?.validate()?;
        Ok(this)
    }

    pub fn encoded(&self) -> &[u8] {
        &self.encoded
    }

    /// Deterministic identity of this configuration.
    pub fn deployment_id(&self) -> Address {
        Address::new(oism_crypto::blake2b_256(&self.encoded))
    }
}

impl WatcherSetSource for StaticWatcherSet {
    fn watchers_and_threshold(&self) -> Result<WatcherSet, WatcherSetError> {
        bincode::deserialize(&self.encoded).map_err(|e| WatcherSetError::Encoding(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addrs(n: u8) -> Vec<Address> {
        (1..=n).map(|i| Address::new([i; 32])).collect()
    }

    #[test]
    fn static_set_decodes_what_it_encoded() {
        let set = StaticWatcherSet::new(addrs(3), 2).unwrap();
        let decoded = set.watchers_and_threshold().unwrap();
        assert_eq!(decoded.watchers, addrs(3));
        assert_eq!(decoded.threshold, 2);
    }

    #[test]
    fn threshold_bounds_enforced() {
        assert_eq!(
            StaticWatcherSet::new(addrs(3), 0),
            Err(WatcherSetError::InvalidThreshold { threshold: 0, watchers: 3 })
        );
        assert_eq!(
            StaticWatcherSet::new(addrs(3), 4),
            Err(WatcherSetError::InvalidThreshold { threshold: 4, watchers: 3 })
        );
        assert!(StaticWatcherSet::new(addrs(3), 3).is_ok());
        assert_eq!(StaticWatcherSet::new(Vec::new(), 1), Err(WatcherSetError::Empty));
    }

    #[test]
    fn duplicate_watchers_rejected() {
        let mut list = addrs(2);
        list.push(list[0]);
        assert_eq!(
            WatcherSet::new(list.clone(), 1),
            Err(WatcherSetError::DuplicateWatcher(list[0]))
        );
    }

    #[test]
    fn contains_is_membership() {
        let set = WatcherSet::new(addrs(3), 1).unwrap();
        assert!(set.contains(&Address::new([2; 32])));
        assert!(!set.contains(&Address::new([9; 32])));
    }

    #[test]
    fn deployment_id_depends_only_on_configuration() {
        let a = StaticWatcherSet::new(addrs(3), 2).unwrap();
        let b = StaticWatcherSet::new(addrs(3), 2).unwrap();
        let c = StaticWatcherSet::new(addrs(3), 1).unwrap();
        assert_eq!(a.deployment_id(), b.deployment_id());
        assert_ne!(a.deployment_id(), c.deployment_id());
    }

    #[test]
    fn from_encoded_validates() {
        let good = StaticWatcherSet::new(addrs(2), 1).unwrap();
        assert_eq!(StaticWatcherSet::from_encoded(good.encoded().to_vec()).unwrap(), good);
        assert!(matches!(
            StaticWatcherSet::from_encoded(vec![1, 2, 3]),
            Err(WatcherSetError::Encoding(_))
        ));
    }
}
