//! Fraud accusation registry.
//!
//! Each watcher may accuse a given delegate once. Accusations are permanent;
//! the per-delegate count only ever grows and always equals the number of
//! distinct watchers that accused the delegate.

use oism_types::Address;
use std::collections::{HashMap, HashSet};

use crate::error::IsmError;

#[derive(Debug, Default)]
pub struct FraudRegistry {
    /// (watcher, delegate) pairs that have been recorded.
    accusations: HashSet<(Address, Address)>,
    /// delegate → number of distinct accusing watchers.
    counts: HashMap<Address, u32>,
}

impl FraudRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `watcher`'s accusation of `delegate`, returning the new count.
    ///
    /// Callers are responsible for checking that `watcher` is in the watcher set.
    pub fn accuse(&mut self, watcher: Address, delegate: Address) -> Result<u32, IsmError> {
        if !self.accusations.insert((watcher, delegate)) {
            return Err(IsmError::DuplicateAccusation { watcher, delegate });
        }
        let count = self.counts.entry(delegate).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    pub fn count(&self, delegate: &Address) -> u32 {
        self.counts.get(delegate).copied().unwrap_or(0)
    }

    pub fn has_accused(&self, watcher: &Address, delegate: &Address) -> bool {
        self.accusations.contains(&(*watcher, *delegate))
    }

    /// All recorded (watcher, delegate) pairs, unordered.
    pub fn accusations(&self) -> impl Iterator<Item = &(Address, Address)> {
        self.accusations.iter()
    }

    /// Number of delegates with at least one accusation.
    pub fn accused_delegates(&self) -> usize {
        self.counts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> Address {
        Address::new([n; 32])
    }

    #[test]
    fn counts_distinct_watchers() {
        let mut reg = FraudRegistry::new();
        assert_eq!(reg.accuse(addr(1), addr(9)).unwrap(), 1);
        assert_eq!(reg.accuse(addr(2), addr(9)).unwrap(), 2);
        assert_eq!(reg.count(&addr(9)), 2);
        assert_eq!(reg.count(&addr(8)), 0);
        assert!(reg.has_accused(&addr(1), &addr(9)));
        assert!(!reg.has_accused(&addr(3), &addr(9)));
    }

    #[test]
    fn repeated_accusation_rejected_and_count_unchanged() {
        let mut reg = FraudRegistry::new();
        reg.accuse(addr(1), addr(9)).unwrap();
        assert_eq!(
            reg.accuse(addr(1), addr(9)),
            Err(IsmError::DuplicateAccusation {
                watcher: addr(1),
                delegate: addr(9)
            })
        );
        assert_eq!(reg.count(&addr(9)), 1);
    }

    #[test]
    fn accusations_are_per_delegate() {
        let mut reg = FraudRegistry::new();
        reg.accuse(addr(1), addr(8)).unwrap();
        reg.accuse(addr(1), addr(9)).unwrap();
        assert_eq!(reg.count(&addr(8)), 1);
        assert_eq!(reg.count(&addr(9)), 1);
        assert_eq!(reg.accused_delegates(), 2);
        assert_eq!(reg.accusations().count(), 2);
    }
}
