//! Submodule router: which delegate verifies messages from which origin.
//!
//! Routes are overwritten unconditionally and never validated; routing an
//! origin to an identity no delegate answers to only surfaces when a message
//! from that origin is pre-verified.

use oism_types::{Address, Domain};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct SubmoduleRouter {
    routes: HashMap<Domain, Address>,
}

impl SubmoduleRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route `origin` to `delegate`, returning the previous route.
    pub fn set(&mut self, origin: Domain, delegate: Address) -> Option<Address> {
        self.routes.insert(origin, delegate)
    }

    pub fn get(&self, origin: Domain) -> Option<Address> {
        self.routes.get(&origin).copied()
    }

    /// Like [`get`](Self::get), with unset origins mapped to [`Address::ZERO`].
    pub fn resolve(&self, origin: Domain) -> Address {
        self.get(origin).unwrap_or(Address::ZERO)
    }

    /// All routes ordered by origin.
    pub fn routes(&self) -> Vec<(Domain, Address)> {
        let mut routes: Vec<_> = self.routes.iter().map(|(o, d)| (*o, *d)).collect();
        routes.sort_unstable_by_key(|(origin, _)| *origin);
        routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overwrite_returns_previous() {
        let mut router = SubmoduleRouter::new();
        assert_eq!(router.set(5, Address::new([1; 32])), None);
        assert_eq!(router.set(5, Address::new([2; 32])), Some(Address::new([1; 32])));
        assert_eq!(router.get(5), Some(Address::new([2; 32])));
    }

    #[test]
    fn unset_origin_resolves_to_zero() {
        let router = SubmoduleRouter::new();
        assert_eq!(router.get(7), None);
        assert_eq!(router.resolve(7), Address::ZERO);
    }

    #[test]
    fn zero_delegate_accepted() {
        let mut router = SubmoduleRouter::new();
        router.set(1, Address::ZERO);
        assert_eq!(router.get(1), Some(Address::ZERO));
    }

    #[test]
    fn routes_are_sorted() {
        let mut router = SubmoduleRouter::new();
        router.set(9, Address::new([9; 32]));
        router.set(3, Address::new([3; 32]));
        let origins: Vec<_> = router.routes().into_iter().map(|(o, _)| o).collect();
        assert_eq!(origins, vec![3, 9]);
    }
}
