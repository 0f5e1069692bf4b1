//! Single-owner access control for configuration changes.

use oism_types::Address;

use crate::error::IsmError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Ownership {
    owner: Address,
}

impl Ownership {
    pub fn new(owner: Address) -> Result<Self, IsmError> {
        if owner.is_zero() {
            return Err(IsmError::ZeroOwner);
        }
        Ok(Self { owner })
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn ensure_owner(&self, caller: &Address) -> Result<(), IsmError> {
        if *caller != self.owner {
            return Err(IsmError::Unauthorized(*caller));
        }
        Ok(())
    }

    /// Hand ownership to `new_owner`, returning the previous owner.
    pub fn transfer(&mut self, caller: &Address, new_owner: Address) -> Result<Address, IsmError> {
        self.ensure_owner(caller)?;
        if new_owner.is_zero() {
            return Err(IsmError::ZeroOwner);
        }
        Ok(std::mem::replace(&mut self.owner, new_owner))
    }
}
