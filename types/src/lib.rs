//! Fundamental types for the optimistic verification module.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! 32-byte identities, message identifiers, origin domains, timestamps and the
//! clock abstraction.

pub mod address;
pub mod error;
pub mod hash;
pub mod time;

mod bytes32;

pub use address::Address;
pub use error::TypesError;
pub use hash::MessageId;
pub use time::{Clock, SystemClock, Timestamp};

/// Identifier of the domain a cross-domain message was sent from.
pub type Domain = u32;
