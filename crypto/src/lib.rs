//! Hashing primitives for the optimistic verification module.
//!
//! - **Blake2b-256** for message identifiers
//! - Deterministic identity derivation from labels, for configuration
//!   fixtures and dry runs

pub mod hash;

pub use hash::{blake2b_256, blake2b_256_multi, derive_address, hash_message};
