//! Nullable infrastructure for deterministic testing.
//!
//! External collaborators of the verification module (the clock and the
//! verification delegates) are abstracted behind traits. This crate provides
//! test-friendly implementations that:
//! - Return deterministic values
//! - Can be controlled programmatically
//! - Record how they were used
//!
//! Usage: swap real implementations for nullables in tests and dry runs.

pub mod clock;
pub mod delegate;

pub use clock::NullClock;
pub use delegate::{NullDelegate, Verdict};
