//! Optimistic verification module.
//!
//! Instead of verifying every inbound message synchronously, a message is
//! first *pre-verified* by the delegate routed for its origin and only
//! becomes finally verified after a fraud window elapses without enough
//! watchers accusing that delegate.
//!
//! - [`router`]: origin → delegate routes.
//! - [`ledger`]: pre-verification records keyed by message id.
//! - [`registry`]: fraud accusations and per-delegate counts.
//! - [`ism`]: the instance tying them together, including the finalization
//!   gate and owner-gated administration.

pub mod config;
pub mod error;
pub mod events;
pub mod ism;
pub mod ledger;
pub mod ownership;
pub mod registry;
pub mod router;
pub mod snapshot;
pub mod spans;

pub use config::{IsmConfig, RouteConfig};
pub use error::IsmError;
pub use events::IsmEvent;
pub use ism::OptimisticIsm;
pub use ledger::PreVerification;
pub use snapshot::IsmSnapshot;
