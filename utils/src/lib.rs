//! Shared utilities for the optimistic verification workspace.

pub mod logging;
pub mod time;

pub use logging::{init_logging, LogFormat, UnknownLogFormat};
pub use time::{format_duration, format_remaining};
