//! Span constructors for the module's entry points.
//!
//! Consistent span names and fields make traces for one message easy to
//! correlate across pre-verification and finalization.

use oism_types::{Address, MessageId};
use tracing::{info_span, Span};

pub fn pre_verify_span(id: &MessageId) -> Span {
    info_span!("pre_verify", id = %id)
}

pub fn finalize_span(id: &MessageId) -> Span {
    info_span!("finalize", id = %id)
}

pub fn accusation_span(watcher: &Address, delegate: &Address) -> Span {
    info_span!("mark_fraudulent", watcher = %watcher, delegate = %delegate)
}
