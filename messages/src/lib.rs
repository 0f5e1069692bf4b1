//! Cross-domain message layout.
//!
//! Messages travel as a packed, big-endian byte string:
//!
//! ```text
//! version u8 | nonce u32 | origin u32 | sender [32] | destination u32 | recipient [32] | body
//! ```
//!
//! The verification module only needs two facts about a message: its
//! content-addressed identifier and its origin domain. Both are exposed
//! through the [`MessageDecoder`] trait so alternative layouts can be
//! plugged in.

pub mod decoder;
pub mod error;
pub mod message;

pub use decoder::{MessageDecoder, PackedMessageDecoder};
pub use error::MessageError;
pub use message::{origin_of, Message, HEADER_LEN, MESSAGE_VERSION};
