//! Message decoding capability consumed by the verification module.

use oism_types::{Domain, MessageId};

use crate::message::origin_of;
use crate::MessageError;

/// Extracts the facts the verification module needs from raw message bytes.
pub trait MessageDecoder: Send + Sync {
    /// Content-addressed identifier of the message.
    fn message_id(&self, message: &[u8]) -> MessageId;

    /// Domain the message was sent from.
    fn origin(&self, message: &[u8]) -> Result<Domain, MessageError>;
}

/// Decoder for the packed layout in [`crate::message`].
#[derive(Clone, Copy, Debug, Default)]
pub struct PackedMessageDecoder;

impl MessageDecoder for PackedMessageDecoder {
    fn message_id(&self, message: &[u8]) -> MessageId {
        oism_crypto::hash_message(message)
    }

    fn origin(&self, message: &[u8]) -> Result<Domain, MessageError> {
        origin_of(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Message;
    use oism_types::Address;

    #[test]
    fn packed_decoder_agrees_with_message() {
        let msg = Message::new(1, 42, Address::ZERO, 2, Address::ZERO, vec![1, 2, 3]);
        let bytes = msg.encode();
        let decoder = PackedMessageDecoder;
        assert_eq!(decoder.message_id(&bytes), msg.id());
        assert_eq!(decoder.origin(&bytes).unwrap(), 42);
    }
}
