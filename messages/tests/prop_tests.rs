use proptest::prelude::*;

use oism_messages::{origin_of, Message, MessageDecoder, PackedMessageDecoder, HEADER_LEN};
use oism_types::Address;

proptest! {
    /// Any encoded message decodes back to itself.
    #[test]
    fn encode_decode_roundtrip(
        nonce in any::<u32>(),
        origin in any::<u32>(),
        destination in any::<u32>(),
        sender in prop::array::uniform32(0u8..),
        recipient in prop::array::uniform32(0u8..),
        body in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let msg = Message::new(nonce, origin, Address::new(sender), destination, Address::new(recipient), body);
        let bytes = msg.encode();
        prop_assert_eq!(Message::decode(&bytes).unwrap(), msg);
        prop_assert_eq!(origin_of(&bytes).unwrap(), origin);
    }

    /// Anything shorter than the header is rejected, never panics.
    #[test]
    fn short_inputs_rejected(bytes in prop::collection::vec(any::<u8>(), 0..HEADER_LEN)) {
        prop_assert!(origin_of(&bytes).is_err());
        prop_assert!(Message::decode(&bytes).is_err());
        prop_assert!(PackedMessageDecoder.origin(&bytes).is_err());
    }
}
