use proptest::prelude::*;

use oism_types::{Address, MessageId, Timestamp};

proptest! {
    /// Display output parses back to the same identity.
    #[test]
    fn address_display_parses_back(bytes in prop::array::uniform32(0u8..)) {
        let addr = Address::new(bytes);
        let parsed: Address = addr.to_string().parse().unwrap();
        prop_assert_eq!(parsed, addr);
    }

    /// Display output parses back to the same message id.
    #[test]
    fn message_id_display_parses_back(bytes in prop::array::uniform32(0u8..)) {
        let id = MessageId::new(bytes);
        let parsed: MessageId = id.to_string().parse().unwrap();
        prop_assert_eq!(parsed, id);
    }

    /// Address::is_zero is true only for all-zero bytes.
    #[test]
    fn address_is_zero_correct(bytes in prop::array::uniform32(0u8..)) {
        prop_assert_eq!(Address::new(bytes).is_zero(), bytes == [0u8; 32]);
    }

    /// A window opened at `t` is exceeded exactly when `now > t + w`.
    #[test]
    fn strict_window_matches_integer_comparison(
        t in 1u64..1_000_000_000,
        w in 1u64..1_000_000,
        now in 0u64..2_000_000_000,
    ) {
        let opened = Timestamp::new(t);
        prop_assert_eq!(opened.strictly_exceeded(w, Timestamp::new(now)), now > t + w);
    }

    /// Timestamp ordering: new(a) <= new(b) iff a <= b.
    #[test]
    fn timestamp_ordering(a in 0u64..u64::MAX, b in 0u64..u64::MAX) {
        let ta = Timestamp::new(a);
        let tb = Timestamp::new(b);
        prop_assert_eq!(ta <= tb, a <= b);
        prop_assert_eq!(ta == tb, a == b);
    }
}
