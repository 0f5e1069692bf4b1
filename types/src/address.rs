//! 32-byte identity used for owners, watchers and verification delegates.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::bytes32;
use crate::TypesError;

/// A 32-byte identity.
///
/// 20-byte account addresses are accepted when parsing and left-padded with
/// zeroes, so the same value can name an account on any domain.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; 32]);

impl Address {
    /// The empty identity. Used as the route of an unconfigured origin.
    pub const ZERO: Self = Self([0u8; 32]);

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Left-pad a 20-byte account address.
    pub fn from_account(account: [u8; 20]) -> Self {
        let mut bytes = [0u8; 32];
        bytes[12..].copy_from_slice(&account);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        match digits.len() {
            40 => {
                let mut account = [0u8; 20];
                hex::decode_to_slice(digits, &mut account)
                    .map_err(|e| TypesError::InvalidHex(e.to_string()))?;
                Ok(Self::from_account(account))
            }
            64 => bytes32::parse_exact(digits).map(Self),
            actual => Err(TypesError::InvalidLength {
                expected: "40 or 64",
                actual,
            }),
        }
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", hex::encode(&self.0[28..]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bytes32::to_hex(&self.0))
    }
}

impl From<[u8; 32]> for Address {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        bytes32::serialize(&self.0, s)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        bytes32::deserialize(d, |s| s.parse::<Address>().map(|a| a.0)).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_width_hex() {
        let s = format!("0x{}", "ab".repeat(32));
        let addr: Address = s.parse().unwrap();
        assert_eq!(addr.as_bytes(), &[0xab; 32]);
        assert_eq!(addr.to_string(), s);
    }

    #[test]
    fn account_addresses_are_left_padded() {
        let addr: Address = "11".repeat(20).parse().unwrap();
        assert_eq!(&addr.as_bytes()[..12], &[0u8; 12]);
        assert_eq!(&addr.as_bytes()[12..], &[0x11; 20]);
    }

    #[test]
    fn rejects_bad_length_and_digits() {
        assert!(matches!(
            "0x1234".parse::<Address>(),
            Err(TypesError::InvalidLength { actual: 4, .. })
        ));
        assert!(matches!(
            "zz".repeat(32).parse::<Address>(),
            Err(TypesError::InvalidHex(_))
        ));
    }

    #[test]
    fn json_uses_hex_and_bincode_uses_bytes() {
        let addr = Address::new([7u8; 32]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{}\"", "07".repeat(32)));
        assert_eq!(serde_json::from_str::<Address>(&json).unwrap(), addr);

        let bin = bincode::serialize(&addr).unwrap();
        assert_eq!(bin.len(), 32);
        assert_eq!(bincode::deserialize::<Address>(&bin).unwrap(), addr);
    }
}
