//! Shared hex and serde plumbing for the 32-byte newtypes.
//!
//! Human-readable formats (TOML, JSON) carry `0x`-prefixed hex strings;
//! binary formats (bincode) carry the raw 32 bytes.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::TypesError;

pub(crate) fn to_hex(bytes: &[u8; 32]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Decode exactly 64 hex digits, with or without a `0x` prefix.
pub(crate) fn parse_exact(s: &str) -> Result<[u8; 32], TypesError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.len() != 64 {
        return Err(TypesError::InvalidLength {
            expected: "64",
            actual: digits.len(),
        });
    }
    let mut out = [0u8; 32];
    hex::decode_to_slice(digits, &mut out).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
    Ok(out)
}

pub(crate) fn serialize<S: Serializer>(bytes: &[u8; 32], s: S) -> Result<S::Ok, S::Error> {
    if s.is_human_readable() {
        s.serialize_str(&to_hex(bytes))
    } else {
        bytes.serialize(s)
    }
}

pub(crate) fn deserialize<'de, D, F>(d: D, parse: F) -> Result<[u8; 32], D::Error>
where
    D: Deserializer<'de>,
    F: FnOnce(&str) -> Result<[u8; 32], TypesError>,
{
    if d.is_human_readable() {
        let s = String::deserialize(d)?;
        parse(&s).map_err(serde::de::Error::custom)
    } else {
        <[u8; 32]>::deserialize(d)
    }
}
