//! Packed message encoding and decoding.

use oism_types::{Address, Domain, MessageId};
use serde::{Deserialize, Serialize};

use crate::MessageError;

/// Layout version written by [`Message::encode`].
pub const MESSAGE_VERSION: u8 = 1;

const NONCE_OFFSET: usize = 1;
const ORIGIN_OFFSET: usize = 5;
const SENDER_OFFSET: usize = 9;
const DESTINATION_OFFSET: usize = 41;
const RECIPIENT_OFFSET: usize = 45;

/// Length of the fixed header preceding the body.
pub const HEADER_LEN: usize = 77;

/// A decoded cross-domain message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub version: u8,
    pub nonce: u32,
    pub origin: Domain,
    pub sender: Address,
    pub destination: Domain,
    pub recipient: Address,
    pub body: Vec<u8>,
}

impl Message {
    /// Build a current-version message.
    pub fn new(
        nonce: u32,
        origin: Domain,
        sender: Address,
        destination: Domain,
        recipient: Address,
        body: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            version: MESSAGE_VERSION,
            nonce,
            origin,
            sender,
            destination,
            recipient,
            body: body.into(),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(HEADER_LEN + self.body.len());
        out.push(self.version);
        out.extend_from_slice(&self.nonce.to_be_bytes());
        out.extend_from_slice(&self.origin.to_be_bytes());
        out.extend_from_slice(self.sender.as_bytes());
        out.extend_from_slice(&self.destination.to_be_bytes());
        out.extend_from_slice(self.recipient.as_bytes());
        out.extend_from_slice(&self.body);
        out
    }

    /// Decode a packed message. Only the current layout version is accepted.
    pub fn decode(bytes: &[u8]) -> Result<Self, MessageError> {
        check_header(bytes)?;
        let version = bytes[0];
        if version != MESSAGE_VERSION {
            return Err(MessageError::UnsupportedVersion(version));
        }
        Ok(Self {
            version,
            nonce: read_u32(bytes, NONCE_OFFSET),
            origin: read_u32(bytes, ORIGIN_OFFSET),
            sender: read_address(bytes, SENDER_OFFSET),
            destination: read_u32(bytes, DESTINATION_OFFSET),
            recipient: read_address(bytes, RECIPIENT_OFFSET),
            body: bytes[HEADER_LEN..].to_vec(),
        })
    }

    /// Identifier of this message: the hash of its encoding.
    pub fn id(&self) -> MessageId {
        oism_crypto::hash_message(&self.encode())
    }
}

/// Read the origin domain straight out of an encoded message.
pub fn origin_of(bytes: &[u8]) -> Result<Domain, MessageError> {
    check_header(bytes)?;
    Ok(read_u32(bytes, ORIGIN_OFFSET))
}

fn check_header(bytes: &[u8]) -> Result<(), MessageError> {
    if bytes.len() < HEADER_LEN {
        return Err(MessageError::Truncated {
            len: bytes.len(),
            need: HEADER_LEN,
        });
    }
    Ok(())
}

// Callers have checked the header length.
fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(&bytes[offset..offset + 4]);
    u32::from_be_bytes(buf)
}

fn read_address(bytes: &[u8], offset: usize) -> Address {
    let mut buf = [0u8; 32];
    buf.copy_from_slice(&bytes[offset..offset + 32]);
    Address::new(buf)
}
