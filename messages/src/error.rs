use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    #[error("message too short: {len} bytes, header needs {need}")]
    Truncated { len: usize, need: usize },

    #[error("unsupported message version: {0}")]
    UnsupportedVersion(u8),
}
