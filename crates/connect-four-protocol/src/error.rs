//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding boundary records.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed.
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed bytes, missing fields, or an
    /// unknown variant tag.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The input can't be a record at all (e.g. an empty frame).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
