//! Codec trait and implementations for boundary records.
//!
//! The session core never needs bytes; its collaborators usually do. A
//! Discord bot decodes a [`RoutedInput`](crate::RoutedInput) from a
//! reaction payload, a socket adapter encodes each
//! [`Outcome`](crate::Outcome) for its clients. They pick a [`Codec`] and
//! stay agnostic of the format.

use serde::{de::DeserializeOwned, Serialize};

use crate::ProtocolError;

/// Encodes Rust values to bytes and decodes them back.
///
/// `Send + Sync + 'static` so one codec can live in a long-running task
/// and be shared between them.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    ///
    /// # Errors
    /// Returns `ProtocolError::Encode` if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    ///
    /// # Errors
    /// Returns `ProtocolError::InvalidMessage` for an empty frame and
    /// `ProtocolError::Decode` when the bytes don't match `T`.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] backed by `serde_json`.
///
/// ```rust
/// use connect_four_protocol::{Codec, InputEvent, JsonCodec, PlayerId, RoutedInput, SessionId};
///
/// let codec = JsonCodec;
/// let input = RoutedInput {
///     session_id: SessionId(7),
///     actor: PlayerId(1),
///     event: InputEvent::Move { column: 3 },
/// };
///
/// let bytes = codec.encode(&input).unwrap();
/// let decoded: RoutedInput = codec.decode(&bytes).unwrap();
/// assert_eq!(input, decoded);
/// ```
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        if data.iter().all(u8::is_ascii_whitespace) {
            return Err(ProtocolError::InvalidMessage("empty frame".into()));
        }
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use connect_four_board::{Board, Color};

    use super::*;
    use crate::{GameStatus, InputEvent, Outcome, SessionId};

    #[test]
    fn test_json_codec_outcome_survives_encoding() {
        let codec = JsonCodec;
        let mut board = Board::new();
        let mv = board.drop_piece(0, Color::Red).unwrap();
        let outcome = Outcome {
            session_id: SessionId(3),
            board,
            status: GameStatus::AwaitingMove { turn: Color::Yellow },
            last_move: Some(mv),
            time_to_move: None,
        };

        let bytes = codec.encode(&outcome).unwrap();
        let decoded: Outcome = codec.decode(&bytes).unwrap();

        assert_eq!(decoded, outcome);
    }

    #[test]
    fn test_json_codec_empty_frame_is_invalid_message() {
        let result: Result<InputEvent, _> = JsonCodec.decode(b"  \n");
        assert!(matches!(result, Err(ProtocolError::InvalidMessage(_))));
    }

    #[test]
    fn test_json_codec_garbage_is_decode_error() {
        let result: Result<InputEvent, _> = JsonCodec.decode(b"drop 3");
        assert!(matches!(result, Err(ProtocolError::Decode(_))));
    }
}
