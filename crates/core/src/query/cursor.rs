//! Opaque pagination cursors: base64 of `{"offset": n}`.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CursorError {
    #[error("cursor is not valid base64: {0}")]
    Encoding(#[from] base64::DecodeError),

    #[error("cursor payload is malformed: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Serialize, Deserialize)]
struct CursorPayload {
    offset: usize,
}

/// Encode an offset into the filtered and sorted sequence.
pub fn encode_cursor(offset: usize) -> String {
    // Serializing a single integer field cannot fail
    let json = serde_json::to_vec(&CursorPayload { offset }).unwrap_or_default();
    BASE64.encode(json)
}

/// Decode a cursor back into an offset.
pub fn decode_cursor(cursor: &str) -> Result<usize, CursorError> {
    let bytes = BASE64.decode(cursor.trim())?;
    let payload: CursorPayload = serde_json::from_slice(&bytes)?;
    Ok(payload.offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_matches_wire_format() {
        // {"offset":20}
        assert_eq!(encode_cursor(20), "eyJvZmZzZXQiOjIwfQ==");
        assert_eq!(decode_cursor("eyJvZmZzZXQiOjIwfQ==").unwrap(), 20);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_cursor("not base64 at all!"),
            Err(CursorError::Encoding(_))
        ));
        // "hello"
        assert!(matches!(
            decode_cursor("aGVsbG8="),
            Err(CursorError::Payload(_))
        ));
        // {"offset":-1}
        assert!(matches!(
            decode_cursor("eyJvZmZzZXQiOi0xfQ=="),
            Err(CursorError::Payload(_))
        ));
    }
}
