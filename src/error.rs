//! Error types for talking to the game server.

use std::fmt;

/// Failure of a single request/response exchange with the game server.
///
/// Every variant is recoverable: the session keeps its last-known state and
/// the next successful poll brings it back in line with the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced a response (connect, timeout, I/O).
    Request(String),
    /// The server answered with a non-success status code.
    Status(u16),
    /// The response body could not be decoded.
    Decode(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Request(reason) => write!(f, "request failed: {reason}"),
            TransportError::Status(code) => write!(f, "server returned status {code}"),
            TransportError::Decode(reason) => write!(f, "undecodable response: {reason}"),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Self::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            Self::Status(status.as_u16())
        } else {
            Self::Request(e.to_string())
        }
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Result type for transport operations.
pub type TransportResult<T> = Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_status_code() {
        let err = TransportError::Status(503);
        assert_eq!(err.to_string(), "server returned status 503");
    }

    #[test]
    fn test_json_error_maps_to_decode() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(matches!(TransportError::from(json_err), TransportError::Decode(_)));
    }
}
