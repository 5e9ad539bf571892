//! Gateway error taxonomy
//!
//! One tagged enum covers every failure the gateway reports, each variant
//! mapped to an HTTP-equivalent status code. The variants that are fatal for
//! a connection additionally map to a distinguished WebSocket close code;
//! everything else is reported as an `ErrorFrame` on the open connection.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Handshake credential missing, malformed, invalid, or expired.
    /// Refuses the transport upgrade; no connection is created.
    #[error("authentication credentials are not valid: {0}")]
    Unauthenticated(String),

    /// Inbound frame is not a `{type, payload}` envelope with both fields
    /// non-empty. Reported on the connection, which stays open.
    #[error("invalid message format: {0}")]
    MalformedEnvelope(String),

    /// Envelope `type` has no registered handler. Reported on the
    /// connection, which stays open.
    #[error("unknown message type: {0}")]
    UnknownMessageType(String),

    /// Session metadata absent at dispatch time. Unreachable after a
    /// completed handshake but checked defensively; fatal for the
    /// connection, never for the process.
    #[error("session metadata not found")]
    MissingSessionState,

    /// The completion service failed or timed out during a pipeline run.
    /// The run is aborted and nothing is persisted.
    #[error("generation failed: {0}")]
    GenerationFailed(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("internal server error: {0}")]
    Internal(String),

    #[error("service is currently unavailable: {0}")]
    Unavailable(String),
}

impl GatewayError {
    /// HTTP-equivalent status code for this error.
    pub fn status(&self) -> u16 {
        match self {
            GatewayError::Unauthenticated(_) => 401,
            GatewayError::MalformedEnvelope(_) => 400,
            GatewayError::UnknownMessageType(_) => 400,
            GatewayError::MissingSessionState => 409,
            GatewayError::GenerationFailed(_) => 502,
            GatewayError::BadRequest(_) => 400,
            GatewayError::NotFound(_) => 404,
            GatewayError::Internal(_) => 500,
            GatewayError::Unavailable(_) => 503,
        }
    }

    /// WebSocket close code, for the variants that end the connection.
    ///
    /// Non-fatal errors return `None`: they are sent as error frames and the
    /// connection survives.
    pub fn close_code(&self) -> Option<u16> {
        match self {
            GatewayError::MissingSessionState => Some(4000),
            GatewayError::Unauthenticated(_) => Some(4001),
            _ => None,
        }
    }

    /// Whether this error ends the connection it occurred on.
    pub fn is_fatal(&self) -> bool {
        self.close_code().is_some()
    }

    /// Build the outbound error frame for this error.
    pub fn to_frame(&self) -> ErrorFrame {
        ErrorFrame {
            error: self.to_string(),
        }
    }
}

/// Outbound error payload: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorFrame {
    pub error: String,
}

impl ErrorFrame {
    /// Serialize to the wire representation.
    ///
    /// Serialization of a two-field struct cannot fail; fall back to a
    /// hand-built frame to keep the signature infallible.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self)
            .unwrap_or_else(|_| format!(r#"{{"error":"{}"}}"#, self.error.replace('"', "'")))
    }
}

/// Result alias for gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(GatewayError::Unauthenticated("no token".into()).status(), 401);
        assert_eq!(GatewayError::MalformedEnvelope("bad".into()).status(), 400);
        assert_eq!(GatewayError::UnknownMessageType("x".into()).status(), 400);
        assert_eq!(GatewayError::NotFound("y".into()).status(), 404);
        assert_eq!(GatewayError::Internal("z".into()).status(), 500);
        assert_eq!(GatewayError::Unavailable("down".into()).status(), 503);
    }

    #[test]
    fn only_fatal_variants_carry_close_codes() {
        assert_eq!(GatewayError::MissingSessionState.close_code(), Some(4000));
        assert_eq!(
            GatewayError::Unauthenticated("expired".into()).close_code(),
            Some(4001)
        );
        assert_eq!(GatewayError::MalformedEnvelope("x".into()).close_code(), None);
        assert_eq!(GatewayError::GenerationFailed("x".into()).close_code(), None);
        assert!(!GatewayError::UnknownMessageType("x".into()).is_fatal());
    }

    #[test]
    fn error_frame_shape() {
        let frame = GatewayError::UnknownMessageType("warble".into()).to_frame();
        let json = frame.to_json();
        assert_eq!(json, r#"{"error":"unknown message type: warble"}"#);
    }
}
