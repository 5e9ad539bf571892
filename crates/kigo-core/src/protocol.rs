//! Wire protocol types
//!
//! Every inbound text frame is an `Envelope`: a `type` tag naming a
//! registered handler and an opaque `payload` string for it.

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// The minimal inbound message unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Handler name this message is addressed to
    #[serde(rename = "type")]
    pub kind: String,
    /// Opaque payload passed through to the handler unmodified
    pub payload: String,
}

impl Envelope {
    pub fn new(kind: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: payload.into(),
        }
    }

    /// Parse raw inbound text into a validated envelope.
    ///
    /// Rejects unparseable frames and envelopes with an empty `type` or
    /// `payload` before any handler dispatch happens. The error carries
    /// enough context to be reported back on the same connection.
    pub fn parse(raw: &str) -> Result<Self, GatewayError> {
        let envelope: Envelope = serde_json::from_str(raw)
            .map_err(|e| GatewayError::MalformedEnvelope(format!("invalid JSON: {e}")))?;

        if envelope.kind.is_empty() {
            return Err(GatewayError::MalformedEnvelope(
                "missing message type".to_string(),
            ));
        }
        if envelope.payload.is_empty() {
            return Err(GatewayError::MalformedEnvelope(
                "missing message payload".to_string(),
            ));
        }

        Ok(envelope)
    }
}
