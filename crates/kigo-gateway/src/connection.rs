//! Per-connection lifecycle
//!
//! Each admitted connection runs as one task owning the socket. Inbound
//! messages are processed strictly in order: the dispatch future is awaited
//! inline, so message n+1 is not read off the socket until message n's
//! handler has finished. Other connections are independent tasks and keep
//! running while this one waits on the completion service.

use std::borrow::Cow;
use std::sync::Arc;

use axum::extract::ws::{CloseFrame, Message, WebSocket};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use kigo_core::{Envelope, GatewayError, SessionMetadata};

use crate::registry::{HandlerContext, HandlerRegistry};

/// Drive one admitted connection until it closes.
///
/// `metadata` is `Some` for every connection the authenticator admitted; the
/// `None` branch exists only to honor the defensive missing-session check at
/// dispatch time.
pub async fn run_connection(
    socket: WebSocket,
    metadata: Option<SessionMetadata>,
    registry: Arc<HandlerRegistry>,
) {
    let connection_id = Uuid::new_v4().to_string();
    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    if let Some(ref metadata) = metadata {
        info!(
            connection_id = %connection_id,
            subject = %metadata.subject,
            role = %metadata.role,
            "connection established"
        );
    }

    loop {
        tokio::select! {
            // Outbound frames queued by handlers
            Some(frame) = rx.recv() => {
                if let Err(e) = sender.send(frame).await {
                    debug!(connection_id = %connection_id, "send failed: {e}");
                    break;
                }
            }

            // Inbound frames, processed one at a time
            inbound = receiver.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        let result = dispatch(&text, metadata.as_ref(), &registry, &connection_id, &tx).await;
                        match result {
                            Ok(()) => {}
                            Err(fatal) if fatal.is_fatal() => {
                                error!(connection_id = %connection_id, error = %fatal, "closing connection");
                                let close = Message::Close(Some(CloseFrame {
                                    // is_fatal() guarantees a code
                                    code: fatal.close_code().unwrap_or(1011),
                                    reason: Cow::Owned(fatal.to_string()),
                                }));
                                let _ = sender.send(close).await;
                                break;
                            }
                            Err(recoverable) => {
                                warn!(connection_id = %connection_id, error = %recoverable, "message rejected");
                                if tx.send(Message::Text(recoverable.to_frame().to_json())).is_err() {
                                    break;
                                }
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if sender.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) => {
                        debug!(connection_id = %connection_id, "closed by peer");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(connection_id = %connection_id, "socket error: {e}");
                        break;
                    }
                    None => break,
                }
            }
        }
    }

    info!(connection_id = %connection_id, "connection closed");
}

/// Validate one inbound frame and invoke its handler.
///
/// Exactly one of three things happens: the matching handler runs once, or
/// a recoverable error is returned for reporting on the open connection, or
/// the missing-session error is returned and the caller closes with the
/// distinguished code.
pub async fn dispatch(
    raw: &str,
    metadata: Option<&SessionMetadata>,
    registry: &HandlerRegistry,
    connection_id: &str,
    sender: &mpsc::UnboundedSender<Message>,
) -> Result<(), GatewayError> {
    let envelope = Envelope::parse(raw)?;

    // Should be unreachable post-handshake; fatal for this connection only.
    let metadata = metadata.ok_or(GatewayError::MissingSessionState)?;

    let handler = registry
        .get(&envelope.kind)
        .ok_or_else(|| GatewayError::UnknownMessageType(envelope.kind.clone()))?;

    let ctx = HandlerContext::new(connection_id, metadata.clone(), sender.clone());
    handler.handle(&envelope.payload, &ctx).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use kigo_core::Role;
    use crate::registry::MessageHandler;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct RecordingHandler {
        calls: AtomicUsize,
        payloads: Mutex<Vec<String>>,
    }

    impl RecordingHandler {
        fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                payloads: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl MessageHandler for RecordingHandler {
        async fn handle(&self, payload: &str, _ctx: &HandlerContext) -> Result<(), GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.payloads.lock().unwrap().push(payload.to_string());
            Ok(())
        }
    }

    fn setup() -> (
        Arc<RecordingHandler>,
        HandlerRegistry,
        SessionMetadata,
        mpsc::UnboundedSender<Message>,
        mpsc::UnboundedReceiver<Message>,
    ) {
        let handler = Arc::new(RecordingHandler::new());
        let registry = HandlerRegistry::new().with_handler("haiku", handler.clone());
        let metadata = SessionMetadata::new("alice", Role::User);
        let (tx, rx) = mpsc::unbounded_channel();
        (handler, registry, metadata, tx, rx)
    }

    #[tokio::test]
    async fn valid_envelope_invokes_handler_once_with_exact_payload() {
        let (handler, registry, metadata, tx, _rx) = setup();

        dispatch(
            r#"{"type":"haiku","payload":"a cat on a mat"}"#,
            Some(&metadata),
            &registry,
            "c1",
            &tx,
        )
        .await
        .unwrap();

        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
        assert_eq!(handler.payloads.lock().unwrap()[0], "a cat on a mat");
    }

    #[tokio::test]
    async fn malformed_envelope_is_recoverable_and_invokes_nothing() {
        let (handler, registry, metadata, tx, _rx) = setup();

        let err = dispatch("{\"type\":\"haiku\"}", Some(&metadata), &registry, "c1", &tx)
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::MalformedEnvelope(_)));
        assert!(!err.is_fatal());
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unknown_type_is_recoverable_and_invokes_nothing() {
        let (handler, registry, metadata, tx, _rx) = setup();

        let err = dispatch(
            r#"{"type":"warble","payload":"x"}"#,
            Some(&metadata),
            &registry,
            "c1",
            &tx,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, GatewayError::UnknownMessageType(_)));
        assert!(!err.is_fatal());
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_session_is_fatal_with_distinguished_code() {
        let (handler, registry, _metadata, tx, _rx) = setup();

        let err = dispatch(
            r#"{"type":"haiku","payload":"x"}"#,
            None,
            &registry,
            "c1",
            &tx,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, GatewayError::MissingSessionState));
        assert_eq!(err.close_code(), Some(4000));
        assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn envelope_validation_precedes_session_check() {
        let (_handler, registry, _metadata, tx, _rx) = setup();

        let err = dispatch("garbage", None, &registry, "c1", &tx).await.unwrap_err();
        assert!(matches!(err, GatewayError::MalformedEnvelope(_)));
    }
}
