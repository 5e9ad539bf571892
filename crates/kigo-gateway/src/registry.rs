//! Handler registry and dispatch context
//!
//! The registry maps an envelope `type` to a handler. It is built once at
//! startup and immutable afterwards; tests construct their own registries
//! with whatever handlers they need.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::ws::Message;
use tokio::sync::mpsc;
use tracing::debug;

use kigo_core::{GatewayError, SessionMetadata};

/// What a handler sees of the connection it is serving.
#[derive(Clone)]
pub struct HandlerContext {
    /// Connection id; doubles as the pipeline thread id
    pub connection_id: String,
    /// Identity decoded at handshake
    pub metadata: SessionMetadata,
    sender: mpsc::UnboundedSender<Message>,
}

impl HandlerContext {
    pub fn new(
        connection_id: impl Into<String>,
        metadata: SessionMetadata,
        sender: mpsc::UnboundedSender<Message>,
    ) -> Self {
        Self {
            connection_id: connection_id.into(),
            metadata,
            sender,
        }
    }

    /// Queue a text frame for this connection.
    ///
    /// A send failure means the peer is gone; the frame is dropped and the
    /// connection task will notice on its own.
    pub fn send_text(&self, text: impl Into<String>) {
        if self.sender.send(Message::Text(text.into())).is_err() {
            debug!(connection_id = %self.connection_id, "dropping frame for closed connection");
        }
    }
}

/// Behavior for one envelope `type`.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    /// Handle one envelope payload.
    ///
    /// Errors are reported back on the connection as error frames; they do
    /// not close it.
    async fn handle(&self, payload: &str, ctx: &HandlerContext) -> Result<(), GatewayError>;
}

/// Immutable mapping from envelope `type` to handler.
#[derive(Default)]
pub struct HandlerRegistry {
    handlers: HashMap<String, Arc<dyn MessageHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler under a name. Builder-style, used only at startup.
    pub fn with_handler(mut self, name: impl Into<String>, handler: Arc<dyn MessageHandler>) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn MessageHandler>> {
        self.handlers.get(name)
    }

    pub fn handler_names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kigo_core::Role;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingHandler {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl MessageHandler for CountingHandler {
        async fn handle(&self, payload: &str, ctx: &HandlerContext) -> Result<(), GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            ctx.send_text(payload.to_string());
            Ok(())
        }
    }

    #[tokio::test]
    async fn registry_lookup_and_invoke() {
        let handler = Arc::new(CountingHandler {
            calls: AtomicUsize::new(0),
        });
        let registry = HandlerRegistry::new().with_handler("echo", handler.clone());

        let (tx, mut rx) = mpsc::unbounded_channel();
        let ctx = HandlerContext::new("c1", SessionMetadata::new("alice", Role::User), tx);

        registry.get("echo").unwrap().handle("hi", &ctx).await.unwrap();
        assert_eq!(handler.calls.load(Ordering::SeqCst), 1);

        match rx.recv().await.unwrap() {
            Message::Text(text) => assert_eq!(text, "hi"),
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn unknown_name_is_absent() {
        let registry = HandlerRegistry::new();
        assert!(registry.get("nope").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn send_to_closed_connection_does_not_panic() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let ctx = HandlerContext::new("c1", SessionMetadata::new("alice", Role::User), tx);
        ctx.send_text("dropped");
    }
}
