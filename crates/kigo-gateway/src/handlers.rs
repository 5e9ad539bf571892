//! Built-in message handlers

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use kigo_core::GatewayError;
use kigo_flow::{FlowError, HaikuFlow};

use crate::registry::{HandlerContext, MessageHandler};

/// `haiku`: run the generation pipeline and reply with the formatted result.
///
/// The connection id scopes the thread, so each connection accumulates its
/// own conversation and repeated messages build on prior runs.
pub struct HaikuHandler {
    flow: Arc<HaikuFlow>,
}

impl HaikuHandler {
    pub fn new(flow: Arc<HaikuFlow>) -> Self {
        Self { flow }
    }
}

#[async_trait]
impl MessageHandler for HaikuHandler {
    async fn handle(&self, payload: &str, ctx: &HandlerContext) -> Result<(), GatewayError> {
        info!(
            connection_id = %ctx.connection_id,
            subject = %ctx.metadata.subject,
            "haiku requested"
        );

        let response = self
            .flow
            .invoke(&ctx.connection_id, payload)
            .await
            .map_err(|e| match e {
                FlowError::Generation(inner) => GatewayError::GenerationFailed(inner.to_string()),
                FlowError::Checkpoint(inner) => GatewayError::Internal(inner.to_string()),
            })?;

        ctx.send_text(response);
        Ok(())
    }
}

/// `echo`: send the payload straight back.
pub struct EchoHandler;

#[async_trait]
impl MessageHandler for EchoHandler {
    async fn handle(&self, payload: &str, ctx: &HandlerContext) -> Result<(), GatewayError> {
        ctx.send_text(payload.to_string());
        Ok(())
    }
}
