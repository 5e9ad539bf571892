use async_trait::async_trait;

use crate::error::Result;

/// External text-completion capability.
///
/// Asynchronous and fallible: calls may take unbounded time and callers must
/// treat every invocation as a suspension point. Implementations must be
/// safe to share across connection tasks.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Turn prompt text into generated text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
