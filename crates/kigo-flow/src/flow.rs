//! Pipeline orchestrator
//!
//! Runs the fixed step sequence for a thread id: load checkpoint, append
//! the inbound message, `find_word` → `create_haiku` → `format_response`,
//! persist, return the response. Runs for the same thread id are serialized;
//! runs for different threads proceed concurrently.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use kigo_core::ChatMessage;
use kigo_llm::CompletionService;

use crate::checkpoint::CheckpointStore;
use crate::error::FlowResult;
use crate::state::PipelineState;
use crate::steps;

/// The three-step haiku generation flow.
pub struct HaikuFlow {
    completion: Arc<dyn CompletionService>,
    checkpoints: Arc<dyn CheckpointStore>,
    /// Per-thread run locks; at most one run in flight per thread id
    thread_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl HaikuFlow {
    pub fn new(completion: Arc<dyn CompletionService>, checkpoints: Arc<dyn CheckpointStore>) -> Self {
        Self {
            completion,
            checkpoints,
            thread_locks: DashMap::new(),
        }
    }

    fn thread_lock(&self, thread_id: &str) -> Arc<Mutex<()>> {
        self.thread_locks
            .entry(thread_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run the pipeline for one inbound message on the given thread.
    ///
    /// The run works on a private copy of the thread's state: if any step
    /// fails the checkpoint is left exactly as it was before the run, so a
    /// retry never resumes into a half-finished state.
    pub async fn invoke(&self, thread_id: &str, message: &str) -> FlowResult<String> {
        let lock = self.thread_lock(thread_id);
        let _guard = lock.lock().await;

        let mut state = self
            .checkpoints
            .load(thread_id)
            .await?
            .unwrap_or_default();
        let prior_len = state.messages.len();

        // Fresh scratch fields for this run; history is carried over.
        state.suggested_word = None;
        state.haiku = None;
        state.result = None;
        state.messages.push(ChatMessage::human(message));

        debug!(thread_id, prior_messages = prior_len, "pipeline run starting");

        if let Err(e) = self.run_steps(&mut state).await {
            warn!(thread_id, error = %e, "pipeline run aborted, checkpoint unchanged");
            return Err(e);
        }

        self.checkpoints.save(thread_id, &state).await?;

        let response = state
            .messages
            .last()
            .map(|m| m.content.clone())
            .unwrap_or_default();

        info!(
            thread_id,
            messages = state.messages.len(),
            "pipeline run complete"
        );
        Ok(response)
    }

    async fn run_steps(&self, state: &mut PipelineState) -> FlowResult<()> {
        steps::find_word(state, self.completion.as_ref()).await?;
        steps::create_haiku(state, self.completion.as_ref()).await?;
        steps::format_response(state);
        Ok(())
    }
}
