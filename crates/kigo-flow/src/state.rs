//! Pipeline state

use serde::{Deserialize, Serialize};

use kigo_core::ChatMessage;

/// Shared mutable state the pipeline steps operate on.
///
/// `messages` is append-only: steps add entries but never remove or replace
/// prior ones. The remaining fields are scratch values a single run fills in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineState {
    /// Accumulated conversation, oldest first
    pub messages: Vec<ChatMessage>,
    /// Word chosen by the `find_word` step
    pub suggested_word: Option<String>,
    /// Working output of the `create_haiku` step
    pub haiku: Option<String>,
    /// Final formatted response of the run
    pub result: Option<String>,
}

impl PipelineState {
    /// Concatenate all message contents in original order, one per line.
    ///
    /// Both completion prompts are built over this view of the history.
    pub fn joined_contents(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
