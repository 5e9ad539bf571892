use thiserror::Error;

use kigo_llm::CompletionError;

use crate::checkpoint::CheckpointError;

/// Pipeline errors
#[derive(Error, Debug)]
pub enum FlowError {
    /// The completion service failed or timed out during a step. The run
    /// was aborted and no partial state was persisted.
    #[error("generation failed: {0}")]
    Generation(#[from] CompletionError),

    #[error("checkpoint store error: {0}")]
    Checkpoint(#[from] CheckpointError),
}

pub type FlowResult<T> = Result<T, FlowError>;
