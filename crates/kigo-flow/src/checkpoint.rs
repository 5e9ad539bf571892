//! Checkpoint storage
//!
//! One checkpoint per thread id, overwrite semantics. The trait is the seam
//! for persistent backends; the in-memory implementation is the default and
//! keeps state indefinitely.

use async_trait::async_trait;
use dashmap::DashMap;
use thiserror::Error;

use crate::state::PipelineState;

/// Checkpoint storage errors
#[derive(Error, Debug)]
pub enum CheckpointError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("checkpoint error: {0}")]
    Other(String),
}

pub type CheckpointResult<T> = Result<T, CheckpointError>;

/// Persists pipeline state keyed by thread id.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Load the checkpoint for a thread, if one exists.
    async fn load(&self, thread_id: &str) -> CheckpointResult<Option<PipelineState>>;

    /// Save the checkpoint for a thread, replacing any previous one.
    async fn save(&self, thread_id: &str, state: &PipelineState) -> CheckpointResult<()>;
}

/// In-memory checkpoint store.
#[derive(Debug, Default)]
pub struct MemoryCheckpointer {
    checkpoints: DashMap<String, PipelineState>,
}

impl MemoryCheckpointer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored checkpoints
    pub fn len(&self) -> usize {
        self.checkpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checkpoints.is_empty()
    }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointer {
    async fn load(&self, thread_id: &str) -> CheckpointResult<Option<PipelineState>> {
        Ok(self.checkpoints.get(thread_id).map(|entry| entry.clone()))
    }

    async fn save(&self, thread_id: &str, state: &PipelineState) -> CheckpointResult<()> {
        self.checkpoints.insert(thread_id.to_string(), state.clone());
        Ok(())
    }
}
