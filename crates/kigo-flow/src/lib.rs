//! # Kigo Flow
//!
//! The haiku generation pipeline: a fixed three-step sequence over shared
//! pipeline state, checkpointed by thread id so a conversation can be
//! resumed across invocations.
//!
//! Steps run strictly in order: `find_word`, then `create_haiku`, then
//! `format_response`. Each is a data transform over [`PipelineState`] with
//! at most one await point on the completion service. The checkpoint store only
//! ever sees the state of a fully-completed run.

pub mod checkpoint;
pub mod error;
pub mod flow;
pub mod state;
pub mod steps;

pub use checkpoint::{CheckpointError, CheckpointResult, CheckpointStore, MemoryCheckpointer};
pub use error::{FlowError, FlowResult};
pub use flow::HaikuFlow;
pub use state::PipelineState;
