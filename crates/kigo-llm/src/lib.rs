//! # Kigo LLM
//!
//! The gateway's view of the external text-completion capability: an async,
//! fallible `CompletionService` trait, plus the Anthropic Messages API
//! provider used in production.

pub mod anthropic;
pub mod error;
pub mod service;

pub use anthropic::AnthropicProvider;
pub use error::{CompletionError, Result};
pub use service::CompletionService;
