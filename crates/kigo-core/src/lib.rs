pub mod error;
pub mod identity;
pub mod message;
pub mod protocol;

pub use error::{ErrorFrame, GatewayError, Result};
pub use identity::{Role, SessionMetadata};
pub use message::{ChatMessage, MessageRole};
pub use protocol::Envelope;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
