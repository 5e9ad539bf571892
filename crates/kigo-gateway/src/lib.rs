//! # Kigo Gateway
//!
//! Real-time WebSocket gateway: connections are authenticated with a bearer
//! JWT before the transport upgrade, inbound `{type, payload}` envelopes are
//! validated and dispatched to registered handlers, and the `haiku` handler
//! runs the checkpointed generation pipeline from `kigo-flow`.

pub mod auth;
pub mod connection;
pub mod handlers;
pub mod logging;
pub mod registry;
pub mod server;

pub use auth::{Claims, IdentityVerifier, JwtVerifier};
pub use registry::{HandlerContext, HandlerRegistry, MessageHandler};
pub use server::{build_app, run_server, GatewayState};
