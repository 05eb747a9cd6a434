// ABOUTME: Core client library for confab
// ABOUTME: Conversation timeline, connection lifecycle, tool registry, and submission pipeline

pub mod api;
pub mod connection;
pub mod error;
pub mod registry;
pub mod session;
pub mod timeline;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{Backend, HttpBackend, WireTurn};
pub use connection::{ConnectionManager, ConnectionState};
pub use error::ClientError;
pub use registry::ToolRegistry;
pub use session::ChatSession;
pub use timeline::Conversation;
pub use types::{Role, ToolDescriptor, ToolInvocation, Turn, TurnId, TurnStatus};
