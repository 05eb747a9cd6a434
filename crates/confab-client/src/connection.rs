// ABOUTME: Connection lifecycle management for the backend session
// ABOUTME: Tri-state machine driving the handshake and the post-connect tool load

use crate::api::Backend;
use crate::error::ClientError;
use crate::registry::ToolRegistry;
use crate::types::ToolDescriptor;
use std::fmt;

/// Readiness of the session with the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => write!(f, "disconnected"),
            Self::Connecting => write!(f, "connecting"),
            Self::Connected => write!(f, "connected"),
        }
    }
}

/// Owns the connection state and the tool registry snapshot.
///
/// Transitions: `Disconnected → Connecting → {Connected, Disconnected}`.
/// All transitions are driven by [`ConnectionManager::connect`]; there is
/// no automatic reconnection loop. Connection state is the single gate for
/// whether the submission pipeline accepts input.
pub struct ConnectionManager {
    state: ConnectionState,
    registry: ToolRegistry,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            registry: ToolRegistry::new(),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Latest tool snapshot; empty before the first successful load
    pub fn tools(&self) -> &[ToolDescriptor] {
        self.registry.snapshot()
    }

    /// Perform the handshake against the backend.
    ///
    /// Valid from `Disconnected` or `Connected` (re-connect is idempotent);
    /// rejected while a connect is already in flight. On success the state
    /// becomes `Connected` and exactly one best-effort tool registry load
    /// is triggered — a registry failure is logged and does not revert the
    /// connection state. On handshake failure the state becomes
    /// `Disconnected` and the error is returned.
    pub async fn connect(&mut self, backend: &dyn Backend) -> Result<(), ClientError> {
        if self.state == ConnectionState::Connecting {
            return Err(ClientError::ConnectInProgress);
        }

        self.state = ConnectionState::Connecting;
        if let Err(e) = backend.connect().await {
            self.state = ConnectionState::Disconnected;
            tracing::warn!("backend handshake failed: {}", e);
            return Err(e);
        }
        self.state = ConnectionState::Connected;
        tracing::info!("connected to backend");

        // Registry failures are independent of connectivity.
        match self.registry.load(backend).await {
            Ok(count) => tracing::info!(tool_count = count, "loaded backend tools"),
            Err(e) => tracing::warn!("tool registry load failed: {}", e),
        }

        Ok(())
    }

    /// Re-fetch the tool snapshot outside the connect flow. Rejected while
    /// disconnected; a failed refresh retains the previous snapshot.
    pub async fn refresh_tools(&mut self, backend: &dyn Backend) -> Result<usize, ClientError> {
        if self.state == ConnectionState::Disconnected {
            return Err(ClientError::NotConnected);
        }
        self.registry.load(backend).await
    }
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{descriptor, FakeBackend};
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_initial_state_disconnected() {
        let manager = ConnectionManager::new();
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert!(!manager.is_connected());
        assert!(manager.tools().is_empty());
    }

    #[tokio::test]
    async fn test_connect_success_loads_tools_once() {
        let backend = FakeBackend::new();
        backend.set_tools(vec![descriptor("search")]);

        let mut manager = ConnectionManager::new();
        manager.connect(&backend).await.unwrap();

        assert_eq!(manager.state(), ConnectionState::Connected);
        assert_eq!(manager.tools().len(), 1);
        assert_eq!(backend.connect_calls(), 1);
        assert_eq!(backend.tools_calls(), 1);
    }

    #[tokio::test]
    async fn test_connect_failure_returns_to_disconnected() {
        let backend = FakeBackend::new();
        backend.fail_connect.store(true, Ordering::Relaxed);

        let mut manager = ConnectionManager::new();
        let err = manager.connect(&backend).await.unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        // No tool load is attempted when the handshake fails.
        assert_eq!(backend.tools_calls(), 0);
    }

    #[tokio::test]
    async fn test_registry_failure_does_not_revert_connection() {
        let backend = FakeBackend::new();
        backend.fail_tools.store(true, Ordering::Relaxed);

        let mut manager = ConnectionManager::new();
        manager.connect(&backend).await.unwrap();
        assert_eq!(manager.state(), ConnectionState::Connected);
        assert!(manager.tools().is_empty());
    }

    #[tokio::test]
    async fn test_reconnect_from_connected_is_allowed() {
        let backend = FakeBackend::new();
        let mut manager = ConnectionManager::new();

        manager.connect(&backend).await.unwrap();
        manager.connect(&backend).await.unwrap();

        assert_eq!(manager.state(), ConnectionState::Connected);
        assert_eq!(backend.connect_calls(), 2);
    }

    #[tokio::test]
    async fn test_reconnect_after_failure_is_allowed() {
        let backend = FakeBackend::new();
        backend.fail_connect.store(true, Ordering::Relaxed);

        let mut manager = ConnectionManager::new();
        assert!(manager.connect(&backend).await.is_err());

        backend.fail_connect.store(false, Ordering::Relaxed);
        manager.connect(&backend).await.unwrap();
        assert_eq!(manager.state(), ConnectionState::Connected);
    }

    #[tokio::test]
    async fn test_refresh_tools_rejected_while_disconnected() {
        let backend = FakeBackend::new();
        let mut manager = ConnectionManager::new();

        let err = manager.refresh_tools(&backend).await.unwrap_err();
        assert!(matches!(err, ClientError::NotConnected));
        assert_eq!(backend.tools_calls(), 0);
    }

    #[tokio::test]
    async fn test_refresh_tools_replaces_snapshot() {
        let backend = FakeBackend::new();
        backend.set_tools(vec![descriptor("a")]);

        let mut manager = ConnectionManager::new();
        manager.connect(&backend).await.unwrap();

        backend.set_tools(vec![descriptor("b"), descriptor("c")]);
        let count = manager.refresh_tools(&backend).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(manager.tools()[0].name, "b");
    }

    #[test]
    fn test_connection_state_display() {
        assert_eq!(format!("{}", ConnectionState::Disconnected), "disconnected");
        assert_eq!(format!("{}", ConnectionState::Connecting), "connecting");
        assert_eq!(format!("{}", ConnectionState::Connected), "connected");
    }
}
