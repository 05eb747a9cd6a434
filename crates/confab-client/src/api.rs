// ABOUTME: HTTP boundary to the agent backend
// ABOUTME: Backend trait, reqwest implementation, and wire-format types

use crate::error::ClientError;
use crate::types::{Role, ToolDescriptor, ToolInvocation};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default bound on each backend round trip. Expiry is treated the same as
/// any other transport failure.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// One turn as the backend serializes it in a `/chat` response batch.
/// Missing `content` and `tool_calls` default to empty; unknown fields
/// are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct WireTurn {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tool_calls: Vec<ToolInvocation>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    messages: Vec<WireTurn>,
}

#[derive(Deserialize)]
struct ToolsResponse {
    tools: Vec<ToolDescriptor>,
}

/// The three operations the backend exposes. Trait seam so the
/// orchestration layer can be exercised against a scripted double.
#[async_trait]
pub trait Backend: Send + Sync {
    /// `POST /connect` — establish a session with the backend.
    async fn connect(&self) -> Result<(), ClientError>;

    /// `GET /tools` — list the tools the backend currently exposes.
    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ClientError>;

    /// `POST /chat` — submit one user utterance and receive the ordered
    /// batch of turns the backend recorded for this exchange.
    ///
    /// The utterance is the sole payload. The backend is stateful and
    /// recalls prior turns itself; the client never resends history.
    async fn send_chat(&self, query: &str) -> Result<Vec<WireTurn>, ClientError>;
}

/// reqwest-backed implementation speaking JSON to a configured base URL
#[derive(Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: url::Url,
}

impl HttpBackend {
    /// Create a backend client with the default request timeout.
    ///
    /// `base_url` is the backend's base URL (e.g. "http://localhost:8000").
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Connection(format!("failed to build HTTP client: {}", e)))?;

        // Trailing slash so Url::join treats the base path as a directory.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        let base_url = url::Url::parse(&normalized)
            .map_err(|e| ClientError::Connection(format!("invalid backend URL {}: {}", base_url, e)))?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> Result<url::Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Api(format!("invalid endpoint {}: {}", path, e)))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn connect(&self) -> Result<(), ClientError> {
        self.client
            .post(self.endpoint("connect")?)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ClientError> {
        let body: ToolsResponse = self
            .client
            .get(self.endpoint("tools")?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.tools)
    }

    async fn send_chat(&self, query: &str) -> Result<Vec<WireTurn>, ClientError> {
        let body: ChatResponse = self
            .client
            .post(self.endpoint("chat")?)
            .json(&ChatRequest { query })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(body.messages)
    }
}
