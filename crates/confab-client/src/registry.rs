// ABOUTME: Tool registry client and snapshot cache
// ABOUTME: Fetches the backend's tool list; replaces wholesale, retains on failure

use crate::api::Backend;
use crate::error::ClientError;
use crate::types::ToolDescriptor;

/// Cache of the tools the backend currently exposes.
///
/// Holds the latest snapshot only, no history. A successful load replaces
/// the snapshot atomically; a failed load leaves the previous snapshot
/// (possibly empty) in place. Registry failures are independent of
/// connectivity and never change connection state.
#[derive(Debug, Default)]
pub struct ToolRegistry {
    tools: Vec<ToolDescriptor>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch the tool list from the backend and replace the snapshot.
    /// Returns the new tool count. No retry policy; callers may re-invoke.
    pub async fn load(&mut self, backend: &dyn Backend) -> Result<usize, ClientError> {
        let tools = backend.list_tools().await?;
        tracing::debug!(tool_count = tools.len(), "tool registry refreshed");
        self.tools = tools;
        Ok(self.tools.len())
    }

    /// Latest snapshot; empty before the first successful load
    pub fn snapshot(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
