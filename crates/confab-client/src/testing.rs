// ABOUTME: Test doubles for the backend boundary
// ABOUTME: Scripted FakeBackend with per-operation call counters

use crate::api::{Backend, WireTurn};
use crate::error::ClientError;
use crate::types::{Role, ToolDescriptor, ToolInvocation};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// Scripted backend double. Operations fail when the matching `fail_*`
/// flag is set; `/chat` pops batches from a queue (empty queue means an
/// empty batch). Every call is counted so tests can assert "no network
/// call happened".
#[derive(Default)]
pub struct FakeBackend {
    pub fail_connect: AtomicBool,
    pub fail_tools: AtomicBool,
    pub fail_chat: AtomicBool,
    pub tools: Mutex<Vec<ToolDescriptor>>,
    pub chat_batches: Mutex<VecDeque<Vec<WireTurn>>>,
    pub connect_calls: AtomicUsize,
    pub tools_calls: AtomicUsize,
    pub chat_calls: AtomicUsize,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_tools(&self, tools: Vec<ToolDescriptor>) {
        *self.tools.lock().unwrap() = tools;
    }

    pub fn script_chat(&self, batch: Vec<WireTurn>) {
        self.chat_batches.lock().unwrap().push_back(batch);
    }

    pub fn chat_calls(&self) -> usize {
        self.chat_calls.load(Ordering::Relaxed)
    }

    pub fn connect_calls(&self) -> usize {
        self.connect_calls.load(Ordering::Relaxed)
    }

    pub fn tools_calls(&self) -> usize {
        self.tools_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn connect(&self) -> Result<(), ClientError> {
        self.connect_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_connect.load(Ordering::Relaxed) {
            return Err(ClientError::Connection("scripted connect failure".into()));
        }
        Ok(())
    }

    async fn list_tools(&self) -> Result<Vec<ToolDescriptor>, ClientError> {
        self.tools_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_tools.load(Ordering::Relaxed) {
            return Err(ClientError::Api("scripted tools failure".into()));
        }
        Ok(self.tools.lock().unwrap().clone())
    }

    async fn send_chat(&self, _query: &str) -> Result<Vec<WireTurn>, ClientError> {
        self.chat_calls.fetch_add(1, Ordering::Relaxed);
        if self.fail_chat.load(Ordering::Relaxed) {
            return Err(ClientError::Connection("scripted chat failure".into()));
        }
        Ok(self.chat_batches.lock().unwrap().pop_front().unwrap_or_default())
    }
}

/// Assistant wire turn with plain text content
pub fn assistant_turn(content: &str) -> WireTurn {
    WireTurn {
        role: Role::Assistant,
        content: content.to_string(),
        tool_calls: vec![],
    }
}

/// Assistant wire turn carrying tool invocations
pub fn tool_turn(content: &str, tool_calls: Vec<ToolInvocation>) -> WireTurn {
    WireTurn {
        role: Role::Assistant,
        content: content.to_string(),
        tool_calls,
    }
}

/// Minimal tool descriptor for registry tests
pub fn descriptor(name: &str) -> ToolDescriptor {
    ToolDescriptor {
        name: name.to_string(),
        description: format!("{} tool", name),
        input_schema: serde_json::json!({"type": "object"}),
    }
}
