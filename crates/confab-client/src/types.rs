// ABOUTME: Core conversation types for confab
// ABOUTME: Turn, TurnId, Role, TurnStatus, ToolInvocation, and ToolDescriptor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Fixed content of the synthetic turn appended when a submission fails.
pub const PROCESSING_ERROR_TEXT: &str =
    "Something went wrong while processing your message. Please try again.";

/// Fixed content of the synthetic turn appended when the backend returns an
/// empty batch, so the timeline never ends on a dangling pending turn.
pub const NO_RESPONSE_TEXT: &str = "No response received from the agent.";

/// Role of a turn's author.
///
/// The backend treats roles as an open set: it may introduce roles this
/// client has never seen. Unknown strings are preserved in `Other` and
/// rendered assistant-like rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
    Other(String),
}

impl Role {
    pub fn is_user(&self) -> bool {
        matches!(self, Role::User)
    }

    /// The raw wire string for this role.
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Other(s) => s,
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            _ => Role::Other(s),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a turn in the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStatus {
    /// Just-submitted user turn, between send and response
    Pending,
    /// Settled turn, part of the permanent timeline
    Committed,
    /// Synthetic client-generated error turn
    Failed,
}

/// A completed record of one external tool call, as reported by the backend.
/// This client never observes an in-flight call; the record is immutable
/// once attached to a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool_name: String,
    #[serde(default)]
    pub arguments: serde_json::Value,
    #[serde(default)]
    pub result: serde_json::Value,
}

/// Metadata describing a tool the backend can invoke
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub input_schema: serde_json::Value,
}

static TURN_SEQ: AtomicU64 = AtomicU64::new(0);

/// Opaque, unique, monotonically orderable turn identifier.
///
/// Derived from creation time with a process-wide counter suffix, so two
/// turns created in the same millisecond never collide. Uniqueness is what
/// matters (rendering keys, the single-pending invariant); append order
/// remains the ordering authority.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TurnId(String);

impl TurnId {
    pub fn generate() -> Self {
        let seq = TURN_SEQ.fetch_add(1, Ordering::Relaxed);
        Self(format!("{:013}-{:08}", Utc::now().timestamp_millis(), seq))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TurnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One atomic entry in the conversation timeline
#[derive(Debug, Clone)]
pub struct Turn {
    pub id: TurnId,
    pub role: Role,
    /// Display text; may be empty when the turn carries only tool calls
    pub content: String,
    /// Tool invocations in backend execution/display order
    pub tool_calls: Vec<ToolInvocation>,
    /// Assigned client-side at creation. Display only; never an ordering signal.
    pub created_at: DateTime<Utc>,
    pub status: TurnStatus,
}

impl Turn {
    fn new(role: Role, content: String, tool_calls: Vec<ToolInvocation>, status: TurnStatus) -> Self {
        Self {
            id: TurnId::generate(),
            role,
            content,
            tool_calls,
            created_at: Utc::now(),
            status,
        }
    }

    /// Optimistic user turn appended at submit time, before the backend replies
    pub fn pending_user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), vec![], TurnStatus::Pending)
    }

    /// Committed turn built from one entry of a backend response batch
    pub fn committed(role: Role, content: String, tool_calls: Vec<ToolInvocation>) -> Self {
        Self::new(role, content, tool_calls, TurnStatus::Committed)
    }

    /// Synthetic committed assistant turn standing in for an empty batch
    pub fn no_response() -> Self {
        Self::new(
            Role::Assistant,
            NO_RESPONSE_TEXT.to_string(),
            vec![],
            TurnStatus::Committed,
        )
    }

    /// Synthetic failed assistant turn standing in for a submission error
    pub fn failure_notice() -> Self {
        Self::new(
            Role::Assistant,
            PROCESSING_ERROR_TEXT.to_string(),
            vec![],
            TurnStatus::Failed,
        )
    }

    /// The same turn with its status moved to `Committed`
    pub fn into_committed(self) -> Self {
        Self {
            status: TurnStatus::Committed,
            ..self
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == TurnStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_known_strings() {
        assert_eq!(Role::from("user".to_string()), Role::User);
        assert_eq!(Role::from("assistant".to_string()), Role::Assistant);
    }

    #[test]
    fn test_role_unknown_passthrough() {
        let role = Role::from("tool".to_string());
        assert_eq!(role, Role::Other("tool".to_string()));
        assert_eq!(role.as_str(), "tool");
        assert!(!role.is_user());
    }

    #[test]
    fn test_role_serde_round_trip() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");

        let role: Role = serde_json::from_str("\"moderator\"").unwrap();
        assert_eq!(role, Role::Other("moderator".to_string()));
        assert_eq!(serde_json::to_string(&role).unwrap(), "\"moderator\"");
    }

    #[test]
    fn test_turn_id_unique() {
        let a = TurnId::generate();
        let b = TurnId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_turn_id_monotonic() {
        let ids: Vec<TurnId> = (0..100).map(|_| TurnId::generate()).collect();
        for pair in ids.windows(2) {
            assert!(pair[0] < pair[1], "{} should sort before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_pending_user_turn() {
        let turn = Turn::pending_user("hello");
        assert_eq!(turn.role, Role::User);
        assert_eq!(turn.content, "hello");
        assert_eq!(turn.status, TurnStatus::Pending);
        assert!(turn.tool_calls.is_empty());
        assert!(turn.is_pending());
    }

    #[test]
    fn test_into_committed_keeps_identity() {
        let turn = Turn::pending_user("hi");
        let id = turn.id.clone();
        let committed = turn.into_committed();
        assert_eq!(committed.id, id);
        assert_eq!(committed.status, TurnStatus::Committed);
        assert_eq!(committed.content, "hi");
    }

    #[test]
    fn test_no_response_turn() {
        let turn = Turn::no_response();
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.content, NO_RESPONSE_TEXT);
        assert_eq!(turn.status, TurnStatus::Committed);
    }

    #[test]
    fn test_failure_notice_turn() {
        let turn = Turn::failure_notice();
        assert_eq!(turn.role, Role::Assistant);
        assert_eq!(turn.content, PROCESSING_ERROR_TEXT);
        assert_eq!(turn.status, TurnStatus::Failed);
    }

    #[test]
    fn test_tool_invocation_serde_round_trip() {
        let json = r#"{"tool_name":"search","arguments":{"q":"x"},"result":"y"}"#;
        let inv: ToolInvocation = serde_json::from_str(json).unwrap();
        assert_eq!(inv.tool_name, "search");
        assert_eq!(inv.arguments, serde_json::json!({"q": "x"}));
        assert_eq!(inv.result, serde_json::json!("y"));

        let back: serde_json::Value = serde_json::to_value(&inv).unwrap();
        assert_eq!(back, serde_json::from_str::<serde_json::Value>(json).unwrap());
    }

    #[test]
    fn test_tool_descriptor_camel_case_wire_form() {
        let json = r#"{"name":"search","description":"Search the web","inputSchema":{"type":"object"}}"#;
        let tool: ToolDescriptor = serde_json::from_str(json).unwrap();
        assert_eq!(tool.name, "search");
        assert_eq!(tool.input_schema, serde_json::json!({"type": "object"}));

        let out = serde_json::to_string(&tool).unwrap();
        assert!(out.contains("inputSchema"));
    }

    #[test]
    fn test_tool_descriptor_missing_optional_fields() {
        let tool: ToolDescriptor = serde_json::from_str(r#"{"name":"ping"}"#).unwrap();
        assert_eq!(tool.name, "ping");
        assert!(tool.description.is_empty());
        assert_eq!(tool.input_schema, serde_json::Value::Null);
    }
}
