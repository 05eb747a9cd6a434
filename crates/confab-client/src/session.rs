// ABOUTME: Turn submission pipeline tying conversation, connection, and backend together
// ABOUTME: One outstanding round trip at a time; every outcome lands in the timeline

use crate::api::{Backend, WireTurn};
use crate::connection::{ConnectionManager, ConnectionState};
use crate::error::ClientError;
use crate::timeline::Conversation;
use crate::types::{ToolDescriptor, Turn};
use std::sync::Arc;

/// A live chat session against one backend.
///
/// Owns the conversation timeline, the connection state, and the
/// single-outstanding-submission rule. Mutated by exactly one owner; the
/// UI reads it through snapshots.
///
/// The backend is stateful and owns conversation history: each submit
/// sends only the new utterance, never the prior turns. This is a
/// contract, not an optimization — resending history would silently
/// change what the backend feeds its model.
pub struct ChatSession {
    backend: Arc<dyn Backend>,
    connection: ConnectionManager,
    conversation: Conversation,
    in_flight: bool,
}

impl ChatSession {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self {
            backend,
            connection: ConnectionManager::new(),
            conversation: Conversation::new(),
            in_flight: false,
        }
    }

    /// Establish (or re-establish) the backend session. See
    /// [`ConnectionManager::connect`] for the state machine.
    pub async fn connect(&mut self) -> Result<(), ClientError> {
        self.connection.connect(self.backend.as_ref()).await
    }

    /// Re-fetch the tool snapshot; rejected while disconnected.
    pub async fn refresh_tools(&mut self) -> Result<usize, ClientError> {
        self.connection.refresh_tools(self.backend.as_ref()).await
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        self.connection.tools()
    }

    /// Current timeline, oldest first
    pub fn timeline(&self) -> &[Turn] {
        self.conversation.snapshot()
    }

    /// Whether a submission round trip is outstanding
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Submit one user utterance; exactly one backend round trip, no retry.
    ///
    /// Preconditions are rejected with an error, perform no network call,
    /// and leave the timeline untouched: the text must be non-empty after
    /// trimming, the session must be connected, and no prior submission
    /// may still be outstanding.
    ///
    /// Backend failures are not errors to the caller: they land in the
    /// timeline as a synthetic failed turn, submit returns `Ok`, and the
    /// pipeline accepts the next call. On every outcome no turn remains
    /// pending.
    pub async fn submit(&mut self, user_text: &str) -> Result<(), ClientError> {
        let text = user_text.trim();
        if text.is_empty() {
            return Err(ClientError::EmptyMessage);
        }
        if self.connection.state() != ConnectionState::Connected {
            return Err(ClientError::NotConnected);
        }
        if self.in_flight {
            return Err(ClientError::SubmissionInFlight);
        }

        self.in_flight = true;
        self.conversation.append(Turn::pending_user(text));

        let outcome = self.backend.send_chat(text).await;
        self.resolve(outcome);

        self.in_flight = false;
        Ok(())
    }

    /// Fold the round-trip outcome into the timeline.
    ///
    /// The pending user turn is always committed in place first, so no
    /// path can leave the timeline ending on a pending turn. The backend's
    /// batch is the authoritative record of the exchange and is appended
    /// whole, in order — even if it echoes the user turn.
    fn resolve(&mut self, outcome: Result<Vec<WireTurn>, ClientError>) {
        if self.conversation.has_pending() {
            let committed = self
                .conversation
                .snapshot()
                .last()
                .cloned()
                .map(Turn::into_committed);
            if let Some(turn) = committed {
                self.conversation.replace_last(turn);
            }
        }

        match outcome {
            Ok(batch) if batch.is_empty() => {
                tracing::debug!("backend returned an empty turn batch");
                self.conversation.append(Turn::no_response());
            }
            Ok(batch) => {
                for wire in batch {
                    self.conversation
                        .append(Turn::committed(wire.role, wire.content, wire.tool_calls));
                }
            }
            Err(e) => {
                tracing::warn!("chat submission failed: {}", e);
                self.conversation.append(Turn::failure_notice());
            }
        }
    }
}
