// ABOUTME: Append-only conversation timeline store
// ABOUTME: Enforces unique turn ids and the single-trailing-pending invariant

use crate::types::{Turn, TurnId};

/// Ordered, append-only sequence of turns. Single source of truth for what
/// is rendered; append order is the only ordering authority (timestamps on
/// turns are cosmetic).
///
/// The store performs no I/O and raises no errors of its own. Mutations
/// that would violate its invariants — duplicate turn ids, or a second
/// pending turn — are caller bugs and panic rather than being handled.
#[derive(Debug, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn to the end of the timeline.
    ///
    /// # Panics
    /// Panics if the turn's id already exists in the timeline, or if a
    /// pending turn is already present (only the newest turn may be pending).
    pub fn append(&mut self, turn: Turn) {
        assert!(
            !self.contains(&turn.id),
            "duplicate turn id {} appended to timeline",
            turn.id
        );
        assert!(
            !self.has_pending(),
            "cannot append while a pending turn is outstanding"
        );
        self.turns.push(turn);
    }

    /// Replace the last turn, keeping its position. Used only to move the
    /// pending user turn to a terminal status.
    ///
    /// # Panics
    /// Panics on an empty timeline, or if the replacement's id duplicates
    /// any turn other than the one being replaced.
    pub fn replace_last(&mut self, turn: Turn) {
        assert!(!self.turns.is_empty(), "replace_last on an empty timeline");
        let end = self.turns.len() - 1;
        assert!(
            self.turns[..end].iter().all(|t| t.id != turn.id),
            "duplicate turn id {} in replace_last",
            turn.id
        );
        self.turns[end] = turn;
    }

    /// Current timeline, oldest first
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    /// Cloned timeline, for handing across task boundaries
    pub fn to_vec(&self) -> Vec<Turn> {
        self.turns.clone()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Whether a submission's optimistic turn is still unresolved. Because
    /// a pending turn is only ever the last element, checking the tail is
    /// sufficient.
    pub fn has_pending(&self) -> bool {
        self.turns.last().map(Turn::is_pending).unwrap_or(false)
    }

    fn contains(&self, id: &TurnId) -> bool {
        self.turns.iter().any(|t| &t.id == id)
    }
}
