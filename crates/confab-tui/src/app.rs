// ABOUTME: Central application state and key handling for the confab TUI
// ABOUTME: Mutations happen in handle_* methods; async work is returned as Actions

use crate::worker::Update;
use confab_client::{ConnectionState, ToolDescriptor, Turn};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::{Duration, Instant};

const MAX_HISTORY: usize = 100;

/// Actions that need async handling (returned from handle_key)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    Submit(String),
    Reconnect,
    RefreshTools,
}

/// Central application state
pub struct App {
    // Connection
    pub connection: ConnectionState,
    pub busy: bool,

    // Conversation state (snapshot published by the worker, plus a local
    // optimistic echo while a submission is in flight)
    pub timeline: Vec<Turn>,
    pub tools: Vec<ToolDescriptor>,

    // Input state
    pub input: String,
    pub input_history: Vec<String>,
    pub history_index: Option<usize>,

    // Viewport
    pub scroll: u16,

    // Status bar
    pub status: String,

    // Quit handling
    pub should_quit: bool,
    pub last_ctrl_c: Option<Instant>,

    // Throbber animation frame
    pub throbber_frame: usize,
}

impl App {
    pub fn new() -> Self {
        Self {
            connection: ConnectionState::Disconnected,
            busy: false,
            timeline: vec![],
            tools: vec![],
            input: String::new(),
            input_history: vec![],
            history_index: None,
            scroll: 0,
            status: "Connecting...".to_string(),
            should_quit: false,
            last_ctrl_c: None,
            throbber_frame: 0,
        }
    }

    /// Advance throbber animation
    pub fn tick(&mut self) {
        self.throbber_frame = (self.throbber_frame + 1) % 8;
    }

    /// Get current throbber character
    pub fn throbber_char(&self) -> char {
        const THROBBER: [char; 8] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧'];
        THROBBER[self.throbber_frame]
    }

    /// Check if the Ctrl+C hint should be shown
    pub fn show_ctrl_c_hint(&self) -> bool {
        self.last_ctrl_c
            .map(|t| t.elapsed() < Duration::from_millis(500))
            .unwrap_or(false)
    }

    /// Handle a key event, returning an action if needed
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<Action> {
        match key.code {
            KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(Action::Quit);
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(last) = self.last_ctrl_c {
                    if last.elapsed() < Duration::from_millis(500) {
                        return Some(Action::Quit);
                    }
                }
                self.last_ctrl_c = Some(Instant::now());
                return None;
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(Action::Reconnect);
            }
            KeyCode::Char('t') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(Action::RefreshTools);
            }

            // Scroll
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_add(5);
            }
            KeyCode::PageDown => {
                self.scroll = self.scroll.saturating_sub(5);
            }

            // History navigation (when input is empty)
            KeyCode::Up if self.input.is_empty() || self.history_index.is_some() => {
                self.navigate_history(-1);
            }
            KeyCode::Down if self.history_index.is_some() => {
                self.navigate_history(1);
            }

            KeyCode::Enter => {
                return self.take_submission();
            }
            KeyCode::Backspace => {
                self.input.pop();
                self.history_index = None;
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                self.history_index = None;
            }
            _ => {}
        }
        None
    }

    /// Turn the compose buffer into a submission, if preconditions hold.
    /// Also pushes a local optimistic echo so the turn is visible while
    /// the round trip is in flight; the worker's next timeline snapshot
    /// replaces it with the authoritative record.
    fn take_submission(&mut self) -> Option<Action> {
        let content = self.input.trim().to_string();
        if content.is_empty() {
            return None;
        }
        if self.connection != ConnectionState::Connected {
            self.status = "Not connected — Ctrl+R to reconnect".to_string();
            return None;
        }
        if self.busy {
            self.status = "Still waiting for the agent...".to_string();
            return None;
        }

        self.input.clear();
        self.history_index = None;
        self.input_history.push(content.clone());
        if self.input_history.len() > MAX_HISTORY {
            self.input_history.remove(0);
        }
        self.busy = true;
        self.scroll = 0;
        self.timeline.push(Turn::pending_user(content.clone()));
        self.status = "Sending...".to_string();
        Some(Action::Submit(content))
    }

    fn navigate_history(&mut self, direction: i32) {
        if self.input_history.is_empty() {
            return;
        }

        let new_index = match self.history_index {
            None if direction < 0 => Some(self.input_history.len() - 1),
            None => None,
            Some(i) => {
                let new = i as i32 + direction;
                if new < 0 || new >= self.input_history.len() as i32 {
                    None
                } else {
                    Some(new as usize)
                }
            }
        };

        self.history_index = new_index;
        self.input = match new_index {
            Some(i) => self.input_history[i].clone(),
            None => String::new(),
        };
    }

    /// Fold a worker update into the UI state
    pub fn handle_update(&mut self, update: Update) {
        match update {
            Update::Connection(state) => {
                self.connection = state;
                self.status = match state {
                    ConnectionState::Disconnected => {
                        "Disconnected — Ctrl+R to reconnect".to_string()
                    }
                    ConnectionState::Connecting => "Connecting...".to_string(),
                    ConnectionState::Connected => "Connected".to_string(),
                };
            }
            Update::Timeline(turns) => {
                self.timeline = turns;
                self.scroll = 0;
            }
            Update::Tools(tools) => {
                self.tools = tools;
            }
            Update::Busy(busy) => {
                self.busy = busy;
            }
            Update::Notice(text) => {
                self.status = text;
            }
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
