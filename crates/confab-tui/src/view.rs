// ABOUTME: Ratatui rendering for the confab TUI
// ABOUTME: Pure functions from App state to widgets; no mutation here

use crate::app::App;
use confab_client::{ConnectionState, Role, ToolInvocation, Turn, TurnStatus};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

const SNIPPET_LEN: usize = 60;

/// Render the full UI
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Min(3),    // Conversation
            Constraint::Length(3), // Input
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);
    render_conversation(frame, app, chunks[1]);
    render_input(frame, app, chunks[2]);
    render_status(frame, app, chunks[3]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let (state_text, state_color) = match app.connection {
        ConnectionState::Connected => ("connected", Color::Green),
        ConnectionState::Connecting => ("connecting", Color::Yellow),
        ConnectionState::Disconnected => ("disconnected", Color::Red),
    };

    let line = Line::from(vec![
        Span::styled(" confab ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("· "),
        Span::styled(state_text, Style::default().fg(state_color)),
        Span::raw(format!(" · {} tools", app.tools.len())),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_conversation(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();
    for turn in &app.timeline {
        lines.extend(turn_lines(turn));
        lines.push(Line::raw(""));
    }

    if app.busy {
        lines.push(Line::from(vec![
            Span::styled(
                format!("{} ", app.throbber_char()),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled("thinking...", Style::default().fg(Color::DarkGray)),
        ]));
    }

    // Stick to the bottom unless the user scrolled up
    let inner_height = area.height.saturating_sub(2);
    let total = lines.len() as u16;
    let base = total.saturating_sub(inner_height);
    let offset = base.saturating_sub(app.scroll);

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" conversation "))
        .wrap(Wrap { trim: false })
        .scroll((offset, 0));
    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let title = if app.busy { " waiting " } else { " message " };
    let input = Paragraph::new(app.input.as_str())
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(input, area);

    if !app.busy {
        frame.set_cursor_position((area.x + 1 + app.input.len() as u16, area.y + 1));
    }
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let text = if app.show_ctrl_c_hint() {
        "Press Ctrl+C again to quit".to_string()
    } else {
        format!(
            " {}  ·  Enter send · Ctrl+R reconnect · Ctrl+T tools · Ctrl+C quit",
            app.status
        )
    };
    frame.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

/// Lines for one conversation turn
pub fn turn_lines(turn: &Turn) -> Vec<Line<'static>> {
    let (label, label_style) = role_label(&turn.role);

    let mut header_spans = vec![Span::styled(label, label_style)];
    match turn.status {
        TurnStatus::Pending => {
            header_spans.push(Span::styled(
                " (sending)",
                Style::default().fg(Color::DarkGray),
            ));
        }
        TurnStatus::Failed => {
            header_spans.push(Span::styled(" (failed)", Style::default().fg(Color::Red)));
        }
        TurnStatus::Committed => {}
    }

    let mut lines = vec![Line::from(header_spans)];
    let content_style = match turn.status {
        TurnStatus::Failed => Style::default().fg(Color::Red),
        TurnStatus::Pending => Style::default().fg(Color::Gray),
        TurnStatus::Committed => Style::default(),
    };
    for raw in turn.content.lines() {
        lines.push(Line::from(Span::styled(raw.to_string(), content_style)));
    }

    for call in &turn.tool_calls {
        lines.push(Line::from(Span::styled(
            format!("  ⚙ {}", tool_summary(call)),
            Style::default().fg(Color::Cyan),
        )));
    }

    lines
}

fn role_label(role: &Role) -> (String, Style) {
    match role {
        Role::User => (
            "you".to_string(),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ),
        Role::Assistant => (
            "agent".to_string(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Role::Other(name) => (
            name.clone(),
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
    }
}

/// One-line summary of a tool invocation: the tool name plus the most
/// recognizable argument, truncated for display
pub fn tool_summary(call: &ToolInvocation) -> String {
    let detail = ["command", "path", "file_path", "query", "url"]
        .iter()
        .find_map(|key| call.arguments.get(key))
        .map(value_snippet);

    match detail {
        Some(detail) if !detail.is_empty() => format!("{}: {}", call.tool_name, detail),
        _ => call.tool_name.clone(),
    }
}

fn value_snippet(value: &serde_json::Value) -> String {
    let text = match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let flat = text.replace('\n', " ");
    if flat.chars().count() > SNIPPET_LEN {
        let cut: String = flat.chars().take(SNIPPET_LEN).collect();
        format!("{}…", cut)
    } else {
        flat
    }
}
