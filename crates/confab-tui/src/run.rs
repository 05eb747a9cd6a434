// ABOUTME: Terminal lifecycle and main event loop for the confab TUI
// ABOUTME: Wires the backend, session worker, input task, and renderer together

use crate::app::{Action, App};
use crate::config::Config;
use crate::view;
use crate::worker::{run_worker, Command, Update};
use anyhow::{Context, Result};
use confab_client::{ChatSession, HttpBackend};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let terminal = Terminal::new(CrosstermBackend::new(stdout))
        .context("Failed to create terminal")?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

// Used by the panic hook, where no Terminal handle is available
fn restore_terminal_basic() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Forward crossterm events to the async loop. Polling happens on a
/// blocking task; the loop itself never blocks on stdin.
fn spawn_input_task() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel(32);
    tokio::task::spawn_blocking(move || loop {
        if event::poll(Duration::from_millis(100)).unwrap_or(false) {
            if let Ok(ev) = event::read() {
                if tx.blocking_send(ev).is_err() {
                    break;
                }
            }
        } else if tx.is_closed() {
            break;
        }
    });
    rx
}

/// Run the TUI against the configured backend until the user quits
pub async fn run(config: Config) -> Result<()> {
    let backend = HttpBackend::with_timeout(
        &config.backend_url,
        Duration::from_secs(config.timeout_secs),
    )
    .with_context(|| format!("Invalid backend URL: {}", config.backend_url))?;
    let session = ChatSession::new(Arc::new(backend));

    let (command_tx, command_rx) = mpsc::channel::<Command>(32);
    let (update_tx, update_rx) = mpsc::channel::<Update>(64);
    let worker = tokio::spawn(run_worker(session, command_rx, update_tx));

    // Connect as soon as the loop starts
    command_tx
        .send(Command::Connect)
        .await
        .context("Session worker exited before startup")?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_terminal_basic();
        original_hook(info);
    }));

    let mut terminal = setup_terminal()?;
    let result = main_loop(&mut terminal, command_tx, update_rx).await;
    restore_terminal(&mut terminal)?;

    worker.abort();
    result
}

async fn main_loop(
    terminal: &mut Tui,
    commands: mpsc::Sender<Command>,
    mut updates: mpsc::Receiver<Update>,
) -> Result<()> {
    let mut app = App::new();
    let mut input = spawn_input_task();
    let mut tick = tokio::time::interval(Duration::from_millis(100));

    loop {
        terminal
            .draw(|frame| view::render(frame, &app))
            .context("Failed to draw frame")?;

        tokio::select! {
            Some(event) = input.recv() => {
                if let Event::Key(key) = event {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match app.handle_key(key) {
                        Some(Action::Quit) => {
                            app.should_quit = true;
                        }
                        Some(Action::Submit(text)) => {
                            commands.send(Command::Submit(text)).await
                                .context("Session worker exited")?;
                        }
                        Some(Action::Reconnect) => {
                            commands.send(Command::Connect).await
                                .context("Session worker exited")?;
                        }
                        Some(Action::RefreshTools) => {
                            commands.send(Command::RefreshTools).await
                                .context("Session worker exited")?;
                        }
                        None => {}
                    }
                }
            }
            Some(update) = updates.recv() => {
                app.handle_update(update);
            }
            _ = tick.tick() => {
                if app.busy {
                    app.tick();
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
