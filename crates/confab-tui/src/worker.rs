// ABOUTME: Worker task that owns the chat session
// ABOUTME: Serializes connect and submit; publishes timeline snapshots to the UI

use confab_client::{ChatSession, ConnectionState, ToolDescriptor, Turn};
use tokio::sync::mpsc;

/// Commands from the UI to the session owner
#[derive(Debug, Clone)]
pub enum Command {
    /// Establish (or re-establish) the backend session
    Connect,
    /// Submit one user utterance
    Submit(String),
    /// Re-fetch the tool snapshot
    RefreshTools,
}

/// State published back to the UI after each command
#[derive(Debug, Clone)]
pub enum Update {
    Connection(ConnectionState),
    Timeline(Vec<Turn>),
    Tools(Vec<ToolDescriptor>),
    Busy(bool),
    Notice(String),
}

/// Run the session-owning loop. The session lives on this task only, so
/// all connection and timeline mutations are serialized here; the UI sees
/// cloned snapshots. Returns when the command channel closes.
pub async fn run_worker(
    mut session: ChatSession,
    mut commands: mpsc::Receiver<Command>,
    updates: mpsc::Sender<Update>,
) {
    while let Some(command) = commands.recv().await {
        match command {
            Command::Connect => {
                let _ = updates
                    .send(Update::Connection(ConnectionState::Connecting))
                    .await;
                match session.connect().await {
                    Ok(()) => {
                        let _ = updates.send(Update::Tools(session.tools().to_vec())).await;
                        let _ = updates
                            .send(Update::Notice(format!(
                                "Connected — {} tools available",
                                session.tools().len()
                            )))
                            .await;
                    }
                    Err(e) => {
                        let _ = updates
                            .send(Update::Notice(format!("Connection failed: {}", e)))
                            .await;
                    }
                }
                let _ = updates.send(Update::Connection(session.state())).await;
            }
            Command::Submit(text) => {
                let _ = updates.send(Update::Busy(true)).await;
                if let Err(e) = session.submit(&text).await {
                    // Precondition rejections; backend failures land in the
                    // timeline instead.
                    let _ = updates.send(Update::Notice(format!("Not sent: {}", e))).await;
                }
                let _ = updates
                    .send(Update::Timeline(session.timeline().to_vec()))
                    .await;
                let _ = updates.send(Update::Busy(false)).await;
            }
            Command::RefreshTools => match session.refresh_tools().await {
                Ok(count) => {
                    let _ = updates.send(Update::Tools(session.tools().to_vec())).await;
                    let _ = updates
                        .send(Update::Notice(format!("{} tools available", count)))
                        .await;
                }
                Err(e) => {
                    let _ = updates
                        .send(Update::Notice(format!("Tool refresh failed: {}", e)))
                        .await;
                }
            },
        }
    }
    tracing::debug!("worker loop finished");
}
