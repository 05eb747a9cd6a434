// ABOUTME: One-shot send command: submit a single message and print the reply
// ABOUTME: Useful for scripting and for checking a backend without the TUI

use crate::config::Config;
use anyhow::{bail, Context, Result};
use confab_client::{ChatSession, HttpBackend, TurnStatus};
use std::sync::Arc;
use std::time::Duration;

/// Connect, submit one message, print the backend's turns, and exit.
/// A failed submission exits non-zero.
pub async fn execute(config: Config, message: &str) -> Result<()> {
    let backend = HttpBackend::with_timeout(
        &config.backend_url,
        Duration::from_secs(config.timeout_secs),
    )
    .with_context(|| format!("Invalid backend URL: {}", config.backend_url))?;
    let mut session = ChatSession::new(Arc::new(backend));

    session
        .connect()
        .await
        .with_context(|| format!("Failed to connect to {}", config.backend_url))?;
    tracing::info!(tools = session.tools().len(), "connected");

    session.submit(message).await.context("Message rejected")?;

    // Skip the echoed user turn; print everything the backend added.
    let mut failed = false;
    for turn in session.timeline().iter().skip(1) {
        if turn.status == TurnStatus::Failed {
            failed = true;
        }
        if !turn.content.is_empty() {
            println!("{}: {}", turn.role, turn.content);
        }
        for call in &turn.tool_calls {
            println!("  [tool] {}", crate::view::tool_summary(call));
        }
    }

    if failed {
        bail!("Submission failed");
    }
    Ok(())
}
