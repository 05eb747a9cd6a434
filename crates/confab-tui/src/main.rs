// ABOUTME: Entry point for the confab binary
// ABOUTME: Clap argument parsing; dispatches to the TUI or a subcommand

use anyhow::Result;
use clap::{Parser, Subcommand};
use confab_tui::{cli, config::Config, run};

#[derive(Parser)]
#[command(name = "confab")]
#[command(about = "Terminal chat interface for a tool-invoking agent backend")]
struct Args {
    /// Backend base URL (overrides the config file)
    #[arg(long, env = "CONFAB_URL")]
    url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Send one message and print the reply, without the TUI
    Send {
        /// The message to send
        message: String,
    },
    /// Create the config directory and a default config file
    Setup,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load()?;
    if let Some(url) = args.url {
        config.backend_url = url;
    }

    match args.command {
        Some(Commands::Send { message }) => {
            confab_log::init();
            cli::send::execute(config, &message).await
        }
        Some(Commands::Setup) => {
            confab_log::init();
            cli::setup::execute()
        }
        None => {
            // The TUI owns the terminal; logs go to a file instead of stderr.
            confab_log::init_file("confab");
            run::run(config).await
        }
    }
}
