// ABOUTME: Setup command: create the config directory and a default config file
// ABOUTME: Idempotent; an existing config is left untouched

use crate::config::Config;
use anyhow::Result;

pub fn execute() -> Result<()> {
    let path = Config::init()?;
    println!("Config file: {}", path.display());
    println!("Edit it to point at your agent backend, then run `confab`.");
    Ok(())
}
