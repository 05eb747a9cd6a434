// ABOUTME: Non-interactive CLI subcommands
// ABOUTME: One-shot send and config setup

pub mod send;
pub mod setup;
