// ABOUTME: Terminal chat interface for confab
// ABOUTME: Channel-based async architecture with Ratatui

pub mod app;
pub mod cli;
pub mod config;
pub mod run;
pub mod view;
pub mod worker;
