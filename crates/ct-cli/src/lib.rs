//! chaos-time CLI library.
//!
//! This crate provides the CLI interface: argument parsing, configuration,
//! and the `jira` and `calendar` report commands.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands, DateArgs};
pub use config::{Config, ConfigError, JiraCredentials};
