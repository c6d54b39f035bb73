//! Subcommand implementations.

pub mod config;
pub mod import;
pub mod schedule;
pub mod watch;
