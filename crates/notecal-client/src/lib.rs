//! CLI, file-backed schedule store, output rendering
//!
//! This crate provides the `notecal` command-line interface.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod store;

pub use cli::Cli;
pub use error::{ClientError, ClientResult};
pub use store::FileStore;
