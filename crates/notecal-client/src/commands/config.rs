//! Configuration commands.

use std::path::Path;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Renders the effective configuration as TOML.
pub fn render(config: &ClientConfig) -> ClientResult<String> {
    toml::to_string_pretty(config)
        .map_err(|e| ClientError::config(format!("failed to serialize config: {}", e)))
}

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig) -> ClientResult<()> {
    println!("# config.toml ({})", ClientConfig::default_path().display());
    println!("{}", render(config)?);
    Ok(())
}

/// Show the configuration file and data directory paths.
pub fn path(config: &ClientConfig, data_dir: Option<&Path>) -> ClientResult<()> {
    println!("config: {}", ClientConfig::default_path().display());
    println!("data: {}", config.data_dir(data_dir).display());
    Ok(())
}
