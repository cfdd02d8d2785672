use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Runtime configuration, read from a JSON file next to the binary
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// API key for the Zoopla listings API
    pub zoopla_key: String,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}
