mod types;

pub use types::*;

use crate::Result;
use std::{env, path::Path};
use tracing::debug;

/// Environment variable that overrides `llm.api_key`.
pub const API_KEY_ENV: &str = "API_KEY";

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    let mut config = load_from_path(&config_path).await?;
    apply_env_overrides(&mut config, env::var(API_KEY_ENV).ok());

    Ok(config)
}

pub async fn load_from_path(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    debug!("Loading configuration from: {}", path.display());

    let config_str = tokio::fs::read_to_string(path).await?;
    let config: Config = serde_yaml::from_str(&config_str)?;

    Ok(config)
}

/// A non-empty key from the environment wins over the file.
pub fn apply_env_overrides(config: &mut Config, api_key: Option<String>) {
    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        debug!("Using API key from {}", API_KEY_ENV);
        config.llm.api_key = key;
    }
}
