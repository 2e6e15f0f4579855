//! Configuration file management for maintplan.
//!
//! Provides a TOML-based config file at `~/.config/maintplan/config.toml` and
//! a resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use maintplan_core::config::ModelConfig;

/// Env vars checked for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];
pub const MODEL_ENV_VAR: &str = "MAINTPLAN_MODEL";
pub const ENDPOINT_ENV_VAR: &str = "MAINTPLAN_ENDPOINT";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    pub model: ModelSection,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ModelSection {
    pub api_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the maintplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/maintplan` or `~/.config/maintplan`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("maintplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("maintplan")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Where the TUI writes its log, since stderr belongs to the terminal UI.
pub fn log_path() -> PathBuf {
    config_dir().join("maintplan.log")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix, since the file holds an API key.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolution
// -----------------------------------------------------------------------

/// Values given on the command line; each one wins over env and file.
#[derive(Debug, Default, Clone)]
pub struct ModelOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
}

fn env_nonempty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Resolve the model configuration.
///
/// - API key: `--api-key` > `GEMINI_API_KEY` > `API_KEY` > `model.api_key` > error
/// - Model: `--model` > `MAINTPLAN_MODEL` > `model.model` > `ModelConfig::DEFAULT_MODEL`
/// - Endpoint: `--endpoint` > `MAINTPLAN_ENDPOINT` > `model.endpoint` > `ModelConfig::DEFAULT_ENDPOINT`
pub fn resolve(overrides: &ModelOverrides) -> Result<ModelConfig> {
    let file_config = load_config().ok();
    let section = file_config.as_ref().map(|c| &c.model);

    let api_key = overrides
        .api_key
        .clone()
        .or_else(|| API_KEY_ENV_VARS.iter().find_map(|v| env_nonempty(v)))
        .or_else(|| {
            section
                .map(|s| s.api_key.clone())
                .filter(|k| !k.trim().is_empty())
        });
    let Some(api_key) = api_key else {
        bail!("API key not found; set GEMINI_API_KEY or run `maintplan init` to create a config file");
    };

    let mut config = ModelConfig::new(api_key);

    if let Some(model) = overrides
        .model
        .clone()
        .or_else(|| env_nonempty(MODEL_ENV_VAR))
        .or_else(|| section.and_then(|s| s.model.clone()))
    {
        config = config.with_model(model);
    }

    if let Some(endpoint) = overrides
        .endpoint
        .clone()
        .or_else(|| env_nonempty(ENDPOINT_ENV_VAR))
        .or_else(|| section.and_then(|s| s.endpoint.clone()))
    {
        config = config.with_endpoint(endpoint);
    }

    Ok(config)
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------
