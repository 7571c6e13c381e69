//! Configuration loading and root folder resolution
//!
//! Credentials and service settings resolve with ENV → TOML priority: an
//! environment variable always wins over the config file, so deployments can
//! override a shared TOML without editing it.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// TOML configuration file contents
///
/// All fields are optional; missing credentials disable the corresponding
/// integration at startup rather than failing the load.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root data folder override
    pub root_folder: Option<String>,
    /// Spotify client-credentials app id
    pub spotify_client_id: Option<String>,
    /// Spotify client-credentials app secret
    pub spotify_client_secret: Option<String>,
    /// YouTube Data API key
    pub youtube_api_key: Option<String>,
    /// Google generative-language API key
    pub gemini_api_key: Option<String>,
    /// Emails allowed to force-regenerate and delete cached charts
    #[serde(default)]
    pub admin_emails: Vec<String>,
    /// Log filter directive (e.g. "info", "strum_cg=debug")
    pub log_filter: Option<String>,
}

/// Load TOML configuration from the given path
///
/// A missing file yields defaults; a malformed file is a hard error.
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        debug!("No config file at {}, using defaults", path.display());
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Default configuration file path for the platform (~/.config/strum/strum.toml)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("strum").join("strum.toml"))
}

/// Resolve a setting with ENV → TOML priority
///
/// Empty or whitespace-only values are treated as unset at either tier.
pub fn resolve_setting(env_var: &str, toml_value: Option<&str>) -> Option<String> {
    if let Ok(value) = std::env::var(env_var) {
        if !value.trim().is_empty() {
            if toml_value.is_some_and(|t| !t.trim().is_empty()) {
                warn!(
                    "{} set in both environment and TOML; using environment",
                    env_var
                );
            }
            return Some(value);
        }
    }

    toml_value
        .filter(|v| !v.trim().is_empty())
        .map(|v| v.to_string())
}

/// Resolve the root data folder
///
/// Priority: CLI argument → STRUM_ROOT_FOLDER → TOML → platform default.
pub fn resolve_root_folder(cli_arg: Option<&str>, config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    if let Ok(path) = std::env::var("STRUM_ROOT_FOLDER") {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.root_folder {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    default_root_folder()
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("strum"))
        .unwrap_or_else(|| PathBuf::from("./strum_data"))
}

/// Ensure the root folder exists and return the database path inside it
pub fn database_path(root_folder: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root_folder)?;
    Ok(root_folder.join("strum.db"))
}
