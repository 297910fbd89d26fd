//! Config file locations.

use crate::error::ApiError;
use std::path::{Path, PathBuf};

/// Directory under the config home holding the global file.
pub const APP_DIR: &str = "townctl";

pub const GLOBAL_CONFIG_FILE: &str = "config.toml";

/// Per-town file, kept in the mayor's directory.
pub const TOWN_CONFIG_FILE: &str = "townctl.toml";

/// `$XDG_CONFIG_HOME`, falling back to `$HOME/.config`.
pub fn config_home() -> Result<PathBuf, ApiError> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config_home.is_empty() {
            return Ok(PathBuf::from(xdg_config_home));
        }
    }

    let home = std::env::var("HOME").map_err(|_| {
        ApiError::ConfigError(
            "Could not determine XDG config home directory (HOME not set)".to_string(),
        )
    })?;

    Ok(PathBuf::from(home).join(".config"))
}

/// `$XDG_CONFIG_HOME/townctl/config.toml`
pub fn global_config_path() -> Result<PathBuf, ApiError> {
    Ok(config_home()?.join(APP_DIR).join(GLOBAL_CONFIG_FILE))
}

/// `<town>/mayor/townctl.toml`
pub fn town_config_path(town_root: &Path) -> PathBuf {
    town_root.join("mayor").join(TOWN_CONFIG_FILE)
}
