//! ConfigLoader facade delegating to the merge service.

use super::merge::MergeService;
use super::paths;
use super::TownConfig;
use crate::error::ApiError;
use std::path::Path;
use tracing::debug;

/// Configuration loader facade.
///
/// Precedence, lowest first: built-in defaults, the global file, the town
/// file, then `TOWNCTL__*` environment variables.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a town from the standard files and environment.
    pub fn load(town_root: &Path) -> Result<TownConfig, ApiError> {
        let mut service = MergeService::new();
        match paths::global_config_path() {
            Ok(global) => service = service.optional_file(global),
            Err(e) => debug!(error = %e, "no global config location"),
        }
        let service = service.optional_file(paths::town_config_path(town_root));
        Self::finish(service)
    }

    /// Load configuration from a specific file, which must exist, plus environment.
    pub fn load_from_file(path: &Path) -> Result<TownConfig, ApiError> {
        Self::finish(MergeService::new().required_file(path))
    }

    /// Create default configuration.
    pub fn default() -> TownConfig {
        TownConfig::default()
    }

    fn finish(service: MergeService) -> Result<TownConfig, ApiError> {
        let config = service.load()?;
        config.validate()?;
        Ok(config)
    }
}
