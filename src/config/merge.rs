//! MergeService: orchestrates sources and deserializes to TownConfig.

use super::sources::{environment, file};
use super::TownConfig;
use config::{Config, ConfigError, Map};
use std::path::PathBuf;

/// Ordered set of sources for one load.
#[derive(Debug, Default)]
pub(crate) struct MergeService {
    /// Files in increasing precedence, each marked required or optional
    files: Vec<(PathBuf, bool)>,
    /// Replacement environment; None reads the process environment
    env: Option<Map<String, String>>,
}

impl MergeService {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn optional_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push((path.into(), false));
        self
    }

    pub(crate) fn required_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.push((path.into(), true));
        self
    }

    #[cfg(test)]
    pub(crate) fn with_env(mut self, vars: Map<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    /// Build the layered config. Defaults come from the serde defaults of
    /// [`TownConfig`], so an empty source set yields `TownConfig::default()`.
    pub(crate) fn load(self) -> Result<TownConfig, ConfigError> {
        let mut builder = Config::builder();
        for (path, required) in &self.files {
            builder = file::add_to_builder(builder, path, *required);
        }
        builder = environment::add_to_builder(builder, self.env);

        builder.build()?.try_deserialize()
    }
}
