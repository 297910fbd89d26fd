//! Configuration
//!
//! Layered TOML configuration for a town: rig prefixes, compliance policy and
//! logging. See [`ConfigLoader`] for source precedence.

mod facade;
mod merge;
pub mod paths;
mod sources;

pub use facade::ConfigLoader;

use crate::compliance::CompliancePolicy;
use crate::error::ApiError;
use crate::fleet::PrefixRegistry;
use crate::logging::LoggingConfig;
use crate::topology::SkipList;
use serde::{Deserialize, Serialize};

/// Effective configuration for one town.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TownConfig {
    /// `[[rigs]]` entries binding a rig name to its session prefix
    #[serde(default)]
    pub rigs: Vec<RigEntry>,

    #[serde(default)]
    pub compliance: ComplianceConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TownConfig {
    /// Build the prefix registry described by `[[rigs]]`.
    pub fn registry(&self) -> Result<PrefixRegistry, ApiError> {
        let pairs = self.rigs.iter().map(|r| (r.name.as_str(), r.prefix.as_str()));
        Ok(PrefixRegistry::from_rigs(pairs)?)
    }

    /// Reject configurations that would fail later at use.
    pub fn validate(&self) -> Result<(), ApiError> {
        self.registry()?;
        self.logging.validate()?;
        if self.compliance.path_export_marker.is_empty()
            || self.compliance.deacon_nudge_marker.is_empty()
        {
            return Err(ApiError::ConfigError(
                "compliance markers cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String, ApiError> {
        toml::to_string_pretty(self)
            .map_err(|e| ApiError::OutputError(format!("Failed to render config: {}", e)))
    }
}

/// One `[[rigs]]` entry.
///
/// The rig name is a value rather than a table key so its case survives
/// loading; the config loader lowercases keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RigEntry {
    pub name: String,
    pub prefix: String,
}

impl RigEntry {
    pub fn new(name: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: prefix.into(),
        }
    }
}

/// `[compliance]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceConfig {
    /// Top-level directories to skip in addition to the built-in list
    #[serde(default)]
    pub extra_skip_dirs: Vec<String>,

    #[serde(default = "default_path_export_marker")]
    pub path_export_marker: String,

    #[serde(default = "default_deacon_nudge_marker")]
    pub deacon_nudge_marker: String,
}

fn default_path_export_marker() -> String {
    CompliancePolicy::default().path_export_marker
}

fn default_deacon_nudge_marker() -> String {
    CompliancePolicy::default().deacon_nudge_marker
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            extra_skip_dirs: Vec::new(),
            path_export_marker: default_path_export_marker(),
            deacon_nudge_marker: default_deacon_nudge_marker(),
        }
    }
}

impl ComplianceConfig {
    pub fn to_policy(&self) -> CompliancePolicy {
        CompliancePolicy {
            path_export_marker: self.path_export_marker.clone(),
            deacon_nudge_marker: self.deacon_nudge_marker.clone(),
        }
    }

    pub fn skip_list(&self) -> SkipList {
        SkipList::with_extra(self.extra_skip_dirs.iter().cloned())
    }
}
