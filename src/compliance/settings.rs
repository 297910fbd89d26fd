//! Settings file model and structural policy checks.

use crate::error::ComplianceError;
use crate::topology::{LocationStatus, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

const ENABLED_PLUGINS_KEY: &str = "enabledPlugins";
const HOOKS_KEY: &str = "hooks";
const SESSION_START_HOOK: &str = "SessionStart";
const STOP_HOOK: &str = "Stop";

/// Command markers every settings file must carry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompliancePolicy {
    /// Substring identifying the PATH export in a SessionStart command
    #[serde(default = "default_path_export_marker")]
    pub path_export_marker: String,

    /// Substring identifying the deacon nudge in a SessionStart command
    #[serde(default = "default_deacon_nudge_marker")]
    pub deacon_nudge_marker: String,
}

fn default_path_export_marker() -> String {
    "PATH=".to_string()
}

fn default_deacon_nudge_marker() -> String {
    "gt nudge deacon".to_string()
}

impl Default for CompliancePolicy {
    fn default() -> Self {
        Self {
            path_export_marker: default_path_export_marker(),
            deacon_nudge_marker: default_deacon_nudge_marker(),
        }
    }
}

/// Why a settings file is stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StaleReason {
    WrongLocation,
    InvalidJson,
    MissingEnabledPlugins,
    MissingHooks,
    MissingPathExport,
    MissingDeaconNudge,
    MissingStopHook,
}

impl StaleReason {
    pub fn describe(&self) -> &'static str {
        match self {
            StaleReason::WrongLocation => "wrong location",
            StaleReason::InvalidJson => "invalid JSON",
            StaleReason::MissingEnabledPlugins => "missing enabledPlugins",
            StaleReason::MissingHooks => "missing hooks",
            StaleReason::MissingPathExport => "missing PATH export",
            StaleReason::MissingDeaconNudge => "missing deacon nudge",
            StaleReason::MissingStopHook => "missing Stop hook",
        }
    }
}

impl fmt::Display for StaleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Parsed content of a settings file, or the parser's complaint.
#[derive(Debug, Clone)]
pub enum SettingsContent {
    Parsed(Value),
    Invalid(String),
}

/// One settings file found during a scan.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    pub path: PathBuf,
    /// Path relative to the town root, used in reports
    pub relative: PathBuf,
    pub role: Role,
    pub location: LocationStatus,
    pub content: SettingsContent,
    pub reasons: BTreeSet<StaleReason>,
}

impl SettingsFile {
    /// Read and parse a settings file. Only I/O failures are errors; bad JSON is
    /// kept as [`SettingsContent::Invalid`].
    pub fn load(
        town_root: &Path,
        relative: &Path,
        role: Role,
        location: LocationStatus,
    ) -> Result<Self, ComplianceError> {
        let path = town_root.join(relative);
        let bytes = std::fs::read(&path).map_err(|source| ComplianceError::Read {
            path: path.clone(),
            source,
        })?;
        Ok(Self::from_bytes(path, relative.to_path_buf(), role, location, &bytes))
    }

    pub fn from_bytes(
        path: PathBuf,
        relative: PathBuf,
        role: Role,
        location: LocationStatus,
        bytes: &[u8],
    ) -> Self {
        let content = match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => SettingsContent::Parsed(value),
            Err(e) => SettingsContent::Invalid(e.to_string()),
        };
        Self {
            path,
            relative,
            role,
            location,
            content,
            reasons: BTreeSet::new(),
        }
    }

    /// Assign stale reasons. Placement and structure are judged independently;
    /// a parse failure stops classification at [`StaleReason::InvalidJson`].
    pub fn validate(&mut self, policy: &CompliancePolicy) {
        self.reasons.clear();
        if self.location == LocationStatus::WrongLocation {
            self.reasons.insert(StaleReason::WrongLocation);
        }
        match &self.content {
            SettingsContent::Invalid(_) => {
                self.reasons.insert(StaleReason::InvalidJson);
            }
            SettingsContent::Parsed(value) => {
                self.reasons.extend(check_structure(value, policy));
            }
        }
    }

    pub fn is_stale(&self) -> bool {
        !self.reasons.is_empty()
    }

    /// Misplaced files are the only ones remediation removes.
    pub fn is_removable(&self) -> bool {
        self.reasons.contains(&StaleReason::WrongLocation)
    }

    /// One report line: path, role, reasons.
    pub fn detail(&self) -> String {
        let reasons: Vec<&str> = self.reasons.iter().map(StaleReason::describe).collect();
        format!(
            "{} ({}): {}",
            self.relative.display(),
            self.role,
            reasons.join(", ")
        )
    }
}

/// Structural checks against the policy. Each missing element adds one reason.
pub fn check_structure(value: &Value, policy: &CompliancePolicy) -> BTreeSet<StaleReason> {
    let mut reasons = BTreeSet::new();

    if value.get(ENABLED_PLUGINS_KEY).is_none() {
        reasons.insert(StaleReason::MissingEnabledPlugins);
    }

    let hooks = value.get(HOOKS_KEY);
    if hooks.is_none() {
        reasons.insert(StaleReason::MissingHooks);
    }

    let session_start: Vec<&str> = hooks
        .map(|h| hook_commands(h, SESSION_START_HOOK))
        .unwrap_or_default();
    if !session_start
        .iter()
        .any(|cmd| cmd.contains(&policy.path_export_marker))
    {
        reasons.insert(StaleReason::MissingPathExport);
    }
    if !session_start
        .iter()
        .any(|cmd| cmd.contains(&policy.deacon_nudge_marker))
    {
        reasons.insert(StaleReason::MissingDeaconNudge);
    }

    if !hooks
        .and_then(|h| h.get(STOP_HOOK))
        .map(is_non_empty)
        .unwrap_or(false)
    {
        reasons.insert(StaleReason::MissingStopHook);
    }

    reasons
}

/// Every `command` string under `hooks.<event>[*].hooks[*]`.
fn hook_commands<'a>(hooks: &'a Value, event: &str) -> Vec<&'a str> {
    hooks
        .get(event)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|entry| entry.get(HOOKS_KEY).and_then(Value::as_array))
        .flatten()
        .filter_map(|hook| hook.get("command").and_then(Value::as_str))
        .collect()
}

fn is_non_empty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::String(s) => !s.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}
