//! Fleet Topology Conventions
//!
//! Where each role's settings file lives under the town root, which top-level
//! directories are not rigs, and the single classifier that maps a settings
//! path back to the role that owns it.

use crate::fleet::{Address, AgentType, NameSelector, RigSelector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Component, Path, PathBuf};

/// Directory holding agent settings inside a role's working directory.
pub const CLAUDE_DIR: &str = ".claude";

/// Settings file name inside [`CLAUDE_DIR`].
pub const SETTINGS_FILE: &str = "settings.json";

/// Top-level town directories that are never rigs.
pub const DEFAULT_SKIP_DIRS: &[&str] = &["mayor", "deacon", "daemon", "docs"];

pub const DEACON_DIR: &str = "deacon";
pub const WITNESS_DIR: &str = "witness";
pub const REFINERY_DIR: &str = "refinery";
pub const CREW_DIR: &str = "crew";
pub const POLECATS_DIR: &str = "polecats";

/// Checkout directory nested under the witness and refinery homes.
pub const RIG_CHECKOUT_DIR: &str = "rig";

/// Settings owner, as inferred from where the file sits.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Role {
    Mayor,
    Deacon,
    Witness { rig: String },
    Refinery { rig: String },
    Crew { rig: String, name: String },
    Polecat { rig: String, name: String },
}

impl Role {
    pub fn agent_type(&self) -> AgentType {
        match self {
            Role::Mayor => AgentType::Mayor,
            Role::Deacon => AgentType::Deacon,
            Role::Witness { .. } => AgentType::Witness,
            Role::Refinery { .. } => AgentType::Refinery,
            Role::Crew { .. } => AgentType::Crew,
            Role::Polecat { .. } => AgentType::Polecat,
        }
    }

    pub fn rig(&self) -> Option<&str> {
        match self {
            Role::Mayor | Role::Deacon => None,
            Role::Witness { rig }
            | Role::Refinery { rig }
            | Role::Crew { rig, .. }
            | Role::Polecat { rig, .. } => Some(rig),
        }
    }

    /// The address naming this role's session.
    pub fn address(&self) -> Address {
        match self {
            Role::Mayor => Address::Mayor,
            Role::Deacon => Address::Deacon,
            Role::Witness { rig } => Address::Witness(RigSelector::Named(rig.clone())),
            Role::Refinery { rig } => Address::Refinery(RigSelector::Named(rig.clone())),
            Role::Crew { rig, name } => Address::Crew {
                rig: rig.clone(),
                name: NameSelector::Named(name.clone()),
            },
            Role::Polecat { rig, name } => Address::Polecat {
                rig: rig.clone(),
                name: NameSelector::Named(name.clone()),
                legacy: false,
            },
        }
    }

    /// Directory the role's agent runs in, relative to the town root.
    pub fn work_dir(&self) -> PathBuf {
        match self {
            Role::Mayor => PathBuf::new(),
            Role::Deacon => PathBuf::from(DEACON_DIR),
            Role::Witness { rig } => [rig.as_str(), WITNESS_DIR, RIG_CHECKOUT_DIR].iter().collect(),
            Role::Refinery { rig } => [rig.as_str(), REFINERY_DIR, RIG_CHECKOUT_DIR]
                .iter()
                .collect(),
            Role::Crew { rig, name } => [rig.as_str(), CREW_DIR, name.as_str()].iter().collect(),
            Role::Polecat { rig, name } => {
                [rig.as_str(), POLECATS_DIR, name.as_str()].iter().collect()
            }
        }
    }

    /// Canonical settings path, relative to the town root.
    pub fn settings_path(&self) -> PathBuf {
        self.work_dir().join(CLAUDE_DIR).join(SETTINGS_FILE)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.address())
    }
}

/// Whether a settings file sits where its role expects it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocationStatus {
    Correct,
    WrongLocation,
}

/// Top-level directory names that are not rigs. Hidden directories are always skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipList {
    names: BTreeSet<String>,
}

impl SkipList {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Default list extended with extra names.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = Self::default();
        list.names.extend(extra.into_iter().map(Into::into));
        list
    }

    pub fn is_skipped(&self, name: &str) -> bool {
        is_hidden(name) || self.names.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl Default for SkipList {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP_DIRS.iter().copied())
    }
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

/// Classify a settings path relative to the town root.
///
/// Returns the owning role and whether the file is correctly placed, or `None`
/// when the path is not a settings location of any role (including anything
/// under a skip-listed or hidden top-level directory).
pub fn classify_settings_path(
    relative: &Path,
    skip: &SkipList,
) -> Option<(Role, LocationStatus)> {
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }

    let [dirs @ .., CLAUDE_DIR, SETTINGS_FILE] = parts.as_slice() else {
        return None;
    };

    use LocationStatus::{Correct, WrongLocation};
    match dirs {
        [] => Some((Role::Mayor, Correct)),
        [DEACON_DIR] => Some((Role::Deacon, Correct)),
        [rig, ..] if skip.is_skipped(rig) => None,
        [rig, WITNESS_DIR, RIG_CHECKOUT_DIR] => Some((Role::Witness { rig: rig.to_string() }, Correct)),
        [rig, WITNESS_DIR] => Some((Role::Witness { rig: rig.to_string() }, WrongLocation)),
        [rig, REFINERY_DIR, RIG_CHECKOUT_DIR] => {
            Some((Role::Refinery { rig: rig.to_string() }, Correct))
        }
        [rig, REFINERY_DIR] => Some((Role::Refinery { rig: rig.to_string() }, WrongLocation)),
        [rig, CREW_DIR, name] if !is_hidden(name) => Some((
            Role::Crew {
                rig: rig.to_string(),
                name: name.to_string(),
            },
            Correct,
        )),
        [rig, POLECATS_DIR, name] if !is_hidden(name) => Some((
            Role::Polecat {
                rig: rig.to_string(),
                name: name.to_string(),
            },
            Correct,
        )),
        _ => None,
    }
}
