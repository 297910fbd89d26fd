//! Human-facing fleet addresses.
//!
//! Forward resolution turns a pattern such as `gastown/crew/*` into the names of
//! the running sessions it denotes. Inverse resolution turns a session name such
//! as `gt-crew-max` back into its canonical address. Both are total: input that
//! doesn't fit the grammar yields no match or an empty string, never an error.

use super::registry::{default_registry, PrefixRegistry, SESSION_SEPARATOR, TOWN_PREFIX};
use super::session::{AgentSession, AgentType};
use std::fmt;

const WILDCARD: &str = "*";
const CREW_SEGMENT: &str = "crew";
const POLECATS_SEGMENT: &str = "polecats";

/// Rig component of an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RigSelector {
    Named(String),
    /// `*`: every rig, role fixed
    Any,
}

/// Agent-name component of a crew or polecat address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameSelector {
    Named(String),
    /// `*`: every member of the rig
    Any,
}

/// A parsed address pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Address {
    Mayor,
    Deacon,
    Witness(RigSelector),
    Refinery(RigSelector),
    Crew {
        rig: String,
        name: NameSelector,
    },
    Polecat {
        rig: String,
        name: NameSelector,
        /// Written as `<rig>/<name>` rather than `<rig>/polecats/<name>`
        legacy: bool,
    },
}

impl Address {
    /// Parse a pattern; `None` for anything outside the address grammar.
    pub fn parse(pattern: &str) -> Option<Address> {
        match pattern {
            "mayor" => return Some(Address::Mayor),
            "deacon" => return Some(Address::Deacon),
            _ => {}
        }

        let segments: Vec<&str> = pattern.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }

        match segments.as_slice() {
            [rig, "witness"] => Some(Address::Witness(rig_selector(rig))),
            [rig, "refinery"] => Some(Address::Refinery(rig_selector(rig))),
            [rig, name] if *rig != WILDCARD => Some(Address::Polecat {
                rig: rig.to_string(),
                name: name_selector(name),
                legacy: true,
            }),
            [rig, CREW_SEGMENT, name] if *rig != WILDCARD => Some(Address::Crew {
                rig: rig.to_string(),
                name: name_selector(name),
            }),
            [rig, POLECATS_SEGMENT, name] if *rig != WILDCARD => Some(Address::Polecat {
                rig: rig.to_string(),
                name: name_selector(name),
                legacy: false,
            }),
            _ => None,
        }
    }

    /// Whether the address denotes more than one potential session.
    pub fn is_wildcard(&self) -> bool {
        matches!(
            self,
            Address::Witness(RigSelector::Any)
                | Address::Refinery(RigSelector::Any)
                | Address::Crew {
                    name: NameSelector::Any,
                    ..
                }
                | Address::Polecat {
                    name: NameSelector::Any,
                    ..
                }
        )
    }

    /// Whether a session falls under this address.
    pub fn matches(&self, session: &AgentSession) -> bool {
        match self {
            Address::Mayor => session.agent_type == AgentType::Mayor,
            Address::Deacon => session.agent_type == AgentType::Deacon,
            Address::Witness(rig) => {
                session.agent_type == AgentType::Witness && rig.matches(&session.rig)
            }
            Address::Refinery(rig) => {
                session.agent_type == AgentType::Refinery && rig.matches(&session.rig)
            }
            Address::Crew { rig, name } => {
                session.agent_type == AgentType::Crew
                    && session.rig == *rig
                    && name.matches(&session.agent_name)
            }
            Address::Polecat { rig, name, .. } => {
                session.agent_type == AgentType::Polecat
                    && session.rig == *rig
                    && name.matches(&session.agent_name)
            }
        }
    }

    /// Canonical session name for a concrete address.
    ///
    /// `None` for wildcard addresses and rigs the registry doesn't know.
    pub fn session_name(&self, registry: &PrefixRegistry) -> Option<String> {
        let sep = SESSION_SEPARATOR;
        match self {
            Address::Mayor => Some(format!("{TOWN_PREFIX}{sep}mayor")),
            Address::Deacon => Some(format!("{TOWN_PREFIX}{sep}deacon")),
            Address::Witness(RigSelector::Named(rig)) => registry
                .lookup_prefix(rig)
                .map(|p| format!("{p}{sep}witness")),
            Address::Refinery(RigSelector::Named(rig)) => registry
                .lookup_prefix(rig)
                .map(|p| format!("{p}{sep}refinery")),
            Address::Crew {
                rig,
                name: NameSelector::Named(name),
            } => registry
                .lookup_prefix(rig)
                .map(|p| format!("{p}{sep}{CREW_SEGMENT}{sep}{name}")),
            Address::Polecat {
                rig,
                name: NameSelector::Named(name),
                ..
            } => registry.lookup_prefix(rig).map(|p| format!("{p}{sep}{name}")),
            _ => None,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Mayor => write!(f, "mayor"),
            Address::Deacon => write!(f, "deacon"),
            Address::Witness(rig) => write!(f, "{}/witness", rig),
            Address::Refinery(rig) => write!(f, "{}/refinery", rig),
            Address::Crew { rig, name } => write!(f, "{}/{}/{}", rig, CREW_SEGMENT, name),
            Address::Polecat {
                rig,
                name,
                legacy: true,
            } => write!(f, "{}/{}", rig, name),
            Address::Polecat { rig, name, .. } => {
                write!(f, "{}/{}/{}", rig, POLECATS_SEGMENT, name)
            }
        }
    }
}

impl RigSelector {
    fn matches(&self, rig: &str) -> bool {
        match self {
            RigSelector::Named(name) => name == rig,
            RigSelector::Any => true,
        }
    }
}

impl fmt::Display for RigSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RigSelector::Named(name) => f.write_str(name),
            RigSelector::Any => f.write_str(WILDCARD),
        }
    }
}

impl NameSelector {
    fn matches(&self, agent_name: &str) -> bool {
        match self {
            NameSelector::Named(name) => name == agent_name,
            NameSelector::Any => true,
        }
    }
}

impl fmt::Display for NameSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameSelector::Named(name) => f.write_str(name),
            NameSelector::Any => f.write_str(WILDCARD),
        }
    }
}

fn rig_selector(segment: &str) -> RigSelector {
    if segment == WILDCARD {
        RigSelector::Any
    } else {
        RigSelector::Named(segment.to_string())
    }
}

fn name_selector(segment: &str) -> NameSelector {
    if segment == WILDCARD {
        NameSelector::Any
    } else {
        NameSelector::Named(segment.to_string())
    }
}

/// Address resolution bound to a specific prefix registry.
#[derive(Debug, Clone, Copy)]
pub struct AddressResolver<'a> {
    registry: &'a PrefixRegistry,
}

impl<'a> AddressResolver<'a> {
    pub fn new(registry: &'a PrefixRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'a PrefixRegistry {
        self.registry
    }

    /// Names of the sessions a pattern denotes. Empty for no match or an invalid pattern.
    pub fn resolve_pattern(&self, pattern: &str, sessions: &[AgentSession]) -> Vec<String> {
        resolve_pattern(pattern, sessions)
    }

    /// Parse a session name into its address, if it follows the naming convention.
    pub fn address_for_session(&self, name: &str) -> Option<Address> {
        let (prefix, rest) = name.split_once(SESSION_SEPARATOR)?;
        if rest.is_empty() {
            return None;
        }

        if prefix == TOWN_PREFIX {
            return match rest {
                "mayor" => Some(Address::Mayor),
                "deacon" => Some(Address::Deacon),
                _ => None,
            };
        }

        let rig = self.registry.lookup_rig(prefix)?.to_string();
        let crew_prefix = format!("{CREW_SEGMENT}{SESSION_SEPARATOR}");

        let address = match rest {
            "witness" => Address::Witness(RigSelector::Named(rig)),
            "refinery" => Address::Refinery(RigSelector::Named(rig)),
            _ => match rest.strip_prefix(crew_prefix.as_str()) {
                Some("") => return None,
                Some(crew_name) => Address::Crew {
                    rig,
                    name: NameSelector::Named(crew_name.to_string()),
                },
                None => Address::Polecat {
                    rig,
                    name: NameSelector::Named(rest.to_string()),
                    legacy: true,
                },
            },
        };
        Some(address)
    }

    /// Canonical address for a session name; empty string when unrecognized.
    pub fn session_name_to_address(&self, name: &str) -> String {
        self.address_for_session(name)
            .map(|a| a.to_string())
            .unwrap_or_default()
    }

    /// Session name the naming convention assigns to a concrete address.
    pub fn session_name_for(&self, address: &Address) -> Option<String> {
        address.session_name(self.registry)
    }
}

/// Names of the sessions a pattern denotes.
pub fn resolve_pattern(pattern: &str, sessions: &[AgentSession]) -> Vec<String> {
    let Some(address) = Address::parse(pattern) else {
        return Vec::new();
    };
    sessions
        .iter()
        .filter(|s| address.matches(s))
        .map(|s| s.name.clone())
        .collect()
}

/// Inverse resolution against the process-wide default registry.
pub fn session_name_to_address(name: &str) -> String {
    let registry = default_registry();
    AddressResolver::new(&registry).session_name_to_address(name)
}
