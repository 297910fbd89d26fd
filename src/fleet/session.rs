//! Running fleet members as reported by the session enumerator.

use crate::error::ApiError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Agent role of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentType {
    /// Town-level coordinator
    Mayor,
    /// Town-level background worker
    Deacon,
    /// Per-rig supervisor
    Witness,
    /// Per-rig merge queue
    Refinery,
    /// Named persistent worker in a rig
    Crew,
    /// Named transient worker in a rig
    Polecat,
}

impl AgentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentType::Mayor => "mayor",
            AgentType::Deacon => "deacon",
            AgentType::Witness => "witness",
            AgentType::Refinery => "refinery",
            AgentType::Crew => "crew",
            AgentType::Polecat => "polecat",
        }
    }

    /// Whether sessions of this type belong to a rig.
    pub fn is_rig_scoped(&self) -> bool {
        !matches!(self, AgentType::Mayor | AgentType::Deacon)
    }

    /// Whether sessions of this type carry an individual agent name.
    pub fn is_named(&self) -> bool {
        matches!(self, AgentType::Crew | AgentType::Polecat)
    }
}

/// One running fleet member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentSession {
    /// Raw session identifier, e.g. `gt-crew-max` or `hq-mayor`
    pub name: String,
    #[serde(rename = "type")]
    pub agent_type: AgentType,
    /// Owning rig; empty for town-level roles
    #[serde(default)]
    pub rig: String,
    /// Individual name; only set for crew and polecats
    #[serde(default)]
    pub agent_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AgentSession {
    pub fn mayor(name: impl Into<String>) -> Self {
        Self::town(name, AgentType::Mayor)
    }

    pub fn deacon(name: impl Into<String>) -> Self {
        Self::town(name, AgentType::Deacon)
    }

    pub fn witness(name: impl Into<String>, rig: impl Into<String>) -> Self {
        Self::rig_singleton(name, AgentType::Witness, rig)
    }

    pub fn refinery(name: impl Into<String>, rig: impl Into<String>) -> Self {
        Self::rig_singleton(name, AgentType::Refinery, rig)
    }

    pub fn crew(
        name: impl Into<String>,
        rig: impl Into<String>,
        agent_name: impl Into<String>,
    ) -> Self {
        Self::named(name, AgentType::Crew, rig, agent_name)
    }

    pub fn polecat(
        name: impl Into<String>,
        rig: impl Into<String>,
        agent_name: impl Into<String>,
    ) -> Self {
        Self::named(name, AgentType::Polecat, rig, agent_name)
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    fn town(name: impl Into<String>, agent_type: AgentType) -> Self {
        Self {
            name: name.into(),
            agent_type,
            rig: String::new(),
            agent_name: String::new(),
            created_at: None,
        }
    }

    fn rig_singleton(name: impl Into<String>, agent_type: AgentType, rig: impl Into<String>) -> Self {
        Self {
            rig: rig.into(),
            ..Self::town(name, agent_type)
        }
    }

    fn named(
        name: impl Into<String>,
        agent_type: AgentType,
        rig: impl Into<String>,
        agent_name: impl Into<String>,
    ) -> Self {
        Self {
            agent_name: agent_name.into(),
            ..Self::rig_singleton(name, agent_type, rig)
        }
    }

    /// Check that rig and agent name presence matches the session type.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Session name cannot be empty".to_string());
        }
        let t = self.agent_type;
        if t.is_rig_scoped() == self.rig.is_empty() {
            return Err(format!(
                "Session '{}' ({}) {} a rig",
                self.name,
                t.as_str(),
                if t.is_rig_scoped() { "requires" } else { "must not have" }
            ));
        }
        if t.is_named() == self.agent_name.is_empty() {
            return Err(format!(
                "Session '{}' ({}) {} an agent name",
                self.name,
                t.as_str(),
                if t.is_named() { "requires" } else { "must not have" }
            ));
        }
        Ok(())
    }
}

/// Parse a JSON array of sessions and reject records that break the type invariants.
pub fn parse_sessions(content: &str) -> Result<Vec<AgentSession>, ApiError> {
    let sessions: Vec<AgentSession> = serde_json::from_str(content)
        .map_err(|e| ApiError::SessionsError(format!("Failed to parse sessions: {}", e)))?;
    for session in &sessions {
        session.validate().map_err(ApiError::SessionsError)?;
    }
    Ok(sessions)
}

/// Load sessions from a JSON file written by the session enumerator.
pub fn load_sessions(path: &Path) -> Result<Vec<AgentSession>, ApiError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        ApiError::SessionsError(format!(
            "Failed to read sessions file {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_sessions(&content)
}
