//! Nudge target planning.
//!
//! Resolves a pattern to concrete targets and applies the freshness gate. Nothing
//! is delivered here; the caller owns delivery.

use super::address::AddressResolver;
use super::freshness::is_fresh;
use super::session::AgentSession;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A session selected for a nudge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NudgeTarget {
    pub session: String,
    /// Canonical address; empty when the session name isn't recognized
    pub address: String,
}

/// Why a matching session will not be nudged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuppressedTarget {
    pub session: String,
    pub reason: String,
}

/// Outcome of resolving a nudge pattern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NudgePlan {
    pub pattern: String,
    pub targets: Vec<NudgeTarget>,
    pub suppressed: Vec<SuppressedTarget>,
}

impl NudgePlan {
    /// Build a plan. With `if_fresh`, sessions older than the freshness threshold
    /// or with an unknown creation time are suppressed.
    pub fn build(
        pattern: &str,
        sessions: &[AgentSession],
        resolver: &AddressResolver<'_>,
        if_fresh: bool,
        now: DateTime<Utc>,
    ) -> Self {
        let mut plan = NudgePlan {
            pattern: pattern.to_string(),
            targets: Vec::new(),
            suppressed: Vec::new(),
        };

        for name in resolver.resolve_pattern(pattern, sessions) {
            if if_fresh {
                let created_at = sessions
                    .iter()
                    .find(|s| s.name == name)
                    .and_then(|s| s.created_at);
                let reason = match created_at {
                    None => Some("creation time unknown".to_string()),
                    Some(created) if !is_fresh(created, now) => Some(format!(
                        "session is {}s old",
                        now.signed_duration_since(created).num_seconds()
                    )),
                    Some(_) => None,
                };
                if let Some(reason) = reason {
                    debug!(session = %name, %reason, "suppressing nudge");
                    plan.suppressed.push(SuppressedTarget {
                        session: name,
                        reason,
                    });
                    continue;
                }
            }
            let address = resolver.session_name_to_address(&name);
            plan.targets.push(NudgeTarget {
                session: name,
                address,
            });
        }

        plan
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
