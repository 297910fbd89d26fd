//! Rig prefix registry.
//!
//! Maps short session-name prefixes (e.g. `gt`) to full rig names (e.g. `gastown`)
//! and back. Entries are fixed once registered; callers that need a different
//! mapping build a new registry and swap it in whole.

use crate::error::RegistryError;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Prefix used by town-level sessions (`hq-mayor`, `hq-deacon`).
pub const TOWN_PREFIX: &str = "hq";

/// Separator between prefix and the rest of a session name.
pub const SESSION_SEPARATOR: char = '-';

/// Bidirectional prefix <-> rig mapping.
#[derive(Debug, Clone, Default)]
pub struct PrefixRegistry {
    rigs_by_prefix: HashMap<String, String>,
    prefixes_by_rig: HashMap<String, String>,
}

impl PrefixRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `(rig, prefix)` pairs, failing on the first conflict.
    pub fn from_rigs<I, R, P>(rigs: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (R, P)>,
        R: AsRef<str>,
        P: AsRef<str>,
    {
        let mut registry = Self::new();
        for (rig, prefix) in rigs {
            registry.register(prefix.as_ref(), rig.as_ref())?;
        }
        Ok(registry)
    }

    /// Register a prefix for a rig.
    ///
    /// Registering the exact same pair twice is a no-op. Binding either side to a
    /// different counterpart fails, which keeps the mapping a bijection.
    pub fn register(&mut self, prefix: &str, rig: &str) -> Result<(), RegistryError> {
        if prefix.is_empty() || prefix.contains(SESSION_SEPARATOR) {
            return Err(RegistryError::InvalidPrefix(prefix.to_string()));
        }
        if prefix == TOWN_PREFIX {
            return Err(RegistryError::ReservedPrefix(prefix.to_string()));
        }
        if rig.trim().is_empty() {
            return Err(RegistryError::EmptyRigName);
        }

        if let Some(existing) = self.rigs_by_prefix.get(prefix) {
            if existing == rig {
                return Ok(());
            }
            return Err(RegistryError::DuplicatePrefix {
                prefix: prefix.to_string(),
                existing: existing.clone(),
                rig: rig.to_string(),
            });
        }
        if let Some(existing) = self.prefixes_by_rig.get(rig) {
            return Err(RegistryError::DuplicateRig {
                rig: rig.to_string(),
                existing: existing.clone(),
                prefix: prefix.to_string(),
            });
        }

        debug!(prefix, rig, "registered rig prefix");
        self.rigs_by_prefix
            .insert(prefix.to_string(), rig.to_string());
        self.prefixes_by_rig
            .insert(rig.to_string(), prefix.to_string());
        Ok(())
    }

    /// Rig name for a prefix
    pub fn lookup_rig(&self, prefix: &str) -> Option<&str> {
        self.rigs_by_prefix.get(prefix).map(String::as_str)
    }

    /// Prefix for a rig name
    pub fn lookup_prefix(&self, rig: &str) -> Option<&str> {
        self.prefixes_by_rig.get(rig).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rigs_by_prefix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rigs_by_prefix.is_empty()
    }

    /// All `(rig, prefix)` pairs sorted by rig name.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        let mut entries: Vec<(&str, &str)> = self
            .prefixes_by_rig
            .iter()
            .map(|(rig, prefix)| (rig.as_str(), prefix.as_str()))
            .collect();
        entries.sort();
        entries
    }
}

fn default_slot() -> &'static RwLock<Arc<PrefixRegistry>> {
    static DEFAULT: OnceLock<RwLock<Arc<PrefixRegistry>>> = OnceLock::new();
    DEFAULT.get_or_init(|| RwLock::new(Arc::new(PrefixRegistry::new())))
}

/// The process-wide registry used by callers that don't thread one explicitly.
pub fn default_registry() -> Arc<PrefixRegistry> {
    default_slot().read().clone()
}

/// Replace the process-wide registry and return the previous one.
///
/// Last writer wins. Callers that swap it for a scope (tests, alternate towns)
/// must put the previous instance back themselves.
pub fn set_default_registry(registry: Arc<PrefixRegistry>) -> Arc<PrefixRegistry> {
    std::mem::replace(&mut *default_slot().write(), registry)
}
