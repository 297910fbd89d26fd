//! Settings Compliance
//!
//! Finds every agent settings file under a town, checks placement and content
//! against policy, and removes misplaced copies on request.

mod remediate;
mod scanner;
pub mod settings;

pub use remediate::{FixFailure, FixReport};
pub use scanner::{CheckStatus, ScanResult, SettingsCheck};
pub use settings::{check_structure, CompliancePolicy, SettingsContent, SettingsFile, StaleReason};
