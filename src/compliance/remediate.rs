//! Remediation for the settings check.
//!
//! Only misplaced files are handled, and only by deletion. Correctly placed
//! files with missing content are reported by the scan and left alone.

use super::scanner::SettingsCheck;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

/// A file that could not be deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a fix pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FixReport {
    pub removed: Vec<PathBuf>,
    pub failed: Vec<FixFailure>,
    /// Stale files left in place because they are correctly located
    pub skipped: Vec<PathBuf>,
}

impl FixReport {
    /// True when every removable file was deleted.
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl SettingsCheck {
    /// Delete every retained stale file that is in the wrong location.
    ///
    /// A failed deletion is recorded and the remaining files are still tried.
    /// Deleted files drop out of the retained list, so repeating the call has
    /// no further effect.
    pub fn fix(&mut self) -> FixReport {
        let mut report = FixReport::default();
        let mut retained = Vec::with_capacity(self.stale.len());

        for file in std::mem::take(&mut self.stale) {
            if !file.is_removable() {
                report.skipped.push(file.path.clone());
                retained.push(file);
                continue;
            }
            match std::fs::remove_file(&file.path) {
                Ok(()) => {
                    info!(path = %file.path.display(), role = %file.role, "removed misplaced settings");
                    report.removed.push(file.path);
                }
                Err(e) => {
                    warn!(path = %file.path.display(), error = %e, "failed to remove misplaced settings");
                    report.failed.push(FixFailure {
                        path: file.path.clone(),
                        error: e.to_string(),
                    });
                    retained.push(file);
                }
            }
        }

        self.stale = retained;
        report
    }
}
