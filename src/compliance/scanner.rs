//! Settings compliance scan over a town root.

use super::settings::{CompliancePolicy, SettingsFile};
use crate::error::ComplianceError;
use crate::topology::{
    classify_settings_path, is_hidden, Role, SkipList, CLAUDE_DIR, CREW_DIR, POLECATS_DIR,
    REFINERY_DIR, RIG_CHECKOUT_DIR, SETTINGS_FILE, WITNESS_DIR,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Overall scan outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Error,
}

/// Report of one scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanResult {
    pub status: CheckStatus,
    pub message: String,
    /// One line per stale file, in scan order
    pub details: Vec<String>,
    pub files_checked: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_hint: Option<String>,
}

impl ScanResult {
    pub fn is_ok(&self) -> bool {
        self.status == CheckStatus::Ok
    }
}

/// The `claude-settings` check: scans, reports, and keeps the stale list for
/// a later [`SettingsCheck::fix`].
#[derive(Debug, Clone, Default)]
pub struct SettingsCheck {
    pub(super) policy: CompliancePolicy,
    pub(super) skip: SkipList,
    pub(super) stale: Vec<SettingsFile>,
}

impl SettingsCheck {
    pub const NAME: &'static str = "claude-settings";

    pub fn new(policy: CompliancePolicy, skip: SkipList) -> Self {
        Self {
            policy,
            skip,
            stale: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// Whether the check has an automatic remediation.
    pub fn can_fix(&self) -> bool {
        true
    }

    /// Stale files found by the most recent run.
    pub fn stale_files(&self) -> &[SettingsFile] {
        &self.stale
    }

    /// Scan the town and replace the retained stale list.
    pub fn run(&mut self, town_root: &Path) -> Result<ScanResult, ComplianceError> {
        if !town_root.is_dir() {
            return Err(ComplianceError::NotADirectory(town_root.to_path_buf()));
        }

        let candidates = discover_settings(town_root, &self.skip)?;
        let files_checked = candidates.len();
        let mut stale = Vec::new();

        for relative in candidates {
            let Some((role, location)) = classify_settings_path(&relative, &self.skip) else {
                continue;
            };
            let mut file = SettingsFile::load(town_root, &relative, role, location)?;
            file.validate(&self.policy);
            if file.is_stale() {
                debug!(path = %file.relative.display(), reasons = ?file.reasons, "stale settings");
                stale.push(file);
            }
        }

        self.stale = stale;
        let result = self.summarize(files_checked);
        if result.is_ok() {
            info!(files_checked, "settings check passed");
        } else {
            warn!(files_checked, stale = self.stale.len(), "settings check found stale files");
        }
        Ok(result)
    }

    fn summarize(&self, files_checked: usize) -> ScanResult {
        if self.stale.is_empty() {
            return ScanResult {
                status: CheckStatus::Ok,
                message: format!("All {} settings file(s) are current", files_checked),
                details: Vec::new(),
                files_checked,
                fix_hint: None,
            };
        }

        let removable = self.stale.iter().filter(|f| f.is_removable()).count();
        let fix_hint = if removable > 0 {
            Some(format!(
                "Run with --fix to delete {} misplaced settings file(s)",
                removable
            ))
        } else {
            Some("Regenerate the listed settings files; --fix only removes misplaced files".to_string())
        };

        ScanResult {
            status: CheckStatus::Error,
            message: format!("Found {} stale settings file(s)", self.stale.len()),
            details: self.stale.iter().map(SettingsFile::detail).collect(),
            files_checked,
            fix_hint,
        }
    }
}

/// Relative paths of every settings file in a role location, correct or misplaced.
///
/// Order is deterministic: mayor, deacon, then rigs by name, each rig listing
/// witness, refinery, crew, polecats. A location that exists but cannot be
/// inspected fails the scan.
fn discover_settings(town_root: &Path, skip: &SkipList) -> Result<Vec<PathBuf>, ComplianceError> {
    let mut found = Vec::new();
    let mut push_if_file = |relative: PathBuf| -> Result<(), ComplianceError> {
        if is_settings_file(town_root, &relative)? {
            found.push(relative);
        }
        Ok(())
    };

    push_if_file(Role::Mayor.settings_path())?;
    push_if_file(Role::Deacon.settings_path())?;

    for rig in child_dirs(town_root)? {
        if skip.is_skipped(&rig) {
            continue;
        }
        let rig_dir = Path::new(&rig);
        for home in [WITNESS_DIR, REFINERY_DIR] {
            let home_dir = rig_dir.join(home);
            push_if_file(home_dir.join(RIG_CHECKOUT_DIR).join(CLAUDE_DIR).join(SETTINGS_FILE))?;
            push_if_file(home_dir.join(CLAUDE_DIR).join(SETTINGS_FILE))?;
        }
        for group in [CREW_DIR, POLECATS_DIR] {
            let group_dir = town_root.join(rig_dir).join(group);
            if !matches!(stat(&group_dir)?, Some(meta) if meta.is_dir()) {
                continue;
            }
            for member in child_dirs(&group_dir)? {
                if is_hidden(&member) {
                    continue;
                }
                push_if_file(rig_dir.join(group).join(member).join(CLAUDE_DIR).join(SETTINGS_FILE))?;
            }
        }
    }

    Ok(found)
}

/// Metadata for `path`, or None when it does not exist.
fn stat(path: &Path) -> Result<Option<fs::Metadata>, ComplianceError> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ComplianceError::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Whether `relative` names a regular file under `root`.
///
/// Descends one component at a time so a missing or non-directory ancestor
/// reads as absent, while a permission error on any ancestor is reported.
fn is_settings_file(root: &Path, relative: &Path) -> Result<bool, ComplianceError> {
    let mut current = root.to_path_buf();
    let mut components = relative.components().peekable();
    while let Some(component) = components.next() {
        current.push(component);
        let Some(meta) = stat(&current)? else {
            return Ok(false);
        };
        let is_last = components.peek().is_none();
        if is_last {
            return Ok(meta.is_file());
        }
        if !meta.is_dir() {
            return Ok(false);
        }
    }
    Ok(false)
}

/// Names of the immediate subdirectories of `dir`, sorted.
fn child_dirs(dir: &Path) -> Result<Vec<String>, ComplianceError> {
    let mut names = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for entry in walker {
        let entry = entry.map_err(|source| ComplianceError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_dir() {
            continue;
        }
        match entry.file_name().to_str() {
            Some(name) => names.push(name.to_string()),
            None => warn!(
                path = %entry.path().display(),
                "skipping directory with a non-UTF-8 name"
            ),
        }
    }
    Ok(names)
}
