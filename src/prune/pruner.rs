//! Polecat branch pruning: delete branches no active polecat owns.

use super::contract::BranchStore;
use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{info, warn};

/// Glob for local polecat branches.
pub const POLECAT_BRANCH_PATTERN: &str = "polecat/*";

pub const DEFAULT_REMOTE: &str = "origin";

#[derive(Debug, Clone, Default)]
pub struct PruneOptions {
    /// Report what would be pruned without deleting
    pub dry_run: bool,
    /// Also prune remote branches
    pub remote: bool,
}

/// What happened to one branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "error", rename_all = "snake_case")]
pub enum BranchOutcome {
    /// Owned by an active polecat
    Kept,
    Pruned,
    WouldPrune,
    Failed(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BranchAction {
    pub branch: String,
    #[serde(flatten)]
    pub outcome: BranchOutcome,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PruneReport {
    pub dry_run: bool,
    pub local: Vec<BranchAction>,
    pub remote: Vec<BranchAction>,
    /// Non-fatal problems on the remote side
    pub warnings: Vec<String>,
}

impl PruneReport {
    fn count(&self, pred: impl Fn(&BranchOutcome) -> bool) -> usize {
        self.local
            .iter()
            .chain(self.remote.iter())
            .filter(|a| pred(&a.outcome))
            .count()
    }

    /// Branches deleted, or that would be deleted in a dry run.
    pub fn pruned(&self) -> usize {
        self.count(|o| matches!(o, BranchOutcome::Pruned | BranchOutcome::WouldPrune))
    }

    pub fn kept(&self) -> usize {
        self.count(|o| matches!(o, BranchOutcome::Kept))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, BranchOutcome::Failed(_)))
    }
}

/// Prunes polecat branches through a [`BranchStore`].
pub struct BranchPruner<'a, S: BranchStore> {
    store: &'a S,
    remote_name: String,
}

impl<'a, S: BranchStore> BranchPruner<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            remote_name: DEFAULT_REMOTE.to_string(),
        }
    }

    /// Prune every polecat branch not in `active`.
    ///
    /// Failing to list local branches aborts. Individual deletions and all
    /// remote-side problems are recorded in the report instead.
    pub fn run(
        &self,
        active: &HashSet<String>,
        options: &PruneOptions,
    ) -> Result<PruneReport, ApiError> {
        let mut report = PruneReport {
            dry_run: options.dry_run,
            ..PruneReport::default()
        };

        let local = self
            .store
            .list_branches(POLECAT_BRANCH_PATTERN)
            .map_err(|e| ApiError::PruneError(format!("listing local branches: {:#}", e)))?;
        for branch in local {
            let outcome = self.decide(&branch, active, options.dry_run, |b| {
                self.store.delete_branch(b, true)
            });
            report.local.push(BranchAction { branch, outcome });
        }

        if options.remote {
            self.prune_remote(active, options, &mut report);
        }

        info!(
            pruned = report.pruned(),
            kept = report.kept(),
            failed = report.failed(),
            dry_run = options.dry_run,
            "polecat branch prune finished"
        );
        Ok(report)
    }

    fn prune_remote(&self, active: &HashSet<String>, options: &PruneOptions, report: &mut PruneReport) {
        let remote = self.remote_name.as_str();
        if let Err(e) = self.store.fetch_prune(remote) {
            warn!(error = %e, "fetch --prune failed, continuing");
            report
                .warnings
                .push(format!("git fetch --prune failed: {:#} (continuing)", e));
        }

        let pattern = format!("{}/{}", remote, POLECAT_BRANCH_PATTERN);
        let branches = match self.store.list_remote_branches(&pattern) {
            Ok(branches) => branches,
            Err(e) => {
                report
                    .warnings
                    .push(format!("listing remote branches: {:#}", e));
                return;
            }
        };

        let tracking_prefix = format!("{}/", remote);
        for remote_branch in branches {
            let branch = remote_branch
                .strip_prefix(&tracking_prefix)
                .unwrap_or(&remote_branch)
                .to_string();
            let outcome = self.decide(&branch, active, options.dry_run, |b| {
                self.store.delete_remote_branch(remote, b)
            });
            report.remote.push(BranchAction {
                branch: remote_branch,
                outcome,
            });
        }
    }

    fn decide(
        &self,
        branch: &str,
        active: &HashSet<String>,
        dry_run: bool,
        delete: impl FnOnce(&str) -> anyhow::Result<()>,
    ) -> BranchOutcome {
        if active.contains(branch) {
            return BranchOutcome::Kept;
        }
        if dry_run {
            return BranchOutcome::WouldPrune;
        }
        match delete(branch) {
            Ok(()) => BranchOutcome::Pruned,
            Err(e) => {
                warn!(branch, error = %e, "failed to delete branch");
                BranchOutcome::Failed(format!("{:#}", e))
            }
        }
    }
}
