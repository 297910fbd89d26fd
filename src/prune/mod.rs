//! Polecat Branch Pruning
//!
//! Removes `polecat/*` branches that no active polecat owns, locally and
//! optionally on `origin`.

mod contract;
mod git;
mod pruner;

pub use contract::BranchStore;
pub use git::{GitBranchStore, BARE_REPO_DIR};
pub use pruner::{
    BranchAction, BranchOutcome, BranchPruner, PruneOptions, PruneReport, DEFAULT_REMOTE,
    POLECAT_BRANCH_PATTERN,
};
