//! `git` CLI adapter for [`BranchStore`].

use super::contract::BranchStore;
use crate::error::ApiError;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Shared bare repository inside a rig.
pub const BARE_REPO_DIR: &str = ".repo.git";

/// Branch store backed by the `git` binary, run inside one repository.
pub struct GitBranchStore {
    git_path: String,
    repo: PathBuf,
}

impl GitBranchStore {
    pub fn new(repo: impl Into<PathBuf>) -> Self {
        Self {
            git_path: "git".to_string(),
            repo: repo.into(),
        }
    }

    /// Locate the repository base for a rig: the shared bare repo if present,
    /// otherwise the mayor's checkout.
    pub fn for_rig(rig_path: &Path) -> Result<Self, ApiError> {
        let bare = rig_path.join(BARE_REPO_DIR);
        if bare.is_dir() {
            return Ok(Self::new(bare));
        }
        let mayor_checkout = rig_path.join("mayor").join("rig");
        if mayor_checkout.is_dir() {
            return Ok(Self::new(mayor_checkout));
        }
        Err(ApiError::PruneError(format!(
            "no repo base found in {} (neither {} nor mayor/rig exists)",
            rig_path.display(),
            BARE_REPO_DIR
        )))
    }

    pub fn repo(&self) -> &Path {
        &self.repo
    }

    fn run(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.git_path)
            .arg("-C")
            .arg(&self.repo)
            .args(args)
            .output()
            .with_context(|| format!("Failed to execute git {}", args.join(" ")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git {} failed: {}", args.join(" "), stderr.trim());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn list(&self, extra: &[&str], pattern: &str) -> Result<Vec<String>> {
        let mut args = vec!["branch"];
        args.extend_from_slice(extra);
        args.extend_from_slice(&["--list", pattern, "--format=%(refname:short)"]);
        let stdout = self.run(&args)?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect())
    }
}

impl BranchStore for GitBranchStore {
    fn list_branches(&self, pattern: &str) -> Result<Vec<String>> {
        self.list(&[], pattern)
    }

    fn list_remote_branches(&self, pattern: &str) -> Result<Vec<String>> {
        self.list(&["-r"], pattern)
    }

    fn delete_branch(&self, name: &str, force: bool) -> Result<()> {
        let flag = if force { "-D" } else { "-d" };
        self.run(&["branch", flag, name]).map(|_| ())
    }

    fn delete_remote_branch(&self, remote: &str, name: &str) -> Result<()> {
        self.run(&["push", remote, "--delete", name]).map(|_| ())
    }

    fn fetch_prune(&self, remote: &str) -> Result<()> {
        self.run(&["fetch", "--prune", remote]).map(|_| ())
    }
}
