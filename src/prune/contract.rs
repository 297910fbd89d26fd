//! Branch store port used by the pruner.

/// List and delete capability over a repository's branches.
///
/// Abstracting the repository lets the pruner run against an in-memory store
/// in tests and against the `git` CLI in production.
pub trait BranchStore {
    /// Local branch names matching a glob such as `polecat/*`.
    fn list_branches(&self, pattern: &str) -> anyhow::Result<Vec<String>>;

    /// Remote-tracking branch names matching a glob such as `origin/polecat/*`.
    fn list_remote_branches(&self, pattern: &str) -> anyhow::Result<Vec<String>>;

    fn delete_branch(&self, name: &str, force: bool) -> anyhow::Result<()>;

    fn delete_remote_branch(&self, remote: &str, name: &str) -> anyhow::Result<()>;

    /// Drop stale remote-tracking refs for `remote`.
    fn fetch_prune(&self, remote: &str) -> anyhow::Result<()>;
}
