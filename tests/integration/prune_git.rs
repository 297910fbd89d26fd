use std::collections::HashSet;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;
use townctl::prune::{BranchOutcome, BranchPruner, BranchStore, GitBranchStore, PruneOptions};

fn git(repo: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .arg("-C")
        .arg(repo)
        .args([
            "-c",
            "user.name=Town",
            "-c",
            "user.email=town@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// A rig whose mayor checkout has an initial commit and the given branches.
/// Returns None when git is unavailable.
fn rig_with_branches(branches: &[&str]) -> Option<TempDir> {
    let temp = TempDir::new().unwrap();
    let repo = temp.path().join("mayor/rig");
    std::fs::create_dir_all(&repo).unwrap();
    if !git(&repo, &["init", "-q"]) {
        return None;
    }
    assert!(git(&repo, &["commit", "-q", "--allow-empty", "-m", "init"]));
    for branch in branches {
        assert!(git(&repo, &["branch", branch]));
    }
    Some(temp)
}

#[test]
fn prunes_inactive_polecat_branches_in_real_repo() {
    let Some(rig) = rig_with_branches(&["polecat/alpha", "polecat/beta", "feature/x"]) else {
        return;
    };
    let store = GitBranchStore::for_rig(rig.path()).unwrap();
    let active: HashSet<String> = ["polecat/beta".to_string()].into_iter().collect();

    let report = BranchPruner::new(&store)
        .run(&active, &PruneOptions::default())
        .unwrap();

    assert_eq!(report.pruned(), 1);
    assert_eq!(report.kept(), 1);
    let remaining = store.list_branches("polecat/*").unwrap();
    assert_eq!(remaining, vec!["polecat/beta".to_string()]);
    assert_eq!(store.list_branches("feature/*").unwrap(), vec!["feature/x".to_string()]);
}

#[test]
fn dry_run_leaves_real_repo_untouched() {
    let Some(rig) = rig_with_branches(&["polecat/alpha", "polecat/beta"]) else {
        return;
    };
    let store = GitBranchStore::for_rig(rig.path()).unwrap();
    let options = PruneOptions {
        dry_run: true,
        remote: false,
    };

    let report = BranchPruner::new(&store).run(&HashSet::new(), &options).unwrap();

    assert!(report
        .local
        .iter()
        .all(|a| a.outcome == BranchOutcome::WouldPrune));
    assert_eq!(store.list_branches("polecat/*").unwrap().len(), 2);
}

#[test]
fn remote_mode_without_origin_warns_and_keeps_going() {
    let Some(rig) = rig_with_branches(&["polecat/alpha"]) else {
        return;
    };
    let store = GitBranchStore::for_rig(rig.path()).unwrap();
    let options = PruneOptions {
        dry_run: false,
        remote: true,
    };

    let report = BranchPruner::new(&store).run(&HashSet::new(), &options).unwrap();

    assert_eq!(report.pruned(), 1);
    assert!(report.remote.is_empty());
    assert!(!report.warnings.is_empty());
}
