use std::fs;

use tempfile::TempDir;
use townctl::compliance::{CheckStatus, ScanResult, SettingsCheck};

use crate::integration::support::{write_json, write_stale, write_valid};

fn scan(town: &std::path::Path) -> (SettingsCheck, ScanResult) {
    let mut check = SettingsCheck::default();
    let result = check.run(town).unwrap();
    (check, result)
}

fn assert_detail_mentions(result: &ScanResult, needle: &str) {
    assert!(
        result.details.iter().any(|d| d.contains(needle)),
        "expected details to mention {:?}, got {:?}",
        needle,
        result.details
    );
}

#[test]
fn check_is_named_claude_settings() {
    let check = SettingsCheck::default();
    assert_eq!(check.name(), "claude-settings");
    assert!(check.can_fix());
}

#[test]
fn no_settings_files_is_ok() {
    let temp = TempDir::new().unwrap();
    let (_, result) = scan(temp.path());
    assert_eq!(result.status, CheckStatus::Ok);
}

#[test]
fn valid_settings_in_every_canonical_location_are_ok() {
    let locations = [
        ".claude/settings.json",
        "deacon/.claude/settings.json",
        "gastown/witness/rig/.claude/settings.json",
        "gastown/refinery/rig/.claude/settings.json",
        "gastown/crew/max/.claude/settings.json",
        "gastown/polecats/alpha/.claude/settings.json",
    ];
    for location in locations {
        let temp = TempDir::new().unwrap();
        write_valid(temp.path(), location);
        let (_, result) = scan(temp.path());
        assert_eq!(
            result.status,
            CheckStatus::Ok,
            "{}: {}",
            location,
            result.message
        );
        assert_eq!(result.files_checked, 1);
    }
}

#[test]
fn missing_enabled_plugins_is_one_stale_file() {
    let temp = TempDir::new().unwrap();
    write_stale(temp.path(), ".claude/settings.json", &["enabledPlugins"]);
    let (_, result) = scan(temp.path());
    assert_eq!(result.status, CheckStatus::Error);
    assert!(result.message.contains("1 stale"), "{}", result.message);
    assert_detail_mentions(&result, "missing enabledPlugins");
}

#[test]
fn missing_hooks_is_stale() {
    let temp = TempDir::new().unwrap();
    write_stale(temp.path(), ".claude/settings.json", &["hooks"]);
    let (_, result) = scan(temp.path());
    assert_eq!(result.status, CheckStatus::Error);
    assert_detail_mentions(&result, "missing hooks");
}

#[test]
fn missing_path_export_is_stale() {
    let temp = TempDir::new().unwrap();
    write_stale(temp.path(), ".claude/settings.json", &["PATH"]);
    let (_, result) = scan(temp.path());
    assert_eq!(result.status, CheckStatus::Error);
    assert_detail_mentions(&result, "PATH export");
}

#[test]
fn missing_deacon_nudge_is_stale() {
    let temp = TempDir::new().unwrap();
    write_stale(temp.path(), ".claude/settings.json", &["deacon-nudge"]);
    let (_, result) = scan(temp.path());
    assert_eq!(result.status, CheckStatus::Error);
    assert_detail_mentions(&result, "deacon nudge");
}

#[test]
fn missing_stop_hook_is_stale() {
    let temp = TempDir::new().unwrap();
    write_stale(temp.path(), ".claude/settings.json", &["Stop"]);
    let (_, result) = scan(temp.path());
    assert_eq!(result.status, CheckStatus::Error);
    assert_detail_mentions(&result, "Stop hook");
}

#[test]
fn witness_and_refinery_outside_rig_checkout_are_wrong_location() {
    for location in [
        "gastown/witness/.claude/settings.json",
        "gastown/refinery/.claude/settings.json",
    ] {
        let temp = TempDir::new().unwrap();
        write_valid(temp.path(), location);
        let (_, result) = scan(temp.path());
        assert_eq!(result.status, CheckStatus::Error, "{}", location);
        assert_detail_mentions(&result, "wrong location");
    }
}

#[test]
fn multiple_stale_files_are_counted() {
    let temp = TempDir::new().unwrap();
    write_stale(temp.path(), ".claude/settings.json", &["PATH"]);
    write_stale(temp.path(), "deacon/.claude/settings.json", &["Stop"]);
    write_valid(temp.path(), "gastown/witness/.claude/settings.json");

    let (check, result) = scan(temp.path());
    assert_eq!(result.status, CheckStatus::Error);
    assert!(result.message.contains("3 stale"), "{}", result.message);
    assert_eq!(result.details.len(), 3);
    assert_eq!(check.stale_files().len(), 3);
}

#[test]
fn invalid_json_is_stale() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join(".claude/settings.json");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "not valid json {").unwrap();

    let (_, result) = scan(temp.path());
    assert_eq!(result.status, CheckStatus::Error);
    assert_detail_mentions(&result, "invalid JSON");
}

#[test]
fn fix_deletes_misplaced_file_and_rescan_is_ok() {
    let temp = TempDir::new().unwrap();
    let wrong = write_valid(temp.path(), "gastown/witness/.claude/settings.json");

    let (mut check, result) = scan(temp.path());
    assert_eq!(result.status, CheckStatus::Error);

    let report = check.fix();
    assert!(report.is_complete());
    assert!(!wrong.exists());

    let result = check.run(temp.path()).unwrap();
    assert_eq!(result.status, CheckStatus::Ok);
}

#[test]
fn fix_leaves_correctly_placed_stale_files() {
    let temp = TempDir::new().unwrap();
    let deficient = write_stale(temp.path(), "gastown/crew/max/.claude/settings.json", &["PATH"]);

    let (mut check, _) = scan(temp.path());
    let report = check.fix();
    assert!(report.removed.is_empty());
    assert_eq!(report.skipped, vec![deficient.clone()]);
    assert!(deficient.exists());

    let result = check.run(temp.path()).unwrap();
    assert_eq!(result.status, CheckStatus::Error);
}

#[test]
fn skips_non_rig_directories() {
    let temp = TempDir::new().unwrap();
    for skip_dir in ["mayor", "deacon", "daemon", ".git", "docs", ".hidden"] {
        write_stale(
            temp.path(),
            &format!("{}/witness/rig/.claude/settings.json", skip_dir),
            &["PATH"],
        );
    }

    let (check, _) = scan(temp.path());
    assert!(
        check.stale_files().is_empty(),
        "expected 0 stale files, got {}",
        check.stale_files().len()
    );
}

#[test]
fn mixed_valid_and_stale_reports_only_stale() {
    let temp = TempDir::new().unwrap();
    write_valid(temp.path(), ".claude/settings.json");
    write_stale(temp.path(), "gastown/witness/rig/.claude/settings.json", &["PATH"]);
    write_valid(temp.path(), "gastown/refinery/rig/.claude/settings.json");

    let (_, result) = scan(temp.path());
    assert_eq!(result.status, CheckStatus::Error);
    assert!(result.message.contains("1 stale"), "{}", result.message);
    assert_eq!(result.details.len(), 1);
    assert!(result.details[0].starts_with("gastown/witness/rig/.claude/settings.json"));
    assert_eq!(result.files_checked, 3);
}

#[test]
fn mixed_valid_and_misplaced_reports_only_misplaced() {
    let temp = TempDir::new().unwrap();
    write_valid(temp.path(), "gastown/witness/.claude/settings.json");
    write_valid(temp.path(), ".claude/settings.json");
    write_valid(temp.path(), "gastown/refinery/rig/.claude/settings.json");

    let (_, result) = scan(temp.path());
    assert_eq!(result.status, CheckStatus::Error);
    assert!(result.message.contains("1 stale"), "{}", result.message);
    assert_eq!(result.details.len(), 1);
    assert!(result.details[0].starts_with("gastown/witness/.claude/settings.json"));
    assert!(result.details[0].contains("wrong location"), "{}", result.details[0]);
    assert_eq!(result.files_checked, 3);
}

#[test]
fn custom_policy_markers_apply() {
    use townctl::compliance::CompliancePolicy;
    use townctl::topology::SkipList;

    let temp = TempDir::new().unwrap();
    let mut settings = crate::integration::support::valid_settings();
    settings["hooks"]["SessionStart"][0]["hooks"][1]["command"] =
        serde_json::Value::String("town ping deacon".to_string());
    write_json(&temp.path().join(".claude/settings.json"), &settings);

    let policy = CompliancePolicy {
        path_export_marker: "PATH=".to_string(),
        deacon_nudge_marker: "town ping deacon".to_string(),
    };
    let mut check = SettingsCheck::new(policy, SkipList::default());
    assert!(check.run(temp.path()).unwrap().is_ok());

    let (_, default_result) = scan(temp.path());
    assert_detail_mentions(&default_result, "deacon nudge");
}
