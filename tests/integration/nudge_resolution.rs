use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tempfile::TempDir;
use townctl::error::ApiError;
use townctl::tooling::Commands;

use crate::integration::support::{context, fleet, write_sessions};

fn resolve(pattern: &str) -> Vec<String> {
    let temp = TempDir::new().unwrap();
    let sessions = write_sessions(temp.path(), &fleet());
    let output = context(temp.path())
        .execute(&Commands::Resolve {
            pattern: pattern.to_string(),
            sessions,
            format: "json".to_string(),
        })
        .unwrap();
    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(parsed["pattern"], pattern);
    parsed["sessions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s.as_str().unwrap().to_string())
        .collect()
}

#[test]
fn resolve_command_matches_address_patterns() {
    let cases: Vec<(&str, Vec<&str>)> = vec![
        ("mayor", vec!["hq-mayor"]),
        ("deacon", vec!["hq-deacon"]),
        ("gastown/witness", vec!["gt-witness"]),
        ("gastown/refinery", vec!["gt-refinery"]),
        ("*/witness", vec!["bd-witness", "gt-witness"]),
        ("gastown/crew/*", vec!["gt-crew-joe", "gt-crew-max"]),
        ("gastown/crew/max", vec!["gt-crew-max"]),
        ("gastown/polecats/*", vec!["gt-alpha", "gt-beta"]),
        ("gastown/polecats/alpha", vec!["gt-alpha"]),
        ("gastown/alpha", vec!["gt-alpha"]),
        ("gastown/*", vec!["gt-alpha", "gt-beta"]),
        ("beads/polecats/*", vec!["bd-gamma"]),
        ("gastown/crew/nobody", vec![]),
        ("nowhere/witness", vec![]),
        ("gastown/crew/max/extra", vec![]),
        ("", vec![]),
    ];

    for (pattern, expected) in cases {
        assert_eq!(resolve(pattern), expected, "pattern {:?}", pattern);
    }
}

#[test]
fn resolve_text_reports_no_match() {
    let temp = TempDir::new().unwrap();
    let sessions = write_sessions(temp.path(), &fleet());
    let output = context(temp.path())
        .execute(&Commands::Resolve {
            pattern: "gastown/crew/nobody".to_string(),
            sessions,
            format: "text".to_string(),
        })
        .unwrap();
    assert_eq!(output, "No sessions match gastown/crew/nobody");
}

#[test]
fn address_command_inverts_session_names() {
    let temp = TempDir::new().unwrap();
    let ctx = context(temp.path());
    let cases = [
        ("hq-mayor", "mayor"),
        ("hq-deacon", "deacon"),
        ("gt-witness", "gastown/witness"),
        ("bd-refinery", "beads/refinery"),
        ("gt-crew-max", "gastown/crew/max"),
        ("gt-alpha", "gastown/alpha"),
    ];
    for (session, address) in cases {
        let out = ctx
            .execute(&Commands::Address {
                session: session.to_string(),
            })
            .unwrap();
        assert_eq!(out, address, "session {}", session);
    }

    for unknown in ["zz-witness", "gt-", "gt-crew-", "nohyphen"] {
        let err = ctx
            .execute(&Commands::Address {
                session: unknown.to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, ApiError::UnknownSession(_)), "{}", unknown);
    }
}

#[test]
fn nudge_plan_lists_targets_with_addresses() {
    let temp = TempDir::new().unwrap();
    let sessions = write_sessions(temp.path(), &fleet());
    let output = context(temp.path())
        .execute(&Commands::Nudge {
            pattern: "gastown/crew/*".to_string(),
            sessions,
            if_fresh: false,
            format: "json".to_string(),
        })
        .unwrap();

    let parsed: Value = serde_json::from_str(&output).unwrap();
    assert_eq!(
        parsed["targets"],
        json!([
            {"session": "gt-crew-joe", "address": "gastown/crew/joe"},
            {"session": "gt-crew-max", "address": "gastown/crew/max"}
        ])
    );
    assert_eq!(parsed["suppressed"], json!([]));
}

#[test]
fn nudge_if_fresh_suppresses_old_sessions() {
    let now = Utc::now();
    let sessions = json!([
        {"name": "gt-alpha", "type": "polecat", "rig": "gastown", "agent_name": "alpha",
         "created_at": (now - Duration::seconds(5)).to_rfc3339()},
        {"name": "gt-beta", "type": "polecat", "rig": "gastown", "agent_name": "beta",
         "created_at": (now - Duration::seconds(600)).to_rfc3339()},
        {"name": "gt-gamma", "type": "polecat", "rig": "gastown", "agent_name": "gamma"}
    ]);

    let temp = TempDir::new().unwrap();
    let path = write_sessions(temp.path(), &sessions);
    let output = context(temp.path())
        .execute(&Commands::Nudge {
            pattern: "gastown/polecats/*".to_string(),
            sessions: path,
            if_fresh: true,
            format: "json".to_string(),
        })
        .unwrap();

    let parsed: Value = serde_json::from_str(&output).unwrap();
    let targets = parsed["targets"].as_array().unwrap();
    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0]["session"], "gt-alpha");

    let suppressed = parsed["suppressed"].as_array().unwrap();
    assert_eq!(suppressed.len(), 2);
    assert_eq!(suppressed[0]["session"], "gt-beta");
    assert!(suppressed[0]["reason"].as_str().unwrap().contains("old"));
    assert_eq!(suppressed[1]["session"], "gt-gamma");
    assert_eq!(suppressed[1]["reason"], "creation time unknown");
}

#[test]
fn nudge_without_matches_is_an_error() {
    let temp = TempDir::new().unwrap();
    let sessions = write_sessions(temp.path(), &fleet());
    let err = context(temp.path())
        .execute(&Commands::Nudge {
            pattern: "nowhere/witness".to_string(),
            sessions,
            if_fresh: false,
            format: "text".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::NoTargets(_)));
}

#[test]
fn inconsistent_sessions_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let sessions = write_sessions(
        temp.path(),
        &json!([{"name": "gt-witness", "type": "witness"}]),
    );
    let err = context(temp.path())
        .execute(&Commands::Resolve {
            pattern: "*/witness".to_string(),
            sessions,
            format: "text".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ApiError::SessionsError(_)));
}
