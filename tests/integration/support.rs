//! Fixtures shared by the integration tests.

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use townctl::config::{RigEntry, TownConfig};
use townctl::tooling::CliContext;

pub fn valid_settings() -> Value {
    json!({
        "enabledPlugins": ["plugin1"],
        "hooks": {
            "SessionStart": [{
                "matcher": "**",
                "hooks": [
                    {"type": "command", "command": "export PATH=/usr/local/bin:$PATH"},
                    {"type": "command", "command": "gt nudge deacon session-started"}
                ]
            }],
            "Stop": [{
                "matcher": "**",
                "hooks": [
                    {"type": "command", "command": "gt costs record --session $CLAUDE_SESSION_ID"}
                ]
            }]
        }
    })
}

/// Valid settings with the named elements removed: `enabledPlugins`, `hooks`,
/// `PATH`, `deacon-nudge` or `Stop`.
pub fn stale_settings(missing: &[&str]) -> Value {
    let mut settings = valid_settings();
    for element in missing {
        match *element {
            "enabledPlugins" | "hooks" => {
                settings.as_object_mut().unwrap().remove(*element);
            }
            "PATH" => drop_session_start_command(&mut settings, "PATH="),
            "deacon-nudge" => drop_session_start_command(&mut settings, "gt nudge deacon"),
            "Stop" => {
                settings["hooks"].as_object_mut().unwrap().remove("Stop");
            }
            other => panic!("unknown settings element {}", other),
        }
    }
    settings
}

fn drop_session_start_command(settings: &mut Value, marker: &str) {
    let hooks = settings["hooks"]["SessionStart"][0]["hooks"]
        .as_array_mut()
        .unwrap();
    hooks.retain(|h| !h["command"].as_str().unwrap_or_default().contains(marker));
}

pub fn write_json(path: &Path, value: &Value) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, serde_json::to_string_pretty(value).unwrap()).unwrap();
}

pub fn write_valid(town: &Path, relative: &str) -> PathBuf {
    let path = town.join(relative);
    write_json(&path, &valid_settings());
    path
}

pub fn write_stale(town: &Path, relative: &str, missing: &[&str]) -> PathBuf {
    let path = town.join(relative);
    write_json(&path, &stale_settings(missing));
    path
}

/// Context for `town` with the rigs used across these tests.
pub fn context(town: &Path) -> CliContext {
    let mut config = TownConfig::default();
    config.rigs.push(RigEntry::new("gastown", "gt"));
    config.rigs.push(RigEntry::new("beads", "bd"));
    CliContext::with_config(town.to_path_buf(), config).unwrap()
}

pub fn write_sessions(dir: &Path, sessions: &Value) -> PathBuf {
    let path = dir.join("sessions.json");
    write_json(&path, sessions);
    path
}

/// The fleet used by the resolution table.
pub fn fleet() -> Value {
    json!([
        {"name": "hq-mayor", "type": "mayor"},
        {"name": "hq-deacon", "type": "deacon"},
        {"name": "gt-witness", "type": "witness", "rig": "gastown"},
        {"name": "gt-refinery", "type": "refinery", "rig": "gastown"},
        {"name": "gt-crew-max", "type": "crew", "rig": "gastown", "agent_name": "max"},
        {"name": "gt-crew-joe", "type": "crew", "rig": "gastown", "agent_name": "joe"},
        {"name": "gt-alpha", "type": "polecat", "rig": "gastown", "agent_name": "alpha"},
        {"name": "gt-beta", "type": "polecat", "rig": "gastown", "agent_name": "beta"},
        {"name": "bd-witness", "type": "witness", "rig": "beads"},
        {"name": "bd-gamma", "type": "polecat", "rig": "beads", "agent_name": "gamma"}
    ])
}
