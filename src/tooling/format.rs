//! Format command results as text or JSON.

use crate::compliance::{FixReport, ScanResult};
use crate::error::ApiError;
use crate::fleet::NudgePlan;
use crate::prune::{BranchAction, BranchOutcome, PruneReport};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde::Serialize;

/// Format a section heading with bold/underline.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Pretty JSON for any serializable result.
pub fn to_json<T: Serialize>(value: &T) -> Result<String, ApiError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ApiError::OutputError(format!("JSON serialization failed: {}", e)))
}

pub fn format_resolve_text(pattern: &str, sessions: &[String]) -> String {
    if sessions.is_empty() {
        return format!("No sessions match {}", pattern);
    }
    sessions.join("\n")
}

pub fn format_nudge_text(plan: &NudgePlan) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("Nudge targets for {}", plan.pattern))
    ));

    if plan.targets.is_empty() {
        out.push_str("No sessions to nudge.\n");
    } else {
        let mut table = Table::new();
        table.load_preset(UTF8_BORDERS_ONLY);
        table.set_header(vec!["Session", "Address"]);
        for target in &plan.targets {
            let address = if target.address.is_empty() {
                "-".to_string()
            } else {
                target.address.clone()
            };
            table.add_row(vec![target.session.clone(), address]);
        }
        out.push_str(&format!("{}\n", table));
    }

    if !plan.suppressed.is_empty() {
        out.push_str(&format!("\n{}\n\n", format_section_heading("Suppressed")));
        for skipped in &plan.suppressed {
            out.push_str(&format!(
                "  {} {} ({})\n",
                "-".dimmed(),
                skipped.session,
                skipped.reason
            ));
        }
    }
    out
}

pub fn format_scan_text(check_name: &str, result: &ScanResult) -> String {
    let mut out = String::new();
    let marker = if result.is_ok() {
        format!("{}", "✓".green())
    } else {
        format!("{}", "✗".red())
    };
    out.push_str(&format!("{} {}: {}\n", marker, check_name, result.message));
    for detail in &result.details {
        out.push_str(&format!("    {}\n", detail));
    }
    if let Some(hint) = &result.fix_hint {
        out.push_str(&format!("  {} {}\n", "hint:".yellow(), hint));
    }
    out
}

pub fn format_fix_text(report: &FixReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Removed {} misplaced settings file(s)\n",
        report.removed.len()
    ));
    for path in &report.removed {
        out.push_str(&format!("  {} {}\n", "✓".green(), path.display()));
    }
    for failure in &report.failed {
        out.push_str(&format!(
            "  {} {}: {}\n",
            "fail".red(),
            failure.path.display(),
            failure.error
        ));
    }
    if !report.skipped.is_empty() {
        out.push_str(&format!(
            "Left {} correctly placed file(s) for regeneration\n",
            report.skipped.len()
        ));
    }
    out
}

pub fn format_prune_text(rig: &str, report: &PruneReport) -> String {
    let mut out = String::new();
    let verb = if report.dry_run { "Scanning" } else { "Pruning" };
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&format!("{} polecat branches in {}", verb, rig))
    ));

    if report.local.is_empty() {
        out.push_str("No local polecat branches found.\n\n");
    } else {
        out.push_str("Local branches\n");
        out.push_str(&format!("{}\n\n", branch_table(&report.local)));
    }

    if !report.remote.is_empty() {
        out.push_str("Remote branches\n");
        out.push_str(&format!("{}\n\n", branch_table(&report.remote)));
    }
    for warning in &report.warnings {
        out.push_str(&format!("{} {}\n", "warning:".yellow(), warning));
    }

    let pruned_label = if report.dry_run { "Would prune" } else { "Pruned" };
    out.push_str(&format!(
        "{} {}, kept {}, failed {}",
        pruned_label,
        report.pruned(),
        report.kept(),
        report.failed()
    ));
    out
}

fn branch_table(actions: &[BranchAction]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Branch", "Result"]);
    for action in actions {
        let result = match &action.outcome {
            BranchOutcome::Kept => "kept (active polecat)".to_string(),
            BranchOutcome::Pruned => "pruned".to_string(),
            BranchOutcome::WouldPrune => "would prune".to_string(),
            BranchOutcome::Failed(e) => format!("failed: {}", e),
        };
        table.add_row(vec![action.branch.clone(), result]);
    }
    table
}

pub fn format_rigs_text(entries: &[(&str, &str)]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Rigs")));
    if entries.is_empty() {
        out.push_str("No rigs configured.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Rig", "Prefix"]);
    for (rig, prefix) in entries {
        table.add_row(vec![rig.to_string(), prefix.to_string()]);
    }
    out.push_str(&format!("{}\n", table));
    out
}
