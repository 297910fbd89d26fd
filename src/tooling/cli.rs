//! CLI Tooling
//!
//! Command-line interface for town operations. Every command is read-only
//! except `doctor --fix` and `prune` without `--dry-run`.

use super::format::{
    format_fix_text, format_nudge_text, format_prune_text, format_resolve_text,
    format_rigs_text, format_scan_text, to_json,
};
use crate::compliance::{FixReport, ScanResult, SettingsCheck};
use crate::config::{ConfigLoader, TownConfig};
use crate::error::ApiError;
use crate::fleet::{load_sessions, set_default_registry, AddressResolver, NudgePlan, PrefixRegistry};
use crate::logging::LogOverrides;
use crate::prune::{BranchPruner, GitBranchStore, PruneOptions};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// townctl - Agent town addressing and settings compliance
#[derive(Parser, Debug)]
#[command(name = "townctl")]
#[command(about = "Resolve agent addresses and check settings compliance across a town")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Town root directory
    #[arg(long, default_value = ".", global = true)]
    pub town: PathBuf,

    /// Configuration file path (replaces the global and town config files)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn log_overrides(&self) -> LogOverrides {
        LogOverrides {
            level: self.log_level.clone(),
            format: self.log_format.clone(),
            output: self.log_output.clone(),
            file: self.log_file.clone(),
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// List the sessions an address pattern denotes
    Resolve {
        /// Address pattern, e.g. gastown/crew/* or */witness
        pattern: String,
        /// JSON file of running sessions
        #[arg(long)]
        sessions: PathBuf,
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Translate a session name to its address
    Address {
        /// Session name, e.g. gt-crew-max
        session: String,
    },
    /// Plan a nudge: resolve targets without delivering anything
    Nudge {
        /// Address pattern
        pattern: String,
        /// JSON file of running sessions
        #[arg(long)]
        sessions: PathBuf,
        /// Only target sessions created within the last 60 seconds
        #[arg(long)]
        if_fresh: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Check agent settings files for drift
    Doctor {
        /// Delete misplaced settings files
        #[arg(long)]
        fix: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Remove polecat branches not owned by an active polecat
    Prune {
        /// Rig name (directory under the town root)
        rig: String,
        /// Branch of an active polecat; repeat for each
        #[arg(long = "active", required_unless_present = "all")]
        active: Vec<String>,
        /// Treat every polecat branch as stale (no active polecats)
        #[arg(long, conflicts_with = "active")]
        all: bool,
        /// Show what would be pruned without deleting
        #[arg(long)]
        dry_run: bool,
        /// Also prune branches on origin
        #[arg(long)]
        remote: bool,
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// List configured rigs and their session prefixes
    Rigs {
        /// Output format (text or json)
        #[arg(long, default_value = "text", value_parser = ["text", "json"])]
        format: String,
    },
    /// Print the effective configuration
    Config,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Resolve { .. } => "resolve",
            Commands::Address { .. } => "address",
            Commands::Nudge { .. } => "nudge",
            Commands::Doctor { .. } => "doctor",
            Commands::Prune { .. } => "prune",
            Commands::Rigs { .. } => "rigs",
            Commands::Config => "config",
        }
    }
}

#[derive(Serialize)]
struct ResolveOutput<'a> {
    pattern: &'a str,
    sessions: &'a [String],
}

#[derive(Serialize)]
struct DoctorOutput<'a> {
    check: &'a str,
    result: &'a ScanResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    fix: Option<&'a FixReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    after_fix: Option<&'a ScanResult>,
}

#[derive(Serialize)]
struct RigEntry<'a> {
    rig: &'a str,
    prefix: &'a str,
}

/// Loaded configuration and registry for one town.
pub struct CliContext {
    town_root: PathBuf,
    config: TownConfig,
    registry: Arc<PrefixRegistry>,
}

impl CliContext {
    /// Create a new CLI context, loading configuration for `town_root`.
    pub fn new(town_root: PathBuf, config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match &config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load(&town_root)?,
        };
        Self::with_config(town_root, config)
    }

    /// Create a context from an already loaded configuration.
    ///
    /// An existing town root is canonicalized; a missing one is kept as given
    /// so commands that need it can report it.
    pub fn with_config(town_root: PathBuf, config: TownConfig) -> Result<Self, ApiError> {
        let town_root = dunce::canonicalize(&town_root).unwrap_or(town_root);
        let registry = Arc::new(config.registry()?);
        Ok(Self {
            town_root,
            config,
            registry,
        })
    }

    pub fn config(&self) -> &TownConfig {
        &self.config
    }

    pub fn registry(&self) -> &PrefixRegistry {
        &self.registry
    }

    pub fn town_root(&self) -> &Path {
        &self.town_root
    }

    /// Make this context's registry the process-wide default.
    pub fn install_default_registry(&self) {
        set_default_registry(Arc::clone(&self.registry));
    }

    /// Execute a CLI command
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        info!(command = command.name(), town = %self.town_root.display(), "executing command");
        match command {
            Commands::Resolve {
                pattern,
                sessions,
                format,
            } => self.handle_resolve(pattern, sessions, format),
            Commands::Address { session } => self.handle_address(session),
            Commands::Nudge {
                pattern,
                sessions,
                if_fresh,
                format,
            } => self.handle_nudge(pattern, sessions, *if_fresh, format),
            Commands::Doctor { fix, format } => self.handle_doctor(*fix, format),
            Commands::Prune {
                rig,
                active,
                all,
                dry_run,
                remote,
                format,
            } => {
                let options = PruneOptions {
                    dry_run: *dry_run,
                    remote: *remote,
                };
                self.handle_prune(rig, active, *all, &options, format)
            }
            Commands::Rigs { format } => self.handle_rigs(format),
            Commands::Config => self.config.to_toml(),
        }
    }

    fn resolver(&self) -> AddressResolver<'_> {
        AddressResolver::new(&self.registry)
    }

    fn handle_resolve(&self, pattern: &str, sessions: &Path, format: &str) -> Result<String, ApiError> {
        let sessions = load_sessions(sessions)?;
        let mut matched = self.resolver().resolve_pattern(pattern, &sessions);
        matched.sort();
        if format == "json" {
            to_json(&ResolveOutput {
                pattern,
                sessions: &matched,
            })
        } else {
            Ok(format_resolve_text(pattern, &matched))
        }
    }

    fn handle_address(&self, session: &str) -> Result<String, ApiError> {
        let address = self.resolver().session_name_to_address(session);
        if address.is_empty() {
            return Err(ApiError::UnknownSession(session.to_string()));
        }
        Ok(address)
    }

    fn handle_nudge(
        &self,
        pattern: &str,
        sessions: &Path,
        if_fresh: bool,
        format: &str,
    ) -> Result<String, ApiError> {
        let sessions = load_sessions(sessions)?;
        let mut plan = NudgePlan::build(pattern, &sessions, &self.resolver(), if_fresh, Utc::now());
        if plan.targets.is_empty() && plan.suppressed.is_empty() {
            return Err(ApiError::NoTargets(pattern.to_string()));
        }
        plan.targets.sort_by(|a, b| a.session.cmp(&b.session));
        plan.suppressed.sort_by(|a, b| a.session.cmp(&b.session));
        if format == "json" {
            to_json(&plan)
        } else {
            Ok(format_nudge_text(&plan))
        }
    }

    fn handle_doctor(&self, fix: bool, format: &str) -> Result<String, ApiError> {
        let mut check = SettingsCheck::new(
            self.config.compliance.to_policy(),
            self.config.compliance.skip_list(),
        );
        let result = check.run(&self.town_root)?;

        let (fix_report, after_fix) = if fix && !result.is_ok() && check.can_fix() {
            let report = check.fix();
            let rescan = check.run(&self.town_root)?;
            (Some(report), Some(rescan))
        } else {
            (None, None)
        };

        if format == "json" {
            return to_json(&DoctorOutput {
                check: check.name(),
                result: &result,
                fix: fix_report.as_ref(),
                after_fix: after_fix.as_ref(),
            });
        }

        let mut out = format_scan_text(check.name(), &result);
        if let Some(report) = &fix_report {
            out.push('\n');
            out.push_str(&format_fix_text(report));
        }
        if let Some(rescan) = &after_fix {
            out.push('\n');
            out.push_str(&format_scan_text(check.name(), rescan));
        }
        Ok(out.trim_end().to_string())
    }

    fn handle_prune(
        &self,
        rig: &str,
        active: &[String],
        all: bool,
        options: &PruneOptions,
        format: &str,
    ) -> Result<String, ApiError> {
        // An empty active set prunes everything, so it must be asked for.
        if active.is_empty() && !all {
            return Err(ApiError::PruneError(
                "no active polecat branches given; pass --active or --all".to_string(),
            ));
        }
        if !active.is_empty() && all {
            return Err(ApiError::PruneError(
                "--all cannot be combined with --active".to_string(),
            ));
        }
        let store = GitBranchStore::for_rig(&self.town_root.join(rig))?;
        let active: HashSet<String> = active.iter().cloned().collect();
        let report = BranchPruner::new(&store).run(&active, options)?;
        if format == "json" {
            to_json(&report)
        } else {
            Ok(format_prune_text(rig, &report))
        }
    }

    fn handle_rigs(&self, format: &str) -> Result<String, ApiError> {
        let entries = self.registry.entries();
        if format == "json" {
            let rows: Vec<RigEntry<'_>> = entries
                .iter()
                .map(|&(rig, prefix)| RigEntry { rig, prefix })
                .collect();
            to_json(&rows)
        } else {
            Ok(format_rigs_text(&entries).trim_end().to_string())
        }
    }
}
