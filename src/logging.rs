//! Logging System
//!
//! Structured logging through `tracing`. Level, format and destination come
//! from the `[logging]` config table, the `TOWNCTL_LOG*` environment variables
//! and CLI flags, in increasing order of precedence.

use crate::error::ApiError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

pub const ENV_LOG: &str = "TOWNCTL_LOG";
pub const ENV_LOG_FORMAT: &str = "TOWNCTL_LOG_FORMAT";
pub const ENV_LOG_OUTPUT: &str = "TOWNCTL_LOG_OUTPUT";
pub const ENV_LOG_FILE: &str = "TOWNCTL_LOG_FILE";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Whether logging is enabled (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Level or filter directive: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file, file+stderr, both
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output includes file; None means the state dir default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Colored output (text format on a terminal stream only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Per-module levels, e.g. `townctl::compliance = "debug"`
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: BTreeMap::new(),
        }
    }
}

/// Logging settings given on the command line.
#[derive(Debug, Clone, Default)]
pub struct LogOverrides {
    pub level: Option<String>,
    pub format: Option<String>,
    pub output: Option<String>,
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    /// Apply `TOWNCTL_LOG*` environment variables.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply environment-style overrides from any lookup; empty values are ignored.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(level) = get(ENV_LOG) {
            self.level = level;
        }
        if let Some(format) = get(ENV_LOG_FORMAT) {
            self.format = format;
        }
        if let Some(output) = get(ENV_LOG_OUTPUT) {
            self.output = output;
        }
        if let Some(file) = get(ENV_LOG_FILE) {
            self.file = Some(PathBuf::from(file));
        }
    }

    pub fn apply_overrides(&mut self, overrides: &LogOverrides) {
        if let Some(level) = &overrides.level {
            self.level = level.clone();
        }
        if let Some(format) = &overrides.format {
            self.format = format.clone();
        }
        if let Some(output) = &overrides.output {
            self.output = output.clone();
        }
        if let Some(file) = &overrides.file {
            self.file = Some(file.clone());
        }
    }

    /// Check format and output names without installing anything.
    pub fn validate(&self) -> Result<(), ApiError> {
        parse_format(&self.format)?;
        parse_output_destinations(&self.output)?;
        Ok(())
    }
}

/// Default log file under the platform state directory.
pub fn default_log_file_path() -> Result<PathBuf, ApiError> {
    let project_dirs = directories::ProjectDirs::from("", "townctl", "townctl").ok_or_else(|| {
        ApiError::ConfigError(
            "Could not determine platform state directory for log file".to_string(),
        )
    })?;
    let dir = project_dirs
        .state_dir()
        .unwrap_or_else(|| project_dirs.data_local_dir());
    Ok(dir.join("townctl.log"))
}

/// Install the global subscriber described by `config`.
///
/// Fails if a subscriber is already installed or the config names an
/// unknown format or output.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ApiError> {
    if !config.enabled {
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let json = parse_format(&config.format)? == LogFormat::Json;
    let output = parse_output_destinations(&config.output)?;
    let ansi = config.color && !json && !output.file;
    let writer = build_writer(&output, config)?;

    let layer = fmt::layer()
        .with_target(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_writer(writer);
    let subscriber = Registry::default().with(filter);

    let installed = if json {
        subscriber.with(layer.json()).try_init()
    } else {
        subscriber.with(layer.with_ansi(ansi)).try_init()
    };
    installed.map_err(|e| ApiError::ConfigError(format!("Failed to install logger: {}", e)))
}

fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, ApiError> {
    let mut filter = EnvFilter::try_new(&config.level).map_err(|e| {
        ApiError::ConfigError(format!("Invalid log level '{}': {}", config.level, e))
    })?;
    for (module, level) in &config.modules {
        let directive = format!("{}={}", module, level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| ApiError::ConfigError(format!("Invalid log directive: {}", e)))?,
        );
    }
    Ok(filter)
}

fn build_writer(
    output: &OutputDestinations,
    config: &LoggingConfig,
) -> Result<BoxMakeWriter, ApiError> {
    if !output.file {
        return Ok(match (output.stdout, output.stderr) {
            (true, true) => BoxMakeWriter::new(std::io::stdout.and(std::io::stderr)),
            (true, false) => BoxMakeWriter::new(std::io::stdout),
            _ => BoxMakeWriter::new(std::io::stderr),
        });
    }

    let path = match &config.file {
        Some(p) if !p.as_os_str().is_empty() => p.clone(),
        _ => default_log_file_path()?,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| ApiError::ConfigError(format!("Failed to create log directory: {}", e)))?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| {
            ApiError::ConfigError(format!("Failed to open log file {}: {}", path.display(), e))
        })?;
    let file = Mutex::new(file);

    Ok(if output.stderr {
        BoxMakeWriter::new(file.and(std::io::stderr))
    } else {
        BoxMakeWriter::new(file)
    })
}

#[derive(Debug, PartialEq, Eq)]
enum LogFormat {
    Text,
    Json,
}

fn parse_format(format: &str) -> Result<LogFormat, ApiError> {
    match format {
        "text" => Ok(LogFormat::Text),
        "json" => Ok(LogFormat::Json),
        _ => Err(ApiError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            format
        ))),
    }
}

/// Output destinations
#[derive(Debug)]
struct OutputDestinations {
    stdout: bool,
    stderr: bool,
    file: bool,
}

fn parse_output_destinations(output: &str) -> Result<OutputDestinations, ApiError> {
    let (stdout, stderr, file) = match output {
        "stdout" => (true, false, false),
        "stderr" => (false, true, false),
        "file" => (false, false, true),
        "file+stderr" => (false, true, true),
        "both" => (true, true, false),
        _ => {
            return Err(ApiError::ConfigError(format!(
                "Invalid log output: {} (must be 'stdout', 'stderr', 'file', 'file+stderr', or 'both')",
                output
            )))
        }
    };
    Ok(OutputDestinations {
        stdout,
        stderr,
        file,
    })
}
