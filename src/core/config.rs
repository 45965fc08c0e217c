//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.lineterm/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LineTermConfig {
    #[serde(default)]
    pub console: ConsoleConfig,
    #[serde(default)]
    pub log: LogConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ConsoleConfig {
    pub prompt: Option<String>,
    pub greeting: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LogConfig {
    pub level: Option<String>,
    pub file: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_PROMPT: &str = "> ";
pub const DEFAULT_GREETING: &str =
    "lineterm: type a line and press Enter. Commands: clear, key, exit.";
pub const DEFAULT_LOG_FILE: &str = "lineterm.log";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Debug;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub prompt: String,
    pub greeting: String,
    pub log_level: LevelFilter,
    pub log_file: PathBuf,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.lineterm/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".lineterm").join("config.toml"))
}

/// Load config from `~/.lineterm/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `LineTermConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<LineTermConfig, ConfigError> {
    let Some(path) = config_path() else {
        warn!("Could not determine home directory, using default config");
        return Ok(LineTermConfig::default());
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(LineTermConfig::default());
    }

    load_config_from(&path)
}

/// Load and parse a config file at an explicit path.
pub fn load_config_from(path: &Path) -> Result<LineTermConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: LineTermConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# lineterm Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [console]
# prompt = "> "                      # Or set LINETERM_PROMPT env var
# greeting = "Welcome."

# [log]
# level = "debug"                    # "off", "error", "warn", "info", "debug", "trace"
# file = "lineterm.log"              # Or set LINETERM_LOG_FILE env var
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
///
/// `cli_prompt` and `cli_log_file` are from CLI flags (None = not specified).
pub fn resolve(
    config: &LineTermConfig,
    cli_prompt: Option<&str>,
    cli_log_file: Option<&str>,
) -> ResolvedConfig {
    // Prompt: CLI → env → config → default
    let prompt = cli_prompt
        .map(|s| s.to_string())
        .or_else(|| std::env::var("LINETERM_PROMPT").ok())
        .or_else(|| config.console.prompt.clone())
        .unwrap_or_else(|| DEFAULT_PROMPT.to_string());

    let greeting = config
        .console
        .greeting
        .clone()
        .unwrap_or_else(|| DEFAULT_GREETING.to_string());

    // Log level: env → config → default
    let log_level = std::env::var("LINETERM_LOG_LEVEL")
        .ok()
        .or_else(|| config.log.level.clone())
        .map_or(DEFAULT_LOG_LEVEL, |level| parse_level(&level));

    // Log file: CLI → env → config → default
    let log_file = cli_log_file
        .map(|s| s.to_string())
        .or_else(|| std::env::var("LINETERM_LOG_FILE").ok())
        .or_else(|| config.log.file.clone())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    ResolvedConfig {
        prompt,
        greeting,
        log_level,
        log_file: PathBuf::from(log_file),
    }
}

fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level).unwrap_or_else(|_| {
        warn!("Unknown log level {level:?}, using {DEFAULT_LOG_LEVEL}");
        DEFAULT_LOG_LEVEL
    })
}
