//! Configuration for prn-split
//!
//! This module provides the configuration system with:
//! - XDG-compliant config file location
//! - CLI argument overrides
//! - Environment variable support
//! - Config precedence: CLI > env > file > defaults
//! - Validation with field-specific error messages

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// CLI arguments for prn-split
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "prn-split")]
#[command(version)]
#[command(about = "Split a printer spool (PRN) capture into per-page image files", long_about = None)]
pub struct CliArgs {
    /// Spool file to split
    #[arg(value_name = "FILE")]
    pub input: PathBuf,

    /// Path to custom config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Consecutive PJL command lines that start a new page
    #[arg(short = 'n', long, value_name = "LINES")]
    pub commands_per_page: Option<usize>,

    /// Line break ending each PJL command line (crlf, lf, cr or an escaped literal like "\r\n")
    #[arg(long, value_name = "SEQ")]
    pub line_break: Option<String>,

    /// Directory for the extracted pages
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File extension for the extracted pages
    #[arg(short, long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Treat the file as a single plain image (no PJL segmentation)
    #[arg(long)]
    pub plain: bool,

    /// Replace page files that already exist
    #[arg(long)]
    pub overwrite: bool,

    /// Maximum number of read-and-write attempts
    #[arg(long, value_name = "N")]
    pub max_attempts: Option<u32>,

    /// List the pages instead of writing them
    #[arg(short, long)]
    pub list: bool,
}

/// Output configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory the page files are written to
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
    /// Page file extension, without the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Replace existing page files instead of refusing to write
    #[serde(default)]
    pub overwrite: bool,
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}
fn default_extension() -> String {
    "jbg".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
            extension: default_extension(),
            overwrite: false,
        }
    }
}

/// prn-split configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Consecutive PJL command lines that start a new page
    #[serde(default = "default_commands_per_page")]
    pub commands_per_page: usize,

    /// Line break ending each command line
    #[serde(default = "default_line_break")]
    pub line_break: String,

    /// Segment PJL-framed files into pages (false: whole file is one page)
    #[serde(default = "default_true")]
    pub pjl_aware: bool,

    /// Maximum number of read-and-write attempts
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Output settings
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_commands_per_page() -> usize {
    1
}
fn default_line_break() -> String {
    "crlf".to_string()
}
fn default_true() -> bool {
    true
}
fn default_max_attempts() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            commands_per_page: default_commands_per_page(),
            line_break: default_line_break(),
            pjl_aware: true,
            max_attempts: default_max_attempts(),
            output: OutputConfig::default(),
        }
    }
}

/// Configuration error
#[derive(Debug, Clone)]
pub struct ConfigError {
    pub message: String,
    pub field: Option<String>,
}

impl ConfigError {
    fn field(field: &str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field: Some(field.to_string()),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "Config error in '{}': {}", field, self.message)
        } else {
            write!(f, "Config error: {}", self.message)
        }
    }
}

impl std::error::Error for ConfigError {}

/// Parse a line break setting into bytes.
///
/// Accepts the names `crlf`, `lf` and `cr`, or an escaped literal using
/// `\r`, `\n`, `\t`, `\\` and `\xHH`. Returns `None` for an empty or
/// malformed value.
pub fn parse_line_break(value: &str) -> Option<Vec<u8>> {
    match value.to_lowercase().as_str() {
        "crlf" => return Some(b"\r\n".to_vec()),
        "lf" => return Some(b"\n".to_vec()),
        "cr" => return Some(b"\r".to_vec()),
        _ => {}
    }

    let mut bytes = Vec::new();
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            if !c.is_ascii() {
                return None;
            }
            bytes.push(c as u8);
            continue;
        }
        match chars.next()? {
            'r' => bytes.push(b'\r'),
            'n' => bytes.push(b'\n'),
            't' => bytes.push(b'\t'),
            '\\' => bytes.push(b'\\'),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                if hex.len() != 2 {
                    return None;
                }
                bytes.push(u8::from_str_radix(&hex, 16).ok()?);
            }
            _ => return None,
        }
    }

    if bytes.is_empty() {
        None
    } else {
        Some(bytes)
    }
}

impl Config {
    /// Load configuration with full precedence:
    /// CLI args > environment variables > config file > defaults
    pub fn load_with_args(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            // An explicitly requested file must load
            Some(path) => Self::load_from_file(path)?,
            None => Self::default_config_path()
                .filter(|path| path.exists())
                .and_then(|path| match Self::load_from_file(&path) {
                    Ok(config) => Some(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {:?}: {}", path, e);
                        None
                    }
                })
                .unwrap_or_default(),
        };

        config.apply_env_vars();
        config.apply_cli_args(args);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            message: format!("Failed to read config file {}: {}", path.display(), e),
            field: None,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
            field: None,
        })
    }

    /// Default config file location
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("prn-split").join("config.toml"))
    }

    /// Apply environment variables to config
    fn apply_env_vars(&mut self) {
        self.apply_env(|key| env::var(key).ok());
    }

    fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("PRN_SPLIT_COMMANDS_PER_PAGE") {
            match val.parse() {
                Ok(lines) => self.commands_per_page = lines,
                Err(_) => log::warn!("Ignoring PRN_SPLIT_COMMANDS_PER_PAGE={:?}", val),
            }
        }
        if let Some(val) = lookup("PRN_SPLIT_LINE_BREAK") {
            self.line_break = val;
        }
        if let Some(val) = lookup("PRN_SPLIT_PJL_AWARE") {
            match val.to_lowercase().as_str() {
                "1" | "true" => self.pjl_aware = true,
                "0" | "false" => self.pjl_aware = false,
                _ => log::warn!("Ignoring PRN_SPLIT_PJL_AWARE={:?}", val),
            }
        }
        if let Some(val) = lookup("PRN_SPLIT_MAX_ATTEMPTS") {
            match val.parse() {
                Ok(attempts) => self.max_attempts = attempts,
                Err(_) => log::warn!("Ignoring PRN_SPLIT_MAX_ATTEMPTS={:?}", val),
            }
        }
        if let Some(val) = lookup("PRN_SPLIT_OUTPUT_DIR") {
            self.output.directory = PathBuf::from(val);
        }
        if let Some(val) = lookup("PRN_SPLIT_EXTENSION") {
            self.output.extension = val;
        }
    }

    /// Apply CLI arguments to config
    fn apply_cli_args(&mut self, args: &CliArgs) {
        if let Some(lines) = args.commands_per_page {
            self.commands_per_page = lines;
        }
        if let Some(line_break) = &args.line_break {
            self.line_break = line_break.clone();
        }
        if args.plain {
            self.pjl_aware = false;
        }
        if let Some(attempts) = args.max_attempts {
            self.max_attempts = attempts;
        }
        if let Some(dir) = &args.output_dir {
            self.output.directory = dir.clone();
        }
        if let Some(ext) = &args.extension {
            self.output.extension = ext.clone();
        }
        if args.overwrite {
            self.output.overwrite = true;
        }
    }

    /// Validate configuration values
    fn validate(&self) -> Result<(), ConfigError> {
        if self.commands_per_page == 0 {
            return Err(ConfigError::field(
                "commands_per_page",
                "must be at least 1",
            ));
        }

        match parse_line_break(&self.line_break) {
            None => {
                return Err(ConfigError::field(
                    "line_break",
                    format!(
                        "invalid line break {:?} (use crlf, lf, cr or an escaped literal)",
                        self.line_break
                    ),
                ));
            }
            // Printable bytes are command text, so such a break never ends a line
            Some(bytes) if (0x20..=0x7E).contains(&bytes[0]) => {
                return Err(ConfigError::field(
                    "line_break",
                    format!(
                        "line break {:?} must not start with a printable character",
                        self.line_break
                    ),
                ));
            }
            Some(_) => {}
        }

        if self.max_attempts == 0 {
            return Err(ConfigError::field("max_attempts", "must be at least 1"));
        }

        let ext = &self.output.extension;
        if ext.is_empty() || ext.starts_with('.') || ext.contains(&['/', '\\'][..]) {
            return Err(ConfigError::field(
                "output.extension",
                format!("invalid extension {:?}", ext),
            ));
        }

        Ok(())
    }

    /// Line break bytes; only valid after `validate`
    pub fn line_break_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        parse_line_break(&self.line_break)
            .ok_or_else(|| ConfigError::field("line_break", "invalid line break"))
    }
}
