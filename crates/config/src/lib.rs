//! Configuration loading, validation, and management for BRX.
//!
//! Loads configuration from `~/.brx/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.brx/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Quality policy and convergence loop settings
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Tool registry settings
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Community submission screening
    #[serde(default)]
    pub intake: IntakeConfig,

    /// Version ledger settings
    #[serde(default)]
    pub ledger: LedgerConfig,

    /// Background evolution cycle
    #[serde(default)]
    pub evolution: EvolutionConfig,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Running-best quality at which the convergence loop stops
    #[serde(default = "default_quality_threshold")]
    pub quality_threshold: f64,

    /// Iteration cap for the convergence loop
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Which invoker backs the loop: "registry" or "simulated"
    #[serde(default = "default_invoker")]
    pub invoker: String,

    /// Per-request deadline in milliseconds (0 = none)
    #[serde(default)]
    pub deadline_ms: u64,
}

fn default_quality_threshold() -> f64 {
    0.95
}
fn default_max_iterations() -> u32 {
    5
}
fn default_invoker() -> String {
    "registry".into()
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            quality_threshold: default_quality_threshold(),
            max_iterations: default_max_iterations(),
            invoker: default_invoker(),
            deadline_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default = "default_base_skill_level")]
    pub base_skill_level: f64,

    #[serde(default = "default_advanced_skill_cutoff")]
    pub advanced_skill_cutoff: f64,
}

fn default_base_skill_level() -> f64 {
    0.7
}
fn default_advanced_skill_cutoff() -> f64 {
    0.8
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            base_skill_level: default_base_skill_level(),
            advanced_skill_cutoff: default_advanced_skill_cutoff(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Substrings that get a submitted tool rejected
    #[serde(default = "default_denylist")]
    pub denylist: Vec<String>,
}

fn default_denylist() -> Vec<String> {
    [
        "import os",
        "import sys",
        "__import__",
        "eval(",
        "exec(",
        "open(",
        "file(",
        "subprocess",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            denylist: default_denylist(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default = "default_symbolic_version")]
    pub symbolic_version: String,

    /// Improvements above this significance enter the architecture history
    #[serde(default = "default_significance_cutoff")]
    pub significance_cutoff: f64,
}

fn default_symbolic_version() -> String {
    "BRX ∞".into()
}
fn default_significance_cutoff() -> f64 {
    0.8
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            symbolic_version: default_symbolic_version(),
            significance_cutoff: default_significance_cutoff(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_evolution_interval")]
    pub interval_minutes: u32,
}

fn default_evolution_interval() -> u32 {
    60
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_minutes: default_evolution_interval(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.brx/config.toml).
    ///
    /// Environment variables override file values:
    /// - `BRX_QUALITY_THRESHOLD`
    /// - `BRX_MAX_ITERATIONS`
    /// - `BRX_INVOKER`
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path())?;
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("BRX_QUALITY_THRESHOLD") {
            self.pipeline.quality_threshold = raw.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("BRX_QUALITY_THRESHOLD is not a number: {raw}"))
            })?;
        }

        if let Some(raw) = lookup("BRX_MAX_ITERATIONS") {
            self.pipeline.max_iterations = raw.trim().parse().map_err(|_| {
                ConfigError::ValidationError(format!("BRX_MAX_ITERATIONS is not an integer: {raw}"))
            })?;
        }

        if let Some(invoker) = lookup("BRX_INVOKER") {
            self.pipeline.invoker = invoker.trim().to_string();
        }

        Ok(())
    }

    /// Write the default configuration to `path` unless a file already exists.
    /// Returns `true` when a file was written.
    pub fn write_default(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
        std::fs::write(path, Self::default_toml()).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(true)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".brx")
    }

    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = &self.pipeline;
        if !(0.0..=1.0).contains(&p.quality_threshold) {
            return Err(ConfigError::ValidationError(
                "pipeline.quality_threshold must be between 0.0 and 1.0".into(),
            ));
        }

        if p.max_iterations < 1 {
            return Err(ConfigError::ValidationError(
                "pipeline.max_iterations must be at least 1".into(),
            ));
        }

        if !matches!(p.invoker.as_str(), "registry" | "simulated") {
            return Err(ConfigError::ValidationError(format!(
                "pipeline.invoker must be \"registry\" or \"simulated\", got \"{}\"",
                p.invoker
            )));
        }

        for (key, value) in [
            ("tools.base_skill_level", self.tools.base_skill_level),
            ("tools.advanced_skill_cutoff", self.tools.advanced_skill_cutoff),
            ("ledger.significance_cutoff", self.ledger.significance_cutoff),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "{key} must be between 0.0 and 1.0"
                )));
            }
        }

        if self.evolution.enabled && self.evolution.interval_minutes == 0 {
            return Err(ConfigError::ValidationError(
                "evolution.interval_minutes must be > 0 when enabled".into(),
            ));
        }

        Ok(())
    }

    /// Generate a default config TOML string (for `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            pipeline: PipelineConfig::default(),
            tools: ToolsConfig::default(),
            intake: IntakeConfig::default(),
            ledger: LedgerConfig::default(),
            evolution: EvolutionConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Failed to write config file at {path}: {reason}")]
    WriteError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
