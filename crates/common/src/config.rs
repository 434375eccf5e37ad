//! Configuration management for the scoring engine.
//!
//! Settings are layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. `config/default.toml` (if it exists)
//! 3. `config/{NPMM_ENV}.toml` (if it exists)
//! 4. An explicit file passed by the caller (if any)
//! 5. Environment variables prefixed with `NPMM__`
//!
//! ## Example Configuration
//!
//! ```toml
//! [telemetry]
//! log_level = "debug"
//! json_logging = false
//!
//! [scoring]
//! workers = 4
//! fallback_penalty = 1e9
//!
//! [scoring.groups]
//! planning = ["NpTsp", "NpHamiltonianCycle"]
//! graph = ["NpMaximumCliqueProblem", "NpMaximumSet", "NpGcpD"]
//! partition = ["NpMinimumCut"]
//!
//! [output]
//! directory = "reports"
//! write_artifacts = true
//! ```

use anyhow::{Context, Result};
use npmm_domain::task::TaskGroups;
use npmm_domain::verdict::FALLBACK_PENALTY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name attached to log output
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable JSON logging format
    #[serde(default)]
    pub json_logging: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            json_logging: false,
            log_level: default_log_level(),
        }
    }
}

/// Scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Number of blocking workers for concurrent evaluation (1 = sequential)
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Category → member task names
    #[serde(default)]
    pub groups: TaskGroups,

    /// Penalty for weight-based problems on graphs with no weights
    #[serde(default = "default_fallback_penalty")]
    pub fallback_penalty: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            groups: TaskGroups::default(),
            fallback_penalty: default_fallback_penalty(),
        }
    }
}

/// Report output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for report artifacts; defaults to the input file's directory
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Whether to persist the statistics and report files
    #[serde(default = "default_write_artifacts")]
    pub write_artifacts: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: None,
            write_artifacts: default_write_artifacts(),
        }
    }
}

// Default value functions
fn default_service_name() -> String {
    "npmm-scoring".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_workers() -> usize {
    1
}

fn default_fallback_penalty() -> f64 {
    FALLBACK_PENALTY
}

fn default_write_artifacts() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from the standard locations.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use npmm_common::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load configuration");
    /// println!("Scoring with {} worker(s)", config.scoring.workers);
    /// ```
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, layering an explicit file over the standard ones.
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let env = std::env::var("NPMM_ENV").unwrap_or_else(|_| "development".to_string());

        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false));

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            // Environment variables (prefix: NPMM__)
            // Example: NPMM__SCORING__WORKERS=4
            .add_source(
                config::Environment::with_prefix("NPMM")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = settings
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.scoring.workers == 0 {
            anyhow::bail!("Number of scoring workers must be greater than 0");
        }

        if !(self.scoring.fallback_penalty > 0.0) {
            anyhow::bail!(
                "Fallback penalty must be positive, got {}",
                self.scoring.fallback_penalty
            );
        }

        if self.scoring.groups.is_empty() {
            anyhow::bail!("At least one task group must be configured");
        }

        if let Some((category, _)) = self
            .scoring
            .groups
            .iter()
            .find(|(_, members)| members.is_empty())
        {
            anyhow::bail!("Task group '{}' has no members", category);
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.telemetry.log_level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.scoring.workers, 1);
        assert_eq!(config.scoring.fallback_penalty, 1e9);
        assert_eq!(config.scoring.groups, TaskGroups::default());
        assert!(config.output.write_artifacts);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let mut config = AppConfig::default();
        config.scoring.workers = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = AppConfig::default();
        config.telemetry.log_level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_group_rejected() {
        let mut config = AppConfig::default();
        config.scoring.groups = TaskGroups::new([("planning", Vec::<String>::new())]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[scoring]\nworkers = 3\n\n[scoring.groups]\nplanning = [\"NpTsp\"]\n\n[telemetry]\nlog_level = \"debug\""
        )
        .unwrap();

        let config = AppConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.scoring.workers, 3);
        assert_eq!(config.telemetry.log_level, "debug");
        assert_eq!(config.scoring.groups.len(), 1);
        assert_eq!(config.scoring.groups.category_of("NpTsp"), Some("planning"));
    }
}
