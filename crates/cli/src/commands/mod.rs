//! CLI commands

pub mod config;
pub mod evaluate;
pub mod tasks;
pub mod validate;

use npmm_application::{ScoringEngine, ScoringEngineConfig};
use npmm_common::AppConfig;

use crate::output::OutputFormat;

/// Context passed to all commands
pub struct CommandContext {
    pub config: AppConfig,
    pub format: OutputFormat,
}

impl CommandContext {
    /// Create a new command context
    pub fn new(config: AppConfig, format: OutputFormat) -> Self {
        Self { config, format }
    }

    /// Scoring engine configured from the loaded settings
    pub fn engine(&self) -> ScoringEngine {
        ScoringEngine::new(ScoringEngineConfig::from_settings(&self.config.scoring))
    }
}
