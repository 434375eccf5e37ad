//! Shared infrastructure for the NPMM scoring workspace.
//!
//! - Configuration management (layered files plus environment)
//! - Telemetry and structured logging

pub mod config;
pub mod telemetry;

// Re-export commonly used types
pub use config::{AppConfig, OutputConfig, ScoringConfig, TelemetryConfig};
pub use telemetry::{init_from_config, init_tracing};

/// Common error type used throughout the crate
pub type Result<T> = std::result::Result<T, anyhow::Error>;
