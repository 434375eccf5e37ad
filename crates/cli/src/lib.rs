//! NPMM CLI Library
//!
//! Command implementations, batch file I/O and output formatting for the
//! `npmm` binary.

pub mod commands;
pub mod io;
pub mod output;

pub use output::{Formattable, JsonFormatter, OutputFormat, PlainFormatter, TableFormatter};

/// Re-export common types
pub use anyhow::{Context, Result};
