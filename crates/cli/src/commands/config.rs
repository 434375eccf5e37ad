//! Effective configuration display

use anyhow::Result;
use npmm_common::AppConfig;

use crate::commands::CommandContext;
use crate::output::{Formattable, TableFormatter};

impl Formattable for AppConfig {
    fn format_table(&self) -> Result<String> {
        let groups: Vec<(String, String)> = self
            .scoring
            .groups
            .iter()
            .map(|(category, members)| (format!("scoring.groups.{}", category), members.join(", ")))
            .collect();

        let mut items = vec![
            ("telemetry.service_name", self.telemetry.service_name.clone()),
            ("telemetry.json_logging", self.telemetry.json_logging.to_string()),
            ("telemetry.log_level", self.telemetry.log_level.clone()),
            ("scoring.workers", self.scoring.workers.to_string()),
            (
                "scoring.fallback_penalty",
                self.scoring.fallback_penalty.to_string(),
            ),
        ];

        items.extend(groups.iter().map(|(key, value)| (key.as_str(), value.clone())));

        items.push((
            "output.directory",
            self.output
                .directory
                .as_ref()
                .map(|d| d.display().to_string())
                .unwrap_or_else(|| "(next to input)".to_string()),
        ));
        items.push((
            "output.write_artifacts",
            self.output.write_artifacts.to_string(),
        ));

        TableFormatter::key_value(items)
    }
}

/// Print the effective configuration.
pub fn show(ctx: &CommandContext) -> Result<()> {
    println!("{}", ctx.config.format(ctx.format)?);
    Ok(())
}
