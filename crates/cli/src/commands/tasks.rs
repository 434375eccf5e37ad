//! Task taxonomy listing

use anyhow::Result;
use npmm_domain::{Direction, NpTask, TaskGroups};
use serde::Serialize;

use crate::commands::CommandContext;
use crate::output::{colors, Formattable, TableFormatter};

/// One handled task.
#[derive(Debug, Serialize)]
pub struct TaskEntry {
    pub name: &'static str,
    pub display_name: &'static str,
    pub direction: Direction,
    pub category: Option<String>,
}

/// Handled tasks plus the configured category mapping.
#[derive(Debug, Serialize)]
pub struct TaskListing {
    pub tasks: Vec<TaskEntry>,
    pub groups: TaskGroups,
}

impl TaskListing {
    pub fn new(groups: &TaskGroups) -> Self {
        let tasks = NpTask::ALL
            .into_iter()
            .map(|task| TaskEntry {
                name: task.name(),
                display_name: task.display_name(),
                direction: task.direction(),
                category: groups.category_of(task.name()).map(str::to_string),
            })
            .collect();
        Self {
            tasks,
            groups: groups.clone(),
        }
    }
}

impl Formattable for TaskListing {
    fn format_table(&self) -> Result<String> {
        let rows = self
            .tasks
            .iter()
            .map(|entry| {
                let direction = match entry.direction {
                    Direction::Minimize => "minimize",
                    Direction::Maximize => "maximize",
                };
                vec![
                    entry.name.to_string(),
                    entry.display_name.to_string(),
                    direction.to_string(),
                    entry
                        .category
                        .clone()
                        .unwrap_or_else(|| colors::dim("-").to_string()),
                ]
            })
            .collect();
        let tasks = TableFormatter::simple(vec!["Task", "Problem", "Direction", "Category"], rows)?;

        let rows = self
            .groups
            .iter()
            .map(|(category, members)| {
                let members = members
                    .iter()
                    .map(|name| {
                        if NpTask::from_name(name).is_some() {
                            name.clone()
                        } else {
                            colors::dim(name).to_string()
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                vec![category.to_string(), members]
            })
            .collect();
        let groups = TableFormatter::simple(vec!["Category", "Members"], rows)?;

        Ok(format!("{}\n\n{}", tasks, groups))
    }
}

/// Print the task taxonomy.
pub fn run(ctx: &CommandContext) -> Result<()> {
    let listing = TaskListing::new(&ctx.config.scoring.groups);
    println!("{}", listing.format(ctx.format)?);
    Ok(())
}
