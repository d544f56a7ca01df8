use std::path::Path;

use anyhow::Context;
use colored::Colorize;

use crate::schema::{self, ValidationError};

pub fn run(file: &Path) -> anyhow::Result<()> {
    let text = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    match schema::validate_str(&text) {
        Ok(validated) => {
            for warning in &validated.warnings {
                println!("  {} {warning}", "warning:".yellow().bold());
            }
            println!(
                "{} {} ({} slides)",
                "OK".green().bold(),
                file.display(),
                validated.presentation.slide_count()
            );
            Ok(())
        }
        Err(ValidationError::Schema(issues)) => {
            for issue in &issues {
                println!(
                    "  {} {}",
                    format!("{}:", issue.path).red().bold(),
                    issue.to_string().trim_start_matches(&format!("{}: ", issue.path))
                );
            }
            anyhow::bail!(
                "{} has {} schema violation(s)",
                file.display(),
                issues.len()
            )
        }
        Err(e) => Err(e).with_context(|| format!("{} is not a presentation", file.display())),
    }
}
