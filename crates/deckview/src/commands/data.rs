use anyhow::Context;
use colored::Colorize;

use crate::cli::DataCommands;
use crate::state::ImportError;

pub fn run(command: DataCommands) -> anyhow::Result<()> {
    let mut state = super::open_state()?;
    match command {
        DataCommands::Export { output } => {
            super::write_output(output.as_deref(), &state.export_json())
        }
        DataCommands::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            match state.import_json(&text) {
                Ok(()) => {
                    println!(
                        "{} {} ({} slides)",
                        "Imported".green().bold(),
                        file.display(),
                        state.presentation().slide_count()
                    );
                    Ok(())
                }
                Err(ImportError::Invalid(e)) => {
                    for issue in e.issues() {
                        println!("  {} {issue}", "error:".red().bold());
                    }
                    if e.issues().is_empty() {
                        println!("  {} {e}", "error:".red().bold());
                    }
                    anyhow::bail!("{} was not imported; the stored deck is unchanged", file.display())
                }
                Err(ImportError::Storage(e)) => Err(e),
            }
        }
        DataCommands::Reset { all } => {
            if all {
                state.reset_all()?;
                println!("{}", "All stored settings cleared".green().bold());
            } else {
                state.reset_presentation()?;
                println!("{}", "Deck reset to the shipped presentation".green().bold());
            }
            Ok(())
        }
    }
}
