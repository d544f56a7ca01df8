use anyhow::Context;
use colored::Colorize;

use crate::cli::ThemeCommands;
use crate::state::DeckState;
use crate::theme::{self, ThemePreset};

pub fn run(command: ThemeCommands) -> anyhow::Result<()> {
    let mut state = super::open_state()?;
    match command {
        ThemeCommands::List => list(&state),
        ThemeCommands::Show { id } => show(&state, &id),
        ThemeCommands::Apply { id } => {
            let id = match id {
                Some(id) => id,
                None => prompt_theme(&state)?,
            };
            let preset = state.apply_theme(&id)?;
            println!(
                "{} {} to {} slides",
                "Applied".green().bold(),
                preset.name,
                state.presentation().slide_count()
            );
            Ok(())
        }
        ThemeCommands::Save {
            from,
            name,
            description,
        } => {
            let id = state.save_custom_theme(&from, &name, &description)?;
            println!("{} {name} as {}", "Saved".green().bold(), id.cyan());
            Ok(())
        }
        ThemeCommands::Delete { id } => {
            state.delete_custom_theme(&id)?;
            println!("{} {id}", "Deleted".green().bold());
            Ok(())
        }
        ThemeCommands::Import { file } => {
            let text = std::fs::read_to_string(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let id = state.import_theme(&text)?;
            println!("{} {} as {}", "Imported".green().bold(), file.display(), id.cyan());
            Ok(())
        }
        ThemeCommands::Export { id, output } => {
            let json = state.export_theme(&id)?;
            super::write_output(output.as_deref(), &json)
        }
        ThemeCommands::Css { id } => {
            let preset = match id.as_deref().or(state.current_theme()) {
                Some(id) => state
                    .find_theme(id)
                    .ok_or_else(|| anyhow::anyhow!("Unknown theme: {id}"))?,
                None => theme::default_theme(),
            };
            println!(":root {{");
            for (name, value) in preset.css_variables() {
                println!("  {name}: {value};");
            }
            println!("}}");
            Ok(())
        }
    }
}

fn list(state: &DeckState) -> anyhow::Result<()> {
    let current = state.current_theme();
    let themes = state.all_themes();
    let (custom, builtin): (Vec<&ThemePreset>, Vec<&ThemePreset>) =
        themes.iter().partition(|t| t.is_custom());

    println!("{}", "Built-in themes".bold());
    for t in builtin {
        print_row(t, current);
    }
    if !custom.is_empty() {
        println!();
        println!("{}", "Custom themes".bold());
        for t in custom {
            print_row(t, current);
        }
    }
    Ok(())
}

fn print_row(preset: &ThemePreset, current: Option<&str>) {
    let marker = if current == Some(preset.id.as_str()) {
        "*".green().bold()
    } else {
        " ".normal()
    };
    println!(
        " {marker} {:<22} {:<20} {}",
        preset.id.cyan(),
        preset.name,
        preset.description.dimmed()
    );
}

fn show(state: &DeckState, id: &str) -> anyhow::Result<()> {
    let preset = state
        .find_theme(id)
        .ok_or_else(|| anyhow::anyhow!("Unknown theme: {id}"))?;
    println!("{} {}", preset.name.bold(), format!("({})", preset.id).dimmed());
    println!("{}", preset.description);
    println!();
    for (name, value) in preset.css_variables() {
        println!("  {:<28} {value}", name.trim_start_matches("--theme-"));
    }
    Ok(())
}

fn prompt_theme(state: &DeckState) -> anyhow::Result<String> {
    let themes = state.all_themes();
    let labels: Vec<String> = themes
        .iter()
        .map(|t| format!("{} - {}", t.name, t.description))
        .collect();
    let start = state
        .current_theme()
        .and_then(|id| themes.iter().position(|t| t.id == id))
        .unwrap_or(0);
    let choice = inquire::Select::new("Theme:", labels.clone())
        .with_starting_cursor(start)
        .prompt()?;
    let index = labels
        .iter()
        .position(|l| *l == choice)
        .ok_or_else(|| anyhow::anyhow!("No theme selected"))?;
    Ok(themes[index].id.clone())
}
