use colored::Colorize;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> anyhow::Result<()> {
    let path = Config::path()?;
    let config = Config::load_or_default();
    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();

    let defaults = config.defaults.clone().unwrap_or_default();
    let row = |key: &str, value: Option<String>, fallback: &str| match value {
        Some(v) => println!("  {:<22} {}", key, v.green()),
        None => println!("  {:<22} {}", key, format!("{fallback} (default)").dimmed()),
    };
    row("defaults.theme", defaults.theme, "none");
    row("defaults.transition", defaults.transition, "fade");
    row(
        "defaults.start_slide",
        defaults.start_slide.map(|n| n.to_string()),
        "1",
    );
    row(
        "defaults.windowed",
        defaults.windowed.map(|w| w.to_string()),
        "false",
    );
    let storage_dir = config
        .storage
        .as_ref()
        .and_then(|s| s.dir.as_ref())
        .map(|d| d.display().to_string());
    let default_dir = config
        .storage_dir()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    row("storage.dir", storage_dir, &default_dir);
    Ok(())
}

fn set(key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = Config::load_or_default();
    config.set(key, value)?;
    let path = config.save()?;
    println!("{} {key} = {value}", "Set".green().bold());
    log::debug!("Saved config to {}", path.display());
    Ok(())
}
