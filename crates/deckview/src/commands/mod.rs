pub mod animation;
pub mod colors;
pub mod completion;
pub mod config;
pub mod data;
pub mod links;
pub mod nav;
pub mod render;
pub mod theme;
pub mod validate;

use std::path::Path;

use anyhow::Context;

use crate::config::Config;
use crate::schema::Presentation;
use crate::state::DeckState;
use crate::storage::FileStorage;

/// Open the customization store named by the config.
pub fn open_state() -> anyhow::Result<DeckState> {
    let config = Config::load_or_default();
    let dir = config.storage_dir()?;
    log::debug!("Using storage at {}", dir.display());
    let state = DeckState::load(Box::new(FileStorage::new(dir)))?;
    if let Some(err) = state.last_error() {
        log::warn!("Some stored settings were unreadable and were reset: {err}");
    }
    Ok(state)
}

/// Read and validate a deck file, logging its warnings.
pub fn read_deck(path: &Path) -> anyhow::Result<Presentation> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let validated = crate::schema::validate_str(&text)
        .with_context(|| format!("Invalid deck {}", path.display()))?;
    for warning in &validated.warnings {
        log::warn!("{warning}");
    }
    Ok(validated.presentation)
}

/// Write to a file, or to stdout when no path is given.
pub fn write_output(output: Option<&Path>, contents: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{contents}"),
    }
    Ok(())
}
