use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::animation::AnimationConfig;
use crate::colors::{ColorScheme, Mode};
use crate::image_links::{self, ImageLink, LinkField};
use crate::nav_config::NavigationConfig;
use crate::schema::{self, Presentation, ValidationError};
use crate::storage::{self, Storage};
use crate::theme::{self, ThemePreset};

/// Everything the viewer and the customization commands read and change.
///
/// Seeded from storage once. Every mutation builds the new value, writes it
/// to storage, and only then replaces the value in memory, so a failed write
/// leaves both sides as they were. Values that fail to parse are logged, recorded in
/// [`DeckState::last_error`], and replaced by their defaults. A failed
/// import leaves the previous value in place.
pub struct DeckState {
    storage: Box<dyn Storage>,
    presentation: Presentation,
    navigation: NavigationConfig,
    animation: AnimationConfig,
    colors: ColorScheme,
    current_theme: Option<String>,
    custom_themes: Vec<ThemePreset>,
    image_links: Vec<ImageLink>,
    last_error: Option<String>,
}

pub fn now_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

fn parse_document(text: &str) -> Result<Presentation, ValidationError> {
    let validated = schema::validate_str(text)?;
    for warning in &validated.warnings {
        log::warn!("{warning}");
    }
    Ok(validated.presentation)
}

impl DeckState {
    pub fn load(storage: Box<dyn Storage>) -> anyhow::Result<Self> {
        let mut state = Self {
            storage,
            presentation: Presentation::shipped()?,
            navigation: NavigationConfig::default(),
            animation: AnimationConfig::default(),
            colors: ColorScheme::default(),
            current_theme: None,
            custom_themes: Vec::new(),
            image_links: Vec::new(),
            last_error: None,
        };

        if let Some(text) = state.read(storage::PRESENTATION_DATA) {
            match parse_document(&text) {
                Ok(p) => state.presentation = p,
                Err(e) => state.record(storage::PRESENTATION_DATA, &e),
            }
        }
        if let Some(v) = state.read_json(storage::NAVIGATION_CONFIG) {
            state.navigation = v;
        }
        if let Some(v) = state.read_json(storage::ANIMATION_CONFIG) {
            state.animation = v;
        }
        if let Some(v) = state.read_json(storage::COLOR_SCHEME) {
            state.colors = v;
        }
        if let Some(v) = state.read_json(storage::CUSTOM_THEMES) {
            state.custom_themes = v;
        }
        if let Some(v) = state.read_json(storage::IMAGE_LINKS) {
            state.image_links = v;
        }
        state.current_theme = state
            .read(storage::CURRENT_THEME)
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());

        Ok(state)
    }

    fn record(&mut self, key: &str, error: &dyn std::fmt::Display) {
        let message = format!("{key}: {error}");
        log::error!("Failed to load {message}");
        self.last_error = Some(message);
    }

    fn read(&mut self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                self.record(key, &e);
                None
            }
        }
    }

    fn read_json<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let text = self.read(key)?;
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(e) => {
                self.record(key, &e);
                None
            }
        }
    }

    /// Write a candidate value. Callers commit it to memory on success.
    fn persist<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> anyhow::Result<()> {
        let text = serde_json::to_string(value)?;
        self.storage
            .set(key, &text)
            .with_context(|| format!("Failed to save {key}"))
    }

    fn forget(&mut self, key: &str) -> anyhow::Result<()> {
        self.storage
            .remove(key)
            .with_context(|| format!("Failed to remove {key}"))
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn navigation(&self) -> &NavigationConfig {
        &self.navigation
    }

    pub fn animation(&self) -> &AnimationConfig {
        &self.animation
    }

    pub fn colors(&self) -> &ColorScheme {
        &self.colors
    }

    pub fn current_theme(&self) -> Option<&str> {
        self.current_theme.as_deref()
    }

    pub fn custom_themes(&self) -> &[ThemePreset] {
        &self.custom_themes
    }

    pub fn image_links(&self) -> &[ImageLink] {
        &self.image_links
    }

    /// Most recent load or import failure.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_last_error(&mut self) {
        self.last_error = None;
    }

    /// Whether `key` holds a value, as opposed to running on defaults.
    pub fn has_stored(&self, key: &str) -> bool {
        matches!(self.storage.get(key), Ok(Some(_)))
    }

    // Presentation data

    /// Replace the deck with a JSON document and store it. Invalid input
    /// leaves the deck untouched and is recorded as the last error.
    pub fn import_json(&mut self, text: &str) -> Result<(), ImportError> {
        let presentation = self.parse_or_record(text)?;
        self.set_presentation(presentation)?;
        Ok(())
    }

    /// Show a document without storing it, as for a deck file on disk.
    pub fn show_document(&mut self, text: &str) -> Result<(), ValidationError> {
        self.presentation = self.parse_or_record(text)?;
        Ok(())
    }

    fn parse_or_record(&mut self, text: &str) -> Result<Presentation, ValidationError> {
        match parse_document(text) {
            Ok(p) => {
                self.last_error = None;
                Ok(p)
            }
            Err(e) => {
                log::error!("Rejected presentation document: {e}");
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub fn set_presentation(&mut self, presentation: Presentation) -> anyhow::Result<()> {
        let text = presentation.to_json_pretty();
        self.storage
            .set(storage::PRESENTATION_DATA, &text)
            .context("Failed to save presentation-data")?;
        self.presentation = presentation;
        Ok(())
    }

    pub fn export_json(&self) -> String {
        self.presentation.to_json_pretty()
    }

    /// Back to the shipped deck.
    pub fn reset_presentation(&mut self) -> anyhow::Result<()> {
        let shipped = Presentation::shipped()?;
        self.forget(storage::PRESENTATION_DATA)?;
        self.presentation = shipped;
        Ok(())
    }

    // Themes

    pub fn all_themes(&self) -> Vec<ThemePreset> {
        let mut themes = theme::builtin_themes();
        themes.extend(self.custom_themes.iter().cloned());
        themes
    }

    pub fn find_theme(&self, id: &str) -> Option<ThemePreset> {
        theme::find_theme(id, &self.custom_themes)
    }

    /// Rewrite every slide background from the preset and remember it.
    pub fn apply_theme(&mut self, id: &str) -> anyhow::Result<ThemePreset> {
        let preset = self
            .find_theme(id)
            .ok_or_else(|| anyhow::anyhow!("Unknown theme: {id}"))?;
        let mut presentation = self.presentation.clone();
        preset.apply_to(&mut presentation);
        self.set_presentation(presentation)?;
        self.storage
            .set(storage::CURRENT_THEME, &preset.id)
            .context("Failed to save current-theme")?;
        self.current_theme = Some(preset.id.clone());
        log::info!("Applied theme {}", preset.id);
        Ok(preset)
    }

    /// Store a copy of `base` as a custom preset. Returns the new id.
    pub fn save_custom_theme(
        &mut self,
        base_id: &str,
        name: &str,
        description: &str,
    ) -> anyhow::Result<String> {
        let base = self
            .find_theme(base_id)
            .ok_or_else(|| anyhow::anyhow!("Unknown theme: {base_id}"))?;
        let id = theme::custom_theme_id(&self.custom_themes, now_millis());
        let mut themes = self.custom_themes.clone();
        themes.push(base.as_custom(id.clone(), name, description));
        self.commit_custom_themes(themes)?;
        Ok(id)
    }

    pub fn delete_custom_theme(&mut self, id: &str) -> anyhow::Result<()> {
        if theme::builtin_themes().iter().any(|t| t.id == id) {
            anyhow::bail!("Built-in theme {id} cannot be deleted");
        }
        let mut themes = self.custom_themes.clone();
        themes.retain(|t| t.id != id);
        if themes.len() == self.custom_themes.len() {
            anyhow::bail!("Unknown theme: {id}");
        }
        self.commit_custom_themes(themes)
    }

    /// Add a preset from JSON. It always gets a fresh custom id.
    pub fn import_theme(&mut self, text: &str) -> anyhow::Result<String> {
        let imported: ThemePreset = match serde_json::from_str(text) {
            Ok(t) => t,
            Err(e) => {
                self.last_error = Some(format!("theme import: {e}"));
                return Err(e).context("Invalid theme file");
            }
        };
        let id = theme::custom_theme_id(&self.custom_themes, now_millis());
        let preset = ThemePreset {
            id: id.clone(),
            is_custom: Some(true),
            ..imported
        };
        let mut themes = self.custom_themes.clone();
        themes.push(preset);
        self.commit_custom_themes(themes)?;
        Ok(id)
    }

    pub fn export_theme(&self, id: &str) -> anyhow::Result<String> {
        let preset = self
            .find_theme(id)
            .ok_or_else(|| anyhow::anyhow!("Unknown theme: {id}"))?;
        Ok(serde_json::to_string_pretty(&preset)?)
    }

    fn commit_custom_themes(&mut self, themes: Vec<ThemePreset>) -> anyhow::Result<()> {
        self.persist(storage::CUSTOM_THEMES, &themes)?;
        self.custom_themes = themes;
        Ok(())
    }

    // Navigation chrome

    /// Change the navigation layout and store it.
    pub fn update_navigation<R>(
        &mut self,
        change: impl FnOnce(&mut NavigationConfig) -> R,
    ) -> anyhow::Result<R> {
        let mut config = self.navigation.clone();
        let result = change(&mut config);
        self.persist(storage::NAVIGATION_CONFIG, &config)?;
        self.navigation = config;
        Ok(result)
    }

    pub fn reset_navigation(&mut self) -> anyhow::Result<()> {
        self.forget(storage::NAVIGATION_CONFIG)?;
        self.navigation = NavigationConfig::default();
        Ok(())
    }

    // Animation

    pub fn set_animation(&mut self, config: AnimationConfig) -> anyhow::Result<()> {
        self.persist(storage::ANIMATION_CONFIG, &config)?;
        self.animation = config;
        Ok(())
    }

    pub fn reset_animation(&mut self) -> anyhow::Result<()> {
        self.forget(storage::ANIMATION_CONFIG)?;
        self.animation = AnimationConfig::default();
        Ok(())
    }

    // Colors

    pub fn set_color(&mut self, mode: Mode, key: &str, value: &str) -> anyhow::Result<()> {
        let mut colors = self.colors.clone();
        colors.set(mode, key, value)?;
        self.persist(storage::COLOR_SCHEME, &colors)?;
        self.colors = colors;
        Ok(())
    }

    pub fn reset_colors(&mut self) -> anyhow::Result<()> {
        self.forget(storage::COLOR_SCHEME)?;
        self.colors = ColorScheme::default();
        Ok(())
    }

    // Image links

    /// Links, seeded one per slide when nothing is stored yet.
    pub fn ensure_image_links(&mut self) -> anyhow::Result<&[ImageLink]> {
        if self.image_links.is_empty() {
            let links = image_links::initialize(self.presentation.slide_count());
            self.commit_links(links)?;
        }
        Ok(&self.image_links)
    }

    pub fn add_image_link(&mut self) -> anyhow::Result<String> {
        let mut links = self.image_links.clone();
        let id = image_links::add(&mut links);
        self.commit_links(links)?;
        Ok(id)
    }

    pub fn update_image_link(
        &mut self,
        id: &str,
        field: LinkField,
        value: &str,
    ) -> anyhow::Result<()> {
        let mut links = self.image_links.clone();
        if !image_links::update(&mut links, id, field, value) {
            anyhow::bail!("Unknown image link: {id}");
        }
        self.commit_links(links)
    }

    pub fn delete_image_link(&mut self, id: &str) -> anyhow::Result<()> {
        let mut links = self.image_links.clone();
        if !image_links::delete(&mut links, id) {
            anyhow::bail!("Unknown image link: {id}");
        }
        self.commit_links(links)
    }

    /// Point slide backgrounds at their linked images and store the deck.
    pub fn apply_image_links(&mut self) -> anyhow::Result<usize> {
        let mut presentation = self.presentation.clone();
        let applied = image_links::apply_to(&self.image_links, &mut presentation);
        self.set_presentation(presentation)?;
        Ok(applied)
    }

    fn commit_links(&mut self, links: Vec<ImageLink>) -> anyhow::Result<()> {
        self.persist(storage::IMAGE_LINKS, &links)?;
        self.image_links = links;
        Ok(())
    }

    /// Drop every stored key and return to the defaults.
    pub fn reset_all(&mut self) -> anyhow::Result<()> {
        for key in storage::ALL_KEYS {
            self.forget(key)?;
        }
        self.presentation = Presentation::shipped()?;
        self.navigation = NavigationConfig::default();
        self.animation = AnimationConfig::default();
        self.colors = ColorScheme::default();
        self.current_theme = None;
        self.custom_themes.clear();
        self.image_links.clear();
        self.last_error = None;
        Ok(())
    }
}

/// Why an import did not take effect.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav_config::{BottomItem, MoveDirection};
    use crate::schema::{BackgroundKind, ContentType};
    use crate::storage::{MemoryStorage, StorageError};

    fn fresh() -> DeckState {
        DeckState::load(Box::new(MemoryStorage::new())).unwrap()
    }

    fn seeded(entries: &[(&str, &str)]) -> DeckState {
        let mut storage = MemoryStorage::new();
        for (k, v) in entries {
            storage.set(k, v).unwrap();
        }
        DeckState::load(Box::new(storage)).unwrap()
    }

    #[test]
    fn test_defaults_without_storage() {
        let state = fresh();
        assert_eq!(state.presentation(), &Presentation::shipped().unwrap());
        assert_eq!(state.navigation(), &NavigationConfig::default());
        assert_eq!(state.current_theme(), None);
        assert!(state.last_error().is_none());
    }

    #[test]
    fn test_import_trailing_comma_keeps_data() {
        let mut state = fresh();
        let before = state.presentation().clone();
        let err = state
            .import_json(r#"{"presentation": {"title": "x",}, "slides": []}"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ImportError::Invalid(ValidationError::Syntax { .. })
        ));
        assert_eq!(state.presentation(), &before);
        assert!(state.last_error().is_some());
    }

    #[test]
    fn test_import_valid_document_persists() {
        let mut state = fresh();
        let mut pres = Presentation::shipped().unwrap();
        pres.meta.title = "Imported".into();
        state.import_json(&pres.to_json_pretty()).unwrap();
        assert_eq!(state.presentation().meta.title, "Imported");

        let reloaded = DeckState::load(state.storage).unwrap();
        assert_eq!(reloaded.presentation().meta.title, "Imported");
    }

    #[test]
    fn test_corrupt_stored_values_fall_back() {
        let state = seeded(&[
            (storage::NAVIGATION_CONFIG, "{not json"),
            (storage::ANIMATION_CONFIG, r#"{"type":"spin"}"#),
        ]);
        assert_eq!(state.navigation(), &NavigationConfig::default());
        assert_eq!(state.animation(), &AnimationConfig::default());
        assert!(state.last_error().unwrap().starts_with("animation-config"));
    }

    #[test]
    fn test_apply_theme_persists_deck_and_selection() {
        let mut state = fresh();
        state.apply_theme("blue-ocean").unwrap();
        assert_eq!(state.current_theme(), Some("blue-ocean"));
        for slide in &state.presentation().slides {
            assert_eq!(slide.background.kind, BackgroundKind::Gradient);
            assert!(!slide.overlay);
        }
        let reloaded = DeckState::load(state.storage).unwrap();
        assert_eq!(reloaded.current_theme(), Some("blue-ocean"));
        let title = reloaded
            .presentation()
            .slides
            .iter()
            .find(|s| s.content_type == ContentType::Title)
            .unwrap();
        assert_eq!(
            title.background.source,
            "linear-gradient(135deg, #0c4a6e 0%, #075985 50%, #0284c7 100%)"
        );
    }

    #[test]
    fn test_apply_unknown_theme_fails() {
        let mut state = fresh();
        let before = state.presentation().clone();
        assert!(state.apply_theme("neon").is_err());
        assert_eq!(state.presentation(), &before);
    }

    #[test]
    fn test_custom_theme_lifecycle() {
        let mut state = fresh();
        let id = state
            .save_custom_theme("red-energy", "Mine", "Custom theme")
            .unwrap();
        assert!(id.starts_with("custom-"));
        assert!(state.find_theme(&id).unwrap().is_custom());
        assert_eq!(state.all_themes().len(), 9);

        let exported = state.export_theme(&id).unwrap();
        let imported = state.import_theme(&exported).unwrap();
        assert_ne!(imported, id);
        assert_eq!(state.custom_themes().len(), 2);

        state.delete_custom_theme(&id).unwrap();
        assert!(state.delete_custom_theme("dark-professional").is_err());
        assert_eq!(state.custom_themes().len(), 1);

        let reloaded = DeckState::load(state.storage).unwrap();
        assert_eq!(reloaded.custom_themes()[0].id, imported);
    }

    #[test]
    fn test_import_theme_rejects_garbage() {
        let mut state = fresh();
        assert!(state.import_theme("{\"id\": 1}").is_err());
        assert!(state.custom_themes().is_empty());
        assert!(state.last_error().is_some());
    }

    #[test]
    fn test_navigation_updates_persist() {
        let mut state = fresh();
        let moved = state
            .update_navigation(|c| c.move_bottom(BottomItem::Next, MoveDirection::Up))
            .unwrap();
        assert!(moved);
        let reloaded = DeckState::load(state.storage).unwrap();
        assert_eq!(reloaded.navigation().bottom_nav.order[1], BottomItem::Next);
    }

    #[test]
    fn test_reset_colors_removes_key() {
        let mut state = fresh();
        state.set_color(Mode::Dark, "primary", "217 91% 60%").unwrap();
        assert_eq!(state.colors().dark.primary, "217 91% 60%");
        assert!(state.has_stored(storage::COLOR_SCHEME));
        assert!(state.set_color(Mode::Dark, "glow", "1 1% 1%").is_err());
        state.reset_colors().unwrap();
        assert_eq!(state.colors(), &ColorScheme::default());
        assert!(!state.has_stored(storage::COLOR_SCHEME));
    }

    #[test]
    fn test_image_links_flow() {
        let mut state = fresh();
        let n = state.presentation().slide_count();
        assert_eq!(state.ensure_image_links().unwrap().len(), n);
        state
            .update_image_link("slide-1", LinkField::Url, "/img/cover.png")
            .unwrap();
        assert!(state.delete_image_link("slide-99").is_err());
        assert_eq!(state.apply_image_links().unwrap(), n);
        let first = state.presentation().slide_by_id(1).unwrap();
        assert_eq!(first.background.source, "/img/cover.png");
    }

    /// Reads like an empty store, refuses every write.
    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io {
                path: format!("{key}.json").into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.set(key, "")
        }
    }

    #[test]
    fn test_failed_writes_leave_memory_unchanged() {
        let mut state = DeckState::load(Box::new(ReadOnlyStorage)).unwrap();
        let before = state.presentation().clone();

        let mut edited = before.clone();
        edited.meta.title = "Edited".into();
        assert!(state.set_presentation(edited).is_err());
        assert_eq!(state.presentation(), &before);

        assert!(state.apply_theme("blue-ocean").is_err());
        assert_eq!(state.presentation(), &before);
        assert_eq!(state.current_theme(), None);

        assert!(state.set_color(Mode::Dark, "primary", "0 100% 50%").is_err());
        assert_eq!(state.colors(), &ColorScheme::default());

        assert!(
            state
                .update_navigation(|c| c.toggle_top(crate::nav_config::TopItem::Sound))
                .is_err()
        );
        assert_eq!(state.navigation(), &NavigationConfig::default());

        let mut animation = AnimationConfig::default();
        animation.set_delay(0.5).unwrap();
        assert!(state.set_animation(animation).is_err());
        assert_eq!(state.animation(), &AnimationConfig::default());

        assert!(state.save_custom_theme(theme::DEFAULT_THEME_ID, "Mine", "").is_err());
        assert!(state.custom_themes().is_empty());

        assert!(state.ensure_image_links().is_err());
        assert!(state.image_links().is_empty());
    }

    #[test]
    fn test_reset_all() {
        let mut state = fresh();
        state.apply_theme("green-nature").unwrap();
        state.reset_all().unwrap();
        assert_eq!(state.current_theme(), None);
        assert_eq!(state.presentation(), &Presentation::shipped().unwrap());
        for key in storage::ALL_KEYS {
            assert_eq!(state.storage.get(key).unwrap(), None);
        }
    }
}
