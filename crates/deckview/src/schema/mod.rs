pub mod icon_text;
pub mod validate;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub use icon_text::{IconText, parse_icon_text};
pub use validate::{
    SchemaIssue, Validated, ValidationError, ValidationWarning, validate_str,
};

/// The deck shipped with the binary, used when storage holds no override.
pub const DEFAULT_DOCUMENT: &str = include_str!("../../data/slides.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    #[serde(rename = "presentation", alias = "metadata")]
    pub meta: PresentationMeta,
    pub slides: Vec<Slide>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PresentationMeta {
    pub title: String,
    pub subtitle: String,
    /// Stored count. Consumers use `slides.len()` instead.
    #[serde(rename = "totalSlides", alias = "totalSlideCount")]
    pub total_slides: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub id: u32,
    #[serde(rename = "type", alias = "contentType")]
    pub content_type: ContentType,
    pub background: Background,
    #[serde(default)]
    pub overlay: bool,
    pub content: ContentPayload,
}

/// Selects the layout and which payload fields are read.
///
/// Unrecognized tags are kept as `Other` so a newer document still loads and
/// round-trips; such slides render empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ContentType {
    Title,
    Content,
    Cards,
    Stats,
    DualList,
    Checklist,
    Awards,
    Cta,
    Other(String),
}

impl ContentType {
    pub const KNOWN: [&'static str; 8] = [
        "title",
        "content",
        "cards",
        "stats",
        "dual-list",
        "checklist",
        "awards",
        "cta",
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::Content => "content",
            Self::Cards => "cards",
            Self::Stats => "stats",
            Self::DualList => "dual-list",
            Self::Checklist => "checklist",
            Self::Awards => "awards",
            Self::Cta => "cta",
            Self::Other(tag) => tag,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for ContentType {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "title" => Self::Title,
            "content" => Self::Content,
            "cards" => Self::Cards,
            "stats" => Self::Stats,
            "dual-list" => Self::DualList,
            "checklist" => Self::Checklist,
            "awards" => Self::Awards,
            "cta" => Self::Cta,
            _ => Self::Other(tag),
        }
    }
}

impl From<ContentType> for String {
    fn from(content_type: ContentType) -> Self {
        match content_type {
            ContentType::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Background {
    #[serde(rename = "type")]
    pub kind: BackgroundKind,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}

impl Background {
    #[cfg(test)]
    pub fn gradient(source: impl Into<String>) -> Self {
        Self {
            kind: BackgroundKind::Gradient,
            source: source.into(),
            fallback: None,
        }
    }

    pub fn image(source: impl Into<String>, fallback: Option<String>) -> Self {
        Self {
            kind: BackgroundKind::Image,
            source: source.into(),
            fallback,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Image,
    Gradient,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    Left,
    #[default]
    Center,
    Right,
}

/// `null` reads as the default value, the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Union of every content field. `Slide::content_type` decides which ones
/// the renderer reads; the rest are carried along untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub alignment: Alignment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraphs: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<Quote>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<Footer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<Highlight>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cards: Option<Vec<Card>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<Stat>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lists: Option<Vec<ItemList>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub awards: Option<Vec<Award>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<Button>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Badge {
    pub text: String,
    pub color: String,
    #[serde(rename = "textColor", default, skip_serializing_if = "Option::is_none")]
    pub text_color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub text: String,
    pub color: String,
}

/// `content` slides only show the single-string form, `cta` slides only the
/// list form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Footer {
    Text(String),
    Lines(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub number: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemList {
    pub title: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Award {
    pub icon: String,
    pub title: String,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub text: String,
    pub variant: ButtonVariant,
    pub action: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonVariant {
    Primary,
    Outline,
}

impl Presentation {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    #[cfg(test)]
    pub fn slide_by_id(&self, id: u32) -> Option<&Slide> {
        self.slides.iter().find(|s| s.id == id)
    }

    pub fn slide_by_id_mut(&mut self, id: u32) -> Option<&mut Slide> {
        self.slides.iter_mut().find(|s| s.id == id)
    }

    /// Parse and validate the bundled deck.
    pub fn shipped() -> anyhow::Result<Self> {
        let validated = validate::validate_str(DEFAULT_DOCUMENT)?;
        Ok(validated.presentation)
    }

    pub fn to_json_pretty(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| String::from("{}"))
    }
}
