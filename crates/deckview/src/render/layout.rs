use serde::Serialize;

use crate::schema::{Alignment, Award, Button, Card, IconText, Stat};

/// Everything needed to paint one slide, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutTree {
    pub slide_id: u32,
    pub content_type: String,
    /// Resolved background: a CSS gradient or an image location, possibly empty.
    pub background: String,
    pub overlay: bool,
    pub alignment: Alignment,
    pub nodes: Vec<LayoutNode>,
}

impl LayoutTree {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node", rename_all = "kebab-case")]
pub enum LayoutNode {
    Badge {
        text: String,
        color: String,
        text_color: String,
    },
    Heading {
        level: u8,
        text: String,
        centered: bool,
    },
    Paragraphs {
        lines: Vec<String>,
    },
    Quote {
        text: String,
        color: String,
        centered: bool,
    },
    /// Bordered panel of icon-annotated rows.
    ItemPanel {
        rows: Vec<PanelRow>,
        centered: bool,
    },
    Highlight {
        text: String,
        color: String,
    },
    Footer {
        lines: Vec<FooterLine>,
    },
    CardGrid {
        columns: usize,
        cards: Vec<Card>,
    },
    StatGrid {
        columns: usize,
        stats: Vec<Stat>,
    },
    ListColumns {
        columns: Vec<ListColumn>,
        centered: bool,
    },
    /// Bordered panel of lines already prefixed with a check mark.
    Checklist {
        lines: Vec<String>,
    },
    AwardGrid {
        columns: usize,
        awards: Vec<Award>,
    },
    ButtonRow {
        buttons: Vec<Button>,
    },
}

impl LayoutNode {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Badge { .. } => "badge",
            Self::Heading { .. } => "heading",
            Self::Paragraphs { .. } => "paragraphs",
            Self::Quote { .. } => "quote",
            Self::ItemPanel { .. } => "item-panel",
            Self::Highlight { .. } => "highlight",
            Self::Footer { .. } => "footer",
            Self::CardGrid { .. } => "card-grid",
            Self::StatGrid { .. } => "stat-grid",
            Self::ListColumns { .. } => "list-columns",
            Self::Checklist { .. } => "checklist",
            Self::AwardGrid { .. } => "award-grid",
            Self::ButtonRow { .. } => "button-row",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelRow {
    pub icon: Option<String>,
    /// Draw a check mark in place of a missing icon.
    pub check_mark: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListColumn {
    pub title: String,
    pub rows: Vec<IconText>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FooterLine {
    pub text: String,
    pub emphasized: bool,
}
