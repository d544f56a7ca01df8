pub mod awards;
pub mod cards;
pub mod checklist;
pub mod content;
pub mod cta;
pub mod dual_list;
pub mod stats;
pub mod title;

use crate::render::layout::LayoutNode;
use crate::schema::ContentPayload;

const DEFAULT_BADGE_TEXT: &str = "white";

/// Badge node. Only some layouts honor a custom `textColor`.
fn badge(content: &ContentPayload, honor_text_color: bool) -> Option<LayoutNode> {
    let b = content.badge.as_ref().filter(|b| !b.text.is_empty())?;
    Some(LayoutNode::Badge {
        text: b.text.clone(),
        color: b.color.clone(),
        text_color: match (&b.text_color, honor_text_color) {
            (Some(c), true) => c.clone(),
            _ => DEFAULT_BADGE_TEXT.to_string(),
        },
    })
}

/// Empty strings count as absent.
fn heading(text: Option<&String>, level: u8, centered: bool) -> Option<LayoutNode> {
    text.filter(|t| !t.is_empty()).map(|t| LayoutNode::Heading {
        level,
        text: t.clone(),
        centered,
    })
}

fn highlight(content: &ContentPayload) -> Option<LayoutNode> {
    let h = content.highlight.as_ref().filter(|h| !h.text.is_empty())?;
    Some(LayoutNode::Highlight {
        text: h.text.clone(),
        color: h.color.clone(),
    })
}
