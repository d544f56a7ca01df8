use crate::render::layout::{FooterLine, LayoutNode, PanelRow};
use crate::schema::{Alignment, ContentPayload, Footer, parse_icon_text};

/// Text-heavy slide: every optional block in a fixed order.
///
/// Only a single-string footer is shown here; list footers belong to `cta`.
pub fn render(content: &ContentPayload) -> Vec<LayoutNode> {
    let centered = content.alignment == Alignment::Center;
    let mut nodes = Vec::new();

    nodes.extend(super::badge(content, false));
    nodes.extend(super::heading(content.title.as_ref(), 1, centered));
    nodes.extend(super::heading(content.subtitle.as_ref(), 3, false));

    if let Some(paragraphs) = &content.paragraphs {
        nodes.push(LayoutNode::Paragraphs {
            lines: paragraphs.clone(),
        });
    }

    if let Some(quote) = &content.quote {
        nodes.push(LayoutNode::Quote {
            text: format!("\"{}\"", quote.text),
            color: quote.color.clone(),
            centered,
        });
    }

    if let Some(items) = &content.items {
        nodes.push(LayoutNode::ItemPanel {
            rows: items.iter().map(|item| panel_row(item)).collect(),
            centered,
        });
    }

    nodes.extend(super::highlight(content));

    if let Some(Footer::Text(text)) = &content.footer {
        nodes.push(LayoutNode::Footer {
            lines: vec![FooterLine {
                text: text.clone(),
                emphasized: false,
            }],
        });
    }

    nodes
}

/// Rows with an icon show the stripped text. Rows that already carry their
/// own marker are left alone; everything else gets a check mark.
fn panel_row(item: &str) -> PanelRow {
    let parsed = parse_icon_text(item);
    if parsed.icon.is_some() {
        return PanelRow {
            icon: parsed.icon,
            check_mark: false,
            text: parsed.text,
        };
    }
    let has_marker = item.starts_with(super::checklist::CHECK_MARK) || item.contains('\u{2022}');
    PanelRow {
        icon: None,
        check_mark: !has_marker,
        text: item.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_row_with_icon() {
        let row = panel_row("[Rocket] Launch fast");
        assert_eq!(row.icon.as_deref(), Some("Rocket"));
        assert!(!row.check_mark);
        assert_eq!(row.text, "Launch fast");
    }

    #[test]
    fn test_panel_row_keeps_existing_markers() {
        let row = panel_row("\u{2713} Already done");
        assert!(!row.check_mark);
        assert_eq!(row.text, "\u{2713} Already done");

        let row = panel_row("Step \u{2022} two");
        assert!(!row.check_mark);
        assert_eq!(row.text, "Step \u{2022} two");
    }

    #[test]
    fn test_panel_row_adds_check_mark() {
        let row = panel_row("Plain item");
        assert_eq!(row.icon, None);
        assert!(row.check_mark);
        assert_eq!(row.text, "Plain item");
    }
}
