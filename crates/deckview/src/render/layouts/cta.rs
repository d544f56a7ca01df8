use crate::render::layout::{FooterLine, LayoutNode};
use crate::schema::{ContentPayload, Footer};

/// Closing call to action. No badge. Only a list footer is shown, with its
/// last line emphasized.
pub fn render(content: &ContentPayload) -> Vec<LayoutNode> {
    let mut nodes = Vec::new();

    nodes.extend(super::heading(content.title.as_ref(), 1, true));
    nodes.extend(super::heading(content.subtitle.as_ref(), 2, true));

    if let Some(buttons) = &content.buttons {
        nodes.push(LayoutNode::ButtonRow {
            buttons: buttons.clone(),
        });
    }

    if let Some(Footer::Lines(lines)) = &content.footer {
        let last = lines.len().saturating_sub(1);
        nodes.push(LayoutNode::Footer {
            lines: lines
                .iter()
                .enumerate()
                .map(|(i, text)| FooterLine {
                    text: text.clone(),
                    emphasized: i == last,
                })
                .collect(),
        });
    }

    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_footer_line_is_emphasized() {
        let content = ContentPayload {
            footer: Some(Footer::Lines(vec![
                "Questions?".to_string(),
                "hello@example.com".to_string(),
            ])),
            ..Default::default()
        };
        let nodes = render(&content);
        let LayoutNode::Footer { lines } = &nodes[0] else {
            panic!("expected footer, got {:?}", nodes[0]);
        };
        assert!(!lines[0].emphasized);
        assert!(lines[1].emphasized);
    }

    #[test]
    fn test_string_footer_is_ignored() {
        let content = ContentPayload {
            footer: Some(Footer::Text("Thanks".to_string())),
            ..Default::default()
        };
        assert!(render(&content).is_empty());
    }

    #[test]
    fn test_badge_is_never_shown() {
        let content = ContentPayload {
            badge: Some(crate::schema::Badge {
                text: "New".to_string(),
                color: "blue-500".to_string(),
                text_color: None,
            }),
            title: Some("Join us".to_string()),
            ..Default::default()
        };
        let nodes = render(&content);
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].kind(), "heading");
    }
}
