use crate::render::layout::{LayoutNode, ListColumn};
use crate::schema::{Alignment, ContentPayload, parse_icon_text};

/// Two-column lists. Every item goes through icon parsing; items without an
/// icon keep their original text.
pub fn render(content: &ContentPayload) -> Vec<LayoutNode> {
    let mut nodes: Vec<LayoutNode> = [
        super::badge(content, false),
        super::heading(content.title.as_ref(), 1, true),
    ]
    .into_iter()
    .flatten()
    .collect();

    if let Some(lists) = &content.lists {
        let columns = lists
            .iter()
            .map(|list| ListColumn {
                title: list.title.clone(),
                rows: list.items.iter().map(|item| parse_icon_text(item)).collect(),
            })
            .collect();
        nodes.push(LayoutNode::ListColumns {
            columns,
            centered: content.alignment == Alignment::Center,
        });
    }
    nodes
}
