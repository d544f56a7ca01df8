use crate::render::layout::LayoutNode;
use crate::schema::ContentPayload;

pub const CHECK_MARK: char = '\u{2713}';

/// Checklist: every item gets a literal check mark. Icon prefixes are shown
/// as written.
pub fn render(content: &ContentPayload) -> Vec<LayoutNode> {
    let mut nodes: Vec<LayoutNode> = [
        super::badge(content, false),
        super::heading(content.title.as_ref(), 1, false),
    ]
    .into_iter()
    .flatten()
    .collect();

    if let Some(items) = &content.items {
        nodes.push(LayoutNode::Checklist {
            lines: items
                .iter()
                .map(|item| format!("{CHECK_MARK} {item}"))
                .collect(),
        });
    }
    nodes.extend(super::highlight(content));
    nodes
}
