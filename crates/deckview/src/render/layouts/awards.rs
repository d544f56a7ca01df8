use crate::render::layout::LayoutNode;
use crate::schema::ContentPayload;

const AWARD_COLUMNS: usize = 4;

pub fn render(content: &ContentPayload) -> Vec<LayoutNode> {
    let mut nodes: Vec<LayoutNode> = [
        super::badge(content, true),
        super::heading(content.title.as_ref(), 1, true),
    ]
    .into_iter()
    .flatten()
    .collect();

    if let Some(awards) = &content.awards {
        nodes.push(LayoutNode::AwardGrid {
            columns: AWARD_COLUMNS,
            awards: awards.clone(),
        });
    }
    nodes
}
