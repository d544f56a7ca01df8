use crate::render::layout::LayoutNode;
use crate::schema::ContentPayload;

const STAT_COLUMNS: usize = 3;

pub fn render(content: &ContentPayload) -> Vec<LayoutNode> {
    let mut nodes: Vec<LayoutNode> = [
        super::badge(content, false),
        super::heading(content.title.as_ref(), 1, true),
    ]
    .into_iter()
    .flatten()
    .collect();

    if let Some(stats) = &content.stats {
        nodes.push(LayoutNode::StatGrid {
            columns: STAT_COLUMNS,
            stats: stats.clone(),
        });
    }
    nodes
}
