use crate::render::layout::LayoutNode;
use crate::schema::ContentPayload;

const CARD_COLUMNS: usize = 3;

pub fn render(content: &ContentPayload) -> Vec<LayoutNode> {
    let mut nodes: Vec<LayoutNode> = [
        super::badge(content, false),
        super::heading(content.title.as_ref(), 1, false),
    ]
    .into_iter()
    .flatten()
    .collect();

    if let Some(cards) = &content.cards {
        nodes.push(LayoutNode::CardGrid {
            columns: CARD_COLUMNS,
            cards: cards.clone(),
        });
    }
    nodes
}
