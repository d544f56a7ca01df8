use crate::render::layout::LayoutNode;
use crate::schema::ContentPayload;

/// Title slide: badge, centered headline and subtitle.
pub fn render(content: &ContentPayload) -> Vec<LayoutNode> {
    [
        super::badge(content, true),
        super::heading(content.title.as_ref(), 1, true),
        super::heading(content.subtitle.as_ref(), 2, true),
    ]
    .into_iter()
    .flatten()
    .collect()
}
