pub mod chrome;
pub mod image_cache;
pub mod layout;
pub mod layouts;
pub mod paint;
pub mod transition;

use crate::background;
use crate::schema::{ContentType, Slide};

pub use layout::{LayoutNode, LayoutTree};

/// Map a slide to its layout.
///
/// Pure and deterministic. Each content type reads a fixed set of payload
/// fields in a fixed order and skips the ones that are absent. Unknown content
/// types produce an empty layout.
pub fn render(slide: &Slide) -> LayoutTree {
    let content = &slide.content;
    let nodes = match &slide.content_type {
        ContentType::Title => layouts::title::render(content),
        ContentType::Content => layouts::content::render(content),
        ContentType::Cards => layouts::cards::render(content),
        ContentType::Stats => layouts::stats::render(content),
        ContentType::DualList => layouts::dual_list::render(content),
        ContentType::Checklist => layouts::checklist::render(content),
        ContentType::Awards => layouts::awards::render(content),
        ContentType::Cta => layouts::cta::render(content),
        ContentType::Other(_) => Vec::new(),
    };
    log::trace!(
        "slide {} ({}): {}",
        slide.id,
        slide.content_type,
        nodes
            .iter()
            .map(LayoutNode::kind)
            .collect::<Vec<_>>()
            .join(", ")
    );

    LayoutTree {
        slide_id: slide.id,
        content_type: slide.content_type.to_string(),
        background: background::resolve(&slide.background),
        overlay: slide.overlay,
        alignment: content.alignment,
        nodes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{
        Alignment, Award, Background, Badge, Button, ButtonVariant, Card, ContentPayload,
        Footer, Highlight, ItemList, Presentation, Quote, Stat,
    };

    fn slide(content_type: ContentType, content: ContentPayload) -> Slide {
        Slide {
            id: 1,
            content_type,
            background: Background::gradient("linear-gradient(135deg, #000 0%, #fff 100%)"),
            overlay: false,
            content,
        }
    }

    /// A payload with every field set, so each layout shows what it reads.
    fn full_payload() -> ContentPayload {
        ContentPayload {
            alignment: Alignment::Left,
            badge: Some(Badge {
                text: "Badge".into(),
                color: "blue-500".into(),
                text_color: Some("black".into()),
            }),
            title: Some("Title".into()),
            subtitle: Some("Subtitle".into()),
            paragraphs: Some(vec!["P1".into(), "P2".into()]),
            quote: Some(Quote {
                text: "Quote".into(),
                color: "yellow-400".into(),
            }),
            footer: Some(Footer::Text("Footer".into())),
            highlight: Some(Highlight {
                text: "Highlight".into(),
                color: "green-400".into(),
            }),
            items: Some(vec!["[Zap] Fast".into(), "Plain".into()]),
            cards: Some(vec![Card {
                icon: "Star".into(),
                title: "Card".into(),
                description: "Desc".into(),
            }]),
            stats: Some(vec![Stat {
                number: "40%".into(),
                label: "Growth".into(),
            }]),
            lists: Some(vec![ItemList {
                title: "Before".into(),
                items: vec!["[X] Slow".into()],
            }]),
            awards: Some(vec![Award {
                icon: "Medal".into(),
                title: "Best".into(),
                source: "Press".into(),
            }]),
            buttons: Some(vec![Button {
                text: "Go".into(),
                variant: ButtonVariant::Primary,
                action: "start".into(),
            }]),
        }
    }

    fn kinds(tree: &LayoutTree) -> Vec<&'static str> {
        tree.nodes.iter().map(LayoutNode::kind).collect()
    }

    #[test]
    fn test_field_order_per_content_type() {
        let cases: [(ContentType, &[&str]); 8] = [
            (ContentType::Title, &["badge", "heading", "heading"]),
            (
                ContentType::Content,
                &[
                    "badge",
                    "heading",
                    "heading",
                    "paragraphs",
                    "quote",
                    "item-panel",
                    "highlight",
                    "footer",
                ],
            ),
            (ContentType::Cards, &["badge", "heading", "card-grid"]),
            (ContentType::Stats, &["badge", "heading", "stat-grid"]),
            (ContentType::DualList, &["badge", "heading", "list-columns"]),
            (ContentType::Checklist, &["badge", "heading", "checklist", "highlight"]),
            (ContentType::Awards, &["badge", "heading", "award-grid"]),
            (ContentType::Cta, &["heading", "heading", "button-row"]),
        ];
        for (content_type, expected) in cases {
            let tree = render(&slide(content_type.clone(), full_payload()));
            assert_eq!(kinds(&tree), expected, "layout for {content_type}");
        }
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let tree = render(&slide(ContentType::Content, ContentPayload::default()));
        assert!(tree.is_empty());

        let content = ContentPayload {
            title: Some("Only a title".into()),
            ..Default::default()
        };
        let tree = render(&slide(ContentType::Stats, content));
        assert_eq!(kinds(&tree), vec!["heading"]);
    }

    #[test]
    fn test_unknown_content_type_renders_nothing() {
        let tree = render(&slide(ContentType::Other("timeline".into()), full_payload()));
        assert!(tree.is_empty());
        assert_eq!(tree.content_type, "timeline");
        assert!(!tree.background.is_empty());
    }

    #[test]
    fn test_render_is_deterministic() {
        let pres = Presentation::shipped().unwrap();
        for s in &pres.slides {
            assert_eq!(render(s), render(s));
        }
    }

    #[test]
    fn test_badge_text_color() {
        let badge_color = |ct: ContentType| match &render(&slide(ct, full_payload())).nodes[0] {
            LayoutNode::Badge { text_color, .. } => text_color.clone(),
            other => panic!("expected badge, got {other:?}"),
        };
        assert_eq!(badge_color(ContentType::Title), "black");
        assert_eq!(badge_color(ContentType::Awards), "black");
        assert_eq!(badge_color(ContentType::Content), "white");
        assert_eq!(badge_color(ContentType::Cards), "white");
    }

    #[test]
    fn test_content_footer_array_ignored() {
        let mut content = full_payload();
        content.footer = Some(Footer::Lines(vec!["a".into(), "b".into()]));
        let tree = render(&slide(ContentType::Content, content));
        assert!(!kinds(&tree).contains(&"footer"));
    }

    #[test]
    fn test_cta_footer_array_shown() {
        let mut content = full_payload();
        content.footer = Some(Footer::Lines(vec!["a".into(), "b".into()]));
        let tree = render(&slide(ContentType::Cta, content));
        assert_eq!(kinds(&tree).last(), Some(&"footer"));
    }

    #[test]
    fn test_checklist_does_not_parse_icons() {
        let tree = render(&slide(ContentType::Checklist, full_payload()));
        let LayoutNode::Checklist { lines } = &tree.nodes[2] else {
            panic!("expected checklist");
        };
        assert_eq!(lines, &vec!["\u{2713} [Zap] Fast".to_string(), "\u{2713} Plain".to_string()]);
    }

    #[test]
    fn test_dual_list_parses_icons() {
        let tree = render(&slide(ContentType::DualList, full_payload()));
        let LayoutNode::ListColumns { columns, centered } = &tree.nodes[2] else {
            panic!("expected list columns");
        };
        assert!(!centered);
        assert_eq!(columns[0].rows[0].icon.as_deref(), Some("X"));
        assert_eq!(columns[0].rows[0].text, "Slow");
    }

    #[test]
    fn test_quote_is_wrapped() {
        let tree = render(&slide(ContentType::Content, full_payload()));
        let quote = tree
            .nodes
            .iter()
            .find_map(|n| match n {
                LayoutNode::Quote { text, .. } => Some(text.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(quote, "\"Quote\"");
    }

    #[test]
    fn test_heading_centering() {
        let heading_centered = |ct: ContentType, alignment: Alignment| {
            let mut content = full_payload();
            content.alignment = alignment;
            render(&slide(ct, content))
                .nodes
                .iter()
                .find_map(|n| match n {
                    LayoutNode::Heading { level: 1, centered, .. } => Some(*centered),
                    _ => None,
                })
                .unwrap()
        };
        assert!(heading_centered(ContentType::Title, Alignment::Left));
        assert!(!heading_centered(ContentType::Content, Alignment::Left));
        assert!(heading_centered(ContentType::Content, Alignment::Center));
        assert!(!heading_centered(ContentType::Checklist, Alignment::Center));
    }

    #[test]
    fn test_tree_carries_slide_attributes() {
        let mut s = slide(ContentType::Title, full_payload());
        s.id = 4;
        s.overlay = true;
        s.background = Background::image("/assets/slide-4.jpg", Some("https://cdn/4.jpg".into()));
        let tree = render(&s);
        assert_eq!(tree.slide_id, 4);
        assert!(tree.overlay);
        assert_eq!(tree.background, "https://cdn/4.jpg");
        assert_eq!(tree.alignment, Alignment::Left);
    }
}
