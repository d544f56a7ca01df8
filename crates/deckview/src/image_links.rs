use serde::{Deserialize, Serialize};

use crate::schema::{Background, Presentation};

/// Per-slide background image override. Stored as a list under `image-links`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLink {
    pub id: String,
    pub slide_number: u32,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_url: Option<String>,
}

/// Which of a link's two URLs an update targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LinkField {
    Url,
    Fallback,
}

const STOCK_PHOTO_BASE: u64 = 1_500_000_000_000;

fn local_asset(slide_number: u32) -> String {
    format!("/assets/slide-{slide_number}.jpg")
}

/// Remote stock photo used as the default fallback for a slide.
pub fn stock_fallback(slide_number: u32) -> String {
    format!(
        "https://images.unsplash.com/photo-{}?crop=entropy&fit=max&fm=jpg&q=80&w=1920",
        STOCK_PHOTO_BASE + u64::from(slide_number)
    )
}

/// One link per slide, numbered from 1.
pub fn initialize(total_slides: usize) -> Vec<ImageLink> {
    (1..=total_slides as u32)
        .map(|n| ImageLink {
            id: format!("slide-{n}"),
            slide_number: n,
            url: local_asset(n),
            fallback_url: Some(stock_fallback(n)),
        })
        .collect()
}

/// Append a link for the next slide number. Returns its id.
pub fn add(links: &mut Vec<ImageLink>) -> String {
    let n = links.len() as u32 + 1;
    let id = format!("slide-{n}");
    links.push(ImageLink {
        id: id.clone(),
        slide_number: n,
        url: local_asset(n),
        fallback_url: Some(String::new()),
    });
    id
}

/// Set one URL of the link with `id`. Returns false when no link matches.
pub fn update(links: &mut [ImageLink], id: &str, field: LinkField, value: &str) -> bool {
    let Some(link) = links.iter_mut().find(|l| l.id == id) else {
        return false;
    };
    match field {
        LinkField::Url => link.url = value.to_string(),
        LinkField::Fallback => link.fallback_url = Some(value.to_string()),
    }
    true
}

pub fn delete(links: &mut Vec<ImageLink>, id: &str) -> bool {
    let before = links.len();
    links.retain(|l| l.id != id);
    links.len() != before
}

/// Point each linked slide at its image. Slides are matched by id; links
/// without a slide are skipped. Returns how many slides changed.
pub fn apply_to(links: &[ImageLink], presentation: &mut Presentation) -> usize {
    let mut applied = 0;
    for link in links {
        let Some(slide) = presentation.slide_by_id_mut(link.slide_number) else {
            log::debug!("No slide {} for image link {}", link.slide_number, link.id);
            continue;
        };
        slide.background = Background::image(
            link.url.clone(),
            link.fallback_url.clone().filter(|f| !f.is_empty()),
        );
        applied += 1;
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::BackgroundKind;

    #[test]
    fn test_initialize() {
        let links = initialize(3);
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].id, "slide-1");
        assert_eq!(links[2].url, "/assets/slide-3.jpg");
        assert_eq!(
            links[1].fallback_url.as_deref(),
            Some(
                "https://images.unsplash.com/photo-1500000000002?crop=entropy&fit=max&fm=jpg&q=80&w=1920"
            )
        );
    }

    #[test]
    fn test_add_update_delete() {
        let mut links = initialize(2);
        assert_eq!(add(&mut links), "slide-3");
        assert_eq!(links[2].fallback_url.as_deref(), Some(""));

        assert!(update(&mut links, "slide-3", LinkField::Url, "/img/x.png"));
        assert!(update(&mut links, "slide-3", LinkField::Fallback, "https://cdn/x.png"));
        assert_eq!(links[2].url, "/img/x.png");
        assert!(!update(&mut links, "slide-9", LinkField::Url, "nope"));

        assert!(delete(&mut links, "slide-1"));
        assert!(!delete(&mut links, "slide-1"));
        assert_eq!(links.len(), 2);
    }

    #[test]
    fn test_add_after_delete_reuses_length() {
        let mut links = initialize(3);
        delete(&mut links, "slide-1");
        // Numbered by length, so this collides with the existing slide-3.
        assert_eq!(add(&mut links), "slide-3");
    }

    #[test]
    fn test_apply_to_presentation() {
        let mut pres = Presentation::shipped().unwrap();
        let mut links = initialize(2);
        links[1].fallback_url = Some(String::new());
        links.push(ImageLink {
            id: "orphan".into(),
            slide_number: 999,
            url: "/x.jpg".into(),
            fallback_url: None,
        });

        assert_eq!(apply_to(&links, &mut pres), 2);
        let s1 = pres.slide_by_id(1).unwrap();
        assert_eq!(s1.background.kind, BackgroundKind::Image);
        assert_eq!(s1.background.source, "/assets/slide-1.jpg");
        assert!(s1.background.fallback.is_some());
        assert_eq!(pres.slide_by_id(2).unwrap().background.fallback, None);
    }

    #[test]
    fn test_stored_shape() {
        let json = serde_json::to_value(&initialize(1)[0]).unwrap();
        assert_eq!(json["slideNumber"], 1);
        assert!(json["fallbackUrl"].is_string());
    }
}
