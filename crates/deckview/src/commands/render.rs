use std::path::Path;

use crate::render;
use crate::schema::Presentation;

pub fn run(file: Option<&Path>, slide: Option<usize>) -> anyhow::Result<()> {
    let presentation = match file {
        Some(path) => super::read_deck(path)?,
        None => super::open_state()?.presentation().clone(),
    };
    let json = layout_json(&presentation, slide)?;
    println!("{json}");
    Ok(())
}

/// Layout trees as pretty JSON. `slide` is a 1-indexed position.
fn layout_json(presentation: &Presentation, slide: Option<usize>) -> anyhow::Result<String> {
    let total = presentation.slide_count();
    match slide {
        Some(n) => {
            let s = n
                .checked_sub(1)
                .and_then(|i| presentation.slides.get(i))
                .ok_or_else(|| anyhow::anyhow!("Slide {n} out of range (deck has {total})"))?;
            Ok(serde_json::to_string_pretty(&render::render(s))?)
        }
        None => {
            let trees: Vec<_> = presentation.slides.iter().map(render::render).collect();
            Ok(serde_json::to_string_pretty(&trees)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_slide_is_one_tree() {
        let deck = Presentation::shipped().unwrap();
        let json = layout_json(&deck, Some(1)).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.is_object());
    }

    #[test]
    fn test_whole_deck_is_an_array() {
        let deck = Presentation::shipped().unwrap();
        let json = layout_json(&deck, None).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value.as_array().unwrap().len(), deck.slide_count());
    }

    #[test]
    fn test_out_of_range_slide_is_an_error() {
        let deck = Presentation::shipped().unwrap();
        assert!(layout_json(&deck, Some(0)).is_err());
        assert!(layout_json(&deck, Some(deck.slide_count() + 1)).is_err());
    }
}
