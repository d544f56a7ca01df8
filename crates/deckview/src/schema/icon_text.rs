use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

static ICON_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[([^\]]+)\]\s*(.+)$").expect("icon prefix pattern is valid")
});

/// A list entry split into an optional icon name and the text to display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IconText {
    pub icon: Option<String>,
    pub text: String,
}

/// Split `"[IconName] remaining text"` into its icon and text.
///
/// Strings without a bracket prefix come back unchanged with no icon, leading
/// `✓` or bullet characters included. A bare `"[Star]"` with nothing after it
/// is not an icon reference either.
pub fn parse_icon_text(raw: &str) -> IconText {
    match ICON_PREFIX.captures(raw) {
        Some(caps) => IconText {
            icon: Some(caps[1].to_string()),
            text: caps[2].to_string(),
        },
        None => IconText {
            icon: None,
            text: raw.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_icon_prefix_is_extracted() {
        let parsed = parse_icon_text("[Zap] Instant insights");
        assert_eq!(parsed.icon.as_deref(), Some("Zap"));
        assert_eq!(parsed.text, "Instant insights");
    }

    #[test]
    fn test_whitespace_after_bracket_is_optional() {
        let parsed = parse_icon_text("[Check]Done");
        assert_eq!(parsed.icon.as_deref(), Some("Check"));
        assert_eq!(parsed.text, "Done");
    }

    #[test]
    fn test_plain_text_passes_through() {
        for raw in ["✓ Already checked", "• Bullet", "No icon here", ""] {
            let parsed = parse_icon_text(raw);
            assert_eq!(parsed.icon, None);
            assert_eq!(parsed.text, raw);
        }
    }

    #[test]
    fn test_bare_bracket_is_not_an_icon() {
        let parsed = parse_icon_text("[Star]");
        assert_eq!(parsed.icon, None);
        assert_eq!(parsed.text, "[Star]");
    }

    #[test]
    fn test_trailing_spaces_leave_one_character_of_text() {
        // The separator gives back one space so the text part is non-empty.
        let parsed = parse_icon_text("[Star]   ");
        assert_eq!(parsed.icon.as_deref(), Some("Star"));
        assert_eq!(parsed.text, " ");
    }

    #[test]
    fn test_bracket_must_lead() {
        let parsed = parse_icon_text("Use [Zap] here");
        assert_eq!(parsed.icon, None);
        assert_eq!(parsed.text, "Use [Zap] here");
    }

    proptest! {
        #[test]
        fn prop_icon_and_text_recovered(name in "[A-Za-z][A-Za-z0-9]{0,15}", text in "[A-Za-z0-9][A-Za-z0-9 ,.!]{0,40}") {
            let parsed = parse_icon_text(&format!("[{name}] {text}"));
            prop_assert_eq!(parsed.icon.as_deref(), Some(name.as_str()));
            prop_assert_eq!(parsed.text, text);
        }

        #[test]
        fn prop_unbracketed_text_unchanged(text in "[^\\[\n][^\n]{0,40}") {
            let parsed = parse_icon_text(&text);
            prop_assert_eq!(parsed.icon, None);
            prop_assert_eq!(parsed.text, text);
        }
    }
}
