use eframe::egui::Color32;
use serde::{Deserialize, Serialize};

use crate::background::parse_hex_rgb;
use crate::schema::{BackgroundKind, ContentType, Presentation};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePreset {
    pub id: String,
    pub name: String,
    pub description: String,
    pub colors: ThemeColors,
    pub gradients: ThemeGradients,
    #[serde(rename = "isCustom", default, skip_serializing_if = "Option::is_none")]
    pub is_custom: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub background: String,
    pub text: String,
    pub card_bg: String,
    pub border: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeGradients {
    pub hero: String,
    pub card: String,
    pub button: String,
}

/// `(id, name, description, [primary, secondary, accent, background, text, cardBg, border], [hero, card, button])`
type PresetSeed = (
    &'static str,
    &'static str,
    &'static str,
    [&'static str; 7],
    [&'static str; 3],
);

const BUILTIN: [PresetSeed; 8] = [
    (
        "dark-professional",
        "Dark Professional",
        "Modern dark theme with blue accents",
        ["#3B82F6", "#8B5CF6", "#10B981", "#0F172A", "#F8FAFC", "#1E293B", "#334155"],
        [
            "linear-gradient(135deg, #1e293b 0%, #334155 50%, #1e40af 100%)",
            "linear-gradient(135deg, #1e293b 0%, #334155 100%)",
            "linear-gradient(135deg, #3b82f6 0%, #2563eb 100%)",
        ],
    ),
    (
        "light-professional",
        "Light Professional",
        "Clean light theme with blue accents",
        ["#2563EB", "#7C3AED", "#059669", "#FFFFFF", "#0F172A", "#F8FAFC", "#E2E8F0"],
        [
            "linear-gradient(135deg, #f8fafc 0%, #e0e7ff 50%, #dbeafe 100%)",
            "linear-gradient(135deg, #ffffff 0%, #f8fafc 100%)",
            "linear-gradient(135deg, #2563eb 0%, #1d4ed8 100%)",
        ],
    ),
    (
        "blue-ocean",
        "Blue Ocean",
        "Refreshing blue water theme",
        ["#0EA5E9", "#06B6D4", "#14B8A6", "#0C4A6E", "#F0F9FF", "#075985", "#0284C7"],
        [
            "linear-gradient(135deg, #0c4a6e 0%, #075985 50%, #0284c7 100%)",
            "linear-gradient(135deg, #075985 0%, #0369a1 100%)",
            "linear-gradient(135deg, #0ea5e9 0%, #0284c7 100%)",
        ],
    ),
    (
        "purple-gradient",
        "Purple Gradient",
        "Vibrant purple and pink theme",
        ["#A855F7", "#EC4899", "#F59E0B", "#581C87", "#FAF5FF", "#6B21A8", "#7C3AED"],
        [
            "linear-gradient(135deg, #581c87 0%, #7c3aed 50%, #a855f7 100%)",
            "linear-gradient(135deg, #6b21a8 0%, #7c3aed 100%)",
            "linear-gradient(135deg, #a855f7 0%, #9333ea 100%)",
        ],
    ),
    (
        "green-nature",
        "Green Nature",
        "Fresh green and earth tones",
        ["#10B981", "#059669", "#84CC16", "#064E3B", "#F0FDF4", "#065F46", "#047857"],
        [
            "linear-gradient(135deg, #064e3b 0%, #065f46 50%, #047857 100%)",
            "linear-gradient(135deg, #065f46 0%, #047857 100%)",
            "linear-gradient(135deg, #10b981 0%, #059669 100%)",
        ],
    ),
    (
        "red-energy",
        "Red Energy",
        "Bold red and orange theme",
        ["#EF4444", "#F97316", "#FCD34D", "#7F1D1D", "#FEF2F2", "#991B1B", "#B91C1C"],
        [
            "linear-gradient(135deg, #7f1d1d 0%, #991b1b 50%, #dc2626 100%)",
            "linear-gradient(135deg, #991b1b 0%, #b91c1c 100%)",
            "linear-gradient(135deg, #ef4444 0%, #dc2626 100%)",
        ],
    ),
    (
        "midnight-blue",
        "Midnight Blue",
        "Deep blue midnight theme",
        ["#60A5FA", "#818CF8", "#34D399", "#1E3A8A", "#EFF6FF", "#1E40AF", "#2563EB"],
        [
            "linear-gradient(135deg, #1e3a8a 0%, #1e40af 50%, #2563eb 100%)",
            "linear-gradient(135deg, #1e40af 0%, #2563eb 100%)",
            "linear-gradient(135deg, #60a5fa 0%, #3b82f6 100%)",
        ],
    ),
    (
        "sunset-gradient",
        "Sunset Gradient",
        "Warm sunset orange and pink",
        ["#FB923C", "#F472B6", "#FBBF24", "#7C2D12", "#FFF7ED", "#9A3412", "#C2410C"],
        [
            "linear-gradient(135deg, #7c2d12 0%, #ea580c 50%, #f97316 100%)",
            "linear-gradient(135deg, #9a3412 0%, #c2410c 100%)",
            "linear-gradient(135deg, #fb923c 0%, #f97316 100%)",
        ],
    ),
];

pub const DEFAULT_THEME_ID: &str = "dark-professional";

impl ThemePreset {
    fn from_seed((id, name, description, c, g): &PresetSeed) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            colors: ThemeColors {
                primary: c[0].to_string(),
                secondary: c[1].to_string(),
                accent: c[2].to_string(),
                background: c[3].to_string(),
                text: c[4].to_string(),
                card_bg: c[5].to_string(),
                border: c[6].to_string(),
            },
            gradients: ThemeGradients {
                hero: g[0].to_string(),
                card: g[1].to_string(),
                button: g[2].to_string(),
            },
            is_custom: None,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.is_custom.unwrap_or(false)
    }

    /// The gradient a slide of this content type gets.
    pub fn gradient_for(&self, content_type: &ContentType) -> &str {
        match content_type {
            ContentType::Title => &self.gradients.hero,
            ContentType::Cta => &self.gradients.button,
            _ => &self.gradients.card,
        }
    }

    /// Rewrite every slide to this theme's gradients with the overlay off.
    /// Only the background type and source change; a fallback stays put.
    pub fn apply_to(&self, presentation: &mut Presentation) {
        for slide in &mut presentation.slides {
            slide.background.kind = BackgroundKind::Gradient;
            slide.background.source = self.gradient_for(&slide.content_type).to_string();
            slide.overlay = false;
        }
    }

    /// CSS custom properties, `--theme-*` for colors and `--theme-gradient-*`
    /// for gradients.
    pub fn css_variables(&self) -> Vec<(String, String)> {
        let c = &self.colors;
        let g = &self.gradients;
        [
            ("primary", &c.primary),
            ("secondary", &c.secondary),
            ("accent", &c.accent),
            ("background", &c.background),
            ("text", &c.text),
            ("card-bg", &c.card_bg),
            ("border", &c.border),
            ("gradient-hero", &g.hero),
            ("gradient-card", &g.card),
            ("gradient-button", &g.button),
        ]
        .into_iter()
        .map(|(k, v)| (format!("--theme-{k}"), v.clone()))
        .collect()
    }

    /// Copy under a new custom identity.
    pub fn as_custom(&self, id: String, name: &str, description: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            description: description.to_string(),
            is_custom: Some(true),
            ..self.clone()
        }
    }
}

pub fn builtin_themes() -> Vec<ThemePreset> {
    BUILTIN.iter().map(ThemePreset::from_seed).collect()
}

pub fn default_theme() -> ThemePreset {
    ThemePreset::from_seed(&BUILTIN[0])
}

/// Look a preset up among the built-ins first, then the custom ones.
pub fn find_theme(id: &str, custom: &[ThemePreset]) -> Option<ThemePreset> {
    builtin_themes()
        .into_iter()
        .chain(custom.iter().cloned())
        .find(|t| t.id == id)
}

/// Fresh identifier for a custom preset, unique against `existing`.
pub fn custom_theme_id(existing: &[ThemePreset], millis: u128) -> String {
    let mut stamp = millis;
    loop {
        let id = format!("custom-{stamp}");
        if !existing.iter().any(|t| t.id == id) {
            return id;
        }
        stamp += 1;
    }
}

/// Colors and type sizes the viewer paints with.
#[derive(Debug, Clone)]
pub struct Style {
    pub name: String,
    pub background: Color32,
    pub foreground: Color32,
    pub muted: Color32,
    pub accent: Color32,
    pub card_background: Color32,
    pub card_border: Color32,
    pub h1_size: f32,
    pub h2_size: f32,
    pub h3_size: f32,
    pub body_size: f32,
    pub small_size: f32,
}

impl Style {
    pub fn from_preset(preset: &ThemePreset) -> Self {
        let color = |hex: &str, fallback: Color32| {
            parse_hex_rgb(hex)
                .map(|[r, g, b]| Color32::from_rgb(r, g, b))
                .unwrap_or(fallback)
        };
        let foreground = color(&preset.colors.text, Color32::WHITE);
        Self {
            name: preset.id.clone(),
            background: color(&preset.colors.background, Color32::from_rgb(0x0F, 0x17, 0x2A)),
            foreground,
            muted: Self::with_opacity(foreground, 0.7),
            accent: color(&preset.colors.primary, Color32::from_rgb(0x3B, 0x82, 0xF6)),
            // Panels are translucent white over the slide background.
            card_background: Color32::from_rgba_unmultiplied(255, 255, 255, 26),
            card_border: Color32::from_rgba_unmultiplied(255, 255, 255, 51),
            h1_size: 88.0,
            h2_size: 48.0,
            h3_size: 40.0,
            body_size: 30.0,
            small_size: 20.0,
        }
    }

    /// Apply opacity to a color
    pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
        Color32::from_rgba_unmultiplied(
            color.r(),
            color.g(),
            color.b(),
            (opacity.clamp(0.0, 1.0) * color.a() as f32) as u8,
        )
    }

    pub fn heading_size(&self, level: u8) -> f32 {
        match level {
            1 => self.h1_size,
            2 => self.h2_size,
            3 => self.h3_size,
            _ => self.body_size,
        }
    }

    /// Map the Tailwind-style color names used in slide documents
    /// (`blue-500`, `yellow-400`, `white`) to concrete colors.
    pub fn named_color(&self, name: &str) -> Color32 {
        if let Some([r, g, b]) = parse_hex_rgb(name) {
            return Color32::from_rgb(r, g, b);
        }
        let (hue, shade) = name.rsplit_once('-').unwrap_or((name, "500"));
        let shade: u16 = shade.parse().unwrap_or(500);
        let base = match hue {
            "white" => return Color32::WHITE,
            "black" => return Color32::BLACK,
            "red" => (0xEF, 0x44, 0x44),
            "orange" => (0xF9, 0x73, 0x16),
            "amber" => (0xF5, 0x9E, 0x0B),
            "yellow" => (0xEA, 0xB3, 0x08),
            "green" => (0x22, 0xC5, 0x5E),
            "emerald" => (0x10, 0xB9, 0x81),
            "teal" => (0x14, 0xB8, 0xA6),
            "cyan" => (0x06, 0xB6, 0xD4),
            "blue" => (0x3B, 0x82, 0xF6),
            "indigo" => (0x63, 0x66, 0xF1),
            "purple" => (0xA8, 0x55, 0xF7),
            "pink" => (0xEC, 0x48, 0x99),
            "gray" | "slate" => (0x64, 0x74, 0x8B),
            _ => return self.accent,
        };
        // Lighter shades toward white, darker toward black.
        let k = (shade as f32 - 500.0) / 500.0;
        let mix = |c: u8| -> u8 {
            if k < 0.0 {
                (c as f32 + (255.0 - c as f32) * -k * 0.8) as u8
            } else {
                (c as f32 * (1.0 - k * 0.8)) as u8
            }
        };
        Color32::from_rgb(mix(base.0), mix(base.1), mix(base.2))
    }
}
