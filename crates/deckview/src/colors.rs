//! HSL/hex conversion for the color palette editor.
//!
//! Inputs come from free-text fields, so malformed values never fail: they
//! convert to [`HEX_SENTINEL`] or [`HSL_SENTINEL`] instead.

use serde::{Deserialize, Serialize};

use crate::background::parse_hex_rgb;

pub const HEX_SENTINEL: &str = "#000000";
pub const HSL_SENTINEL: &str = "0 0% 0%";

/// Hue in degrees, saturation and lightness in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    /// Parse the palette form `"217 91% 60%"`.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.split_whitespace().map(|p| {
            p.strip_suffix('%')
                .unwrap_or(p)
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
        });
        let h = parts.next()??;
        let s = parts.next()??;
        let l = parts.next()??;
        if parts.next().is_some() {
            return None;
        }
        Some(Self {
            h: h.rem_euclid(360.0),
            s: s.clamp(0.0, 100.0),
            l: l.clamp(0.0, 100.0),
        })
    }

    pub fn to_rgb(self) -> [u8; 3] {
        let hue = self.h / 360.0;
        let saturation = self.s / 100.0;
        let lightness = self.l / 100.0;

        let (r, g, b) = if saturation == 0.0 {
            (lightness, lightness, lightness)
        } else {
            let q = if lightness < 0.5 {
                lightness * (1.0 + saturation)
            } else {
                lightness + saturation - lightness * saturation
            };
            let p = 2.0 * lightness - q;
            (
                hue_to_channel(p, q, hue + 1.0 / 3.0),
                hue_to_channel(p, q, hue),
                hue_to_channel(p, q, hue - 1.0 / 3.0),
            )
        };

        [to_byte(r), to_byte(g), to_byte(b)]
    }

    /// Integer-rounded HSL of an RGB color.
    pub fn from_rgb([r, g, b]: [u8; 3]) -> Self {
        let r = r as f64 / 255.0;
        let g = g as f64 / 255.0;
        let b = b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        let (mut h, mut s) = (0.0, 0.0);

        if max != min {
            let d = max - min;
            s = if l > 0.5 {
                d / (2.0 - max - min)
            } else {
                d / (max + min)
            };
            h = if max == r {
                ((g - b) / d + if g < b { 6.0 } else { 0.0 }) / 6.0
            } else if max == g {
                ((b - r) / d + 2.0) / 6.0
            } else {
                ((r - g) / d + 4.0) / 6.0
            };
        }

        Self {
            h: (h * 360.0).round(),
            s: (s * 100.0).round(),
            l: (l * 100.0).round(),
        }
    }
}

impl std::fmt::Display for Hsl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}% {}%", self.h, self.s, self.l)
    }
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

fn to_byte(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

pub fn rgb_to_hex([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// `"217 91% 60%"` -> `"#3c83f6"`.
pub fn hsl_to_hex(hsl: &str) -> String {
    match Hsl::parse(hsl) {
        Some(parsed) => rgb_to_hex(parsed.to_rgb()),
        None => HEX_SENTINEL.to_string(),
    }
}

/// `"#3c83f6"` or `"#fff"` -> `"217 91% 60%"`.
pub fn hex_to_hsl(hex: &str) -> String {
    match parse_hex_rgb(hex.trim()) {
        Some(rgb) => Hsl::from_rgb(rgb).to_string(),
        None => HSL_SENTINEL.to_string(),
    }
}

/// The nine palette entries of one mode, as HSL strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub background: String,
    pub foreground: String,
    pub card: String,
    pub primary: String,
    pub secondary: String,
    pub muted: String,
    pub accent: String,
    pub destructive: String,
    pub border: String,
}

pub const PALETTE_KEYS: [&str; 9] = [
    "background",
    "foreground",
    "card",
    "primary",
    "secondary",
    "muted",
    "accent",
    "destructive",
    "border",
];

impl Palette {
    pub fn get(&self, key: &str) -> Option<&str> {
        Some(match key {
            "background" => &self.background,
            "foreground" => &self.foreground,
            "card" => &self.card,
            "primary" => &self.primary,
            "secondary" => &self.secondary,
            "muted" => &self.muted,
            "accent" => &self.accent,
            "destructive" => &self.destructive,
            "border" => &self.border,
            _ => return None,
        })
    }

    fn slot(&mut self, key: &str) -> Option<&mut String> {
        Some(match key {
            "background" => &mut self.background,
            "foreground" => &mut self.foreground,
            "card" => &mut self.card,
            "primary" => &mut self.primary,
            "secondary" => &mut self.secondary,
            "muted" => &mut self.muted,
            "accent" => &mut self.accent,
            "destructive" => &mut self.destructive,
            "border" => &mut self.border,
            _ => return None,
        })
    }

    /// Entries as `(--key, value)` CSS custom properties.
    pub fn css_variables(&self) -> Vec<(String, String)> {
        PALETTE_KEYS
            .iter()
            .filter_map(|k| self.get(k).map(|v| (format!("--{k}"), v.to_string())))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Mode {
    Light,
    Dark,
}

/// Light and dark palettes. Stored under `color-scheme`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorScheme {
    pub light: Palette,
    pub dark: Palette,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            light: Palette {
                background: "0 0% 100%".into(),
                foreground: "0 0% 3.9%".into(),
                card: "0 0% 100%".into(),
                primary: "0 0% 9%".into(),
                secondary: "0 0% 96.1%".into(),
                muted: "0 0% 96.1%".into(),
                accent: "0 0% 96.1%".into(),
                destructive: "0 84.2% 60.2%".into(),
                border: "0 0% 89.8%".into(),
            },
            dark: Palette {
                background: "0 0% 3.9%".into(),
                foreground: "0 0% 98%".into(),
                card: "0 0% 3.9%".into(),
                primary: "0 0% 98%".into(),
                secondary: "0 0% 14.9%".into(),
                muted: "0 0% 14.9%".into(),
                accent: "0 0% 14.9%".into(),
                destructive: "0 62.8% 30.6%".into(),
                border: "0 0% 14.9%".into(),
            },
        }
    }
}

impl ColorScheme {
    pub fn palette(&self, mode: Mode) -> &Palette {
        match mode {
            Mode::Light => &self.light,
            Mode::Dark => &self.dark,
        }
    }

    /// Set one entry. The value is stored as given, like the editor's HSL
    /// text field; use [`hex_to_hsl`] first for hex input.
    pub fn set(&mut self, mode: Mode, key: &str, value: &str) -> anyhow::Result<()> {
        let palette = match mode {
            Mode::Light => &mut self.light,
            Mode::Dark => &mut self.dark,
        };
        let slot = palette.slot(key).ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown palette key: {key}. Valid keys: {}",
                PALETTE_KEYS.join(", ")
            )
        })?;
        *slot = value.to_string();
        Ok(())
    }
}
