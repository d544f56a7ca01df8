use crate::schema::{Background, BackgroundKind};

/// Pick the string to paint behind a slide.
///
/// Gradients are used as-is. For images the fallback wins when present: the
/// primary is usually a local asset that may not exist, while the fallback
/// points at a stable remote copy.
pub fn resolve(bg: &Background) -> String {
    match bg.kind {
        BackgroundKind::Gradient => bg.source.clone(),
        BackgroundKind::Image => match bg.fallback.as_deref() {
            Some(fallback) if !fallback.is_empty() => fallback.to_string(),
            _ => bg.source.clone(),
        },
    }
}

/// Candidate image sources in the order they should be tried.
///
/// The second entry is what a failed load swaps to. There is no third try.
pub fn image_candidates(bg: &Background) -> Vec<String> {
    if bg.kind != BackgroundKind::Image {
        return Vec::new();
    }
    let first = resolve(bg);
    let mut out = Vec::with_capacity(2);
    if !first.is_empty() {
        out.push(first.clone());
    }
    for other in [Some(bg.source.as_str()), bg.fallback.as_deref()]
        .into_iter()
        .flatten()
    {
        if !other.is_empty() && other != first {
            out.push(other.to_string());
            break;
        }
    }
    out
}

pub fn is_gradient(value: &str) -> bool {
    let v = value.trim_start();
    v.starts_with("linear-gradient(") || v.starts_with("radial-gradient(")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradientShape {
    Linear,
    Radial,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GradientStop {
    pub color: [u8; 3],
    /// Position in 0.0..=1.0.
    pub offset: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    pub shape: GradientShape,
    /// CSS angle in degrees: 0 points up, 90 points right.
    pub angle: f32,
    pub stops: Vec<GradientStop>,
}

/// Parse the subset of CSS gradients the themes produce: an optional angle
/// followed by hex color stops with optional percentages.
///
/// Stops without a percentage are spread evenly, as CSS does.
pub fn parse_gradient(value: &str) -> Option<Gradient> {
    let v = value.trim();
    let (shape, rest) = if let Some(rest) = v.strip_prefix("linear-gradient(") {
        (GradientShape::Linear, rest)
    } else if let Some(rest) = v.strip_prefix("radial-gradient(") {
        (GradientShape::Radial, rest)
    } else {
        return None;
    };
    let inner = rest.strip_suffix(')')?;

    let mut angle = 180.0;
    let mut raw_stops: Vec<([u8; 3], Option<f32>)> = Vec::new();

    for (i, part) in inner.split(',').map(str::trim).enumerate() {
        if i == 0 {
            if let Some(deg) = part.strip_suffix("deg") {
                angle = deg.trim().parse().ok()?;
                continue;
            }
            if let Some(dir) = part.strip_prefix("to ") {
                angle = direction_angle(dir.trim())?;
                continue;
            }
            if shape == GradientShape::Radial && !part.starts_with('#') {
                // Shape/extent keywords such as `circle at center`.
                continue;
            }
        }

        let mut tokens = part.split_whitespace();
        let color = parse_hex_rgb(tokens.next()?)?;
        let offset = match tokens.next() {
            Some(pct) => Some(pct.strip_suffix('%')?.parse::<f32>().ok()? / 100.0),
            None => None,
        };
        raw_stops.push((color, offset));
    }

    if raw_stops.len() < 2 {
        return None;
    }

    let last = raw_stops.len() - 1;
    let stops = raw_stops
        .into_iter()
        .enumerate()
        .map(|(i, (color, offset))| GradientStop {
            color,
            offset: offset.unwrap_or(i as f32 / last as f32).clamp(0.0, 1.0),
        })
        .collect();

    Some(Gradient {
        shape,
        angle,
        stops,
    })
}

impl Gradient {
    /// Interpolated color at position `t` along the gradient line.
    pub fn color_at(&self, t: f32) -> [u8; 3] {
        let t = t.clamp(0.0, 1.0);
        let first = &self.stops[0];
        if t <= first.offset {
            return first.color;
        }
        for pair in self.stops.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if t <= b.offset {
                let span = (b.offset - a.offset).max(f32::EPSILON);
                let k = (t - a.offset) / span;
                return [
                    lerp_channel(a.color[0], b.color[0], k),
                    lerp_channel(a.color[1], b.color[1], k),
                    lerp_channel(a.color[2], b.color[2], k),
                ];
            }
        }
        self.stops[self.stops.len() - 1].color
    }
}

fn lerp_channel(a: u8, b: u8, k: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * k).round() as u8
}

fn direction_angle(dir: &str) -> Option<f32> {
    Some(match dir {
        "top" => 0.0,
        "top right" | "right top" => 45.0,
        "right" => 90.0,
        "bottom right" | "right bottom" => 135.0,
        "bottom" => 180.0,
        "bottom left" | "left bottom" => 225.0,
        "left" => 270.0,
        "top left" | "left top" => 315.0,
        _ => return None,
    })
}

/// Parse `#rgb` or `#rrggbb`.
pub fn parse_hex_rgb(hex: &str) -> Option<[u8; 3]> {
    let digits = hex.strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, c) in digits.chars().enumerate() {
                let d = c.to_digit(16)? as u8;
                out[i] = d * 17;
            }
            Some(out)
        }
        6 => Some([
            u8::from_str_radix(&digits[0..2], 16).ok()?,
            u8::from_str_radix(&digits[2..4], 16).ok()?,
            u8::from_str_radix(&digits[4..6], 16).ok()?,
        ]),
        _ => None,
    }
}
