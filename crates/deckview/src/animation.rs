use clap::ValueEnum;
use serde::{Deserialize, Serialize};

pub const DURATION_RANGE: (f32, f32) = (0.1, 2.0);
pub const DELAY_RANGE: (f32, f32) = (0.0, 1.0);

/// Slide transition timing. Stored under `animation-config`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    #[serde(rename = "type")]
    pub kind: AnimationType,
    /// Seconds.
    pub duration: f32,
    pub ease: Ease,
    /// Seconds before the incoming slide starts moving.
    pub delay: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AnimationType {
    Fade,
    Slide,
    Scale,
    Flip,
    Zoom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "camelCase")]
#[value(rename_all = "camelCase")]
pub enum Ease {
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
    Spring,
}

/// One pose of a slide during a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub opacity: f32,
    /// Horizontal offset in logical pixels at 1920 wide.
    pub x: f32,
    pub scale: f32,
    /// Rotation around the vertical axis, degrees.
    pub rotate_y: f32,
}

/// Where an incoming slide starts, where it rests, and where an outgoing
/// slide ends up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Variants {
    pub initial: Keyframe,
    pub animate: Keyframe,
    pub exit: Keyframe,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            kind: AnimationType::Fade,
            duration: 0.5,
            ease: Ease::EaseOut,
            delay: 0.0,
        }
    }
}

impl AnimationConfig {
    /// Total time from key press to the incoming slide coming to rest.
    pub fn total_seconds(&self) -> f32 {
        self.duration + self.delay
    }

    pub fn set_duration(&mut self, seconds: f32) -> anyhow::Result<()> {
        let (min, max) = DURATION_RANGE;
        if !(min..=max).contains(&seconds) {
            anyhow::bail!("Duration must be between {min}s and {max}s, got {seconds}");
        }
        self.duration = seconds;
        Ok(())
    }

    pub fn set_delay(&mut self, seconds: f32) -> anyhow::Result<()> {
        let (min, max) = DELAY_RANGE;
        if !(min..=max).contains(&seconds) {
            anyhow::bail!("Delay must be between {min}s and {max}s, got {seconds}");
        }
        self.delay = seconds;
        Ok(())
    }
}

impl Keyframe {
    pub const REST: Keyframe = Keyframe {
        opacity: 1.0,
        x: 0.0,
        scale: 1.0,
        rotate_y: 0.0,
    };

    const fn hidden() -> Self {
        Self {
            opacity: 0.0,
            ..Self::REST
        }
    }

    pub fn lerp(&self, to: &Keyframe, t: f32) -> Keyframe {
        let mix = |a: f32, b: f32| a + (b - a) * t;
        Keyframe {
            opacity: mix(self.opacity, to.opacity).clamp(0.0, 1.0),
            x: mix(self.x, to.x),
            scale: mix(self.scale, to.scale),
            rotate_y: mix(self.rotate_y, to.rotate_y),
        }
    }
}

impl AnimationType {
    pub fn variants(self) -> Variants {
        let hidden = Keyframe::hidden();
        let (initial, exit) = match self {
            AnimationType::Fade => (hidden, hidden),
            AnimationType::Slide => (
                Keyframe { x: 100.0, ..hidden },
                Keyframe { x: -100.0, ..hidden },
            ),
            AnimationType::Scale => (
                Keyframe { scale: 0.8, ..hidden },
                Keyframe { scale: 0.8, ..hidden },
            ),
            AnimationType::Flip => (
                Keyframe { rotate_y: 90.0, ..hidden },
                Keyframe { rotate_y: -90.0, ..hidden },
            ),
            AnimationType::Zoom => (
                Keyframe { scale: 1.5, ..hidden },
                Keyframe { scale: 0.5, ..hidden },
            ),
        };
        Variants {
            initial,
            animate: Keyframe::REST,
            exit,
        }
    }
}

impl Ease {
    /// Map linear progress in `[0, 1]` to eased progress.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Ease::Linear => t,
            Ease::EaseIn => cubic_bezier(0.42, 0.0, 1.0, 1.0, t),
            Ease::EaseOut => cubic_bezier(0.0, 0.0, 0.58, 1.0, t),
            Ease::EaseInOut => cubic_bezier(0.42, 0.0, 0.58, 1.0, t),
            Ease::Spring => {
                if t >= 1.0 {
                    1.0
                } else {
                    // Underdamped, overshoots once and settles.
                    1.0 - (-6.0 * t).exp() * (12.0 * t).cos()
                }
            }
        }
    }
}

/// CSS-style timing curve through (0,0), (x1,y1), (x2,y2), (1,1).
fn cubic_bezier(x1: f32, y1: f32, x2: f32, y2: f32, t: f32) -> f32 {
    let bez = |a: f32, b: f32, s: f32| {
        let inv = 1.0 - s;
        3.0 * inv * inv * s * a + 3.0 * inv * s * s * b + s * s * s
    };
    // x is monotonic on [0, 1], so bisection finds the parameter for t.
    let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
    for _ in 0..32 {
        let mid = (lo + hi) / 2.0;
        if bez(x1, x2, mid) < t {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    bez(y1, y2, (lo + hi) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_shape() {
        let json = serde_json::to_value(AnimationConfig::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "fade", "duration": 0.5, "ease": "easeOut", "delay": 0.0})
        );
    }

    #[test]
    fn test_parse_stored_config() {
        let config: AnimationConfig = serde_json::from_str(
            r#"{"type":"zoom","duration":1.2,"ease":"easeInOut","delay":0.3}"#,
        )
        .unwrap();
        assert_eq!(config.kind, AnimationType::Zoom);
        assert_eq!(config.ease, Ease::EaseInOut);
        assert!((config.total_seconds() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_variants() {
        let slide = AnimationType::Slide.variants();
        assert_eq!(slide.initial.x, 100.0);
        assert_eq!(slide.exit.x, -100.0);
        assert_eq!(slide.animate, Keyframe::REST);

        let zoom = AnimationType::Zoom.variants();
        assert_eq!(zoom.initial.scale, 1.5);
        assert_eq!(zoom.exit.scale, 0.5);

        let flip = AnimationType::Flip.variants();
        assert_eq!(flip.initial.rotate_y, 90.0);
        assert_eq!(flip.exit.rotate_y, -90.0);

        for kind in AnimationType::value_variants() {
            let v = kind.variants();
            assert_eq!(v.initial.opacity, 0.0, "{kind:?}");
            assert_eq!(v.exit.opacity, 0.0, "{kind:?}");
        }
    }

    #[test]
    fn test_ease_endpoints() {
        for ease in Ease::value_variants() {
            assert!(ease.apply(0.0).abs() < 1e-3, "{ease:?}");
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-3, "{ease:?}");
        }
    }

    #[test]
    fn test_ease_shapes() {
        assert!(Ease::EaseIn.apply(0.5) < 0.5);
        assert!(Ease::EaseOut.apply(0.5) > 0.5);
        assert!((Ease::EaseInOut.apply(0.5) - 0.5).abs() < 1e-3);
        assert!((Ease::Linear.apply(0.25) - 0.25).abs() < 1e-6);
        // Spring overshoots.
        let peak = (1..100)
            .map(|i| Ease::Spring.apply(i as f32 / 100.0))
            .fold(0.0_f32, f32::max);
        assert!(peak > 1.0);
    }

    #[test]
    fn test_keyframe_lerp() {
        let v = AnimationType::Scale.variants();
        let mid = v.initial.lerp(&v.animate, 0.5);
        assert!((mid.opacity - 0.5).abs() < 1e-6);
        assert!((mid.scale - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_setters_validate_ranges() {
        let mut config = AnimationConfig::default();
        assert!(config.set_duration(3.0).is_err());
        assert!(config.set_delay(-0.1).is_err());
        config.set_duration(1.0).unwrap();
        config.set_delay(0.2).unwrap();
        assert_eq!(config.duration, 1.0);
        assert_eq!(config.delay, 0.2);
    }
}
