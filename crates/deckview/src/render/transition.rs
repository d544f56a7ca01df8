use std::time::Instant;

use crate::animation::{AnimationConfig, Keyframe};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionDirection {
    Forward,
    Backward,
}

/// A slide change in flight. The outgoing slide plays the exit keyframes
/// while the incoming one plays initial to rest, starting after the delay.
#[derive(Debug, Clone)]
pub struct ActiveTransition {
    pub from: usize,
    pub to: usize,
    pub direction: TransitionDirection,
    config: AnimationConfig,
    start: Instant,
}

impl ActiveTransition {
    pub fn new(
        from: usize,
        to: usize,
        config: AnimationConfig,
        direction: TransitionDirection,
    ) -> Self {
        Self {
            from,
            to,
            direction,
            config,
            start: Instant::now(),
        }
    }

    fn elapsed(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed() >= self.config.total_seconds()
    }

    /// `(outgoing, incoming)` poses right now.
    pub fn poses(&self) -> (Keyframe, Keyframe) {
        poses_at(&self.config, self.direction, self.elapsed())
    }
}

/// `(outgoing, incoming)` poses `elapsed` seconds into a transition.
pub fn poses_at(
    config: &AnimationConfig,
    direction: TransitionDirection,
    elapsed: f32,
) -> (Keyframe, Keyframe) {
    let variants = config.kind.variants();
    let duration = config.duration.max(f32::EPSILON);

    let out_t = config.ease.apply(elapsed / duration);
    let in_t = config.ease.apply((elapsed - config.delay) / duration);

    let mut outgoing = variants.animate.lerp(&variants.exit, out_t);
    let mut incoming = variants.initial.lerp(&variants.animate, in_t);

    // Going back, the deck moves the other way.
    if direction == TransitionDirection::Backward {
        outgoing.x = -outgoing.x;
        outgoing.rotate_y = -outgoing.rotate_y;
        incoming.x = -incoming.x;
        incoming.rotate_y = -incoming.rotate_y;
    }
    (outgoing, incoming)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::{AnimationType, Ease};

    fn config(kind: AnimationType, delay: f32) -> AnimationConfig {
        AnimationConfig {
            kind,
            duration: 1.0,
            ease: Ease::Linear,
            delay,
        }
    }

    #[test]
    fn test_fade_endpoints() {
        let c = config(AnimationType::Fade, 0.0);
        let (out, inc) = poses_at(&c, TransitionDirection::Forward, 0.0);
        assert_eq!(out.opacity, 1.0);
        assert_eq!(inc.opacity, 0.0);
        let (out, inc) = poses_at(&c, TransitionDirection::Forward, 1.0);
        assert_eq!(out.opacity, 0.0);
        assert_eq!(inc, Keyframe::REST);
    }

    #[test]
    fn test_delay_holds_incoming() {
        let c = config(AnimationType::Slide, 0.5);
        let (_, inc) = poses_at(&c, TransitionDirection::Forward, 0.4);
        assert_eq!(inc.x, 100.0);
        let (_, inc) = poses_at(&c, TransitionDirection::Forward, 1.0);
        assert!((inc.x - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_backward_mirrors_motion() {
        let c = config(AnimationType::Slide, 0.0);
        let (out, inc) = poses_at(&c, TransitionDirection::Backward, 0.0);
        assert_eq!(inc.x, -100.0);
        assert_eq!(out.x, 0.0);
        let (out, _) = poses_at(&c, TransitionDirection::Backward, 1.0);
        assert_eq!(out.x, 100.0);
    }

    #[test]
    fn test_fresh_transition_is_running() {
        let t = ActiveTransition::new(0, 1, AnimationConfig::default(), TransitionDirection::Forward);
        assert!(!t.is_complete());
        assert_eq!((t.from, t.to), (0, 1));
    }
}
