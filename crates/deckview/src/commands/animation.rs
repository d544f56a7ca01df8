use colored::Colorize;

use crate::animation::{AnimationConfig, AnimationType, Ease};
use crate::cli::AnimationCommands;

pub fn run(command: AnimationCommands) -> anyhow::Result<()> {
    let mut state = super::open_state()?;
    match command {
        AnimationCommands::Show => {}
        AnimationCommands::Set {
            kind,
            duration,
            ease,
            delay,
        } => {
            let config = merge(*state.animation(), kind, duration, ease, delay)?;
            state.set_animation(config)?;
            println!("{}", "Transition updated".green().bold());
        }
        AnimationCommands::Reset => {
            state.reset_animation()?;
            println!("{}", "Transition reset".green().bold());
        }
    }
    print_config(state.animation());
    Ok(())
}

fn merge(
    mut config: AnimationConfig,
    kind: Option<AnimationType>,
    duration: Option<f32>,
    ease: Option<Ease>,
    delay: Option<f32>,
) -> anyhow::Result<AnimationConfig> {
    if kind.is_none() && duration.is_none() && ease.is_none() && delay.is_none() {
        anyhow::bail!("Nothing to change. Pass --type, --duration, --ease, or --delay.");
    }
    if let Some(kind) = kind {
        config.kind = kind;
    }
    if let Some(ease) = ease {
        config.ease = ease;
    }
    if let Some(seconds) = duration {
        config.set_duration(seconds)?;
    }
    if let Some(seconds) = delay {
        config.set_delay(seconds)?;
    }
    Ok(config)
}

fn print_config(config: &AnimationConfig) {
    println!("  {:<10} {:?}", "type", config.kind);
    println!("  {:<10} {}s", "duration", config.duration);
    println!("  {:<10} {:?}", "ease", config.ease);
    println!("  {:<10} {}s", "delay", config.delay);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_keeps_unset_fields() {
        let merged = merge(
            AnimationConfig::default(),
            Some(AnimationType::Flip),
            None,
            None,
            Some(0.25),
        )
        .unwrap();
        assert_eq!(merged.kind, AnimationType::Flip);
        assert_eq!(merged.duration, 0.5);
        assert_eq!(merged.ease, Ease::EaseOut);
        assert_eq!(merged.delay, 0.25);
    }

    #[test]
    fn test_merge_rejects_out_of_range() {
        let base = AnimationConfig::default();
        assert!(merge(base, None, Some(5.0), None, None).is_err());
        assert!(merge(base, None, None, None, Some(-0.1)).is_err());
        assert!(merge(base, None, None, None, None).is_err());
    }
}
