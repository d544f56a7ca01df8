use colored::Colorize;

use crate::cli::NavCommands;
use crate::nav_config::NavigationConfig;

pub fn run(command: NavCommands) -> anyhow::Result<()> {
    let mut state = super::open_state()?;
    match command {
        NavCommands::Show => {
            print_layout(state.navigation());
            return Ok(());
        }
        NavCommands::MoveBottom { item, direction } => {
            if !state.update_navigation(|nav| nav.move_bottom(item, direction))? {
                println!("{}", "Already at the edge, nothing moved".yellow());
            }
        }
        NavCommands::MoveTop { item, direction } => {
            if !state.update_navigation(|nav| nav.move_top(item, direction))? {
                println!("{}", "Already at the edge, nothing moved".yellow());
            }
        }
        NavCommands::ToggleBottom { item } => {
            let visible = state.update_navigation(|nav| nav.toggle_bottom(item))?;
            println!("{item:?} is now {}", shown(visible));
        }
        NavCommands::ToggleTop { item } => {
            let visible = state.update_navigation(|nav| nav.toggle_top(item))?;
            println!("{item:?} is now {}", shown(visible));
        }
        NavCommands::BottomPosition { position } => {
            state.update_navigation(|nav| nav.set_bottom_position(position))?;
        }
        NavCommands::TopPosition { position } => {
            state.update_navigation(|nav| nav.set_top_position(position))?;
        }
        NavCommands::Hint { visible, position } => {
            if visible.is_none() && position.is_none() {
                anyhow::bail!("Nothing to change. Pass --visible and/or --position.");
            }
            state.update_navigation(|nav| {
                if let Some(v) = visible {
                    nav.set_hint_visible(v);
                }
                if let Some(p) = position {
                    nav.set_hint_position(p);
                }
            })?;
        }
        NavCommands::Reset => {
            state.reset_navigation()?;
            println!("{}", "Navigation layout reset".green().bold());
        }
    }
    print_layout(state.navigation());
    Ok(())
}

fn shown(visible: bool) -> colored::ColoredString {
    if visible {
        "shown".green()
    } else {
        "hidden".red()
    }
}

fn print_layout(nav: &NavigationConfig) {
    let bottom: Vec<String> = nav
        .bottom_nav
        .order
        .iter()
        .map(|item| label(format!("{item:?}"), nav.bottom_nav.visible.get(*item)))
        .collect();
    let top: Vec<String> = nav
        .top_nav
        .order
        .iter()
        .map(|item| label(format!("{item:?}"), nav.top_nav.visible.get(*item)))
        .collect();

    println!(
        "{:<8} {}  {}",
        "Top".bold(),
        top.join(" | "),
        format!("({:?})", nav.top_nav.position).dimmed()
    );
    println!(
        "{:<8} {}  {}",
        "Bottom".bold(),
        bottom.join(" | "),
        format!("({:?})", nav.bottom_nav.position).dimmed()
    );
    println!(
        "{:<8} {}  {}",
        "Hint".bold(),
        shown(nav.keyboard_hint.visible),
        format!("({:?})", nav.keyboard_hint.position).dimmed()
    );
}

fn label(name: String, visible: bool) -> String {
    if visible {
        name
    } else {
        format!("{}", name.strikethrough().dimmed())
    }
}
