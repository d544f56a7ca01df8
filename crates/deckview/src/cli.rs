use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::animation::{AnimationType, Ease};
use crate::colors::Mode;
use crate::image_links::LinkField;
use crate::nav_config::{BarPosition, BottomItem, Corner, MoveDirection, TopItem, TopPosition};

#[derive(Parser)]
#[command(name = "deckview")]
#[command(author, version, about)]
#[command(long_about = "A slide-deck viewer driven by a JSON presentation document.\n\n\
    Decks are rendered natively with per-slide gradient or image backgrounds.\n\
    Every customization (theme, navigation chrome, colors, animation, image\n\
    links) is stored locally and picked up on the next launch.\n\n\
    Examples:\n  \
    deckview                          Present the stored deck (fullscreen)\n  \
    deckview slides.json --windowed   Present a deck file in a window\n  \
    deckview validate slides.json     Check a deck for schema errors\n  \
    deckview theme apply blue-ocean   Restyle every slide")]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Deck file to present (defaults to the stored deck)
    pub file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Launch in a window instead of fullscreen
    #[arg(long, global = false)]
    pub windowed: bool,

    /// Start on a specific slide (1-indexed)
    #[arg(long, global = false)]
    pub slide: Option<usize>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check a deck file against the presentation schema
    Validate {
        /// Deck file to check
        file: PathBuf,
    },

    /// Print the layout tree of one or all slides as JSON
    Render {
        /// Deck file (defaults to the stored deck)
        file: Option<PathBuf>,

        /// Only this slide (1-indexed position)
        #[arg(long)]
        slide: Option<usize>,
    },

    /// List, apply, and manage theme presets
    Theme {
        #[command(subcommand)]
        command: ThemeCommands,
    },

    /// Arrange the navigation controls
    Nav {
        #[command(subcommand)]
        command: NavCommands,
    },

    /// Edit the light and dark color palettes
    Colors {
        #[command(subcommand)]
        command: ColorCommands,
    },

    /// Configure slide transitions
    Animation {
        #[command(subcommand)]
        command: AnimationCommands,
    },

    /// Manage per-slide background image links
    Links {
        #[command(subcommand)]
        command: LinkCommands,
    },

    /// Import, export, or reset the stored deck
    Data {
        #[command(subcommand)]
        command: DataCommands,
    },

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ThemeCommands {
    /// List built-in and custom presets
    List,

    /// Show a preset's colors and gradients
    Show { id: String },

    /// Restyle every slide with a preset (prompts when no id is given)
    Apply { id: Option<String> },

    /// Save a copy of a preset as a custom theme
    Save {
        /// Preset to copy
        #[arg(long)]
        from: String,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "Custom theme")]
        description: String,
    },

    /// Delete a custom theme
    Delete { id: String },

    /// Add a custom theme from a JSON file
    Import { file: PathBuf },

    /// Write a preset as JSON
    Export {
        id: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a preset's CSS custom properties
    Css {
        /// Defaults to the current theme
        id: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum NavCommands {
    /// Show the navigation layout
    Show,

    /// Move a bottom control one step
    MoveBottom {
        #[arg(value_enum)]
        item: BottomItem,
        #[arg(value_enum)]
        direction: MoveDirection,
    },

    /// Move a top control one step
    MoveTop {
        #[arg(value_enum)]
        item: TopItem,
        #[arg(value_enum)]
        direction: MoveDirection,
    },

    /// Show or hide a bottom control
    ToggleBottom {
        #[arg(value_enum)]
        item: BottomItem,
    },

    /// Show or hide a top control
    ToggleTop {
        #[arg(value_enum)]
        item: TopItem,
    },

    /// Place the bottom bar
    BottomPosition {
        #[arg(value_enum)]
        position: BarPosition,
    },

    /// Place the top bar
    TopPosition {
        #[arg(value_enum)]
        position: TopPosition,
    },

    /// Configure the keyboard hint
    Hint {
        #[arg(long)]
        visible: Option<bool>,

        #[arg(long, value_enum)]
        position: Option<Corner>,
    },

    /// Restore the default layout
    Reset,
}

#[derive(Subcommand)]
pub enum ColorCommands {
    /// Show both palettes with hex previews
    Show,

    /// Set a palette entry from an HSL string or a hex color
    Set {
        #[arg(value_enum)]
        mode: Mode,

        /// background, foreground, card, primary, secondary, muted, accent, destructive, border
        key: String,

        /// `217 91% 60%` or `#3b82f6`
        value: String,
    },

    /// Convert between `h s% l%` and `#rrggbb`
    Convert { value: String },

    /// Restore the default palettes
    Reset,
}

#[derive(Subcommand)]
pub enum AnimationCommands {
    /// Show the transition settings
    Show,

    /// Change one or more transition settings
    Set {
        #[arg(long = "type", value_enum)]
        kind: Option<AnimationType>,

        /// Seconds, 0.1 to 2
        #[arg(long)]
        duration: Option<f32>,

        #[arg(long, value_enum)]
        ease: Option<Ease>,

        /// Seconds, 0 to 1
        #[arg(long)]
        delay: Option<f32>,
    },

    /// Restore the default transition
    Reset,
}

#[derive(Subcommand)]
pub enum LinkCommands {
    /// List image links (seeds one per slide on first use)
    List,

    /// Append a link for the next slide number
    Add,

    /// Change a link's URL or fallback URL
    Set {
        id: String,
        #[arg(value_enum)]
        field: LinkField,
        value: String,
    },

    /// Remove a link
    Delete { id: String },

    /// Point slide backgrounds at their linked images
    Apply,
}

#[derive(Subcommand)]
pub enum DataCommands {
    /// Write the stored deck as JSON
    Export {
        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Replace the stored deck with a JSON file
    Import { file: PathBuf },

    /// Go back to the shipped deck
    Reset {
        /// Also clear themes, colors, navigation, animation, and image links
        #[arg(long)]
        all: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Display current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key (e.g. defaults.theme, defaults.transition, storage.dir)
        key: String,

        /// Value to set
        value: String,
    },
}

#[derive(Clone, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Commands::Validate { file }) => crate::commands::validate::run(&file),
            Some(Commands::Render { file, slide }) => {
                crate::commands::render::run(file.as_deref(), slide)
            }
            Some(Commands::Theme { command }) => crate::commands::theme::run(command),
            Some(Commands::Nav { command }) => crate::commands::nav::run(command),
            Some(Commands::Colors { command }) => crate::commands::colors::run(command),
            Some(Commands::Animation { command }) => crate::commands::animation::run(command),
            Some(Commands::Links { command }) => crate::commands::links::run(command),
            Some(Commands::Data { command }) => crate::commands::data::run(command),
            Some(Commands::Config { command }) => crate::commands::config::run(command),
            Some(Commands::Completion { shell }) => {
                crate::commands::completion::run(shell);
                Ok(())
            }
            None => {
                if let Some(file) = &self.file {
                    if !file.exists() {
                        anyhow::bail!("File not found: {}", file.display());
                    }
                }
                crate::app::run(self.file, self.windowed, self.slide)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_nav_move() {
        let cli = Cli::try_parse_from(["deckview", "nav", "move-bottom", "next", "up"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Nav {
                command: NavCommands::MoveBottom {
                    item: BottomItem::Next,
                    direction: MoveDirection::Up
                }
            })
        ));
    }

    #[test]
    fn test_parse_animation_set() {
        let cli = Cli::try_parse_from([
            "deckview", "animation", "set", "--type", "zoom", "--ease", "easeInOut",
        ])
        .unwrap();
        let Some(Commands::Animation {
            command: AnimationCommands::Set { kind, ease, .. },
        }) = cli.command
        else {
            panic!("expected animation set");
        };
        assert_eq!(kind, Some(AnimationType::Zoom));
        assert_eq!(ease, Some(Ease::EaseInOut));
    }

    #[test]
    fn test_file_and_flags() {
        let cli = Cli::try_parse_from(["deckview", "deck.json", "--windowed", "--slide", "3", "-vv"])
            .unwrap();
        assert_eq!(cli.file, Some(PathBuf::from("deck.json")));
        assert!(cli.windowed);
        assert_eq!(cli.slide, Some(3));
        assert_eq!(cli.verbose, 2);
    }
}
