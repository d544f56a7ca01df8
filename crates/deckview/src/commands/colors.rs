use colored::Colorize;

use crate::cli::ColorCommands;
use crate::colors::{self, Mode, PALETTE_KEYS, Palette};

pub fn run(command: ColorCommands) -> anyhow::Result<()> {
    match command {
        ColorCommands::Convert { value } => {
            println!("{}", convert(&value));
            Ok(())
        }
        ColorCommands::Show => {
            let state = super::open_state()?;
            print_palette("Light", state.colors().palette(Mode::Light));
            println!();
            print_palette("Dark", state.colors().palette(Mode::Dark));
            Ok(())
        }
        ColorCommands::Set { mode, key, value } => {
            let mut state = super::open_state()?;
            let hsl = normalize(&value);
            state.set_color(mode, &key, &hsl)?;
            println!(
                "{} {mode:?} {key} = {hsl} ({})",
                "Set".green().bold(),
                colors::hsl_to_hex(&hsl)
            );
            Ok(())
        }
        ColorCommands::Reset => {
            let mut state = super::open_state()?;
            state.reset_colors()?;
            println!("{}", "Color palettes reset".green().bold());
            Ok(())
        }
    }
}

/// Hex input is stored in HSL form; anything else is kept as typed.
fn normalize(value: &str) -> String {
    if value.trim_start().starts_with('#') {
        colors::hex_to_hsl(value.trim())
    } else {
        value.trim().to_string()
    }
}

fn convert(value: &str) -> String {
    if value.trim_start().starts_with('#') {
        colors::hex_to_hsl(value.trim())
    } else {
        colors::hsl_to_hex(value)
    }
}

fn print_palette(title: &str, palette: &Palette) {
    println!("{}", title.bold());
    for key in PALETTE_KEYS {
        let hsl = palette.get(key).unwrap_or(colors::HSL_SENTINEL);
        let hex = colors::hsl_to_hex(hsl);
        let swatch = match crate::background::parse_hex_rgb(&hex) {
            Some([r, g, b]) => "  ".on_truecolor(r, g, b),
            None => "  ".normal(),
        };
        println!("  {swatch} {:<12} {:<18} {}", key, hsl, hex.dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_goes_both_ways() {
        assert_eq!(convert("#ffffff"), "0 0% 100%");
        assert_eq!(convert("0 0% 0%"), "#000000");
    }

    #[test]
    fn test_normalize_only_rewrites_hex() {
        assert_eq!(normalize(" 217 91% 60% "), "217 91% 60%");
        assert_eq!(normalize("#000000"), "0 0% 0%");
    }
}
