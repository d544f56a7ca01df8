use eframe::egui::{self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use crate::nav_config::{BarPosition, BottomItem, Corner, NavigationConfig, TopItem, TopPosition};
use crate::navigation::Navigator;
use crate::theme::Style;

pub const KEYBOARD_HINT: &str = "Use \u{2190} \u{2192} arrows or spacebar to navigate";

/// A control the viewer draws around the slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Prev { enabled: bool },
    Indicators { count: usize, active: usize },
    Next { enabled: bool },
    Share { confirmed: bool },
    Counter { text: String },
    Sound { muted: bool },
}

/// What a click on the chrome asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChromeAction {
    Previous,
    Next,
    GoTo(usize),
    Share,
    ToggleSound,
}

/// Everything needed to draw the chrome for one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chrome {
    pub bottom: Vec<Control>,
    pub bottom_position: BarPosition,
    pub top: Vec<Control>,
    pub top_position: TopPosition,
    pub hint: Option<Corner>,
}

/// Viewer flags the chrome reflects.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeFlags {
    pub muted: bool,
    pub share_confirmed: bool,
}

/// Lay out the controls in configured order, dropping hidden ones. The
/// arrow buttons disable at the ends even though the keys wrap around.
pub fn build(config: &NavigationConfig, nav: &Navigator, flags: ChromeFlags) -> Chrome {
    let bottom = config
        .bottom_nav
        .order
        .iter()
        .filter(|item| config.bottom_nav.visible.get(**item))
        .map(|item| match item {
            BottomItem::Prev => Control::Prev {
                enabled: !nav.is_first(),
            },
            BottomItem::Indicators => Control::Indicators {
                count: nav.total(),
                active: nav.current(),
            },
            BottomItem::Next => Control::Next {
                enabled: !nav.is_last(),
            },
        })
        .collect();

    let top = config
        .top_nav
        .order
        .iter()
        .filter(|item| config.top_nav.visible.get(**item))
        .map(|item| match item {
            TopItem::Share => Control::Share {
                confirmed: flags.share_confirmed,
            },
            TopItem::Counter => Control::Counter {
                text: format!("{} / {}", nav.current() + 1, nav.total()),
            },
            TopItem::Sound => Control::Sound { muted: flags.muted },
        })
        .collect();

    Chrome {
        bottom,
        bottom_position: config.bottom_nav.position,
        top,
        top_position: config.top_nav.position,
        hint: config.keyboard_hint.visible.then_some(config.keyboard_hint.position),
    }
}

const BUTTON: f32 = 48.0;
const GAP: f32 = 16.0;
const MARGIN: f32 = 32.0;
const DOT: f32 = 8.0;
const DOT_ACTIVE: f32 = 32.0;
const DOT_GAP: f32 = 8.0;

fn glass(alpha: f32) -> Color32 {
    Style::with_opacity(Color32::WHITE, alpha)
}

fn control_width(ui: &egui::Ui, control: &Control, scale: f32) -> f32 {
    match control {
        Control::Indicators { count, .. } => {
            let n = *count as f32;
            if *count == 0 {
                0.0
            } else {
                (DOT * (n - 1.0) + DOT_ACTIVE + DOT_GAP * (n - 1.0)) * scale
            }
        }
        Control::Counter { text } => {
            let galley = ui.painter().layout_no_wrap(
                text.clone(),
                FontId::proportional(18.0 * scale),
                Color32::WHITE,
            );
            galley.rect.width() + 32.0 * scale
        }
        _ => BUTTON * scale,
    }
}

/// Draw the chrome over `rect` and collect clicks.
pub fn draw(ui: &egui::Ui, chrome: &Chrome, rect: Rect, scale: f32) -> Vec<ChromeAction> {
    let mut actions = Vec::new();

    let row_height = BUTTON * scale;
    let bottom_y = rect.bottom() - MARGIN * scale - row_height;
    let bottom_width = row_width(ui, &chrome.bottom, scale);
    let bottom_x = match chrome.bottom_position {
        BarPosition::Left => rect.left() + MARGIN * scale,
        BarPosition::Center => rect.center().x - bottom_width / 2.0,
        BarPosition::Right => rect.right() - MARGIN * scale - bottom_width,
    };
    draw_row(
        ui,
        &chrome.bottom,
        Pos2::new(bottom_x, bottom_y),
        scale,
        &mut actions,
    );

    let top_width = row_width(ui, &chrome.top, scale);
    let top_x = match chrome.top_position {
        TopPosition::Left => rect.left() + MARGIN * scale,
        TopPosition::Right => rect.right() - MARGIN * scale - top_width,
    };
    draw_row(
        ui,
        &chrome.top,
        Pos2::new(top_x, rect.top() + MARGIN * scale),
        scale,
        &mut actions,
    );

    if let Some(corner) = chrome.hint {
        draw_hint(ui, corner, rect, scale);
    }
    actions
}

fn row_width(ui: &egui::Ui, controls: &[Control], scale: f32) -> f32 {
    let widths: f32 = controls.iter().map(|c| control_width(ui, c, scale)).sum();
    widths + GAP * scale * controls.len().saturating_sub(1) as f32
}

fn draw_row(
    ui: &egui::Ui,
    controls: &[Control],
    origin: Pos2,
    scale: f32,
    actions: &mut Vec<ChromeAction>,
) {
    let height = BUTTON * scale;
    let mut x = origin.x;
    for (i, control) in controls.iter().enumerate() {
        let width = control_width(ui, control, scale);
        let cell = Rect::from_min_size(Pos2::new(x, origin.y), Vec2::new(width, height));
        match control {
            Control::Prev { enabled } => {
                if icon_button(ui, cell, "\u{2039}", *enabled, ("prev", i), scale) {
                    actions.push(ChromeAction::Previous);
                }
            }
            Control::Next { enabled } => {
                if icon_button(ui, cell, "\u{203A}", *enabled, ("next", i), scale) {
                    actions.push(ChromeAction::Next);
                }
            }
            Control::Sound { muted } => {
                let glyph = if *muted { "\u{1F507}" } else { "\u{1F50A}" };
                if icon_button(ui, cell, glyph, true, ("sound", i), scale) {
                    actions.push(ChromeAction::ToggleSound);
                }
            }
            Control::Share { confirmed } => {
                let glyph = if *confirmed { "\u{2713}" } else { "\u{21AA}" };
                if icon_button(ui, cell, glyph, true, ("share", i), scale) {
                    actions.push(ChromeAction::Share);
                }
            }
            Control::Counter { text } => {
                let painter = ui.painter();
                painter.rect_filled(cell, height / 2.0, glass(0.1));
                painter.rect_stroke(
                    cell,
                    height / 2.0,
                    Stroke::new(1.0, glass(0.3)),
                    egui::StrokeKind::Inside,
                );
                painter.text(
                    cell.center(),
                    Align2::CENTER_CENTER,
                    text,
                    FontId::proportional(18.0 * scale),
                    Color32::WHITE,
                );
            }
            Control::Indicators { count, active } => {
                let mut dx = cell.left();
                for index in 0..*count {
                    let w = (if index == *active { DOT_ACTIVE } else { DOT }) * scale;
                    let dot = Rect::from_min_size(
                        Pos2::new(dx, cell.center().y - DOT * scale / 2.0),
                        Vec2::new(w, DOT * scale),
                    );
                    let response = ui.interact(
                        dot.expand(4.0 * scale),
                        ui.id().with(("dot", index)),
                        Sense::click(),
                    );
                    let alpha = if index == *active {
                        1.0
                    } else if response.hovered() {
                        0.6
                    } else {
                        0.4
                    };
                    ui.painter().rect_filled(dot, DOT * scale / 2.0, glass(alpha));
                    if response.clicked() {
                        actions.push(ChromeAction::GoTo(index));
                    }
                    dx += w + DOT_GAP * scale;
                }
            }
        }
        x += width + GAP * scale;
    }
}

fn icon_button(
    ui: &egui::Ui,
    rect: Rect,
    glyph: &str,
    enabled: bool,
    salt: (&str, usize),
    scale: f32,
) -> bool {
    let response = ui.interact(rect, ui.id().with(salt), Sense::click());
    let fill = match (enabled, response.hovered()) {
        (true, true) => glass(0.2),
        _ => glass(0.1),
    };
    let ink = if enabled { Color32::WHITE } else { glass(0.4) };
    let painter = ui.painter();
    painter.rect_filled(rect, 8.0 * scale, fill);
    painter.rect_stroke(
        rect,
        8.0 * scale,
        Stroke::new(1.0, glass(0.3)),
        egui::StrokeKind::Inside,
    );
    painter.text(
        rect.center(),
        Align2::CENTER_CENTER,
        glyph,
        FontId::proportional(26.0 * scale),
        ink,
    );
    enabled && response.clicked()
}

fn draw_hint(ui: &egui::Ui, corner: Corner, rect: Rect, scale: f32) {
    let color = Style::with_opacity(Color32::WHITE, 0.7);
    let galley = ui.painter().layout_no_wrap(
        KEYBOARD_HINT.to_string(),
        FontId::proportional(14.0 * scale),
        color,
    );
    let pad = Vec2::new(16.0, 8.0) * scale;
    let size = galley.rect.size() + pad * 2.0;
    let margin = MARGIN * scale;
    let min = match corner {
        Corner::TopLeft => Pos2::new(rect.left() + margin, rect.top() + margin),
        Corner::TopRight => Pos2::new(rect.right() - margin - size.x, rect.top() + margin),
        Corner::BottomLeft => Pos2::new(rect.left() + margin, rect.bottom() - margin - size.y),
        Corner::BottomRight => Pos2::new(
            rect.right() - margin - size.x,
            rect.bottom() - margin - size.y,
        ),
    };
    let pill = Rect::from_min_size(min, size);
    let painter = ui.painter();
    painter.rect_filled(pill, size.y / 2.0, glass(0.1));
    painter.rect_stroke(
        pill,
        size.y / 2.0,
        Stroke::new(1.0, glass(0.3)),
        egui::StrokeKind::Inside,
    );
    painter.galley(pill.min + pad, galley, color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nav_config::MoveDirection;

    #[test]
    fn test_default_chrome() {
        let chrome = build(
            &NavigationConfig::default(),
            &Navigator::new(5),
            ChromeFlags::default(),
        );
        assert_eq!(
            chrome.bottom,
            vec![
                Control::Prev { enabled: false },
                Control::Indicators { count: 5, active: 0 },
                Control::Next { enabled: true },
            ]
        );
        assert_eq!(
            chrome.top,
            vec![
                Control::Sound { muted: false },
                Control::Share { confirmed: false },
                Control::Counter { text: "1 / 5".into() },
            ]
        );
        assert_eq!(chrome.hint, Some(Corner::TopLeft));
    }

    #[test]
    fn test_next_disabled_on_last_slide() {
        let nav = Navigator::starting_at(3, 2);
        let chrome = build(&NavigationConfig::default(), &nav, ChromeFlags::default());
        assert_eq!(chrome.bottom[2], Control::Next { enabled: false });
        assert_eq!(chrome.bottom[0], Control::Prev { enabled: true });
        assert_eq!(chrome.top[2], Control::Counter { text: "3 / 3".into() });
    }

    #[test]
    fn test_order_and_visibility_follow_config() {
        let mut config = NavigationConfig::default();
        config.toggle_bottom(BottomItem::Indicators);
        config.move_bottom(BottomItem::Next, MoveDirection::Up);
        config.toggle_top(TopItem::Sound);
        config.set_hint_visible(false);
        let flags = ChromeFlags {
            muted: true,
            share_confirmed: true,
        };
        let chrome = build(&config, &Navigator::new(2), flags);
        assert_eq!(
            chrome.bottom,
            vec![Control::Prev { enabled: false }, Control::Next { enabled: true }]
        );
        assert_eq!(chrome.top[0], Control::Share { confirmed: true });
        assert_eq!(chrome.top.len(), 2);
        assert_eq!(chrome.hint, None);
    }
}
