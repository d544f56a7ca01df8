use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Layout of the navigation chrome. Stored under `navigation-config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationConfig {
    pub bottom_nav: BottomNav,
    pub top_nav: TopNav,
    pub keyboard_hint: KeyboardHint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BottomNav {
    pub order: Vec<BottomItem>,
    pub visible: BottomVisibility,
    pub position: BarPosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopNav {
    pub order: Vec<TopItem>,
    pub visible: TopVisibility,
    pub position: TopPosition,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BottomVisibility {
    pub prev: bool,
    pub indicators: bool,
    pub next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopVisibility {
    pub share: bool,
    pub counter: bool,
    pub sound: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyboardHint {
    pub visible: bool,
    pub position: Corner,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BottomItem {
    Prev,
    Indicators,
    Next,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TopItem {
    Share,
    Counter,
    Sound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BarPosition {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TopPosition {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MoveDirection {
    Up,
    Down,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            bottom_nav: BottomNav {
                order: vec![BottomItem::Prev, BottomItem::Indicators, BottomItem::Next],
                visible: BottomVisibility {
                    prev: true,
                    indicators: true,
                    next: true,
                },
                position: BarPosition::Center,
            },
            top_nav: TopNav {
                order: vec![TopItem::Sound, TopItem::Share, TopItem::Counter],
                visible: TopVisibility {
                    share: true,
                    counter: true,
                    sound: true,
                },
                position: TopPosition::Right,
            },
            keyboard_hint: KeyboardHint {
                visible: true,
                position: Corner::TopLeft,
            },
        }
    }
}

/// Swap the entry at `index` with its neighbor. No-op at either end.
fn move_item<T>(items: &mut [T], index: usize, direction: MoveDirection) -> bool {
    match direction {
        MoveDirection::Up if index > 0 && index < items.len() => {
            items.swap(index, index - 1);
            true
        }
        MoveDirection::Down if index + 1 < items.len() => {
            items.swap(index, index + 1);
            true
        }
        _ => false,
    }
}

impl BottomVisibility {
    pub fn get(&self, item: BottomItem) -> bool {
        match item {
            BottomItem::Prev => self.prev,
            BottomItem::Indicators => self.indicators,
            BottomItem::Next => self.next,
        }
    }

    fn slot(&mut self, item: BottomItem) -> &mut bool {
        match item {
            BottomItem::Prev => &mut self.prev,
            BottomItem::Indicators => &mut self.indicators,
            BottomItem::Next => &mut self.next,
        }
    }
}

impl TopVisibility {
    pub fn get(&self, item: TopItem) -> bool {
        match item {
            TopItem::Share => self.share,
            TopItem::Counter => self.counter,
            TopItem::Sound => self.sound,
        }
    }

    fn slot(&mut self, item: TopItem) -> &mut bool {
        match item {
            TopItem::Share => &mut self.share,
            TopItem::Counter => &mut self.counter,
            TopItem::Sound => &mut self.sound,
        }
    }
}

impl NavigationConfig {
    /// Move a bottom control one step. Returns whether anything changed.
    pub fn move_bottom(&mut self, item: BottomItem, direction: MoveDirection) -> bool {
        match self.bottom_nav.order.iter().position(|i| *i == item) {
            Some(index) => move_item(&mut self.bottom_nav.order, index, direction),
            None => false,
        }
    }

    pub fn move_top(&mut self, item: TopItem, direction: MoveDirection) -> bool {
        match self.top_nav.order.iter().position(|i| *i == item) {
            Some(index) => move_item(&mut self.top_nav.order, index, direction),
            None => false,
        }
    }

    /// Flip visibility and return the new state.
    pub fn toggle_bottom(&mut self, item: BottomItem) -> bool {
        let slot = self.bottom_nav.visible.slot(item);
        *slot = !*slot;
        *slot
    }

    pub fn toggle_top(&mut self, item: TopItem) -> bool {
        let slot = self.top_nav.visible.slot(item);
        *slot = !*slot;
        *slot
    }

    pub fn set_bottom_position(&mut self, position: BarPosition) {
        self.bottom_nav.position = position;
    }

    pub fn set_top_position(&mut self, position: TopPosition) {
        self.top_nav.position = position;
    }

    pub fn set_hint_visible(&mut self, visible: bool) {
        self.keyboard_hint.visible = visible;
    }

    pub fn set_hint_position(&mut self, position: Corner) {
        self.keyboard_hint.position = position;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_stored_shape() {
        let json = serde_json::to_value(NavigationConfig::default()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "bottomNav": {
                    "order": ["prev", "indicators", "next"],
                    "visible": {"prev": true, "indicators": true, "next": true},
                    "position": "center"
                },
                "topNav": {
                    "order": ["sound", "share", "counter"],
                    "visible": {"share": true, "counter": true, "sound": true},
                    "position": "right"
                },
                "keyboardHint": {"visible": true, "position": "top-left"}
            })
        );
    }

    #[test]
    fn test_move_swaps_neighbors() {
        let mut config = NavigationConfig::default();
        assert!(config.move_bottom(BottomItem::Next, MoveDirection::Up));
        assert_eq!(
            config.bottom_nav.order,
            vec![BottomItem::Prev, BottomItem::Next, BottomItem::Indicators]
        );
        assert!(config.move_top(TopItem::Sound, MoveDirection::Down));
        assert_eq!(
            config.top_nav.order,
            vec![TopItem::Share, TopItem::Sound, TopItem::Counter]
        );
    }

    #[test]
    fn test_move_past_the_ends_is_noop() {
        let mut config = NavigationConfig::default();
        assert!(!config.move_bottom(BottomItem::Prev, MoveDirection::Up));
        assert!(!config.move_bottom(BottomItem::Next, MoveDirection::Down));
        assert_eq!(config, NavigationConfig::default());
    }

    #[test]
    fn test_toggle_visibility() {
        let mut config = NavigationConfig::default();
        assert!(!config.toggle_bottom(BottomItem::Indicators));
        assert!(!config.bottom_nav.visible.get(BottomItem::Indicators));
        assert!(config.toggle_bottom(BottomItem::Indicators));
        assert!(!config.toggle_top(TopItem::Share));
        assert!(!config.top_nav.visible.get(TopItem::Share));
    }

    #[test]
    fn test_positions() {
        let mut config = NavigationConfig::default();
        config.set_bottom_position(BarPosition::Left);
        config.set_top_position(TopPosition::Left);
        config.set_hint_position(Corner::BottomRight);
        config.set_hint_visible(false);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["bottomNav"]["position"], "left");
        assert_eq!(json["keyboardHint"]["position"], "bottom-right");
        assert_eq!(json["keyboardHint"]["visible"], false);
    }
}
