use eframe::egui;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, channel};
use std::time::{Duration, Instant};

use anyhow::Context;
use notify_debouncer_mini::notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};

use crate::animation::{AnimationConfig, Keyframe};
use crate::audio::BackgroundMusic;
use crate::config::Config;
use crate::navigation::{KeyOutcome, NavKey, Navigator};
use crate::render::chrome::{self, ChromeAction, ChromeFlags};
use crate::render::image_cache::ImageCache;
use crate::render::paint::{self, PaintContext};
use crate::render::transition::{ActiveTransition, TransitionDirection};
use crate::render::{self, LayoutTree};
use crate::state::DeckState;
use crate::storage::{self, FileStorage};
use crate::theme::{self, Style};

const ESC_QUIT_WINDOW: f32 = 1.0;
const SHARE_CONFIRM_SECONDS: f32 = 2.0;
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(300);
const RELOAD_POLL: Duration = Duration::from_millis(250);

const DIGIT_KEYS: [(egui::Key, char); 10] = [
    (egui::Key::Num0, '0'),
    (egui::Key::Num1, '1'),
    (egui::Key::Num2, '2'),
    (egui::Key::Num3, '3'),
    (egui::Key::Num4, '4'),
    (egui::Key::Num5, '5'),
    (egui::Key::Num6, '6'),
    (egui::Key::Num7, '7'),
    (egui::Key::Num8, '8'),
    (egui::Key::Num9, '9'),
];

struct Toast {
    message: String,
    start: Instant,
}

impl Toast {
    fn new(message: String) -> Self {
        Self {
            message,
            start: Instant::now(),
        }
    }

    fn opacity(&self) -> f32 {
        let elapsed = self.start.elapsed().as_secs_f32();
        let duration = 2.5;
        let fade_start = 2.0;
        if elapsed < fade_start {
            1.0
        } else if elapsed < duration {
            1.0 - (elapsed - fade_start) / (duration - fade_start)
        } else {
            0.0
        }
    }

    fn is_expired(&self) -> bool {
        self.start.elapsed().as_secs_f32() >= 2.5
    }
}

/// Keeps the debouncer alive and hands its events to the UI thread.
struct Reloader {
    path: PathBuf,
    events: Receiver<DebounceEventResult>,
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl Reloader {
    fn watch(path: &Path) -> anyhow::Result<Self> {
        let (tx, rx) = channel();
        let mut debouncer = new_debouncer(RELOAD_DEBOUNCE, tx)?;
        debouncer
            .watcher()
            .watch(path, RecursiveMode::NonRecursive)?;
        Ok(Self {
            path: path.to_path_buf(),
            events: rx,
            _debouncer: debouncer,
        })
    }

    /// True when the file changed since the last poll.
    fn changed(&self) -> bool {
        let mut changed = false;
        while let Ok(result) = self.events.try_recv() {
            match result {
                Ok(events) => changed |= !events.is_empty(),
                Err(e) => log::warn!("File watcher error: {e}"),
            }
        }
        changed
    }
}

/// The current slide and the transition that brought it in.
struct Stage {
    navigator: Navigator,
    animation: AnimationConfig,
    transition: Option<ActiveTransition>,
}

impl Stage {
    fn new(total: usize, start_index: usize, animation: AnimationConfig) -> Self {
        Self {
            navigator: Navigator::starting_at(total, start_index),
            animation,
            transition: None,
        }
    }

    /// Jump to `index`, animating forward or backward by position. A move
    /// while a transition runs finishes that transition at once.
    fn go_to(&mut self, index: usize) {
        let from = self.navigator.current();
        if from == index || !self.navigator.go_to(index) {
            return;
        }
        let direction = if index > from {
            TransitionDirection::Forward
        } else {
            TransitionDirection::Backward
        };
        self.begin(from, index, direction);
    }

    fn handle_key(&mut self, key: NavKey) {
        let from = self.navigator.current();
        if self.navigator.handle_key(key) == KeyOutcome::Ignored {
            return;
        }
        let to = self.navigator.current();
        if from != to {
            let direction = if key == NavKey::ArrowLeft {
                TransitionDirection::Backward
            } else {
                TransitionDirection::Forward
            };
            self.begin(from, to, direction);
        }
    }

    fn begin(&mut self, from: usize, to: usize, direction: TransitionDirection) {
        self.transition = Some(ActiveTransition::new(from, to, self.animation, direction));
    }

    /// Drop the transition once it has played out.
    fn settle(&mut self) {
        if self.transition.as_ref().is_some_and(|t| t.is_complete()) {
            self.transition = None;
        }
    }

    fn reset(&mut self, total: usize) {
        self.navigator.set_total(total);
        self.transition = None;
    }
}

/// Confirmation state and toast text after trying to copy `text`.
fn share_outcome(copied: anyhow::Result<()>, text: &str) -> (Option<Instant>, String) {
    match copied {
        Ok(()) => (Some(Instant::now()), format!("Copied {text}")),
        Err(e) => {
            log::error!("Failed to copy to clipboard: {e:#}");
            (None, "Could not copy to the clipboard".to_string())
        }
    }
}

/// Confirmation state and toast text after toggling the music.
fn sound_outcome(toggled: anyhow::Result<()>, muted: bool) -> String {
    match toggled {
        Ok(()) if muted => "Sound off".to_string(),
        Ok(()) => "Sound on".to_string(),
        Err(e) => {
            log::warn!("Background music unavailable: {e:#}");
            "Sound unavailable".to_string()
        }
    }
}

struct DeckApp {
    state: DeckState,
    file_path: Option<PathBuf>,
    storage_dir: PathBuf,
    stage: Stage,
    trees: Vec<LayoutTree>,
    style: Style,
    image_cache: ImageCache,
    music: BackgroundMusic,
    clipboard: Option<arboard::Clipboard>,
    toast: Option<Toast>,
    last_esc: Option<Instant>,
    typed_digits: String,
    shared_at: Option<Instant>,
    reloader: Option<Reloader>,
}

impl DeckApp {
    fn new(
        mut state: DeckState,
        file_path: Option<PathBuf>,
        storage_dir: PathBuf,
        start_index: usize,
        style: Style,
        animation: AnimationConfig,
    ) -> Self {
        let base_path = file_path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        let music = BackgroundMusic::new(base_path.clone());
        let image_cache = ImageCache::new(base_path);
        image_cache.prefetch(state.presentation().slides.iter().map(|s| &s.background));

        let reloader = file_path.as_deref().and_then(|path| match Reloader::watch(path) {
            Ok(r) => Some(r),
            Err(e) => {
                log::warn!("Not watching {} for changes: {e}", path.display());
                None
            }
        });

        let toast = state
            .last_error()
            .map(|e| Toast::new(format!("Some stored settings were reset ({e})")));
        state.clear_last_error();

        let trees = state.presentation().slides.iter().map(render::render).collect();
        let stage = Stage::new(state.presentation().slide_count(), start_index, animation);

        Self {
            state,
            file_path,
            storage_dir,
            stage,
            trees,
            style,
            image_cache,
            music,
            clipboard: None,
            toast,
            last_esc: None,
            typed_digits: String::new(),
            shared_at: None,
            reloader,
        }
    }

    fn apply_action(&mut self, action: ChromeAction) {
        match action {
            ChromeAction::Previous => self.stage.handle_key(NavKey::ArrowLeft),
            ChromeAction::Next => self.stage.handle_key(NavKey::ArrowRight),
            ChromeAction::GoTo(index) => self.stage.go_to(index),
            ChromeAction::Share => self.share(),
            ChromeAction::ToggleSound => self.toggle_sound(),
        }
    }

    fn toggle_sound(&mut self) {
        let toggled = self.music.toggle();
        let message = sound_outcome(toggled, self.music.is_muted());
        self.toast = Some(Toast::new(message));
    }

    /// The clipboard handle is kept so the copied text outlives this call.
    fn copy_to_clipboard(&mut self, text: &str) -> anyhow::Result<()> {
        let mut clipboard = match self.clipboard.take() {
            Some(c) => c,
            None => arboard::Clipboard::new().context("No clipboard available")?,
        };
        let result = clipboard.set_text(text).context("Clipboard rejected the text");
        self.clipboard = Some(clipboard);
        result
    }

    fn share(&mut self) {
        let location = match &self.file_path {
            Some(path) => path
                .canonicalize()
                .unwrap_or_else(|_| path.clone())
                .display()
                .to_string(),
            None => self
                .storage_dir
                .join(format!("{}.json", storage::PRESENTATION_DATA))
                .display()
                .to_string(),
        };
        let text = format!("{location} (slide {})", self.stage.navigator.current() + 1);
        let copied = self.copy_to_clipboard(&text);
        let (shared_at, message) = share_outcome(copied, &text);
        self.shared_at = shared_at;
        self.toast = Some(Toast::new(message));
    }

    fn jump_to_typed(&mut self) {
        let typed = std::mem::take(&mut self.typed_digits);
        let Ok(number) = typed.parse::<usize>() else {
            return;
        };
        let total = self.stage.navigator.total();
        if number == 0 || number > total {
            self.toast = Some(Toast::new(format!("No slide {number} (deck has {total})")));
            return;
        }
        self.stage.go_to(number - 1);
    }

    fn reload(&mut self) {
        let Some(path) = self.reloader.as_ref().map(|r| r.path.clone()) else {
            return;
        };
        let text = match std::fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) => {
                log::warn!("Failed to re-read {}: {e}", path.display());
                return;
            }
        };
        match self.state.show_document(&text) {
            Ok(()) => {
                let presentation = self.state.presentation();
                self.trees = presentation.slides.iter().map(render::render).collect();
                self.stage.reset(presentation.slide_count());
                self.image_cache.clear();
                self.image_cache
                    .prefetch(presentation.slides.iter().map(|s| &s.background));
                log::info!("Reloaded {}", path.display());
                self.toast = Some(Toast::new("Reloaded".to_string()));
            }
            Err(e) => {
                log::error!("Keeping the previous deck: {e}");
                self.toast = Some(Toast::new(format!("Reload failed: {e}")));
            }
        }
    }

    fn compute_scale(rect: egui::Rect) -> f32 {
        let ref_w = 1920.0;
        let ref_h = 1080.0;
        (rect.width() / ref_w).min(rect.height() / ref_h)
    }

    fn draw_slide(&self, ui: &egui::Ui, index: usize, rect: egui::Rect, scale: f32, pose: &Keyframe) {
        let (Some(slide), Some(tree)) = (
            self.state.presentation().slides.get(index),
            self.trees.get(index),
        ) else {
            return;
        };
        let pc = PaintContext {
            style: &self.style,
            images: &self.image_cache,
            scale,
            opacity: 1.0,
        };
        paint::paint_slide(ui, &slide.background, tree, &pc, rect, pose);
    }

    fn draw_toast(&self, ui: &egui::Ui, rect: egui::Rect, scale: f32) -> bool {
        let Some(ref toast) = self.toast else {
            return false;
        };
        let opacity = toast.opacity();
        if opacity <= 0.0 {
            return false;
        }
        let color = Style::with_opacity(self.style.foreground, opacity * 0.9);
        let bg = Style::with_opacity(egui::Color32::from_black_alpha(220), opacity);
        let galley = ui.painter().layout_no_wrap(
            toast.message.clone(),
            egui::FontId::proportional(20.0 * scale),
            color,
        );
        let padding = 16.0 * scale;
        let toast_rect = egui::Rect::from_min_size(
            egui::pos2(
                rect.center().x - galley.rect.width() / 2.0 - padding,
                rect.top() + 40.0 * scale,
            ),
            egui::vec2(
                galley.rect.width() + padding * 2.0,
                galley.rect.height() + padding * 2.0,
            ),
        );
        ui.painter().rect_filled(toast_rect, 8.0 * scale, bg);
        let text_pos = egui::pos2(toast_rect.left() + padding, toast_rect.top() + padding);
        ui.painter().galley(text_pos, galley, color);
        true
    }
}

impl eframe::App for DeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.reloader.as_ref().is_some_and(Reloader::changed) {
            self.reload();
        }

        // Viewport commands go out after the input closure releases its lock.
        let mut viewport_cmds: Vec<egui::ViewportCommand> = Vec::new();
        let mut keys: Vec<NavKey> = Vec::new();
        let mut jump: Option<usize> = None;
        let mut submit_digits = false;
        let mut toggle_sound = false;

        ctx.input(|i| {
            if i.key_pressed(egui::Key::Q) {
                viewport_cmds.push(egui::ViewportCommand::Close);
                return;
            }

            if i.key_pressed(egui::Key::Escape) {
                if !self.typed_digits.is_empty() {
                    self.typed_digits.clear();
                    return;
                }
                if let Some(last) = self.last_esc {
                    if last.elapsed().as_secs_f32() < ESC_QUIT_WINDOW {
                        viewport_cmds.push(egui::ViewportCommand::Close);
                        return;
                    }
                }
                self.last_esc = Some(Instant::now());
                self.toast = Some(Toast::new("Press Escape again to quit".to_string()));
                return;
            }

            if i.key_pressed(egui::Key::ArrowRight) {
                keys.push(NavKey::ArrowRight);
            }
            if i.key_pressed(egui::Key::Space) {
                keys.push(NavKey::Space);
            }
            if i.key_pressed(egui::Key::ArrowLeft) {
                keys.push(NavKey::ArrowLeft);
            }
            if i.key_pressed(egui::Key::Home) {
                jump = Some(0);
            }
            if i.key_pressed(egui::Key::End) {
                jump = Some(self.stage.navigator.total().saturating_sub(1));
            }
            if i.key_pressed(egui::Key::M) {
                toggle_sound = true;
            }

            for (key, digit) in DIGIT_KEYS {
                if i.key_pressed(key) {
                    self.typed_digits.push(digit);
                }
            }
            if i.key_pressed(egui::Key::Enter) && !self.typed_digits.is_empty() {
                submit_digits = true;
            }
        });

        for cmd in viewport_cmds {
            ctx.send_viewport_cmd(cmd);
        }

        for key in keys {
            self.stage.handle_key(key);
        }
        if let Some(index) = jump {
            self.stage.go_to(index);
        }
        if submit_digits {
            self.jump_to_typed();
        }
        if toggle_sound {
            self.toggle_sound();
        }

        self.stage.settle();
        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }
        if self
            .shared_at
            .is_some_and(|t| t.elapsed().as_secs_f32() >= SHARE_CONFIRM_SECONDS)
        {
            self.shared_at = None;
        }

        let bg = self.style.background;
        let mut actions = Vec::new();

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                ui.painter().rect_filled(rect, 0.0, bg);
                let scale = Self::compute_scale(rect);

                if let Some(ref t) = self.stage.transition {
                    let (outgoing, incoming) = t.poses();
                    self.draw_slide(ui, t.from, rect, scale, &outgoing);
                    self.draw_slide(ui, t.to, rect, scale, &incoming);
                    ctx.request_repaint();
                } else {
                    self.draw_slide(ui, self.stage.navigator.current(), rect, scale, &Keyframe::REST);
                }

                let flags = ChromeFlags {
                    muted: self.music.is_muted(),
                    share_confirmed: self.shared_at.is_some(),
                };
                let bar = chrome::build(self.state.navigation(), &self.stage.navigator, flags);
                actions = chrome::draw(ui, &bar, rect, scale);

                if !self.typed_digits.is_empty() {
                    let color = Style::with_opacity(self.style.foreground, 0.6);
                    ui.painter().text(
                        egui::pos2(rect.right() - 32.0 * scale, rect.top() + 32.0 * scale),
                        egui::Align2::RIGHT_TOP,
                        format!("Go to {}", self.typed_digits),
                        egui::FontId::monospace(20.0 * scale),
                        color,
                    );
                }

                if self.draw_toast(ui, rect, scale) || self.shared_at.is_some() {
                    ctx.request_repaint();
                }
            });

        for action in actions {
            self.apply_action(action);
        }

        if self.reloader.is_some() {
            ctx.request_repaint_after(RELOAD_POLL);
        }
    }
}

/// Present a deck file, or the stored deck when no file is given.
pub fn run(file: Option<PathBuf>, windowed: bool, start_slide: Option<usize>) -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let defaults = config.defaults.clone().unwrap_or_default();

    let storage_dir = config.storage_dir()?;
    let mut state = DeckState::load(Box::new(FileStorage::new(storage_dir.clone())))?;

    match &file {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            state
                .show_document(&text)
                .map_err(|e| anyhow::anyhow!("Invalid deck {}: {e}", path.display()))?;
        }
        None => {
            // First launch: honor the configured theme once.
            let first_launch = state.current_theme().is_none()
                && !state.has_stored(storage::PRESENTATION_DATA);
            if let (true, Some(id)) = (first_launch, defaults.theme.as_deref()) {
                if let Err(e) = state.apply_theme(id) {
                    log::warn!("Could not apply default theme {id}: {e}");
                }
            }
        }
    }

    if state.presentation().slides.is_empty() {
        anyhow::bail!("The deck has no slides");
    }

    let preset = state
        .current_theme()
        .or(defaults.theme.as_deref())
        .and_then(|id| state.find_theme(id))
        .unwrap_or_else(theme::default_theme);
    let style = Style::from_preset(&preset);
    log::debug!("Painting with the {} palette", style.name);

    let mut animation = *state.animation();
    if !state.has_stored(storage::ANIMATION_CONFIG) {
        if let Some(kind) = config.default_transition() {
            animation.kind = kind;
        }
    }

    let start_index = start_slide
        .or(defaults.start_slide)
        .map(|n| n.saturating_sub(1))
        .unwrap_or(0);
    let windowed = windowed || defaults.windowed.unwrap_or(false);

    let meta = &state.presentation().meta;
    let title = if meta.title.trim().is_empty() {
        "deckview".to_string()
    } else {
        meta.title.clone()
    };

    let viewport = if windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| {
            Ok(Box::new(DeckApp::new(
                state,
                file,
                storage_dir,
                start_index,
                style,
                animation,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::AnimationType;

    fn stage(total: usize) -> Stage {
        let animation = AnimationConfig {
            kind: AnimationType::Slide,
            duration: 2.0,
            ..AnimationConfig::default()
        };
        Stage::new(total, 0, animation)
    }

    #[test]
    fn test_keys_during_a_transition_still_move() {
        let mut stage = stage(5);
        stage.handle_key(NavKey::ArrowRight);
        assert!(stage.transition.is_some());
        stage.handle_key(NavKey::ArrowRight);
        assert_eq!(stage.navigator.current(), 2);
        let t = stage.transition.as_ref().unwrap();
        assert_eq!((t.from, t.to), (1, 2));
    }

    #[test]
    fn test_direction_follows_the_move() {
        let mut stage = stage(3);
        stage.handle_key(NavKey::ArrowLeft);
        let t = stage.transition.as_ref().unwrap();
        assert_eq!((t.from, t.to), (0, 2));
        assert_eq!(t.direction, TransitionDirection::Backward);

        stage.go_to(0);
        assert_eq!(
            stage.transition.as_ref().unwrap().direction,
            TransitionDirection::Backward
        );
        stage.go_to(1);
        assert_eq!(
            stage.transition.as_ref().unwrap().direction,
            TransitionDirection::Forward
        );
    }

    #[test]
    fn test_jump_to_current_or_missing_slide_does_nothing() {
        let mut stage = stage(3);
        stage.go_to(0);
        stage.go_to(7);
        assert!(stage.transition.is_none());
        assert_eq!(stage.navigator.current(), 0);
    }

    #[test]
    fn test_reset_clamps_and_stops() {
        let mut stage = stage(5);
        stage.go_to(4);
        stage.reset(2);
        assert!(stage.transition.is_none());
        assert_eq!(stage.navigator.current(), 0);
    }

    #[test]
    fn test_share_confirms_only_after_a_copy() {
        let (confirmed, message) = share_outcome(Ok(()), "/deck.json (slide 2)");
        assert!(confirmed.is_some());
        assert_eq!(message, "Copied /deck.json (slide 2)");

        let (confirmed, message) =
            share_outcome(Err(anyhow::anyhow!("no display")), "/deck.json (slide 2)");
        assert!(confirmed.is_none());
        assert_eq!(message, "Could not copy to the clipboard");
    }

    #[test]
    fn test_sound_messages() {
        assert_eq!(sound_outcome(Ok(()), false), "Sound on");
        assert_eq!(sound_outcome(Ok(()), true), "Sound off");
        assert_eq!(
            sound_outcome(Err(anyhow::anyhow!("no track")), true),
            "Sound unavailable"
        );
    }
}
