use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, Sender, channel};

use anyhow::Context as _;
use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};
use rayon::prelude::*;

use crate::background;
use crate::schema::{Background, BackgroundKind};

enum Entry {
    Pending,
    Decoded(ColorImage),
    Ready(TextureHandle),
    Failed,
}

/// Background images keyed by their candidate list.
///
/// Decoding happens on the rayon pool. The UI thread drains finished images
/// each time it asks for a texture and uploads them on first use.
pub struct ImageCache {
    base_path: PathBuf,
    entries: RefCell<HashMap<String, Entry>>,
    sender: Sender<(String, Option<ColorImage>)>,
    receiver: Receiver<(String, Option<ColorImage>)>,
}

fn cache_key(candidates: &[String]) -> String {
    candidates.join("\n")
}

impl ImageCache {
    pub fn new(base_path: PathBuf) -> Self {
        let (sender, receiver) = channel();
        Self {
            base_path,
            entries: RefCell::new(HashMap::new()),
            sender,
            receiver,
        }
    }

    /// Start decoding every image background of the deck.
    pub fn prefetch<'a>(&self, backgrounds: impl IntoIterator<Item = &'a Background>) {
        let jobs: Vec<(String, Vec<String>)> = {
            let mut entries = self.entries.borrow_mut();
            backgrounds
                .into_iter()
                .filter(|bg| bg.kind == BackgroundKind::Image)
                .map(background::image_candidates)
                .filter(|c| !c.is_empty())
                .filter_map(|candidates| {
                    let key = cache_key(&candidates);
                    if entries.contains_key(&key) {
                        return None;
                    }
                    entries.insert(key.clone(), Entry::Pending);
                    Some((key, candidates))
                })
                .collect()
        };
        if jobs.is_empty() {
            return;
        }
        log::debug!("Prefetching {} background image(s)", jobs.len());
        let base = self.base_path.clone();
        let sender = self.sender.clone();
        rayon::spawn(move || {
            jobs.into_par_iter().for_each_with(sender, |tx, (key, candidates)| {
                let image = load_first(&base, &candidates);
                let _ = tx.send((key, image));
            });
        });
    }

    /// Texture for an image background, or `None` while it is still loading
    /// or when every candidate failed.
    pub fn background_texture(&self, ctx: &egui::Context, bg: &Background) -> Option<TextureHandle> {
        let candidates = background::image_candidates(bg);
        if candidates.is_empty() {
            return None;
        }
        self.drain();
        let key = cache_key(&candidates);
        let mut entries = self.entries.borrow_mut();
        match entries.remove(&key) {
            Some(Entry::Decoded(image)) => {
                let texture = ctx.load_texture(key.clone(), image, TextureOptions::LINEAR);
                entries.insert(key, Entry::Ready(texture.clone()));
                Some(texture)
            }
            Some(Entry::Ready(texture)) => {
                entries.insert(key, Entry::Ready(texture.clone()));
                Some(texture)
            }
            Some(entry @ (Entry::Pending | Entry::Failed)) => {
                if matches!(entry, Entry::Pending) {
                    ctx.request_repaint();
                }
                entries.insert(key, entry);
                None
            }
            None => {
                drop(entries);
                self.prefetch([bg]);
                ctx.request_repaint();
                None
            }
        }
    }

    fn drain(&self) {
        let mut entries = self.entries.borrow_mut();
        for (key, image) in self.receiver.try_iter() {
            let entry = match image {
                Some(image) => Entry::Decoded(image),
                None => Entry::Failed,
            };
            entries.insert(key, entry);
        }
    }

    /// Forget everything, e.g. after the deck was reloaded.
    pub fn clear(&self) {
        self.drain();
        self.entries.borrow_mut().clear();
    }
}

/// Try the resolved source, then swap to the other candidate once.
fn load_first(base: &Path, candidates: &[String]) -> Option<ColorImage> {
    for source in candidates {
        match load_image(base, source) {
            Ok(image) => return Some(image),
            Err(e) => log::warn!("Failed to load background {source}: {e:#}"),
        }
    }
    None
}

fn load_image(base: &Path, source: &str) -> anyhow::Result<ColorImage> {
    let bytes = if source.starts_with("http://") || source.starts_with("https://") {
        ureq::get(source)
            .call()
            .with_context(|| format!("Request to {source} failed"))?
            .body_mut()
            .read_to_vec()
            .context("Failed to read response body")?
    } else {
        let path = resolve_local(base, source)
            .ok_or_else(|| anyhow::anyhow!("File not found"))?;
        std::fs::read(&path).with_context(|| format!("Failed to read {}", path.display()))?
    };
    let rgba = image::load_from_memory(&bytes)
        .context("Failed to decode image")?
        .to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, rgba.as_raw()))
}

/// Site-absolute paths (`/assets/x.jpg`) are looked up next to the deck and
/// in its `public/` directory.
fn resolve_local(base: &Path, source: &str) -> Option<PathBuf> {
    let direct = Path::new(source);
    if direct.is_absolute() && direct.exists() {
        return Some(direct.to_path_buf());
    }
    let relative = source.trim_start_matches('/');
    [base.join(relative), base.join("public").join(relative)]
        .into_iter()
        .find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &Path) {
        let img = image::RgbaImage::from_pixel(2, 3, image::Rgba([10, 20, 30, 255]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_resolve_local_checks_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("public/assets")).unwrap();
        write_png(&dir.path().join("public/assets/slide-1.png"));
        let found = resolve_local(dir.path(), "/assets/slide-1.png").unwrap();
        assert!(found.ends_with("public/assets/slide-1.png"));
        assert!(resolve_local(dir.path(), "/assets/missing.png").is_none());
    }

    #[test]
    fn test_load_first_swaps_to_second_candidate() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("ok.png"));
        let candidates = vec!["missing.png".to_string(), "ok.png".to_string()];
        let image = load_first(dir.path(), &candidates).unwrap();
        assert_eq!(image.size, [2, 3]);
    }

    #[test]
    fn test_load_first_gives_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.png"), b"not an image").unwrap();
        let candidates = vec!["broken.png".to_string(), "missing.png".to_string()];
        assert!(load_first(dir.path(), &candidates).is_none());
    }
}
