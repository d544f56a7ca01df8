//! Looping background music behind the sound control.
//!
//! The track is looked up next to the deck, under `public/audio/` or
//! `audio/`, as `background-music.mp3` or `background-music.ogg`. Playback
//! starts muted. Output goes through `rodio` when the `audio` feature is
//! enabled; without it every attempt to play fails and the control stays
//! muted.

use std::path::{Path, PathBuf};

const TRACK_NAMES: [&str; 2] = ["background-music.mp3", "background-music.ogg"];

/// Places a background track may live, in lookup order.
pub fn track_candidates(base: &Path) -> Vec<PathBuf> {
    [base.join("public").join("audio"), base.join("audio")]
        .iter()
        .flat_map(|dir| TRACK_NAMES.iter().map(move |name| dir.join(name)))
        .collect()
}

pub fn find_track(base: &Path) -> Option<PathBuf> {
    track_candidates(base).into_iter().find(|p| p.is_file())
}

pub struct BackgroundMusic {
    base: PathBuf,
    muted: bool,
    player: Option<player::Player>,
}

impl BackgroundMusic {
    pub fn new(base: PathBuf) -> Self {
        Self {
            base,
            muted: true,
            player: None,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Start or stop the music. When starting fails the flag goes back to
    /// muted before the error is returned.
    pub fn toggle(&mut self) -> anyhow::Result<()> {
        if self.muted {
            self.muted = false;
            if let Err(e) = self.play() {
                self.muted = true;
                return Err(e);
            }
        } else {
            if let Some(player) = &self.player {
                player.pause();
            }
            self.muted = true;
        }
        Ok(())
    }

    fn play(&mut self) -> anyhow::Result<()> {
        if let Some(player) = &self.player {
            player.resume();
            return Ok(());
        }
        let track = find_track(&self.base).ok_or_else(|| {
            anyhow::anyhow!("No background-music track under {}", self.base.display())
        })?;
        self.player = Some(player::Player::start(&track)?);
        log::info!("Playing {}", track.display());
        Ok(())
    }
}

#[cfg(feature = "audio")]
mod player {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;

    use anyhow::Context;
    use rodio::{Decoder, OutputStream, Sink, Source};

    pub struct Player {
        _stream: OutputStream,
        sink: Sink,
    }

    impl Player {
        /// Decode first so a bad file fails before an output device is opened.
        pub fn start(track: &Path) -> anyhow::Result<Self> {
            let file =
                File::open(track).with_context(|| format!("Failed to open {}", track.display()))?;
            let source = Decoder::new(BufReader::new(file))
                .with_context(|| format!("Failed to decode {}", track.display()))?;
            let (stream, handle) =
                OutputStream::try_default().context("No audio output device")?;
            let sink = Sink::try_new(&handle).context("Failed to open an audio sink")?;
            sink.append(source.repeat_infinite());
            Ok(Self {
                _stream: stream,
                sink,
            })
        }

        pub fn pause(&self) {
            self.sink.pause();
        }

        pub fn resume(&self) {
            self.sink.play();
        }
    }
}

#[cfg(not(feature = "audio"))]
mod player {
    use std::path::Path;

    /// Without an audio backend no player can exist.
    pub enum Player {}

    impl Player {
        pub fn start(track: &Path) -> anyhow::Result<Self> {
            anyhow::bail!(
                "Cannot play {}: built without the `audio` feature",
                track.display()
            )
        }

        pub fn pause(&self) {
            match *self {}
        }

        pub fn resume(&self) {
            match *self {}
        }
    }
}
