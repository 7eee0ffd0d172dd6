use std::collections::HashMap;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::game::session::SoundEvent;

const EXTENSIONS: [&str; 3] = ["wav", "ogg", "mp3"];
const MUSIC_STEM: &str = "theme";

/// First existing `<dir>/<stem>.<ext>`.
fn find_sound(dir: &Path, stem: &str) -> Option<PathBuf> {
    EXTENSIONS.iter().map(|ext| dir.join(format!("{stem}.{ext}"))).find(|p| p.is_file())
}

fn load_bytes(path: &Path) -> Option<Arc<Vec<u8>>> {
    match fs::read(path) {
        Ok(b) => Some(Arc::new(b)),
        Err(e) => {
            log::warn!("sound {}: {e}", path.display());
            None
        }
    }
}

/// Plays session sound events through rodio. Missing files are silent.
pub struct AudioManager {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    bg_sink: Option<Sink>,
    sfx: HashMap<SoundEvent, Arc<Vec<u8>>>,
    sfx_volume: f32,
}

impl AudioManager {
    /// `None` when no output device is available.
    pub fn new() -> Option<Self> {
        let (_stream, handle) = match OutputStream::try_default() {
            Ok(s) => s,
            Err(e) => {
                log::warn!("no audio output: {e}");
                return None;
            }
        };
        Some(Self { _stream, handle, bg_sink: None, sfx: HashMap::new(), sfx_volume: 0.8 })
    }

    /// Loads one clip per event from `dir`, named after `SoundEvent::file_stem`.
    pub fn load_dir(&mut self, dir: &Path) {
        for event in SoundEvent::ALL {
            match find_sound(dir, event.file_stem()).and_then(|p| load_bytes(&p)) {
                Some(bytes) => {
                    self.sfx.insert(event, bytes);
                }
                None => log::debug!("no clip for {event:?} in {}", dir.display()),
            }
        }
        log::info!("loaded {} of {} sound clips", self.sfx.len(), SoundEvent::ALL.len());
    }

    /// Each clip gets its own detached sink so overlapping events all play.
    pub fn play(&self, event: SoundEvent) {
        let Some(data) = self.sfx.get(&event) else { return };
        if let Ok(dec) = Decoder::new(Cursor::new(data.as_ref().clone())) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                sink.append(dec.amplify(self.sfx_volume));
                sink.detach();
            }
        }
    }

    pub fn play_all(&self, events: &[SoundEvent]) {
        for &e in events {
            self.play(e);
        }
    }

    pub fn play_music_loop(&mut self, dir: &Path) {
        if self.bg_sink.is_some() { return; }
        let Some(bytes) = find_sound(dir, MUSIC_STEM).and_then(|p| load_bytes(&p)) else { return };
        if let Ok(dec) = Decoder::new_looped(Cursor::new(bytes.as_ref().clone())) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                sink.append(dec);
                sink.set_volume(0.35);
                self.bg_sink = Some(sink);
            }
        }
    }
}
