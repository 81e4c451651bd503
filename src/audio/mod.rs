//! Audio cues
//!
//! The game fires named cues and never waits on them. On the web the cues
//! are synthesized with Web Audio oscillators; everywhere else (and whenever
//! the audio context cannot be created) they fall silent.

use std::cell::RefCell;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
mod web;
#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

/// Sound cue names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Creature took a step
    Move,
    /// Meat devoured
    Eat,
    /// Key or door appeared, or the level was cleared
    Unlock,
    /// Low-sanity heartbeat
    Heartbeat,
    /// Subliminal scare sting
    SuddenNoise,
    /// Auditory hallucination
    Whisper,
    /// Jumpscare
    Screech,
}

/// Fire-and-forget cue player
pub trait AudioSink {
    fn play(&self, cue: SoundCue);
}

impl<T: AudioSink + ?Sized> AudioSink for Rc<T> {
    fn play(&self, cue: SoundCue) {
        (**self).play(cue)
    }
}

/// Sink that drops every cue
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&self, _cue: SoundCue) {}
}

/// Sink that remembers cues (headless runs and tests)
#[derive(Debug, Default)]
pub struct CueRecorder {
    cues: RefCell<Vec<SoundCue>>,
}

impl CueRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything played so far
    pub fn cues(&self) -> Vec<SoundCue> {
        self.cues.borrow().clone()
    }

    pub fn count(&self, cue: SoundCue) -> usize {
        self.cues.borrow().iter().filter(|&&c| c == cue).count()
    }

    pub fn clear(&self) {
        self.cues.borrow_mut().clear();
    }
}

impl AudioSink for CueRecorder {
    fn play(&self, cue: SoundCue) {
        self.cues.borrow_mut().push(cue);
    }
}

/// Best available sink for the current platform
pub fn default_sink() -> Box<dyn AudioSink> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(WebAudio::new())
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        log::info!("No native audio backend - cues are silent");
        Box::new(SilentAudio)
    }
}
