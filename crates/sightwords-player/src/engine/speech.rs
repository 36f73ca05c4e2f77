//! Speech service: turns announcement text into sound
//!
//! Lifecycle is explicit: `init()` before the first announcement,
//! `shutdown()` when the window closes. The audio device is only opened on
//! the first announcement, so a machine without sound still plays the game.

use sightwords_common::{GameError, Result};

use crate::assets::sound::AudioChunk;
use crate::game::speech::{Announcer, AudioStream, SpeechSynth};

use super::sound_engine::SoundEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Created,
    Ready,
    /// Audio device could not be opened; announcements are skipped
    Unavailable,
    Shutdown,
}

pub struct SpeechService {
    synth: Box<dyn SpeechSynth>,
    sound: Option<SoundEngine>,
    state: ServiceState,
    volume: f32,
}

/// Only the first chunk of an utterance is played
pub fn head_chunk(mut stream: AudioStream) -> Option<AudioChunk> {
    stream.next()
}

impl SpeechService {
    pub fn new(synth: Box<dyn SpeechSynth>, volume: f32) -> Self {
        Self {
            synth,
            sound: None,
            state: ServiceState::Created,
            volume,
        }
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    pub fn init(&mut self) {
        if self.state == ServiceState::Created {
            self.state = ServiceState::Ready;
            tracing::info!("Speech service ready");
        }
    }

    pub fn shutdown(&mut self) {
        if let Some(mut sound) = self.sound.take() {
            sound.stop_all();
        }
        self.state = ServiceState::Shutdown;
        tracing::info!("Speech service stopped");
    }

    fn output(&mut self) -> Result<&mut SoundEngine> {
        match self.state {
            ServiceState::Ready => {}
            ServiceState::Created => {
                return Err(GameError::SpeechUnavailable("service not initialized".into()))
            }
            ServiceState::Unavailable => {
                return Err(GameError::SpeechUnavailable("no audio device".into()))
            }
            ServiceState::Shutdown => {
                return Err(GameError::SpeechUnavailable("service shut down".into()))
            }
        }
        if self.sound.is_none() {
            match SoundEngine::new() {
                Some(mut engine) => {
                    engine.set_volume(self.volume);
                    self.sound = Some(engine);
                }
                None => {
                    self.state = ServiceState::Unavailable;
                    return Err(GameError::SpeechUnavailable("no audio device".into()));
                }
            }
        }
        self.sound
            .as_mut()
            .ok_or_else(|| GameError::SpeechUnavailable("no audio device".into()))
    }
}

impl Announcer for SpeechService {
    fn announce(&mut self, text: &str) -> Result<()> {
        self.output()?;
        let chunk = head_chunk(self.synth.speak(text))
            .ok_or_else(|| GameError::SpeechUnavailable(format!("no audio for {:?}", text)))?;
        let sound = self.output()?;
        sound.gc();
        if sound.play_chunk(&chunk) {
            Ok(())
        } else {
            Err(GameError::SpeechUnavailable("playback failed".into()))
        }
    }
}

impl Drop for SpeechService {
    fn drop(&mut self) {
        if self.state != ServiceState::Shutdown {
            self.shutdown();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::sound::VOICE_SAMPLE_RATE;
    use std::cell::Cell;
    use std::rc::Rc;

    struct CountingSynth {
        calls: Rc<Cell<u32>>,
    }

    impl SpeechSynth for CountingSynth {
        fn speak(&self, _text: &str) -> AudioStream {
            self.calls.set(self.calls.get() + 1);
            Box::new(std::iter::repeat(AudioChunk::new(VOICE_SAMPLE_RATE, vec![0.0; 8])))
        }
    }

    fn service() -> (SpeechService, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0));
        let synth = CountingSynth { calls: calls.clone() };
        (SpeechService::new(Box::new(synth), 1.0), calls)
    }

    #[test]
    fn head_of_endless_stream() {
        let stream: AudioStream = Box::new(
            (1..).map(|n| AudioChunk::new(VOICE_SAMPLE_RATE, vec![n as f32])),
        );
        assert_eq!(head_chunk(stream).unwrap().samples, vec![1.0]);
    }

    #[test]
    fn announce_before_init_is_refused() {
        let (mut speech, calls) = service();
        let err = speech.announce("The word to click is... \"the\"").unwrap_err();
        assert!(matches!(err, GameError::SpeechUnavailable(_)));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn announce_after_shutdown_is_refused() {
        let (mut speech, calls) = service();
        speech.init();
        assert_eq!(speech.state(), ServiceState::Ready);
        speech.shutdown();
        assert!(speech.announce("hello").is_err());
        assert_eq!(calls.get(), 0);
        assert_eq!(speech.state(), ServiceState::Shutdown);
    }

    #[test]
    fn init_is_idempotent() {
        let (mut speech, _) = service();
        speech.init();
        speech.init();
        assert_eq!(speech.state(), ServiceState::Ready);
    }
}
