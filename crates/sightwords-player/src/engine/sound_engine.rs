//! Sound engine: audio playback via rodio
//!
//! Plays speech chunks as one-shot sinks. Nothing waits for playback to
//! finish; overlapping chunks simply mix.

use rodio::buffer::SamplesBuffer;
use rodio::{OutputStream, OutputStreamHandle, Sink};

use crate::assets::sound::AudioChunk;

/// Owns the output stream and the sinks that are still playing
pub struct SoundEngine {
    /// rodio output stream (must be kept alive)
    _stream: OutputStream,
    handle: OutputStreamHandle,
    /// One-shot sounds (kept alive until finished)
    sinks: Vec<Sink>,
    /// Master volume (0.0 – 1.0)
    volume: f32,
}

impl SoundEngine {
    /// Open the default output device. Returns None if audio is unavailable.
    pub fn new() -> Option<Self> {
        match OutputStream::try_default() {
            Ok((stream, handle)) => {
                tracing::info!("Audio output initialized");
                Some(Self {
                    _stream: stream,
                    handle,
                    sinks: Vec::new(),
                    volume: 1.0,
                })
            }
            Err(e) => {
                tracing::warn!("Failed to initialize audio: {}", e);
                None
            }
        }
    }

    /// Start playing a mono chunk and return immediately
    pub fn play_chunk(&mut self, chunk: &AudioChunk) -> bool {
        if chunk.is_empty() {
            return false;
        }
        match Sink::try_new(&self.handle) {
            Ok(sink) => {
                sink.set_volume(self.volume);
                sink.append(SamplesBuffer::new(1, chunk.sample_rate, chunk.samples.clone()));
                self.sinks.push(sink);
                tracing::debug!("Playing {} ms of speech", chunk.duration_ms());
                true
            }
            Err(e) => {
                tracing::warn!("Failed to create sink: {}", e);
                false
            }
        }
    }

    pub fn stop_all(&mut self) {
        for sink in self.sinks.drain(..) {
            sink.stop();
        }
    }

    /// Set master volume (0.0 – 1.0); applies to sounds started afterwards too
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
        for sink in &self.sinks {
            sink.set_volume(self.volume);
        }
    }

    /// Drop finished sinks
    pub fn gc(&mut self) {
        self.sinks.retain(|s| !s.empty());
    }
}
