//! Recorded-voice speech synth
//!
//! Voice directory layout:
//!   prompt.wav  : "The word to click is..."
//!   <word>.wav  : one clip per word, file name in lowercase
//!
//! `speak()` finds the quoted word in the announcement text and yields a
//! single chunk: prompt followed by the word clip. Decoding happens when
//! the stream is first polled.

use std::path::{Path, PathBuf};

use sightwords_common::{GameError, Result};

use crate::assets::sound::AudioChunk;
use crate::game::speech::{AudioStream, SpeechSynth};

const PROMPT_CLIP: &str = "prompt.wav";

pub struct ClipSynth {
    voice_dir: PathBuf,
}

impl ClipSynth {
    pub fn new(voice_dir: PathBuf) -> Self {
        Self { voice_dir }
    }

    fn clip_path(&self, name: &str) -> PathBuf {
        self.voice_dir.join(format!("{}.wav", name.to_lowercase()))
    }

    fn load_clip(path: &Path) -> Result<AudioChunk> {
        let bytes = std::fs::read(path).map_err(|_| GameError::AssetMissing(path.to_path_buf()))?;
        AudioChunk::from_encoded(bytes, path)
    }

    fn assemble(voice_dir: &Path, word_clip: &Path) -> Option<AudioChunk> {
        let word = match Self::load_clip(word_clip) {
            Ok(chunk) => chunk,
            Err(e) => {
                tracing::debug!("No voice clip: {}", e);
                return None;
            }
        };
        match Self::load_clip(&voice_dir.join(PROMPT_CLIP)) {
            Ok(mut prompt) => {
                if prompt.append(&word) {
                    Some(prompt)
                } else {
                    Some(word)
                }
            }
            Err(_) => Some(word),
        }
    }
}

/// The word an announcement is about: the last double-quoted span,
/// or the whole text when there are no quotes.
pub fn quoted_word(text: &str) -> &str {
    let parts: Vec<&str> = text.split('"').collect();
    if parts.len() >= 3 {
        parts[parts.len() - 2].trim()
    } else {
        text.trim()
    }
}

impl SpeechSynth for ClipSynth {
    fn speak(&self, text: &str) -> AudioStream {
        let voice_dir = self.voice_dir.clone();
        let word_clip = self.clip_path(quoted_word(text));
        Box::new(std::iter::once_with(move || Self::assemble(&voice_dir, &word_clip)).flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_word_from_announcement() {
        assert_eq!(quoted_word("The word to click is... \"said\""), "said");
        assert_eq!(quoted_word("  the  "), "the");
    }

    #[test]
    fn clip_names_are_lowercase() {
        let synth = ClipSynth::new(PathBuf::from("voices"));
        assert_eq!(synth.clip_path("I"), PathBuf::from("voices").join("i.wav"));
    }

    #[test]
    fn missing_clip_yields_empty_stream() {
        let synth = ClipSynth::new(std::env::temp_dir().join("sightwords_test_no_voices"));
        let mut stream = synth.speak("The word to click is... \"the\"");
        assert!(stream.next().is_none());
    }
}
