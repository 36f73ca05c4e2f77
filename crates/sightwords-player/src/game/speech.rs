//! Speech seam: what the game needs from text-to-speech
//!
//! The round controller and answer evaluator only know `Announcer`.
//! The engine provides the real implementation (`SpeechService`);
//! tests use a recorder.

use sightwords_common::Result;

use crate::assets::sound::AudioChunk;

/// Lazy stream of audio produced for one utterance
pub type AudioStream = Box<dyn Iterator<Item = AudioChunk>>;

/// Text-to-speech collaborator. Only the head of the stream is played.
pub trait SpeechSynth {
    fn speak(&self, text: &str) -> AudioStream;
}

/// Fire-and-forget speech output. Must not block on playback.
pub trait Announcer {
    fn announce(&mut self, text: &str) -> Result<()>;
}

/// Phrase spoken at the start of each round and on replay
pub fn announcement(word: &str) -> String {
    format!("The word to click is... \"{}\"", word)
}

/// Announce, logging and swallowing speech failures
pub fn announce_word(speech: &mut dyn Announcer, word: &str) {
    let text = announcement(word);
    tracing::debug!("Speak: {}", text);
    if let Err(e) = speech.announce(&text) {
        tracing::debug!("Announcement skipped: {}", e);
    }
}


#[cfg(test)]
mod tests {
    use super::testing::RecordingAnnouncer;
    use super::*;

    #[test]
    fn announcement_quotes_the_word() {
        assert_eq!(announcement("the"), "The word to click is... \"the\"");
    }

    #[test]
    fn failures_are_swallowed() {
        let mut speech = RecordingAnnouncer::failing();
        announce_word(&mut speech, "and");
        assert_eq!(speech.spoken(), vec![announcement("and")]);
    }
}
