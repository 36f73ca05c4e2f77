//! Answer checking and replay

use super::round::RoundState;
use super::speech::{announce_word, Announcer};

pub const RESULT_TITLE: &str = "Result";
pub const CORRECT_MESSAGE: &str = "Correct!";

/// Outcome of one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
    pub correct: bool,
    pub updated_score: u32,
}

/// Case-insensitive word comparison
pub fn is_match(selected: &str, target: &str) -> bool {
    selected.to_lowercase() == target.to_lowercase()
}

/// Judge `selected` against the current target and update the score.
/// With no target set the answer is simply wrong.
pub fn evaluate(selected: &str, state: &mut RoundState) -> Verdict {
    let correct = state
        .target_word
        .as_deref()
        .map(|target| is_match(selected, target))
        .unwrap_or(false);
    if correct {
        state.score += 1;
    }
    tracing::debug!(
        "Answer '{}' vs {:?}: {}",
        selected,
        state.target_word,
        if correct { "correct" } else { "wrong" }
    );
    Verdict {
        correct,
        updated_score: state.score,
    }
}

pub fn incorrect_message(target: &str) -> String {
    format!("Incorrect. The correct word was '{}'.", target)
}

/// Say the current target again. Returns false when there is none.
pub fn replay_word(state: &RoundState, speech: &mut dyn Announcer) -> bool {
    match state.target_word.as_deref() {
        Some(word) => {
            announce_word(speech, word);
            true
        }
        None => false,
    }
}
