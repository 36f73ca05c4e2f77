//! Round controller: score, remaining rounds and the current target
//!
//! ```text
//! Loading ──start_session──► RoundActive ──record_answer──► Feedback
//!                                 ▲                            │
//!                                 └───────advance_round────────┤
//!                                                              ▼
//!                                                          GameOver
//! ```
//!
//! An empty word pool stops everything in `Halted`.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use sightwords_common::{GameError, Result};

use super::answer::{self, Verdict};
use super::layout::arrange_options;
use super::speech::{announce_word, Announcer};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundState {
    pub score: u32,
    pub rounds_remaining: u32,
    pub target_word: Option<String>,
    pub active_option_words: Vec<String>,
}

impl RoundState {
    pub fn new(total_rounds: u32) -> Self {
        Self {
            rounds_remaining: total_rounds,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    RoundActive,
    Feedback,
    GameOver,
    Halted,
}

/// Final score of a session
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameOverSummary {
    pub score: u32,
    pub total_rounds: u32,
    pub percentage: f64,
}

impl GameOverSummary {
    pub fn new(score: u32, total_rounds: u32) -> Self {
        let percentage = if total_rounds == 0 {
            0.0
        } else {
            score as f64 / total_rounds as f64 * 100.0
        };
        Self {
            score,
            total_rounds,
            percentage,
        }
    }

    pub fn message(&self) -> String {
        format!(
            "Your score is {}/{} ({:.2}%).",
            self.score, self.total_rounds, self.percentage
        )
    }
}

/// What `advance_round` led to
#[derive(Debug, Clone, PartialEq)]
pub enum RoundOutcome {
    Next { target: String },
    GameOver(GameOverSummary),
}

pub struct RoundController {
    state: RoundState,
    total_rounds: u32,
    phase: Phase,
    rng: StdRng,
}

impl RoundController {
    pub fn new(rng: StdRng) -> Self {
        Self {
            state: RoundState::default(),
            total_rounds: 0,
            phase: Phase::Loading,
            rng,
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rounds_played(&self) -> u32 {
        self.total_rounds - self.state.rounds_remaining
    }

    /// Reset the score and play the first round
    pub fn start_session(
        &mut self,
        total_rounds: u32,
        pool: &[String],
        slots: usize,
        speech: &mut dyn Announcer,
    ) -> Result<RoundOutcome> {
        self.total_rounds = total_rounds;
        self.state = RoundState::new(total_rounds);
        self.phase = Phase::Loading;
        tracing::info!("New session: {} rounds, {} words", total_rounds, pool.len());
        self.advance_round(pool, slots, speech)
    }

    /// Next round, or game over when no rounds remain.
    ///
    /// An empty pool leaves the round state untouched and halts.
    pub fn advance_round(
        &mut self,
        pool: &[String],
        slots: usize,
        speech: &mut dyn Announcer,
    ) -> Result<RoundOutcome> {
        if self.state.rounds_remaining == 0 {
            self.state.target_word = None;
            self.state.active_option_words.clear();
            self.phase = Phase::GameOver;
            let summary = GameOverSummary::new(self.state.score, self.total_rounds);
            tracing::info!("Game over: {}", summary.message());
            return Ok(RoundOutcome::GameOver(summary));
        }

        let Some(target) = pool.choose(&mut self.rng).cloned() else {
            self.phase = Phase::Halted;
            return Err(GameError::EmptyWordPool);
        };

        self.state.active_option_words = arrange_options(pool, &target, slots, &mut self.rng);
        self.state.target_word = Some(target.clone());
        self.state.rounds_remaining -= 1;
        self.phase = Phase::RoundActive;

        tracing::debug!(
            "Round {}/{}: target '{}' among {:?}",
            self.rounds_played(),
            self.total_rounds,
            target,
            self.state.active_option_words
        );
        announce_word(speech, &target);

        Ok(RoundOutcome::Next { target })
    }

    /// Judge an answer. Ignored unless a round is active.
    pub fn record_answer(&mut self, selected: &str) -> Option<Verdict> {
        if self.phase != Phase::RoundActive {
            tracing::debug!("Answer '{}' ignored in {:?}", selected, self.phase);
            return None;
        }
        let verdict = answer::evaluate(selected, &mut self.state);
        self.phase = Phase::Feedback;
        Some(verdict)
    }

    pub fn replay_word(&self, speech: &mut dyn Announcer) -> bool {
        answer::replay_word(&self.state, speech)
    }
}
