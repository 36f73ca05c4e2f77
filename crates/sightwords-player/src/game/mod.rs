//! Game logic: template, rounds, layout, answers
//!
//! Startup:   template::load → GameState::new → GameState::start
//! Per click: GameState::dispatch → RoundController::record_answer
//!            → feedback notification → advance_round → LayoutRenderer::render
//!
//! Everything the player sees goes through `UiHost`; everything they hear
//! goes through `Announcer`.

pub mod answer;
pub mod host;
pub mod layout;
pub mod round;
pub mod speech;
pub mod template;

use std::sync::Arc;

use rand::rngs::StdRng;
use sightwords_common::Result;

use crate::assets::ImageSource;
use host::{UiAction, UiHost};
use layout::LayoutRenderer;
use round::{GameOverSummary, Phase, RoundController, RoundOutcome};
use speech::Announcer;
use template::{CorrectAction, LoadedTemplate};

pub const GAME_OVER_TITLE: &str = "Game Over";
pub const CONFIG_ERROR_TITLE: &str = "Configuration Error";

/// Central game state
pub struct GameState {
    pub loaded: LoadedTemplate,
    controller: RoundController,
    layout: LayoutRenderer,
    speech: Box<dyn Announcer>,
    images: Box<dyn ImageSource>,
    total_rounds: u32,
    slots: usize,
    summary: Option<GameOverSummary>,
    quit_requested: bool,
}

impl GameState {
    pub fn new(
        loaded: LoadedTemplate,
        speech: Box<dyn Announcer>,
        images: Box<dyn ImageSource>,
        total_rounds: u32,
        rng: StdRng,
    ) -> Self {
        let slots = layout::slot_count(&loaded.template);
        Self {
            loaded,
            controller: RoundController::new(rng),
            layout: LayoutRenderer::new(),
            speech,
            images,
            total_rounds,
            slots,
            summary: None,
            quit_requested: false,
        }
    }

    /// Put up the window contents and play the first round
    pub fn start(&mut self, host: &mut dyn UiHost) {
        host.set_title(self.loaded.title());
        if let Some(bg) = self.loaded.background.clone() {
            self.layout.set_background(host, bg);
        }
        tracing::info!(
            "Welcome to {}! {} rounds, {} options per round",
            self.loaded.title(),
            self.total_rounds,
            self.slots
        );

        let outcome = self.controller.start_session(
            self.total_rounds,
            self.loaded.word_pool(),
            self.slots,
            self.speech.as_mut(),
        );
        self.handle_outcome(outcome, host);
    }

    pub fn dispatch(&mut self, action: UiAction, host: &mut dyn UiHost) {
        match action {
            UiAction::Select(word) => self.select_word(&word, host),
            UiAction::Replay => self.replay_word(),
        }
    }

    /// Judge a clicked word, show feedback and move to the next round
    pub fn select_word(&mut self, word: &str, host: &mut dyn UiHost) {
        let target = self.controller.state().target_word.clone().unwrap_or_default();
        let Some(verdict) = self.controller.record_answer(word) else {
            return;
        };

        if verdict.correct {
            host.notify_info(answer::RESULT_TITLE, answer::CORRECT_MESSAGE);
            self.run_on_correct(host);
        } else {
            host.notify_error(answer::RESULT_TITLE, &answer::incorrect_message(&target));
        }

        let outcome = self.controller.advance_round(
            self.loaded.word_pool(),
            self.slots,
            self.speech.as_mut(),
        );
        self.handle_outcome(outcome, host);
    }

    pub fn replay_word(&mut self) {
        if !self.controller.replay_word(self.speech.as_mut()) {
            tracing::debug!("Replay with no active word");
        }
    }

    pub fn phase(&self) -> Phase {
        self.controller.phase()
    }

    pub fn controller(&self) -> &RoundController {
        &self.controller
    }

    pub fn layout(&self) -> &LayoutRenderer {
        &self.layout
    }

    pub fn summary(&self) -> Option<&GameOverSummary> {
        self.summary.as_ref()
    }

    /// Set after game over; the engine closes once the last notice is gone
    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    fn handle_outcome(&mut self, outcome: Result<RoundOutcome>, host: &mut dyn UiHost) {
        match outcome {
            Ok(RoundOutcome::Next { .. }) => {
                let words = self.controller.state().active_option_words.clone();
                self.layout.render(host, &words, &self.loaded);
            }
            Ok(RoundOutcome::GameOver(summary)) => {
                self.layout.clear_round(host);
                tracing::info!(
                    "Final score {}/{} ({:.2}%)",
                    summary.score,
                    summary.total_rounds,
                    summary.percentage
                );
                host.notify_info(GAME_OVER_TITLE, &summary.message());
                self.summary = Some(summary);
                self.quit_requested = true;
            }
            Err(e) => {
                self.layout.clear_round(host);
                tracing::error!("Round aborted: {}", e);
                let message = if e.is_terminal() {
                    "There are no words to play with. Check the template's images.".to_string()
                } else {
                    e.to_string()
                };
                host.notify_error(CONFIG_ERROR_TITLE, &message);
            }
        }
    }

    /// Template-declared reward after a correct answer
    fn run_on_correct(&mut self, host: &mut dyn UiHost) {
        let Some(on_correct) = &self.loaded.template.on_correct else {
            return;
        };
        match on_correct.action {
            CorrectAction::ReplaceBackground => {
                let Some(path) = &on_correct.image else {
                    return;
                };
                match self.images.load_image(path) {
                    Ok(bmp) => {
                        let id = self.layout.set_background(host, Arc::new(bmp));
                        tracing::debug!("Background {:?} now {}", id, path.display());
                    }
                    Err(e) => tracing::warn!("Background unchanged: {}", e),
                }
            }
            CorrectAction::Unknown => {
                tracing::debug!("Ignoring unknown on_correct action");
            }
        }
    }
}
