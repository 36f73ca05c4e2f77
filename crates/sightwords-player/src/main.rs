/// Sight Words: hear a word, click the matching button
///
/// Architecture:
///   assets/  : image decoding, voice clips
///   engine/  : window, stage (widgets + notices), audio, speech service
///   game/    : template, rounds, layout, answer checking

mod assets;
mod engine;
mod game;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use assets::voice::ClipSynth;
use assets::FileImageSource;
use engine::speech::SpeechService;
use rand::rngs::StdRng;
use rand::SeedableRng;
use game::GameState;
use sightwords_common::AppConfig;

fn main() -> Result<()> {
    let config = AppConfig::load(&config_dirs());

    let mut filter = EnvFilter::from_default_env();
    let directive_error = match format!("sightwords={}", config.effective_log_level()).parse() {
        Ok(directive) => {
            filter = filter.add_directive(directive);
            None
        }
        Err(e) => Some(e),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("Sight Words v{}", env!("CARGO_PKG_VERSION"));
    if config.valid_log_level().is_none() {
        tracing::warn!(
            "Unknown log_level {:?} in {}, using info",
            config.log_level,
            sightwords_common::CONFIG_FILE_NAME
        );
    }
    if let Some(e) = directive_error {
        tracing::warn!("Log filter not applied: {}", e);
    }

    let template_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.template_path.clone());
    tracing::info!("Template: {}", template_path.display());

    let images = FileImageSource::new(template_path.parent().map(Path::to_path_buf));
    let loaded = game::template::load(&template_path, &images, config.thumbnail_size);

    let voice_dir = config
        .voice_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from("voices"));
    tracing::info!("Voice clips: {}", voice_dir.display());
    let mut speech = SpeechService::new(Box::new(ClipSynth::new(voice_dir)), config.volume);
    speech.init();

    let game = GameState::new(
        loaded,
        Box::new(speech),
        Box::new(images),
        config.total_rounds,
        StdRng::from_entropy(),
    );

    engine::run(game, (config.window_width, config.window_height))
        .context("game window failed")
}

/// Working directory first, then the directory holding the executable
fn config_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd);
    }
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
    {
        if !dirs.contains(&exe_dir) {
            dirs.push(exe_dir);
        }
    }
    dirs
}
