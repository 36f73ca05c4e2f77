//! Common error types and configuration shared across Sight Words crates

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the optional configuration file
pub const CONFIG_FILE_NAME: &str = "sightwords.toml";

/// Everything that can go wrong inside a game session.
///
/// Only `EmptyWordPool` ends a session; the other variants degrade a
/// feature and are logged.
#[derive(Error, Debug)]
pub enum GameError {
    #[error("Template error: {0}")]
    Config(String),

    #[error("Asset not found: {}", .0.display())]
    AssetMissing(PathBuf),

    #[error("Asset could not be decoded: {}: {reason}", .path.display())]
    AssetInvalid { path: PathBuf, reason: String },

    #[error("No words available for this round")]
    EmptyWordPool,

    #[error("Speech unavailable: {0}")]
    SpeechUnavailable(String),
}

impl GameError {
    /// True for errors that end the session instead of degrading it
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameError::EmptyWordPool)
    }
}

pub type Result<T> = std::result::Result<T, GameError>;

/// Application-wide configuration, read from `sightwords.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Template used when no path is given on the command line
    pub template_path: PathBuf,
    /// Rounds per session
    pub total_rounds: u32,
    /// Directory with recorded voice clips (`prompt.wav`, `<word>.wav`)
    pub voice_dir: Option<PathBuf>,
    /// Maximum (width, height) of word thumbnails
    pub thumbnail_size: (u32, u32),
    pub window_width: usize,
    pub window_height: usize,
    /// Master volume (0.0 – 1.0)
    pub volume: f32,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from("templates/basic.json"),
            total_rounds: 10,
            voice_dir: None,
            thumbnail_size: (50, 50),
            window_width: 800,
            window_height: 600,
            volume: 1.0,
            log_level: "info".to_string(),
        }
    }
}

/// Level names accepted by `log_level`
pub const LOG_LEVELS: &[&str] = &["off", "error", "warn", "info", "debug", "trace"];

const DEFAULT_LOG_LEVEL: &str = "info";

impl AppConfig {
    /// The configured log level, lowercased, or `None` when it is not a
    /// level name `tracing` understands
    pub fn valid_log_level(&self) -> Option<String> {
        let level = self.log_level.trim().to_lowercase();
        LOG_LEVELS.contains(&level.as_str()).then_some(level)
    }

    /// Log level to install; unknown names fall back to `info`
    pub fn effective_log_level(&self) -> String {
        self.valid_log_level()
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }

    /// Parse a config document. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| GameError::Config(e.to_string()))
    }

    /// Load the first `sightwords.toml` found in `search_dirs`.
    /// A missing file yields the defaults; a broken one is logged and
    /// replaced by the defaults.
    pub fn load(search_dirs: &[PathBuf]) -> Self {
        for dir in search_dirs {
            let path = dir.join(CONFIG_FILE_NAME);
            if !path.is_file() {
                continue;
            }
            return match Self::load_file(&path) {
                Ok(cfg) => {
                    tracing::info!("Config: {}", path.display());
                    cfg
                }
                Err(e) => {
                    tracing::warn!("{} ignored ({}), using defaults", path.display(), e);
                    Self::default()
                }
            };
        }
        Self::default()
    }

    fn load_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| GameError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_game() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.total_rounds, 10);
        assert_eq!(cfg.thumbnail_size, (50, 50));
        assert_eq!((cfg.window_width, cfg.window_height), (800, 600));
        assert_eq!(cfg.template_path, PathBuf::from("templates/basic.json"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = AppConfig::from_toml_str("total_rounds = 3\nvoice_dir = \"voices\"\n").unwrap();
        assert_eq!(cfg.total_rounds, 3);
        assert_eq!(cfg.voice_dir, Some(PathBuf::from("voices")));
        assert_eq!(cfg.log_level, "info");
    }

    #[test]
    fn broken_toml_is_config_error() {
        let err = AppConfig::from_toml_str("total_rounds = \"many\"").unwrap_err();
        assert!(matches!(err, GameError::Config(_)));
        assert!(!err.is_terminal());
    }

    #[test]
    fn load_falls_back_when_missing() {
        let dir = std::env::temp_dir().join("sightwords_test_no_config");
        let _ = std::fs::remove_dir_all(&dir);
        assert_eq!(AppConfig::load(&[dir]), AppConfig::default());
    }

    #[test]
    fn load_reads_first_config() {
        let dir = std::env::temp_dir().join("sightwords_test_config");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(CONFIG_FILE_NAME), "total_rounds = 5\n").unwrap();
        assert_eq!(AppConfig::load(&[dir.clone()]).total_rounds, 5);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn unknown_log_level_falls_back_to_info() {
        let cfg = AppConfig::from_toml_str("log_level = \"verbose\"\n").unwrap();
        assert_eq!(cfg.valid_log_level(), None);
        assert_eq!(cfg.effective_log_level(), "info");
    }

    #[test]
    fn log_level_is_case_insensitive() {
        let cfg = AppConfig::from_toml_str("log_level = \" DEBUG \"\n").unwrap();
        assert_eq!(cfg.valid_log_level().as_deref(), Some("debug"));
        assert_eq!(AppConfig::default().effective_log_level(), "info");
    }

    #[test]
    fn only_empty_pool_is_terminal() {
        assert!(GameError::EmptyWordPool.is_terminal());
        assert!(!GameError::AssetMissing(PathBuf::from("x.png")).is_terminal());
        assert!(!GameError::SpeechUnavailable("no device".into()).is_terminal());
    }
}
