//! Game templates: one JSON file describes one game variant
//!
//! ```json
//! {
//!   "title": "Animals",
//!   "background_image": "images/farm.png",
//!   "images": { "cat": "images/cat.png", "dog": "images/dog.png" },
//!   "word_positions": [ { "x": 0.25, "y": 0.4, "id": 1 }, { "x": 0.75, "y": 0.4, "id": 2 } ],
//!   "replay_button": { "x": 0.5, "y": 0.9 },
//!   "on_correct": { "action": "replace_background", "image": "images/farm_happy.png" }
//! }
//! ```
//!
//! Every key is optional and unknown keys are ignored. Loading never fails:
//! a missing or broken file gives the built-in template, a missing picture
//! only turns its word into a text-only option.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sightwords_common::{GameError, Result};

use crate::assets::{bitmap, ImageHandle, ImageSource};

pub const DEFAULT_TITLE: &str = "Sight Word Game";

/// Word list used when the template has no `images` table
pub const DEFAULT_SIGHT_WORDS: &[&str] = &[
    "the", "to", "and", "a", "I", "you", "it", "in", "said", "for",
    "up", "look", "is", "go", "we", "little", "down", "can", "see", "not",
    "one", "my", "me", "big", "come", "here", "play", "run", "find", "help",
];

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

// ---------------------------------------------------------------------------
// Template file schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameTemplate {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<PathBuf>,
    /// word → picture. Present-but-empty means "no words", not "defaults".
    #[serde(default, rename = "images", skip_serializing_if = "Option::is_none")]
    pub word_images: Option<BTreeMap<String, PathBuf>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub word_positions: Vec<WordPosition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay_button: Option<ScreenPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_correct: Option<OnCorrect>,
}

/// Fractional screen position (0..1 on each axis), widget centered on it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f32,
    pub y: f32,
}

impl ScreenPoint {
    pub fn in_range(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }

    pub fn clamped(&self) -> ScreenPoint {
        ScreenPoint {
            x: self.x.clamp(0.0, 1.0),
            y: self.y.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordPosition {
    pub x: f32,
    pub y: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<PositionId>,
}

impl WordPosition {
    pub fn point(&self) -> ScreenPoint {
        ScreenPoint { x: self.x, y: self.y }
    }
}

/// Slot identifier; templates use either numbers or names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionId {
    Number(i64),
    Name(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrectAction {
    ReplaceBackground,
    /// Unrecognized or missing action, ignored at runtime
    #[default]
    #[serde(other)]
    Unknown,
}

/// Special action run after a correct answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OnCorrect {
    #[serde(default)]
    pub action: CorrectAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
}

impl GameTemplate {
    /// Template used when no usable file exists: default words, no pictures
    pub fn builtin() -> Self {
        Self {
            title: default_title(),
            background_image: None,
            word_images: None,
            word_positions: Vec::new(),
            replay_button: None,
            on_correct: None,
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| GameError::Config(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| GameError::Config(e.to_string()))
    }

    /// Words eligible for a round, in a stable order
    pub fn word_pool(&self) -> Vec<String> {
        match &self.word_images {
            Some(images) => images.keys().cloned().collect(),
            None => DEFAULT_SIGHT_WORDS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Log anything odd without changing the template
    fn check(&self) {
        for (i, pos) in self.word_positions.iter().enumerate() {
            if !pos.point().in_range() {
                tracing::warn!(
                    "word_positions[{}] = ({}, {}) is outside 0..1 and will be clamped",
                    i, pos.x, pos.y
                );
            }
        }
        if let Some(replay) = &self.replay_button {
            if !replay.in_range() {
                tracing::warn!("replay_button is outside 0..1 and will be clamped");
            }
        }
        if let Some(on_correct) = &self.on_correct {
            match on_correct.action {
                CorrectAction::ReplaceBackground if on_correct.image.is_none() => {
                    tracing::warn!("on_correct.replace_background has no image; it will do nothing");
                }
                CorrectAction::Unknown => {
                    tracing::warn!("on_correct.action is not recognized and will be ignored");
                }
                _ => {}
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Where the active template came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    File(PathBuf),
    BuiltIn,
}

/// A template plus the pictures that could actually be decoded
pub struct LoadedTemplate {
    pub template: GameTemplate,
    pub source: TemplateSource,
    /// Thumbnails of words whose picture loaded; other words are text-only
    pub word_images: HashMap<String, ImageHandle>,
    pub background: Option<ImageHandle>,
    pool: Vec<String>,
}

impl LoadedTemplate {
    /// Decode the template's pictures. Missing ones are logged and skipped.
    pub fn from_template(
        template: GameTemplate,
        source: TemplateSource,
        images: &dyn ImageSource,
        thumb_size: (u32, u32),
    ) -> Self {
        template.check();

        let background = template.background_image.as_deref().and_then(|path| {
            match images.load_image(path) {
                Ok(bmp) => Some(Arc::new(bmp)),
                Err(e) => {
                    tracing::warn!("Background image unavailable: {}", e);
                    None
                }
            }
        });

        let mut word_images = HashMap::new();
        if let Some(table) = &template.word_images {
            for (word, path) in table {
                match images.load_image(path) {
                    Ok(bmp) => {
                        let thumb = bitmap::thumbnail(&bmp, thumb_size.0, thumb_size.1);
                        word_images.insert(word.clone(), Arc::new(thumb));
                    }
                    Err(e) => {
                        tracing::warn!("No image for '{}' ({}), using text only", word, e);
                    }
                }
            }
        }

        let pool = template.word_pool();
        tracing::info!(
            "Template '{}': {} words ({} with images), {} positions",
            template.title,
            pool.len(),
            word_images.len(),
            template.word_positions.len()
        );

        Self {
            template,
            source,
            word_images,
            background,
            pool,
        }
    }

    pub fn builtin() -> Self {
        struct NoImages;
        impl ImageSource for NoImages {
            fn load_image(&self, path: &Path) -> Result<bitmap::DecodedBitmap> {
                Err(GameError::AssetMissing(path.to_path_buf()))
            }
        }
        Self::from_template(GameTemplate::builtin(), TemplateSource::BuiltIn, &NoImages, (1, 1))
    }

    pub fn word_pool(&self) -> &[String] {
        &self.pool
    }

    pub fn image_for(&self, word: &str) -> Option<ImageHandle> {
        self.word_images.get(word).cloned()
    }

    pub fn title(&self) -> &str {
        &self.template.title
    }
}

/// Read a template file. Never fails: problems are logged and the
/// built-in template is used instead.
pub fn load(path: &Path, images: &dyn ImageSource, thumb_size: (u32, u32)) -> LoadedTemplate {
    match read_template(path) {
        Ok(template) => {
            tracing::info!("Template loaded: {}", path.display());
            LoadedTemplate::from_template(
                template,
                TemplateSource::File(path.to_path_buf()),
                images,
                thumb_size,
            )
        }
        Err(e) => {
            tracing::warn!("{}; using built-in word list", e);
            LoadedTemplate::builtin()
        }
    }
}

fn read_template(path: &Path) -> Result<GameTemplate> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GameError::Config(format!("template {} not found", path.display()))
        } else {
            GameError::Config(format!("cannot read {}: {}", path.display(), e))
        }
    })?;
    GameTemplate::parse(&text)
        .map_err(|e| GameError::Config(format!("{}: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::testing::MemoryImages;
    use std::env;

    const FARM: &str = r#"{
        "title": "Farm",
        "background_image": "farm.png",
        "images": { "cat": "cat.png", "dog": "dog.png", "cow": "missing.png" },
        "word_positions": [
            { "x": 0.25, "y": 0.4, "id": 1 },
            { "x": 0.75, "y": 0.4, "id": "right" }
        ],
        "replay_button": { "x": 0.5, "y": 0.9 },
        "on_correct": { "action": "replace_background", "image": "farm_happy.png" },
        "music": "ignored.ogg"
    }"#;

    fn temp_template_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join("sightwords_test_templates").join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn parses_all_recognized_keys() {
        let t = GameTemplate::parse(FARM).unwrap();
        assert_eq!(t.title, "Farm");
        assert_eq!(t.background_image, Some(PathBuf::from("farm.png")));
        assert_eq!(t.word_images.as_ref().unwrap().len(), 3);
        assert_eq!(t.word_positions.len(), 2);
        assert_eq!(t.word_positions[0].id, Some(PositionId::Number(1)));
        assert_eq!(t.word_positions[1].id, Some(PositionId::Name("right".into())));
        assert_eq!(t.replay_button, Some(ScreenPoint { x: 0.5, y: 0.9 }));
        let on_correct = t.on_correct.unwrap();
        assert_eq!(on_correct.action, CorrectAction::ReplaceBackground);
        assert_eq!(on_correct.image, Some(PathBuf::from("farm_happy.png")));
    }

    #[test]
    fn empty_document_takes_defaults() {
        let t = GameTemplate::parse("{}").unwrap();
        assert_eq!(t, GameTemplate::builtin());
        assert_eq!(t.word_pool().len(), DEFAULT_SIGHT_WORDS.len());
    }

    #[test]
    fn unknown_action_is_kept_as_unknown() {
        let t = GameTemplate::parse(r#"{ "on_correct": { "action": "confetti" } }"#).unwrap();
        assert_eq!(t.on_correct.unwrap().action, CorrectAction::Unknown);
    }

    #[test]
    fn reserialized_template_is_equivalent() {
        let original = GameTemplate::parse(FARM).unwrap();
        let json = original.to_json().unwrap();
        let again = GameTemplate::parse(&json).unwrap();
        assert_eq!(original, again);
        assert!(!json.contains("music"));
    }

    #[test]
    fn empty_images_table_means_empty_pool() {
        let t = GameTemplate::parse(r#"{ "images": {} }"#).unwrap();
        assert!(t.word_pool().is_empty());
    }

    #[test]
    fn missing_picture_keeps_word_as_text() {
        let images = MemoryImages::with(&["farm.png", "cat.png", "dog.png"]);
        let loaded = LoadedTemplate::from_template(
            GameTemplate::parse(FARM).unwrap(),
            TemplateSource::BuiltIn,
            &images,
            (50, 50),
        );
        assert!(loaded.word_pool().contains(&"cow".to_string()));
        assert!(loaded.image_for("cow").is_none());
        assert!(loaded.image_for("cat").is_some());
        assert!(loaded.background.is_some());
    }

    #[test]
    fn missing_background_is_not_fatal() {
        let images = MemoryImages::with(&["cat.png"]);
        let loaded = LoadedTemplate::from_template(
            GameTemplate::parse(FARM).unwrap(),
            TemplateSource::BuiltIn,
            &images,
            (50, 50),
        );
        assert!(loaded.background.is_none());
        assert_eq!(loaded.word_pool().len(), 3);
    }

    #[test]
    fn thumbnails_are_limited() {
        let images = MemoryImages::with(&["cat.png"]).sized(200, 100);
        let loaded = LoadedTemplate::from_template(
            GameTemplate::parse(r#"{ "images": { "cat": "cat.png" } }"#).unwrap(),
            TemplateSource::BuiltIn,
            &images,
            (50, 50),
        );
        let cat = loaded.image_for("cat").unwrap();
        assert_eq!((cat.width, cat.height), (50, 25));
    }

    #[test]
    fn missing_file_gives_builtin() {
        let dir = temp_template_dir("missing");
        let loaded = load(&dir.join("nope.json"), &MemoryImages::default(), (50, 50));
        assert_eq!(loaded.source, TemplateSource::BuiltIn);
        assert_eq!(loaded.title(), DEFAULT_TITLE);
        assert!(loaded.word_pool().contains(&"the".to_string()));
    }

    #[test]
    fn malformed_file_gives_builtin() {
        let dir = temp_template_dir("malformed");
        let path = dir.join("broken.json");
        std::fs::write(&path, "{ \"title\": ").unwrap();
        let loaded = load(&path, &MemoryImages::default(), (50, 50));
        assert_eq!(loaded.source, TemplateSource::BuiltIn);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_template_is_used() {
        let dir = temp_template_dir("file");
        let path = dir.join("farm.json");
        std::fs::write(&path, FARM).unwrap();
        let loaded = load(&path, &MemoryImages::default(), (50, 50));
        assert_eq!(loaded.source, TemplateSource::File(path.clone()));
        assert_eq!(loaded.title(), "Farm");
        assert_eq!(loaded.word_pool(), &["cat", "cow", "dog"]);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn on_correct_without_action_keeps_template() {
        let dir = temp_template_dir("no_action");
        let path = dir.join("farm.json");
        std::fs::write(
            &path,
            r#"{ "title": "Farm", "images": { "cat": "cat.png" }, "on_correct": { "image": "x.png" } }"#,
        )
        .unwrap();
        let loaded = load(&path, &MemoryImages::default(), (50, 50));
        assert_eq!(loaded.source, TemplateSource::File(path.clone()));
        assert_eq!(loaded.title(), "Farm");
        assert_eq!(loaded.word_pool(), &["cat"]);
        let on_correct = loaded.template.on_correct.as_ref().unwrap();
        assert_eq!(on_correct.action, CorrectAction::Unknown);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn out_of_range_positions_are_not_rewritten() {
        let t = GameTemplate::parse(r#"{ "word_positions": [ { "x": 1.5, "y": -0.2 } ] }"#).unwrap();
        let loaded = LoadedTemplate::from_template(
            t,
            TemplateSource::BuiltIn,
            &MemoryImages::default(),
            (50, 50),
        );
        let pos = &loaded.template.word_positions[0];
        assert_eq!((pos.x, pos.y), (1.5, -0.2));
        assert_eq!(pos.point().clamped(), ScreenPoint { x: 1.0, y: 0.0 });
    }
}
