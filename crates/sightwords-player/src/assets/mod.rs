//! Asset access: images from disk and recorded voice clips
//!
//! The game core only sees the `ImageSource` trait; `FileImageSource`
//! is the disk-backed implementation used by the binary.

pub mod bitmap;
pub mod sound;
pub mod voice;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sightwords_common::{GameError, Result};

pub use bitmap::DecodedBitmap;

/// Shared, immutable decoded image (cheap to clone into widgets)
pub type ImageHandle = Arc<DecodedBitmap>;

/// Image collaborator: decode the file at `path`
pub trait ImageSource {
    fn load_image(&self, path: &Path) -> Result<DecodedBitmap>;
}

/// Loads images from the filesystem.
///
/// Relative paths are tried against the working directory first and then
/// against `base_dir` (normally the template's directory).
pub struct FileImageSource {
    base_dir: Option<PathBuf>,
}

impl FileImageSource {
    pub fn new(base_dir: Option<PathBuf>) -> Self {
        Self { base_dir }
    }

    /// Find the file a template path refers to
    pub fn resolve(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() {
            return Some(path.to_path_buf());
        }
        if path.is_relative() {
            if let Some(base) = &self.base_dir {
                let candidate = base.join(path);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
        None
    }
}

impl ImageSource for FileImageSource {
    fn load_image(&self, path: &Path) -> Result<DecodedBitmap> {
        let full = self
            .resolve(path)
            .ok_or_else(|| GameError::AssetMissing(path.to_path_buf()))?;
        let bytes = std::fs::read(&full).map_err(|_| GameError::AssetMissing(full.clone()))?;
        let bmp = bitmap::decode(&bytes, &full)?;
        tracing::debug!("Image {} ({}×{})", full.display(), bmp.width, bmp.height);
        Ok(bmp)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn temp_asset_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join("sightwords_test_assets").join(name);
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn missing_file_is_asset_missing() {
        let source = FileImageSource::new(None);
        let err = source.load_image(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, GameError::AssetMissing(_)));
    }

    #[test]
    fn relative_path_resolves_against_base_dir() {
        let dir = temp_asset_dir("resolve");
        std::fs::write(dir.join("dog.png"), b"x").unwrap();
        let source = FileImageSource::new(Some(dir.clone()));
        assert_eq!(source.resolve(Path::new("dog.png")), Some(dir.join("dog.png")));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn undecodable_file_is_asset_invalid() {
        let dir = temp_asset_dir("invalid");
        std::fs::write(dir.join("broken.png"), b"definitely not a png").unwrap();
        let source = FileImageSource::new(Some(dir.clone()));
        let err = source.load_image(Path::new("broken.png")).unwrap_err();
        assert!(matches!(err, GameError::AssetInvalid { .. }));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
