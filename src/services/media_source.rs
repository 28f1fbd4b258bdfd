use crate::messages::SelectedAsset;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v", "webm", "mkv", "avi", "3gp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Videos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickerOptions {
    pub media_type: MediaType,
    pub allows_editing: bool,
    pub quality: f32,
}

impl PickerOptions {
    /// Videos only, in-picker trimming allowed, maximum quality
    pub fn videos() -> Self {
        Self {
            media_type: MediaType::Videos,
            allows_editing: true,
            quality: 1.0,
        }
    }
}

/// Source of user-selected media
///
/// `Ok(None)` means the user cancelled the selection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn pick_video(&self, options: &PickerOptions) -> Result<Option<SelectedAsset>>;
}

/// Picker backed by a path the user staged beforehand (`upload <path>`)
///
/// A staged path is consumed by the next pick; with nothing staged the pick
/// counts as cancelled. Only files inside the media library can be picked;
/// relative paths are taken from the library root.
pub struct FileMediaSource {
    media_dir: PathBuf,
    staged: Mutex<Option<PathBuf>>,
}

impl FileMediaSource {
    pub fn new(media_dir: PathBuf) -> Self {
        Self {
            media_dir,
            staged: Mutex::new(None),
        }
    }

    pub async fn stage(&self, path: Option<PathBuf>) {
        *self.staged.lock().await = path;
    }
}

fn is_video(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| VIDEO_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[async_trait]
impl MediaSource for FileMediaSource {
    async fn pick_video(&self, options: &PickerOptions) -> Result<Option<SelectedAsset>> {
        let Some(path) = self.staged.lock().await.take() else {
            return Ok(None);
        };

        if options.media_type == MediaType::Videos && !is_video(&path) {
            return Err(anyhow::anyhow!("{:?} is not a video file", path));
        }

        let library = tokio::fs::canonicalize(&self.media_dir)
            .await
            .with_context(|| format!("Failed to resolve media library {:?}", self.media_dir))?;
        let path = tokio::fs::canonicalize(library.join(&path))
            .await
            .with_context(|| format!("Failed to resolve {:?}", path))?;
        if !path.starts_with(&library) {
            return Err(anyhow::anyhow!(
                "{:?} is outside the media library {:?}",
                path,
                library
            ));
        }

        let metadata = tokio::fs::metadata(&path)
            .await
            .with_context(|| format!("Failed to read metadata for {:?}", path))?;

        if !metadata.is_file() {
            return Err(anyhow::anyhow!("{:?} is not a regular file", path));
        }

        if options.allows_editing {
            tracing::debug!("No trim editor available, using {:?} as selected", path);
        }

        Ok(Some(SelectedAsset::from_path(&path, Some(metadata.len()))))
    }
}
