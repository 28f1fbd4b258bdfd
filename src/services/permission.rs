use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Gate deciding whether the app may read the media library
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Returns `true` when read access is granted
    async fn request_media_library_access(&self) -> Result<bool>;
}

/// Grants access when the media directory exists and can be listed
pub struct MediaLibraryGate {
    media_dir: PathBuf,
}

impl MediaLibraryGate {
    pub fn new(media_dir: PathBuf) -> Self {
        Self { media_dir }
    }
}

#[async_trait]
impl PermissionGate for MediaLibraryGate {
    async fn request_media_library_access(&self) -> Result<bool> {
        match tokio::fs::read_dir(&self.media_dir).await {
            Ok(_) => Ok(true),
            Err(e) => {
                tracing::debug!(
                    "Media library {:?} is not readable: {}",
                    self.media_dir,
                    e
                );
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_existing_dir_is_granted() {
        let dir = tempfile::tempdir().unwrap();
        let gate = MediaLibraryGate::new(dir.path().to_path_buf());
        assert!(gate.request_media_library_access().await.unwrap());
    }

    #[tokio::test]
    async fn test_missing_dir_is_denied() {
        let dir = tempfile::tempdir().unwrap();
        let gate = MediaLibraryGate::new(dir.path().join("nope"));
        assert!(!gate.request_media_library_access().await.unwrap());
    }
}
