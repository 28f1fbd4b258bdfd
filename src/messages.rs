use std::path::{Path, PathBuf};

/// Phase of the upload workflow (observable via watch channel)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UploadPhase {
    #[default]
    Idle,
    RequestingPermission,
    Picking,
    Validating,
    Uploading,
    Done,
    Failed,
}

/// A user-chosen local video file
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectedAsset {
    pub uri: String,
    pub size_bytes: Option<u64>,
}

impl SelectedAsset {
    pub fn from_path(path: &Path, size_bytes: Option<u64>) -> Self {
        Self {
            uri: format!("file://{}", path.display()),
            size_bytes,
        }
    }

    /// Local filesystem path behind the URI
    pub fn local_path(&self) -> PathBuf {
        PathBuf::from(self.uri.strip_prefix("file://").unwrap_or(&self.uri))
    }
}

/// Upload workflow state.
///
/// `asset` is only populated from `Validating` onwards and `progress_percent`
/// only moves while `phase` is `Uploading` (then 100 once the result settles).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UploadState {
    pub phase: UploadPhase,
    pub progress_percent: f64,
    pub asset: Option<SelectedAsset>,
}

/// Outcome reported by the transfer channel
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadResult {
    pub success: bool,
    pub error_message: Option<String>,
}

impl UploadResult {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error_message: None,
        }
    }

    pub fn rejected(message: Option<String>) -> Self {
        Self {
            success: false,
            error_message: message,
        }
    }
}

/// One-shot user-facing message (title + body)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

impl Notification {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_path_strips_file_scheme() {
        let asset = SelectedAsset::from_path(Path::new("/tmp/clip.mov"), Some(10));
        assert_eq!(asset.uri, "file:///tmp/clip.mov");
        assert_eq!(asset.local_path(), PathBuf::from("/tmp/clip.mov"));

        let bare = SelectedAsset {
            uri: "/videos/a.mp4".to_string(),
            size_bytes: None,
        };
        assert_eq!(bare.local_path(), PathBuf::from("/videos/a.mp4"));
    }

    #[test]
    fn default_state_is_idle() {
        let state = UploadState::default();
        assert_eq!(state.phase, UploadPhase::Idle);
        assert_eq!(state.progress_percent, 0.0);
        assert!(state.asset.is_none());
    }
}
