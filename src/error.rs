use crate::messages::Notification;

pub const PERMISSION_MESSAGE: &str = "Permission to access camera roll is required";
pub const CONNECTION_MESSAGE: &str = "Please check your connection and try again";
pub const RETRY_MESSAGE: &str = "Please try again";
pub const PICKER_MESSAGE: &str = "Failed to pick video";

/// Size limit message, stated in whole MiB ("smaller than 50MB")
pub fn too_large_message(limit_bytes: u64) -> String {
    format!(
        "Please select a video smaller than {}MB",
        limit_bytes / (1024 * 1024)
    )
}

/// Everything that can end an upload attempt early
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("media library access was denied")]
    PermissionDenied,

    #[error("asset is {size} bytes, limit is {limit} bytes")]
    AssetTooLarge { size: u64, limit: u64 },

    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed upload response: {0}")]
    MalformedResponse(String),

    #[error("server rejected upload: {}", .0.as_deref().unwrap_or("no reason given"))]
    ServerRejected(Option<String>),

    #[error("failed to pick video: {0}")]
    Picker(String),
}

/// Fieldless mirror of [`UploadError`], used in outcomes that must be `Copy`/`Eq`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadErrorKind {
    PermissionDenied,
    AssetTooLarge,
    Transport,
    MalformedResponse,
    ServerRejected,
    Picker,
}

impl UploadError {
    pub fn kind(&self) -> UploadErrorKind {
        match self {
            Self::PermissionDenied => UploadErrorKind::PermissionDenied,
            Self::AssetTooLarge { .. } => UploadErrorKind::AssetTooLarge,
            Self::Transport(_) => UploadErrorKind::Transport,
            Self::MalformedResponse(_) => UploadErrorKind::MalformedResponse,
            Self::ServerRejected(_) => UploadErrorKind::ServerRejected,
            Self::Picker(_) => UploadErrorKind::Picker,
        }
    }

    /// The single notification shown to the user for this failure
    pub fn notification(&self) -> Notification {
        match self {
            Self::PermissionDenied => Notification::new("Permission Required", PERMISSION_MESSAGE),
            Self::AssetTooLarge { limit, .. } => {
                Notification::new("File Too Large", too_large_message(*limit))
            }
            Self::Transport(_) | Self::MalformedResponse(_) => {
                Notification::new("Upload Failed", CONNECTION_MESSAGE)
            }
            Self::ServerRejected(message) => Notification::new(
                "Upload Failed",
                message
                    .as_deref()
                    .filter(|m| !m.is_empty())
                    .unwrap_or(RETRY_MESSAGE),
            ),
            Self::Picker(_) => Notification::new("Error", PICKER_MESSAGE),
        }
    }
}

pub const FEED_FALLBACK_MESSAGE: &str = "Failed to load videos";
pub const FEED_CONNECTION_MESSAGE: &str = "Failed to load videos. Please check your connection.";

/// Failures of the video listing call
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("server reported failure: {}", .0.as_deref().unwrap_or("no reason given"))]
    Server(Option<String>),

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed listing response: {0}")]
    Malformed(String),
}

impl FeedError {
    pub fn user_message(&self) -> &str {
        match self {
            Self::Server(message) => message
                .as_deref()
                .filter(|m| !m.is_empty())
                .unwrap_or(FEED_FALLBACK_MESSAGE),
            Self::Transport(_) | Self::Malformed(_) => FEED_CONNECTION_MESSAGE,
        }
    }
}
