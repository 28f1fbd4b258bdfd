use super::progress::{IncrementSource, SimulatedProgress, random_increments};
use crate::error::{UploadError, UploadErrorKind};
use crate::messages::{Notification, UploadPhase, UploadState};
use crate::services::{
    MediaSource, MultipartUpload, Notifier, PermissionGate, PickerOptions, TransferChannel,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

pub const SUCCESS_MESSAGE: &str = "Video uploaded successfully!";

#[derive(Debug, Clone, Copy)]
pub struct UploadSettings {
    pub max_upload_bytes: u64,
    pub progress_interval: Duration,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_upload_bytes: 50 * 1024 * 1024,
            progress_interval: Duration::from_millis(200),
        }
    }
}

/// How a call to [`UploadWorkflow::request_upload`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded,
    Cancelled,
    Failed(UploadErrorKind),
    /// Another attempt was still running; nothing was done
    Busy,
}

enum Attempt {
    Uploaded,
    Cancelled,
}

/// Drives one video through permission, selection, validation and submission
///
/// Attempts are serialized: the workflow owns a single [`UploadState`] and a
/// request made while it is not `Idle` is turned away with
/// [`UploadOutcome::Busy`]. Every attempt ends back at `Idle`.
pub struct UploadWorkflow {
    permissions: Arc<dyn PermissionGate>,
    media: Arc<dyn MediaSource>,
    channel: Arc<dyn TransferChannel>,
    notifier: Arc<dyn Notifier>,
    settings: UploadSettings,
    increments: fn() -> IncrementSource,
    state: Arc<watch::Sender<UploadState>>,
}

impl UploadWorkflow {
    pub fn new(
        permissions: Arc<dyn PermissionGate>,
        media: Arc<dyn MediaSource>,
        channel: Arc<dyn TransferChannel>,
        notifier: Arc<dyn Notifier>,
        settings: UploadSettings,
    ) -> Self {
        let (state, _) = watch::channel(UploadState::default());
        Self {
            permissions,
            media,
            channel,
            notifier,
            settings,
            increments: random_increments,
            state: Arc::new(state),
        }
    }

    /// Replace the random progress steps (deterministic runs)
    #[cfg(test)]
    pub fn with_increments(mut self, increments: fn() -> IncrementSource) -> Self {
        self.increments = increments;
        self
    }

    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    pub async fn request_upload(&self) -> UploadOutcome {
        let claimed = self.state.send_if_modified(|s| {
            if s.phase != UploadPhase::Idle {
                return false;
            }
            s.phase = UploadPhase::RequestingPermission;
            true
        });
        if !claimed {
            tracing::warn!("Upload already in progress, ignoring request");
            return UploadOutcome::Busy;
        }

        let outcome = match self.attempt().await {
            Ok(Attempt::Uploaded) => {
                tracing::info!("Upload complete");
                self.set_phase(UploadPhase::Done);
                self.notifier
                    .notify(&Notification::new("Success", SUCCESS_MESSAGE));
                UploadOutcome::Uploaded
            }
            Ok(Attempt::Cancelled) => {
                tracing::info!("Video selection cancelled");
                UploadOutcome::Cancelled
            }
            Err(e) => {
                tracing::warn!("Upload failed: {}", e);
                self.set_phase(UploadPhase::Failed);
                self.notifier.notify(&e.notification());
                UploadOutcome::Failed(e.kind())
            }
        };

        self.state.send_replace(UploadState::default());
        tracing::debug!("Upload workflow back to Idle");
        outcome
    }

    async fn attempt(&self) -> Result<Attempt, UploadError> {
        let granted = self
            .permissions
            .request_media_library_access()
            .await
            .map_err(|e| UploadError::Picker(format!("{:#}", e)))?;
        if !granted {
            return Err(UploadError::PermissionDenied);
        }

        self.set_phase(UploadPhase::Picking);
        let picked = self
            .media
            .pick_video(&PickerOptions::videos())
            .await
            .map_err(|e| UploadError::Picker(format!("{:#}", e)))?;
        let Some(asset) = picked else {
            return Ok(Attempt::Cancelled);
        };

        tracing::info!("Selected {} ({:?} bytes)", asset.uri, asset.size_bytes);
        self.state.send_modify(|s| {
            s.phase = UploadPhase::Validating;
            s.asset = Some(asset.clone());
        });

        let limit = self.settings.max_upload_bytes;
        if let Some(size) = asset.size_bytes.filter(|size| *size > limit) {
            return Err(UploadError::AssetTooLarge { size, limit });
        }

        self.state.send_modify(|s| {
            s.phase = UploadPhase::Uploading;
            s.progress_percent = 0.0;
        });
        let ticker = SimulatedProgress::start(
            self.state.clone(),
            self.settings.progress_interval,
            (self.increments)(),
        );

        let result = self.channel.submit(&MultipartUpload::for_asset(&asset)).await;

        ticker.stop().await;
        self.state.send_modify(|s| s.progress_percent = 100.0);

        let result = result?;
        if result.success {
            Ok(Attempt::Uploaded)
        } else {
            Err(UploadError::ServerRejected(result.error_message))
        }
    }

    fn set_phase(&self, phase: UploadPhase) {
        tracing::debug!("Upload phase -> {:?}", phase);
        self.state.send_modify(|s| s.phase = phase);
    }
}
