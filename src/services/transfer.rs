use crate::error::UploadError;
use crate::messages::{SelectedAsset, UploadResult};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const VIDEO_FIELD: &str = "video";
pub const VIDEO_FILE_NAME: &str = "uploaded_video.mp4";
pub const VIDEO_CONTENT_TYPE: &str = "video/mp4";

/// Multipart submission for one asset.
///
/// The file name and content type are fixed to `uploaded_video.mp4` /
/// `video/mp4` whatever the source format is, so `.mov` or `.webm` assets go
/// out mislabelled. The server contract currently depends on this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartUpload {
    pub field_name: &'static str,
    pub file_name: &'static str,
    pub content_type: &'static str,
    pub source: PathBuf,
}

impl MultipartUpload {
    pub fn for_asset(asset: &SelectedAsset) -> Self {
        Self {
            field_name: VIDEO_FIELD,
            file_name: VIDEO_FILE_NAME,
            content_type: VIDEO_CONTENT_TYPE,
            source: asset.local_path(),
        }
    }
}

/// Channel that delivers an upload and reports the server's verdict
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransferChannel: Send + Sync {
    async fn submit(&self, upload: &MultipartUpload) -> Result<UploadResult, UploadError>;
}

#[derive(Debug, Deserialize)]
struct UploadResponseBody {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Validate the server's JSON reply
pub fn parse_upload_response(body: &[u8]) -> Result<UploadResult, UploadError> {
    let body: UploadResponseBody = serde_json::from_slice(body)
        .map_err(|e| UploadError::MalformedResponse(e.to_string()))?;

    Ok(if body.success {
        UploadResult::succeeded()
    } else {
        UploadResult::rejected(body.error)
    })
}

/// Client for the upload POST
///
/// `connect_timeout` bounds reaching the server; `total_timeout` bounds the
/// whole request, body transfer included.
pub fn upload_client(
    connect_timeout: Duration,
    total_timeout: Duration,
) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(total_timeout)
        .build()
}

/// POSTs the multipart body to a fixed HTTP endpoint
pub struct HttpTransferChannel {
    client: reqwest::Client,
    url: String,
}

impl HttpTransferChannel {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    async fn build_form(upload: &MultipartUpload) -> Result<Form, UploadError> {
        let data = tokio::fs::read(&upload.source).await.map_err(|e| {
            UploadError::Transport(format!("failed to read {:?}: {}", upload.source, e))
        })?;

        let part = Part::bytes(data)
            .file_name(upload.file_name)
            .mime_str(upload.content_type)
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        Ok(Form::new().part(upload.field_name, part))
    }
}

#[async_trait]
impl TransferChannel for HttpTransferChannel {
    async fn submit(&self, upload: &MultipartUpload) -> Result<UploadResult, UploadError> {
        let form = Self::build_form(upload).await?;

        tracing::info!("Submitting {:?} to {}", upload.source, self.url);
        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;
        tracing::debug!("Upload endpoint answered {} ({} bytes)", status, body.len());

        parse_upload_response(&body)
    }
}
