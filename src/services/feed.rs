use crate::error::FeedError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A video held by the server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    success: bool,
    #[serde(default)]
    data: Option<Vec<Video>>,
    #[serde(default)]
    error: Option<String>,
}

pub fn parse_list_response(body: &[u8]) -> Result<Vec<Video>, FeedError> {
    let response: ListResponse =
        serde_json::from_slice(body).map_err(|e| FeedError::Malformed(e.to_string()))?;

    if !response.success {
        return Err(FeedError::Server(response.error));
    }

    response
        .data
        .ok_or_else(|| FeedError::Malformed("successful response without `data`".to_string()))
}

/// Client for the video listing endpoint
pub struct FeedClient {
    client: reqwest::Client,
    url: String,
}

impl FeedClient {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    pub async fn fetch_videos(&self) -> Result<Vec<Video>, FeedError> {
        tracing::debug!("Fetching videos from {}", self.url);
        let body = self.client.get(&self.url).send().await?.bytes().await?;

        let videos = parse_list_response(&body)?;
        tracing::info!("Loaded {} videos", videos.len());
        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LISTING: &str = r#"{
        "success": true,
        "data": [
            {
                "id": "v1",
                "title": "Sunset timelapse",
                "url": "http://localhost:8000/media/v1.mp4",
                "thumbnail": "http://localhost:8000/media/v1.jpg",
                "uploadedAt": "2024-03-05T18:20:00Z",
                "duration": "0:42"
            },
            {
                "id": "v2",
                "title": "Untitled",
                "url": "http://localhost:8000/media/v2.mp4",
                "uploadedAt": "2024-03-06T08:00:00.000Z"
            }
        ]
    }"#;

    #[test]
    fn test_parse_listing() {
        let videos = parse_list_response(LISTING.as_bytes()).unwrap();

        assert_eq!(videos.len(), 2);
        assert_eq!(videos[0].duration.as_deref(), Some("0:42"));
        assert_eq!(videos[1].thumbnail, None);
        assert_eq!(videos[1].uploaded_at.to_rfc3339(), "2024-03-06T08:00:00+00:00");
    }

    #[test]
    fn test_parse_failure_shapes() {
        assert!(matches!(
            parse_list_response(br#"{"success": false, "error": "db down"}"#),
            Err(FeedError::Server(Some(ref m))) if m == "db down"
        ));
        assert!(matches!(
            parse_list_response(br#"{"success": true}"#),
            Err(FeedError::Malformed(_))
        ));
        assert!(matches!(
            parse_list_response(b"not json"),
            Err(FeedError::Malformed(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_videos() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/videos")
            .with_header("content-type", "application/json")
            .with_body(LISTING)
            .create_async()
            .await;

        let client = FeedClient::new(reqwest::Client::new(), format!("{}/api/videos", server.url()));
        let videos = client.fetch_videos().await.unwrap();

        assert_eq!(videos[0].title, "Sunset timelapse");
        mock.assert_async().await;
    }
}
