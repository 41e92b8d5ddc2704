use std::path::Path;

use anyhow::Context;
use reqwest::header::{CONTENT_TYPE, LOCATION, USER_AGENT};
use serde::Deserialize;
use tracing::{debug, info};

const AGENT: &str = "topicshorts-bot/0.1";

#[derive(Debug, Deserialize)]
struct UploadedVideo {
    id: String,
}

pub struct UploadClient {
    http: reqwest::Client,
    token: String,
    api_base: String,
}

impl UploadClient {
    pub fn new(token: String) -> Self {
        Self::with_base(token, "https://www.googleapis.com".to_string())
    }

    /// `api_base` is injectable so tests can point at a local server.
    pub fn with_base(token: String, api_base: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            token,
            api_base,
        }
    }

    /// Resumable upload: open a session with the snippet metadata, then PUT
    /// the video bytes to the session URL. Returns the hosted video id.
    pub async fn upload(&self, video: &Path, title: &str, category: &str) -> anyhow::Result<String> {
        info!("Opening upload session for {}", video.display());

        let metadata = serde_json::json!({
            "snippet": {
                "title": title,
                "description": format!("{title}\n\nNarrated short."),
                "categoryId": category,
                "tags": ["shorts", "facts"],
            },
            "status": { "privacyStatus": "public" },
        });

        let res = self
            .http
            .post(format!(
                "{}/upload/youtube/v3/videos?uploadType=resumable&part=snippet,status",
                self.api_base
            ))
            .bearer_auth(&self.token)
            .header(USER_AGENT, AGENT)
            .json(&metadata)
            .send()
            .await?
            .error_for_status()?;

        let session = res
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .context("upload session response carried no Location header")?
            .to_string();
        debug!("Upload session: {}", session);

        let bytes = tokio::fs::read(video).await?;
        info!("Uploading {} bytes", bytes.len());

        let uploaded: UploadedVideo = self
            .http
            .put(&session)
            .bearer_auth(&self.token)
            .header(USER_AGENT, AGENT)
            .header(CONTENT_TYPE, "video/mp4")
            .body(bytes)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        info!("Upload complete, video id {}", uploaded.id);
        Ok(uploaded.id)
    }
}
