use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::env;
use std::time::Duration;
use thiserror::Error;

use crate::modules::summary::schema::{CallerFields, TextSummaryRequest};

const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Error, Debug)]
pub enum SummarizerError {
    #[error("AI service error: {0}")]
    Api(String),
    #[error("AI service unreachable or timed out: {0}")]
    Timeout(reqwest::Error),
    #[error("HTTP request failed: {0}")]
    Request(reqwest::Error),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl SummarizerError {
    fn from_reqwest(e: reqwest::Error) -> Self {
        if e.is_timeout() || e.is_connect() {
            SummarizerError::Timeout(e)
        } else {
            SummarizerError::Request(e)
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorResponse {
    error: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Video,
    Audio,
    Text,
}

impl MediaKind {
    pub fn sub_path(&self) -> &'static str {
        match self {
            MediaKind::Video => "video-summary",
            MediaKind::Audio => "audio-summary",
            MediaKind::Text => "text-summary",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaUpload {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
}

/// Parsed AI-service response. `summary` and `transcription` are required;
/// anything the service returns beyond the named fields is kept in `extra`
/// so the caller-facing merged response can carry it through.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiSummary {
    pub summary: String,
    pub transcription: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attendees: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timelines: Option<Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

#[derive(Clone)]
pub struct SummarizerClient {
    client: Client,
    base_url: String,
}

impl SummarizerClient {
    pub fn new() -> Result<Self, SummarizerError> {
        let base_url =
            env::var("AI_SERVICE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string());
        Self::with_base_url(base_url)
    }

    pub fn with_base_url(base_url: String) -> Result<Self, SummarizerError> {
        let timeout_secs = env::var("AI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(SummarizerError::from_reqwest)?;

        Ok(Self { client, base_url })
    }

    pub async fn summarize_media(
        &self,
        kind: MediaKind,
        upload: MediaUpload,
        fields: &CallerFields,
    ) -> Result<AiSummary, SummarizerError> {
        let file_part = Part::bytes(upload.data)
            .file_name(upload.file_name)
            .mime_str(&upload.content_type)
            .map_err(|e| SummarizerError::InvalidResponse(e.to_string()))?;

        let mut form = Form::new().part("file", file_part);

        if let Some(date) = &fields.date {
            form = form.text("date", date.clone());
        }
        if let Some(title) = &fields.meeting_title {
            form = form.text("meeting_title", title.clone());
        }
        if let Some(attendees) = &fields.attendees {
            form = form.text("attendees", attendees.clone());
        }

        let response = self
            .client
            .post(format!("{}/{}", self.base_url, kind.sub_path()))
            .multipart(form)
            .send()
            .await
            .map_err(SummarizerError::from_reqwest)?;

        Self::parse_response(response).await
    }

    pub async fn summarize_text(
        &self,
        body: &TextSummaryRequest,
    ) -> Result<AiSummary, SummarizerError> {
        let response = self
            .client
            .post(format!("{}/{}", self.base_url, MediaKind::Text.sub_path()))
            .json(body)
            .send()
            .await
            .map_err(SummarizerError::from_reqwest)?;

        Self::parse_response(response).await
    }

    async fn parse_response(response: reqwest::Response) -> Result<AiSummary, SummarizerError> {
        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            if let Ok(error_response) = serde_json::from_str::<ApiErrorResponse>(&error_text) {
                return Err(SummarizerError::Api(error_response.error));
            }
            return Err(SummarizerError::Api(error_text));
        }

        let body: Value = response.json().await.map_err(SummarizerError::from_reqwest)?;

        serde_json::from_value(body).map_err(|e| SummarizerError::InvalidResponse(e.to_string()))
    }
}
