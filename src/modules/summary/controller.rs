use axum::{
    extract::{Multipart, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use thiserror::Error;
use validator::Validate;

use crate::modules::summary::{
    crud::{build_filter, SummaryCrud},
    model::{AssembleError, MeetingSummary},
    schema::{CallerFields, ErrorResponse, SummariesQuery, SummaryResponse, TextSummaryRequest},
};
use crate::services::summarizer::{AiSummary, MediaKind, MediaUpload, SummarizerError};
use crate::AppState;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Validation(#[from] AssembleError),
    #[error(transparent)]
    Upstream(#[from] SummarizerError),
    #[error("Storage error: {0}")]
    Storage(#[from] mongodb::error::Error),
}

impl IngestError {
    fn status(&self) -> StatusCode {
        match self {
            IngestError::BadRequest(_) | IngestError::Validation(_) => StatusCode::BAD_REQUEST,
            IngestError::Upstream(_) | IngestError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn error_response(e: IngestError) -> (StatusCode, Json<ErrorResponse>) {
    tracing::error!("request failed: {}", e);
    (e.status(), Json(ErrorResponse { error: e.to_string() }))
}

fn to_response(s: &MeetingSummary) -> SummaryResponse {
    SummaryResponse {
        id: s.id.map(|id| id.to_hex()).unwrap_or_default(),
        meeting_title: s.meeting_title.clone(),
        meeting_date: s.meeting_date.clone(),
        meeting_day: s.meeting_day.clone(),
        transcription: s.transcription.clone(),
        summary: s.summary.clone(),
        attendees: s.attendees.clone(),
        timelines: s.timelines.clone(),
        created_at: s.created_at_rfc3339(),
    }
}

// Everything the AI returned, with the persisted resolution of
// title/date/attendees written over the AI's own values. The response
// can never disagree with the stored record.
fn merged_response(record: &MeetingSummary, ai: &AiSummary) -> Value {
    let mut body = match serde_json::to_value(ai) {
        Ok(Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    };

    body.insert(
        "id".to_string(),
        Value::String(record.id.map(|id| id.to_hex()).unwrap_or_default()),
    );
    body.insert(
        "meeting_title".to_string(),
        Value::String(record.meeting_title.clone()),
    );
    body.insert("date".to_string(), Value::String(record.meeting_date.clone()));
    body.insert(
        "meeting_day".to_string(),
        Value::String(record.meeting_day.clone()),
    );
    body.insert(
        "attendees".to_string(),
        Value::Array(record.attendees.iter().cloned().map(Value::String).collect()),
    );

    Value::Object(body)
}

async fn read_media_upload(
    mut multipart: Multipart,
) -> Result<(Option<MediaUpload>, CallerFields), IngestError> {
    let mut upload: Option<MediaUpload> = None;
    let mut fields = CallerFields::default();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        IngestError::BadRequest(format!("Failed to read multipart: {}", e))
    })? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(|e| {
                    IngestError::BadRequest(format!("Failed to read file: {}", e))
                })?;

                upload = Some(MediaUpload {
                    data: data.to_vec(),
                    file_name,
                    content_type,
                });
            }
            "date" | "meeting_title" | "attendees" => {
                let value = field.text().await.map_err(|e| {
                    IngestError::BadRequest(format!("Failed to read field {}: {}", name, e))
                })?;

                match name.as_str() {
                    "date" => fields.date = Some(value),
                    "meeting_title" => fields.meeting_title = Some(value),
                    _ => fields.attendees = Some(value),
                }
            }
            _ => {}
        }
    }

    Ok((upload, fields))
}

// Shared tail of the ingestion pipeline: resolve fields, validate the
// date, persist, and build the merged response.
async fn store_and_merge(
    state: &AppState,
    fields: &CallerFields,
    ai: AiSummary,
) -> Result<Value, IngestError> {
    let mut record = MeetingSummary::assemble(fields, &ai)?;

    let crud = SummaryCrud::new(&state.db);
    let id = crud.create(record.clone()).await?;
    record.id = Some(id);

    Ok(merged_response(&record, &ai))
}

async fn ingest_media(
    state: &AppState,
    kind: MediaKind,
    multipart: Multipart,
) -> Result<Value, IngestError> {
    let (upload, fields) = read_media_upload(multipart).await?;

    let upload = upload.ok_or_else(|| IngestError::BadRequest("No file provided".to_string()))?;

    let ai = state.summarizer.summarize_media(kind, upload, &fields).await?;

    store_and_merge(state, &fields, ai).await
}

pub async fn video_summary(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, (StatusCode, Json<ErrorResponse>)> {
    let merged = ingest_media(&state, MediaKind::Video, multipart)
        .await
        .map_err(error_response)?;

    Ok(Json(merged))
}

pub async fn audio_summary(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, (StatusCode, Json<ErrorResponse>)> {
    let merged = ingest_media(&state, MediaKind::Audio, multipart)
        .await
        .map_err(error_response)?;

    Ok(Json(merged))
}

pub async fn text_summary(
    State(state): State<AppState>,
    Json(payload): Json<TextSummaryRequest>,
) -> Result<Json<Value>, (StatusCode, Json<ErrorResponse>)> {
    if let Err(e) = payload.validate() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse { error: e.to_string() }),
        ));
    }

    let fields = payload.caller_fields();

    let ai = state
        .summarizer
        .summarize_text(&payload)
        .await
        .map_err(|e| error_response(IngestError::Upstream(e)))?;

    let merged = store_and_merge(&state, &fields, ai)
        .await
        .map_err(error_response)?;

    Ok(Json(merged))
}

pub async fn list_summaries(
    State(state): State<AppState>,
    Query(query): Query<SummariesQuery>,
) -> Result<Json<Vec<SummaryResponse>>, (StatusCode, Json<ErrorResponse>)> {
    let crud = SummaryCrud::new(&state.db);

    let summaries = crud.find(build_filter(&query)).await.map_err(|e| {
        error_response(IngestError::Storage(e))
    })?;

    Ok(Json(summaries.iter().map(to_response).collect()))
}
