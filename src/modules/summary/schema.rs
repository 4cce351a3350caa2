use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

/// The three form fields a caller may supply alongside an upload. Each one
/// takes precedence over the AI service's field of the same meaning.
#[derive(Debug, Clone, Default)]
pub struct CallerFields {
    pub date: Option<String>,
    pub meeting_title: Option<String>,
    pub attendees: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TextSummaryRequest {
    #[validate(length(min = 1, message = "Text cannot be empty"))]
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<String>,
    // Unrecognized fields are forwarded to the AI service untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TextSummaryRequest {
    pub fn caller_fields(&self) -> CallerFields {
        CallerFields {
            date: self.date.clone(),
            meeting_title: self.meeting_title.clone(),
            attendees: self.attendees.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SummariesQuery {
    pub search_method: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub id: String,
    pub meeting_title: String,
    pub meeting_date: String,
    pub meeting_day: String,
    pub transcription: String,
    pub summary: String,
    pub attendees: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timelines: Option<Value>,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
