use bson::oid::ObjectId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::modules::summary::schema::CallerFields;
use crate::services::summarizer::AiSummary;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum AssembleError {
    #[error("Missing meeting date")]
    MissingDate,
    #[error("Invalid meeting date: {0}")]
    InvalidDate(String),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MeetingSummary {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub meeting_title: String,
    pub meeting_date: String,
    pub meeting_day: String,
    pub transcription: String,
    pub summary: String,
    pub attendees: Vec<String>,
    pub timelines: Option<Value>,
    pub created_at: bson::DateTime,
}

impl MeetingSummary {
    /// Builds the record to persist from an AI response plus whatever
    /// fields the caller supplied. Caller fields win over the AI's;
    /// `meeting_day` is always derived from the resolved date.
    pub fn assemble(fields: &CallerFields, ai: &AiSummary) -> Result<Self, AssembleError> {
        let meeting_date = fields
            .date
            .clone()
            .or_else(|| ai.date.clone())
            .ok_or(AssembleError::MissingDate)?;

        let date = NaiveDate::parse_from_str(&meeting_date, DATE_FORMAT)
            .map_err(|_| AssembleError::InvalidDate(meeting_date.clone()))?;

        let meeting_title = fields
            .meeting_title
            .clone()
            .or_else(|| ai.meeting_title.clone())
            .unwrap_or_default();

        let attendees_raw = fields
            .attendees
            .clone()
            .or_else(|| ai.attendees.clone())
            .unwrap_or_default();

        Ok(Self {
            id: None,
            meeting_title,
            meeting_day: weekday_name(date),
            meeting_date,
            transcription: ai.transcription.clone(),
            summary: ai.summary.clone(),
            attendees: split_attendees(&attendees_raw),
            timelines: ai.timelines.clone(),
            created_at: bson::DateTime::now(),
        })
    }

    pub fn created_at_rfc3339(&self) -> String {
        self.created_at.try_to_rfc3339_string().unwrap_or_default()
    }
}

pub fn weekday_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

pub fn split_attendees(raw: &str) -> Vec<String> {
    raw.lines()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}
