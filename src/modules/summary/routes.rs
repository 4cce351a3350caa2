use axum::{
    routing::{get, post},
    Router,
};

use crate::modules::summary::controller;
use crate::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/video-summary", post(controller::video_summary))
        .route("/audio-summary", post(controller::audio_summary))
        .route("/text-summary", post(controller::text_summary))
        .route("/summaries", get(controller::list_summaries))
}
