use mongodb::Database;

pub mod config;
pub mod modules;
pub mod services;

use services::summarizer::SummarizerClient;

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub summarizer: SummarizerClient,
}
