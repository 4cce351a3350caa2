use axum::extract::DefaultBodyLimit;
use axum::Router;
use tower_http::cors::CorsLayer;

use recapd::modules::summary::crud::SummaryCrud;
use recapd::services::summarizer::SummarizerClient;
use recapd::{config, modules, AppState};

// Media uploads can be large; axum's default 2 MB body limit is far too low.
const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recapd=info,tower_http=info".into()),
        )
        .init();

    let db = config::database::connect().await;

    if let Err(e) = SummaryCrud::new(&db).ensure_indexes().await {
        tracing::warn!("failed to create summary indexes: {}", e);
    }

    let summarizer = SummarizerClient::new()?;

    let state = AppState { db, summarizer };

    let app = Router::new()
        .merge(modules::summary::routes::routes())
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let port = std::env::var("PORT").unwrap_or_else(|_| "5001".to_string());
    let addr = format!("0.0.0.0:{}", port);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
