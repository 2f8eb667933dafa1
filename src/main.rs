use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use quizmaster::{api, config::QuizConfig, state::AppState};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quizmaster=debug,tower_http=debug,axum=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Quizmaster...");

    let config = QuizConfig::from_env();
    tracing::info!(
        "music dir {}, snapshot {}",
        config.music_dir.display(),
        config.data_file.display()
    );

    // Prepare directories and reload the last session, if any
    let state = match AppState::init(config).await {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("Failed to prepare storage: {}", e);
            std::process::exit(1);
        }
    };

    let addr = state.config.bind;
    let app = api::router(state);

    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
