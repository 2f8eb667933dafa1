//! HTTP API endpoints for the quiz form.
//!
//! Every view the frontend renders comes from the GET endpoints here and
//! every widget interaction maps to one mutating endpoint. Mutating
//! endpoints persist the state snapshot before responding, mirroring the
//! original form's save-after-every-change behavior.

use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::{QuizError, QuizResult};
use crate::state::{AppState, StateSnapshot};
use crate::types::{QuizState, RoundNumber, Standing, TeamId, Track};
use crate::ui;

/// Upload requests may carry several full-length tracks; axum's 2 MB
/// default body cap is smaller than a single mp3.
const UPLOAD_BODY_LIMIT: usize = 256 * 1024 * 1024;

/// Assemble the full application: JSON API, embedded form UI, and the
/// music directory served for inline playback.
pub fn router(state: Arc<AppState>) -> Router {
    let music_dir = state.tracks.dir().to_path_buf();

    Router::new()
        .merge(ui::routes())
        .nest("/api", api_routes())
        .nest_service("/tracks", ServeDir::new(music_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/state", get(get_state))
        .route("/state/export", get(export_state))
        .route("/state/import", post(import_state))
        .route("/teams/count", put(set_team_count))
        .route("/teams/{id}/name", put(set_team_name))
        .route("/rounds/count", put(set_round_count))
        .route("/scores", put(set_score))
        .route("/summary", get(get_summary))
        .route("/tracks", get(list_tracks).post(upload_tracks))
        .route("/reset", post(reset))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
}

#[derive(Debug, Deserialize)]
struct CountBody {
    count: u32,
}

#[derive(Debug, Deserialize)]
struct NameBody {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ScoreBody {
    team_id: TeamId,
    round: RoundNumber,
    points: u32,
}

/// Leaderboard plus the announced winner (the top row's team name).
#[derive(Debug, Serialize)]
struct SummaryResponse {
    standings: Vec<Standing>,
    winner: Option<String>,
}

#[derive(Debug, Serialize)]
struct UploadResponse {
    saved: Vec<String>,
    tracks: Vec<Track>,
}

/// GET /api/state
async fn get_state(State(state): State<Arc<AppState>>) -> Json<QuizState> {
    Json(state.quiz().await)
}

/// PUT /api/teams/count
async fn set_team_count(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CountBody>,
) -> QuizResult<Json<QuizState>> {
    let quiz = state.set_team_count(body.count).await;
    state.persist().await?;
    Ok(Json(quiz))
}

/// PUT /api/teams/{id}/name
async fn set_team_name(
    State(state): State<Arc<AppState>>,
    Path(id): Path<TeamId>,
    Json(body): Json<NameBody>,
) -> QuizResult<Json<QuizState>> {
    let quiz = state.set_team_name(id, body.name).await?;
    state.persist().await?;
    Ok(Json(quiz))
}

/// PUT /api/rounds/count
async fn set_round_count(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CountBody>,
) -> QuizResult<Json<QuizState>> {
    let quiz = state.set_round_count(body.count).await;
    state.persist().await?;
    Ok(Json(quiz))
}

/// PUT /api/scores
async fn set_score(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ScoreBody>,
) -> QuizResult<Json<QuizState>> {
    let quiz = state.set_score(body.team_id, body.round, body.points).await?;
    state.persist().await?;
    Ok(Json(quiz))
}

/// GET /api/summary
async fn get_summary(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    let standings = state.standings().await;
    let winner = standings.first().map(|row| row.name.clone());
    Json(SummaryResponse { standings, winner })
}

/// GET /api/tracks
async fn list_tracks(State(state): State<Arc<AppState>>) -> QuizResult<Json<Vec<Track>>> {
    Ok(Json(state.tracks.list().await?))
}

/// POST /api/tracks
///
/// Multipart form upload; every file part is stored, any number per
/// request. Responds with the stored names and the refreshed playlist.
async fn upload_tracks(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> QuizResult<Json<UploadResponse>> {
    let mut saved = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| QuizError::Upload(e.to_string()))?
    {
        // parts without a filename are form fields, not uploads
        let Some(raw_name) = field.file_name().map(str::to_owned) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| QuizError::Upload(e.to_string()))?;
        saved.push(state.tracks.save(&raw_name, &bytes).await?);
    }

    let tracks = state.tracks.list().await?;
    tracing::info!("uploaded {} track(s)", saved.len());
    Ok(Json(UploadResponse { saved, tracks }))
}

/// POST /api/reset
async fn reset(State(state): State<Arc<AppState>>) -> QuizResult<Json<QuizState>> {
    let quiz = state.reset().await?;
    state.persist().await?;
    tracing::info!("quiz reset, music files cleared");
    Ok(Json(quiz))
}

/// GET /api/state/export
async fn export_state(State(state): State<Arc<AppState>>) -> Json<StateSnapshot> {
    Json(state.export_snapshot().await)
}

/// POST /api/state/import
///
/// Replaces the live state with an uploaded snapshot. Unlike the lenient
/// startup load, a snapshot that fails validation is refused.
async fn import_state(
    State(state): State<Arc<AppState>>,
    Json(snapshot): Json<StateSnapshot>,
) -> QuizResult<Json<QuizState>> {
    let quiz = state.import_snapshot(snapshot).await?;
    state.persist().await?;
    tracing::info!("state imported from snapshot");
    Ok(Json(quiz))
}
