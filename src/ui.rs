//! Embedded web frontend.
//!
//! The form UI is three plain files (HTML/CSS/JS, no build step)
//! compiled into the binary, so the server ships as a single artifact
//! with nothing to deploy alongside it.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../static/index.html");
const QUIZ_CSS: &str = include_str!("../static/quiz.css");
const APP_JS: &str = include_str!("../static/app.js");

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(serve_index_html))
        .route("/static/quiz.css", get(serve_quiz_css))
        .route("/static/app.js", get(serve_app_js))
}

/// GET /
async fn serve_index_html() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "text/html; charset=utf-8"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        INDEX_HTML,
    )
        .into_response()
}

/// GET /static/quiz.css
async fn serve_quiz_css() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "text/css"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        QUIZ_CSS,
    )
        .into_response()
}

/// GET /static/app.js
async fn serve_app_js() -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", "application/javascript"),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        APP_JS,
    )
        .into_response()
}
