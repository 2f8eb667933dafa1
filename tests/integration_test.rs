use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use quizmaster::api;
use quizmaster::config::QuizConfig;
use quizmaster::state::AppState;
use quizmaster::types::QuizState;

fn temp_config(dir: &tempfile::TempDir) -> QuizConfig {
    QuizConfig {
        music_dir: dir.path().join("music"),
        data_file: dir.path().join("quiz_data.json"),
        ..QuizConfig::default()
    }
}

/// End-to-end integration test for a complete quiz evening
#[tokio::test]
async fn test_full_quiz_flow() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(&dir);
    let state = Arc::new(AppState::init(config.clone()).await.unwrap());

    // 1. First run: default state
    let quiz = state.quiz().await;
    assert_eq!(quiz.num_teams, 1);
    assert_eq!(quiz.num_rounds, 5);
    assert!(quiz.team_names.is_empty());

    // 2. Upload the music round, out of order
    state.tracks.save("track10.mp3", b"ten").await.unwrap();
    state.tracks.save("track2.mp3", b"two").await.unwrap();
    state.tracks.save("bonus.wav", b"bonus").await.unwrap();

    let playlist: Vec<String> = state
        .tracks
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.filename)
        .collect();
    assert_eq!(playlist, vec!["track2.mp3", "track10.mp3", "bonus.wav"]);

    // 3. Set up three teams and name two of them
    let quiz = state.set_team_count(3).await;
    assert_eq!(quiz.team_names[&1], "Team 1");
    assert_eq!(quiz.team_names[&3], "Team 3");
    state.set_team_name(1, "The Quizzards".into()).await.unwrap();
    state.set_team_name(2, "Sharp Pints".into()).await.unwrap();

    // 4. Score two rounds
    state.set_round_count(2).await;
    state.set_score(1, 1, 8).await.unwrap();
    state.set_score(1, 2, 4).await.unwrap();
    state.set_score(2, 1, 6).await.unwrap();
    state.set_score(2, 2, 3).await.unwrap();
    state.set_score(3, 1, 8).await.unwrap();
    state.set_score(3, 2, 4).await.unwrap();

    // 5. Summary: totals are the sums, descending, ties by team id
    let standings = state.standings().await;
    assert_eq!(standings.len(), 3);
    assert_eq!(standings[0].name, "The Quizzards");
    assert_eq!(standings[0].total, 12);
    // team 3 ties team 1 at 12 but has the higher id
    assert_eq!(standings[1].team_id, 3);
    assert_eq!(standings[1].total, 12);
    assert_eq!(standings[2].name, "Sharp Pints");
    assert_eq!(standings[2].total, 9);
    for pair in standings.windows(2) {
        assert!(pair[0].total >= pair[1].total);
    }

    // 6. Persist, then reload as a fresh process would
    state.persist().await.unwrap();
    let reloaded = AppState::init(config).await.unwrap();
    assert_eq!(reloaded.quiz().await, state.quiz().await);

    // 7. Shrinking the team count hides but never deletes
    let quiz = state.set_team_count(2).await;
    assert_eq!(quiz.num_teams, 2);
    assert_eq!(quiz.team_names[&3], "Team 3");
    assert_eq!(quiz.team_scores[&3][&1], 8);
    assert_eq!(state.standings().await.len(), 3);

    // 8. Reset wipes the state and the playlist
    let quiz = state.reset().await.unwrap();
    assert_eq!(quiz, QuizState::default());
    assert!(state.tracks.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn export_import_restores_a_backup() {
    let dir = tempfile::tempdir().unwrap();
    let state = Arc::new(AppState::init(temp_config(&dir)).await.unwrap());

    state.set_team_count(2).await;
    state.set_team_name(2, "Backup Crew".into()).await.unwrap();
    state.set_score(2, 1, 9).await.unwrap();

    let snapshot = state.export_snapshot().await;

    state.reset().await.unwrap();
    assert_eq!(state.quiz().await, QuizState::default());

    let restored = state.import_snapshot(snapshot).await.unwrap();
    assert_eq!(restored.team_names[&2], "Backup Crew");
    assert_eq!(restored.team_scores[&2][&1], 9);
}

// --- router-level tests ---

async fn test_router(dir: &tempfile::TempDir) -> axum::Router {
    let state = Arc::new(AppState::init(temp_config(dir)).await.unwrap());
    api::router(state)
}

async fn body_json(body: Body) -> serde_json::Value {
    let bytes = to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn serves_the_form_ui_at_root() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(&dir).await;

    let response = router.oneshot(get_request("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let html = std::str::from_utf8(&bytes).unwrap();
    assert!(html.contains("Pub Quiz"));
    assert!(html.contains("Team Scores"));
}

#[tokio::test]
async fn state_endpoint_returns_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(&dir).await;

    let response = router.oneshot(get_request("/api/state")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["num_teams"], 1);
    assert_eq!(json["num_rounds"], 5);
}

#[tokio::test]
async fn team_count_then_rename_then_score_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(&dir).await;

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/teams/count",
            serde_json::json!({"count": 2}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response.into_body()).await;
    assert_eq!(json["team_names"]["2"], "Team 2");

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/teams/2/name",
            serde_json::json!({"name": "Quiz in Boots"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/scores",
            serde_json::json!({"team_id": 2, "round": 1, "points": 7}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = router.oneshot(get_request("/api/summary")).await.unwrap();
    let json = body_json(response.into_body()).await;
    assert_eq!(json["winner"], "Quiz in Boots");
    assert_eq!(json["standings"][0]["total"], 7);
}

#[tokio::test]
async fn scoring_an_unknown_team_is_404() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(&dir).await;

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/scores",
            serde_json::json!({"team_id": 9, "round": 1, "points": 3}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["error"], "unknown team 9");
}

#[tokio::test]
async fn round_zero_is_400() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(&dir).await;

    router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/teams/count",
            serde_json::json!({"count": 1}),
        ))
        .await
        .unwrap();

    let response = router
        .oneshot(json_request(
            "PUT",
            "/api/scores",
            serde_json::json!({"team_id": 1, "round": 0, "points": 3}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

fn multipart_request(uri: &str, parts: &[(&str, &[u8])]) -> Request<Body> {
    let boundary = "quiz-test-boundary";
    let mut body = Vec::new();
    for (filename, bytes) in parts {
        body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"tracks\"; filename=\"{}\"\r\n",
                filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", boundary),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn upload_stores_tracks_and_returns_sorted_playlist() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(&dir).await;

    let response = router
        .clone()
        .oneshot(multipart_request(
            "/api/tracks",
            &[
                ("track10.mp3", b"ten".as_slice()),
                ("intro.mp3", b"intro".as_slice()),
                ("track2.mp3", b"two".as_slice()),
            ],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["saved"].as_array().unwrap().len(), 3);
    let names: Vec<&str> = json["tracks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["filename"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["track2.mp3", "track10.mp3", "intro.mp3"]);

    // stored files stream back from /tracks
    let response = router
        .oneshot(get_request("/tracks/track2.mp3"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"two");
}

#[tokio::test]
async fn upload_rejects_unsupported_extension() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(&dir).await;

    let response = router
        .oneshot(multipart_request(
            "/api/tracks",
            &[("setlist.txt", b"notes".as_slice())],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reset_over_http_clears_everything() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(&dir).await;

    router
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/teams/count",
            serde_json::json!({"count": 4}),
        ))
        .await
        .unwrap();
    router
        .clone()
        .oneshot(multipart_request(
            "/api/tracks",
            &[("track1.mp3", b"one".as_slice())],
        ))
        .await
        .unwrap();

    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/reset")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response.into_body()).await;
    assert_eq!(json["num_teams"], 1);
    assert_eq!(json["num_rounds"], 5);
    assert!(json["team_names"].as_object().unwrap().is_empty());

    let response = router.oneshot(get_request("/api/tracks")).await.unwrap();
    let json = body_json(response.into_body()).await;
    assert!(json.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn import_rejects_future_schema_over_http() {
    let dir = tempfile::tempdir().unwrap();
    let router = test_router(&dir).await;

    let response = router
        .clone()
        .oneshot(get_request("/api/state/export"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let mut snapshot = body_json(response.into_body()).await;
    snapshot["schema_version"] = serde_json::json!(999);

    let response = router
        .oneshot(json_request("POST", "/api/state/import", snapshot))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn mutations_persist_across_router_rebuild() {
    let dir = tempfile::tempdir().unwrap();
    let config = temp_config(&dir);

    let state = Arc::new(AppState::init(config.clone()).await.unwrap());
    api::router(state)
        .oneshot(json_request(
            "PUT",
            "/api/rounds/count",
            serde_json::json!({"count": 8}),
        ))
        .await
        .unwrap();

    // a new process picks up the snapshot the handler wrote
    let state = Arc::new(AppState::init(config).await.unwrap());
    let response = api::router(state)
        .oneshot(get_request("/api/state"))
        .await
        .unwrap();
    let json = body_json(response.into_body()).await;
    assert_eq!(json["num_rounds"], 8);
}
