//! HTTP surface tests: the educator changes settings and materials while a
//! conversation is running.

use std::fs;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use spark_assistant::{create_router, AppState, Config, Mode};
use tower::ServiceExt;

fn request(method: Method, uri: &str, body: Option<&str>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let built = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    };
    built.expect("Failed to build request")
}

async fn send(router: &Router, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(req)
        .await
        .expect("Router failed to respond");
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    (status, body.to_vec())
}

fn json(body: &[u8]) -> Value {
    serde_json::from_slice(body).expect("Body is not JSON")
}

#[tokio::test]
async fn test_mode_switch_updates_prompt_and_conversation() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(dir.path().join("syllabus.md"), "Final exam on June 3.").expect("write");
    fs::create_dir_all(dir.path().join("lectures")).expect("mkdir");
    fs::write(dir.path().join("lectures/backprop.md"), "Chain rule, layer by layer.")
        .expect("write");

    let state = AppState::new(Config {
        materials_dir: dir.path().to_path_buf(),
        ..Config::default()
    });
    state
        .conversation
        .lock()
        .await
        .push_user("When is the final?");
    let router = create_router(state.clone());

    let (status, body) = send(&router, request(Method::GET, "/api/prompt", None)).await;
    assert_eq!(status, StatusCode::OK);
    let prompt = String::from_utf8(body).expect("utf8");
    assert!(prompt.contains("Final exam on June 3."));

    let (status, body) = send(
        &router,
        request(
            Method::POST,
            "/api/config",
            Some(r#"{"mode": "lecture", "teachingStyle": "bogus", "llmParams": {"temperature": 0.5}}"#),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reply = json(&body);
    assert_eq!(reply["status"], "ok");
    assert_eq!(reply["config"]["mode"], "lecture");
    assert_eq!(reply["config"]["teachingStyle"], "supportive");

    let (_, body) = send(&router, request(Method::GET, "/api/prompt", None)).await;
    let prompt = String::from_utf8(body).expect("utf8");
    assert!(prompt.contains("Chain rule, layer by layer."));
    assert!(!prompt.contains("Final exam on June 3."));

    let log = state.conversation.lock().await;
    assert_eq!(log.system_prompt(), Some(prompt.as_str()));
    assert_eq!(log.messages().len(), 2);

    let config = state.store.snapshot();
    assert_eq!(config.mode, Mode::Lecture);
    assert!((config.llm_params.temperature - 0.5).abs() < f32::EPSILON);
}

#[tokio::test]
async fn test_reload_reports_new_materials() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let router = create_router(AppState::new(Config {
        materials_dir: dir.path().to_path_buf(),
        ..Config::default()
    }));

    let (_, body) = send(&router, request(Method::POST, "/api/materials/reload", None)).await;
    assert_eq!(
        json(&body)["materials"],
        serde_json::json!({"faq": [], "assignment": [], "lecture": []})
    );

    fs::write(dir.path().join("office_hours.txt"), "Tuesdays 2pm.").expect("write");

    let (status, body) = send(&router, request(Method::POST, "/api/materials/reload", None)).await;
    assert_eq!(status, StatusCode::OK);
    let reply = json(&body);
    assert_eq!(reply["materials"]["faq"], serde_json::json!(["office_hours.txt"]));
    assert!(reply["reloadedAt"].as_str().is_some());

    let (_, body) = send(&router, request(Method::GET, "/api/config", None)).await;
    assert_eq!(json(&body)["materials"]["faq"][0], "office_hours.txt");
}

#[tokio::test]
async fn test_error_cases() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let router = create_router(AppState::new(Config {
        materials_dir: dir.path().to_path_buf(),
        ..Config::default()
    }));

    let (status, _) = send(&router, request(Method::POST, "/api/config", Some("[1, 2"))).await;
    assert!(status.is_client_error(), "got {status}");

    let (status, _) = send(&router, request(Method::GET, "/api/missing", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, request(Method::DELETE, "/api/config", None)).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
