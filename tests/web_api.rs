//! HTTP-level tests for the web variant router.

use std::path::Path;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use cardiorisk::adapters::{ArtifactBundle, JsonUserStore};
use cardiorisk::application::{AccountService, PredictionService};
use cardiorisk::web::{router, AppState};

fn app() -> (Router, TempDir) {
    app_with(Path::new("models/web"), true)
}

fn app_with(artifacts: &Path, verify: bool) -> (Router, TempDir) {
    let dir = TempDir::new().expect("Temp dir");
    let bundle = ArtifactBundle::load(artifacts, verify).expect("Artifacts should load");
    let predictions = PredictionService::from_bundle(bundle).expect("Service");
    let store = JsonUserStore::new(dir.path().join("users.json")).expect("Store");
    let accounts = AccountService::new(Arc::new(store));
    (router(AppState::new(predictions, accounts)), dir)
}

fn full_answers() -> Value {
    json!({
        "answers": [
            { "question": "sysBP", "answer": "140" },
            { "question": "glucose", "answer": 90 },
            { "question": "age", "answer": "55" },
            { "question": "totChol", "answer": "220" },
            { "question": "cigsPerDay", "answer": "10" },
            { "question": "diaBP", "answer": "85" },
            { "question": "prevalentHyp", "answer": "Yes" },
            { "question": "diabetes", "answer": "No" },
            { "question": "BPMeds", "answer": "No" },
            { "question": "gender", "answer": "Male" },
        ]
    })
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .expect("Request")
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("Request")
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Body");
    String::from_utf8(bytes.to_vec()).expect("UTF-8 body")
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[tokio::test]
async fn test_predict_returns_label_per_model() {
    let (app, _dir) = app();
    let response = app
        .oneshot(post_json("/predict", full_answers().to_string()))
        .await
        .expect("Response");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(response).await).expect("JSON");
    assert_eq!(body, json!({ "HeartDiseaseModelLogisticRegression": 0 }));
}

#[tokio::test]
async fn test_predict_missing_answer_is_bad_request() {
    let (app, _dir) = app();
    let mut request = full_answers();
    request["answers"]
        .as_array_mut()
        .expect("Array")
        .retain(|a| a["question"] != "age");

    let response = app
        .oneshot(post_json("/predict", request.to_string()))
        .await
        .expect("Response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_text(response).await).expect("JSON");
    let error = body["error"].as_str().expect("Error message");
    assert!(error.contains("age"), "{error}");
}

async fn predict_with_answer(question: &str, answer: Value) -> (StatusCode, Value) {
    let (app, _dir) = app();
    let mut request = full_answers();
    for entry in request["answers"].as_array_mut().expect("Array") {
        if entry["question"] == question {
            entry["answer"] = answer.clone();
        }
    }
    let response = app
        .oneshot(post_json("/predict", request.to_string()))
        .await
        .expect("Response");
    let status = response.status();
    let body = serde_json::from_str(&body_text(response).await).expect("JSON");
    (status, body)
}

#[tokio::test]
async fn test_predict_rejects_bad_answers() {
    let (status, body) = predict_with_answer("age", json!("abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().contains("age"));

    // Categorical answers are the choice words, not 0/1 flags.
    let (status, body) = predict_with_answer("prevalentHyp", json!(1)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap_or_default().contains("prevalentHyp"));
}

#[tokio::test]
async fn test_predict_inference_failure_is_server_error() {
    let artifacts = TempDir::new().expect("Temp dir");
    for entry in std::fs::read_dir("models/web").expect("Read dir") {
        let entry = entry.expect("Entry");
        std::fs::copy(entry.path(), artifacts.path().join(entry.file_name())).expect("Copy");
    }
    let model = json!({
        "kind": "logistic_regression",
        "coefficients": vec![1.7e308_f64; 10],
        "intercept": 0.0,
    });
    std::fs::write(artifacts.path().join("model.json"), model.to_string()).expect("Write");

    let (app, _dir) = app_with(artifacts.path(), false);
    let response = app
        .oneshot(post_json("/predict", full_answers().to_string()))
        .await
        .expect("Response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_str(&body_text(response).await).expect("JSON");
    assert_eq!(
        body["error"].as_str(),
        Some("Inference failed: decision value is not finite")
    );
}

#[tokio::test]
async fn test_predict_malformed_body_is_bad_request() {
    let (app, _dir) = app();
    let response = app
        .oneshot(post_json("/predict", "{\"answers\": [".to_string()))
        .await
        .expect("Response");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_text(response).await).expect("JSON");
    assert!(!body["error"].as_str().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_registration_then_login() {
    let (app, dir) = app();

    let response = app
        .clone()
        .oneshot(post_form(
            "/registration",
            "fullname=Ada+Lovelace&username=ada&password=secret",
        ))
        .await
        .expect("Response");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/login");

    let stored = std::fs::read_to_string(dir.path().join("users.json")).expect("Registry");
    assert!(stored.contains("\"username\": \"ada\""));

    let response = app
        .clone()
        .oneshot(post_form("/login", "username=ada&password=secret"))
        .await
        .expect("Response");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/index");

    let response = app
        .oneshot(post_form("/login", "username=ada&password=wrong"))
        .await
        .expect("Response");
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("Invalid credentials. Please try again."));
}

#[tokio::test]
async fn test_duplicate_registration_rerenders_form() {
    let (app, _dir) = app();
    let form = "fullname=Ada&username=ada&password=secret";

    let first = app
        .clone()
        .oneshot(post_form("/registration", form))
        .await
        .expect("Response");
    assert!(first.status().is_redirection());

    let second = app
        .oneshot(post_form("/registration", form))
        .await
        .expect("Response");
    assert_eq!(second.status(), StatusCode::OK);
    assert!(body_text(second)
        .await
        .contains("Username already exists. Please try a different one."));
}

#[tokio::test]
async fn test_index_submit_redirects_to_predict() {
    let (app, _dir) = app();
    let response = app
        .oneshot(post_form("/index", ""))
        .await
        .expect("Response");
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/predict");
}

#[tokio::test]
async fn test_static_pages() {
    let (app, _dir) = app();
    for uri in ["/", "/login", "/registration", "/index", "/book"] {
        let response = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).expect("Request"))
            .await
            .expect("Response");
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert!(body_text(response).await.starts_with("<!DOCTYPE html>"));
    }
}
