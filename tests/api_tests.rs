// tests/api_tests.rs

//! Routing, authentication and validation paths that reject a request
//! before it touches the database. The pool connects lazily and is never used.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use driving_theory::{
    config::Config, routes, state::AppState, utils::jwt::sign_jwt,
};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

const SECRET: &str = "test_secret_for_router_tests";

fn test_config() -> Config {
    Config {
        database_url: "postgres://nobody@127.0.0.1:1/unused".to_string(),
        jwt_secret: SECRET.to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        server_port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        admin_email: None,
        admin_password: None,
    }
}

fn app() -> Router {
    let config = test_config();
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect_lazy(&config.database_url)
        .expect("lazy pool from a well-formed URL");
    routes::create_router(AppState::new(pool, config))
}

fn token(user_id: i64, role: &str) -> String {
    sign_jwt(user_id, role, SECRET, 600).unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<serde_json::Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
}

#[tokio::test]
async fn unknown_path_is_404() {
    let response = app()
        .oneshot(request(Method::GET, "/random_path_that_does_not_exist", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn account_routes_require_token() {
    for (method, uri) in [
        (Method::GET, "/api/users/me"),
        (Method::GET, "/api/users/export-data"),
        (Method::DELETE, "/api/users/delete-account"),
        (Method::GET, "/api/test-results/stats"),
    ] {
        let response = app().oneshot(request(method, uri, None, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{}", uri);
    }
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let forged = sign_jwt(1, "admin", "some_other_secret", 600).unwrap();
    let response = app()
        .oneshot(request(Method::GET, "/api/users/me", Some(&forged), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn admin_routes_forbid_regular_users() {
    let response = app()
        .oneshot(request(
            Method::GET,
            "/api/admin/users",
            Some(&token(5, "user")),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_routes_require_token() {
    let response = app()
        .oneshot(request(Method::POST, "/api/admin/questions", None, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn admin_cannot_delete_self() {
    let response = app()
        .oneshot(request(
            Method::DELETE,
            "/api/admin/users/9",
            Some(&token(9, "admin")),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_question_with_two_correct_answers_rejected() {
    let payload = serde_json::json!({
        "number": "12",
        "content": "May you stop here?",
        "points": 2,
        "category": "B",
        "type": "basic",
        "answers": [
            {"option": "Tak", "content": "Tak", "is_correct": true},
            {"option": "Nie", "content": "Nie", "is_correct": true}
        ]
    });

    let response = app()
        .oneshot(request(
            Method::POST,
            "/api/admin/questions",
            Some(&token(1, "admin")),
            Some(payload),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_fails_validation() {
    let response = app()
        .oneshot(request(
            Method::POST,
            "/api/users/register",
            None,
            Some(serde_json::json!({"email": "not-an-email", "password": "password123"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_rejects_short_password() {
    let response = app()
        .oneshot(request(
            Method::POST,
            "/api/users/register",
            None,
            Some(serde_json::json!({"email": "kierowca@example.com", "password": "abc"})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn exam_with_invalid_token_is_rejected() {
    let response = app()
        .oneshot(request(
            Method::GET,
            "/api/test/exam-questions",
            Some("garbage"),
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_question_type_is_bad_request() {
    let response = app()
        .oneshot(request(
            Method::GET,
            "/api/questions/random-question?type=trick",
            None,
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn empty_submission_is_bad_request() {
    let response = app()
        .oneshot(request(
            Method::POST,
            "/api/test-results/save",
            Some(&token(3, "user")),
            Some(serde_json::json!({"answers": []})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn package_purchase_needs_positive_days() {
    let response = app()
        .oneshot(request(
            Method::POST,
            "/api/users/purchase-package",
            Some(&token(3, "user")),
            Some(serde_json::json!({"days": 0})),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
