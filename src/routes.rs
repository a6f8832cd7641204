// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{account, admin, auth, exam, questions, results},
    state::AppState,
    utils::jwt::{admin_middleware, auth_middleware},
};

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Assembles the main application router.
///
/// * Merges all sub-routers (users, questions, exam, results, admin).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (Database Pool + Config).
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    let user_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        // Protected account routes
        .merge(
            Router::new()
                .route("/me", get(account::get_me))
                .route("/profile", put(account::update_profile))
                .route("/change-password", put(account::change_password))
                .route("/settings", put(account::update_settings))
                .route("/delete-account", delete(account::delete_account))
                .route("/export-data", get(account::export_data))
                .route("/purchase-package", post(account::purchase_package))
                .layer(middleware::from_fn_with_state(state.clone(), auth_middleware)),
        );

    let question_routes = Router::new()
        .route("/", get(questions::list_questions))
        .route("/count", get(questions::count_questions))
        .route("/random-question", get(questions::random_question))
        .route("/{id}/explanation", get(questions::get_explanation));

    // Guests get the demo exam; a token switches on mastery-aware composition.
    let exam_routes = Router::new().route("/exam-questions", get(exam::get_exam_questions));

    let result_routes = Router::new()
        .route("/save", post(results::save_result))
        .route("/stats", get(results::get_stats))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}", delete(admin::delete_user))
        .route("/questions", post(admin::create_question))
        .route("/questions/import", post(admin::import_questions))
        .route("/questions/{id}", delete(admin::delete_question))
        // Double middleware protection: Auth first, then Admin check
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/users", user_routes)
        .nest("/api/questions", question_routes)
        .nest("/api/test", exam_routes)
        .nest("/api/test-results", result_routes)
        .nest("/api/admin", admin_routes)
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
