//! services/api/src/web/mod.rs
//!
//! Module wiring for the HTTP layer, the router, and the single place where
//! core errors become HTTP responses.

pub mod auth;
pub mod rest;
pub mod state;

use axum::{
    extract::{DefaultBodyLimit, Request},
    http::StatusCode,
    middleware::{self as axum_middleware, Next},
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use court_summarizer_core::ports::CoreError;
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir};
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::adapters::blob::PUBLIC_PREFIX;
use crate::web::state::AppState;

/// The short human-readable body every non-2xx response carries.
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

pub(crate) type HandlerError = (StatusCode, Json<MessageResponse>);

/// Translates a core error into the response taxonomy.
///
/// Storage failures are logged with the operation name and answered with the
/// caller-facing `server_message` so internals never leak; the other classes
/// carry their own message.
pub(crate) fn core_error_response(
    operation: &str,
    server_message: &str,
    err: CoreError,
) -> HandlerError {
    let (status, message) = match &err {
        CoreError::Validation(m) => (StatusCode::BAD_REQUEST, m.clone()),
        CoreError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
        CoreError::InvalidCredentials => (StatusCode::UNAUTHORIZED, err.to_string()),
        CoreError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
        CoreError::Storage(_) => {
            error!(operation, error = %err, "request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, server_message.to_string())
        }
    };
    (status, Json(MessageResponse { message }))
}

/// Logs every request at debug before it reaches a handler.
async fn log_request(req: Request, next: Next) -> Response {
    debug!(method = %req.method(), path = %req.uri().path(), "incoming request");
    next.run(req).await
}

/// Builds the application router. Shared by the `api` binary and the
/// integration tests.
pub fn build_router(state: Arc<AppState>) -> Router {
    let max_upload_bytes = state.config.max_upload_bytes;
    let uploads_dir = state.config.uploads_dir.clone();

    Router::new()
        .route("/signup", post(auth::signup_handler))
        .route("/login", post(auth::login_handler))
        .route("/user", get(auth::get_user_handler))
        .route("/summaries/save", post(rest::save_summary_handler))
        .route(
            "/summaries/save-with-file",
            post(rest::save_summary_with_file_handler),
        )
        .route(
            "/summaries/user/{email}",
            get(rest::list_user_summaries_handler),
        )
        .route(
            "/summaries/{id}",
            get(rest::get_summary_handler).delete(rest::delete_summary_handler),
        )
        .nest_service(PUBLIC_PREFIX, ServeDir::new(&uploads_dir))
        .layer(axum_middleware::from_fn(log_request))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
