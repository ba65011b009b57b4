//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user signup, login, and profile lookup.
//!
//! Credential verification only: there is no session or token issuance here,
//! the client keeps track of who is logged in.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::web::state::AppState;
use crate::web::{core_error_response, HandlerError, MessageResponse};
use court_summarizer_core::domain::UserProfile;

//=========================================================================================
// Request/Response Types
//=========================================================================================

// Fields are optional at the serde level so a missing one reaches the auth
// service and comes back as the documented 400, not as a deserialize reject.
#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub occupation: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize)]
pub struct UserQuery {
    pub email: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub name: String,
    pub email: String,
    pub occupation: String,
}

impl From<UserProfile> for UserResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            name: profile.name,
            email: profile.email,
            occupation: profile.occupation,
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub user: UserResponse,
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /signup - Register a new user account
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User registered", body = MessageResponse),
        (status = 400, description = "Missing fields", body = MessageResponse),
        (status = 409, description = "Email already registered", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    state
        .auth
        .signup(
            req.name.as_deref().unwrap_or(""),
            req.email.as_deref().unwrap_or(""),
            req.password.as_deref().unwrap_or(""),
            req.occupation.as_deref().unwrap_or(""),
        )
        .await
        .map_err(|e| core_error_response("signup", "Server error during signup.", e))?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "User registered successfully.".to_string(),
        }),
    ))
}

/// POST /login - Verify credentials and return the profile
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Missing fields", body = MessageResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let profile = state
        .auth
        .login(
            req.email.as_deref().unwrap_or(""),
            req.password.as_deref().unwrap_or(""),
        )
        .await
        .map_err(|e| core_error_response("login", "Server error during login.", e))?;

    Ok(Json(LoginResponse {
        message: "Login successful.".to_string(),
        user: profile.into(),
    }))
}

/// GET /user?email= - Look up profile fields by email
///
/// Used by the frontend to backfill profile fields for its locally stored
/// identity.
#[utoipa::path(
    get,
    path = "/user",
    params(("email" = String, Query, description = "Registered email address")),
    responses(
        (status = 200, description = "Profile found", body = UserResponse),
        (status = 400, description = "Missing email parameter", body = MessageResponse),
        (status = 404, description = "No such user", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn get_user_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<UserQuery>,
) -> Result<Json<UserResponse>, HandlerError> {
    let email = query.email.filter(|e| !e.is_empty()).ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse {
                message: "Email query param required.".to_string(),
            }),
        )
    })?;

    let profile = state
        .auth
        .lookup_profile(&email)
        .await
        .map_err(|e| core_error_response("get_user", "Server error fetching user.", e))?;

    Ok(Json(profile.into()))
}
