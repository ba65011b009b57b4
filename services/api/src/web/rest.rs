//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the summary REST endpoints and the master
//! definition for the OpenAPI specification.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::web::state::AppState;
use crate::web::{core_error_response, HandlerError, MessageResponse};
use court_summarizer_core::domain::{SummaryPayload, SummaryRecord};
use court_summarizer_core::services::{FileUpload, SummarySubmission};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::get_user_handler,
        save_summary_handler,
        save_summary_with_file_handler,
        list_user_summaries_handler,
        get_summary_handler,
        delete_summary_handler,
    ),
    components(schemas(
        crate::web::auth::SignupRequest,
        crate::web::auth::LoginRequest,
        crate::web::auth::UserResponse,
        crate::web::auth::LoginResponse,
        MessageResponse,
        SaveSummaryRequest,
        SummaryResponse,
        SaveSummaryResponse,
        SummaryListResponse,
        SummaryEnvelope,
    )),
    tags(
        (name = "Court Summarizer API", description = "Persistence API for court-order summaries.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A persisted summary as it appears on the wire.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResponse {
    pub id: Uuid,
    pub user_email: String,
    pub case_name: String,
    pub original_file_name: String,
    pub summary_file_name: String,
    pub summary_data: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SummaryRecord> for SummaryResponse {
    fn from(record: SummaryRecord) -> Self {
        Self {
            id: record.id,
            user_email: record.owner_email,
            case_name: record.case_name,
            original_file_name: record.original_file_name,
            summary_file_name: record.summary_file_name,
            summary_data: record.summary_data,
            summary_path: record.blob_path,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

// Required fields are optional at the serde level so a missing one is
// answered with the documented 400 rather than a deserialize reject.
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveSummaryRequest {
    pub user_email: Option<String>,
    pub case_name: Option<String>,
    pub original_file_name: Option<String>,
    pub summary_file_name: Option<String>,
    pub summary_data: Option<Value>,
    /// A stored path from an earlier upload, passed through as-is.
    pub summary_path: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct SaveSummaryResponse {
    pub message: String,
    pub summary: SummaryResponse,
}

#[derive(Serialize, ToSchema)]
pub struct SummaryListResponse {
    pub summaries: Vec<SummaryResponse>,
    pub count: usize,
}

#[derive(Serialize, ToSchema)]
pub struct SummaryEnvelope {
    pub summary: SummaryResponse,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// POST /summaries/save - Persist a processed summary without a file upload
#[utoipa::path(
    post,
    path = "/summaries/save",
    request_body = SaveSummaryRequest,
    responses(
        (status = 201, description = "Summary saved", body = SaveSummaryResponse),
        (status = 400, description = "Required fields missing", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn save_summary_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveSummaryRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    debug!(
        user_email = ?req.user_email,
        case_name = ?req.case_name,
        "save summary request"
    );

    let record = state
        .summaries
        .submit(SummarySubmission {
            owner_email: req.user_email.unwrap_or_default(),
            case_name: req.case_name.unwrap_or_default(),
            original_file_name: req.original_file_name,
            summary_file_name: req.summary_file_name.unwrap_or_default(),
            summary_data: SummaryPayload::from_value(req.summary_data),
            blob_path: req.summary_path,
            file: None,
        })
        .await
        .map_err(|e| core_error_response("save_summary", "Server error while saving summary.", e))?;

    Ok((
        StatusCode::CREATED,
        Json(SaveSummaryResponse {
            message: "Summary saved successfully.".to_string(),
            summary: record.into(),
        }),
    ))
}

/// POST /summaries/save-with-file - Persist a summary together with its source PDF
///
/// Accepts multipart/form-data: the textual fields of [`SaveSummaryRequest`]
/// (with `summaryData` as JSON text) plus an optional `file` part. Text that
/// fails to parse as JSON is stored verbatim under a `raw` field rather than
/// failing the request.
#[utoipa::path(
    post,
    path = "/summaries/save-with-file",
    request_body(content_type = "multipart/form-data", description = "Summary fields plus source file."),
    responses(
        (status = 201, description = "Summary and file saved", body = SaveSummaryResponse),
        (status = 400, description = "Required fields missing or malformed form", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn save_summary_with_file_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    let mut user_email = None;
    let mut case_name = None;
    let mut original_file_name = None;
    let mut summary_file_name = None;
    let mut summary_data_text: Option<String> = None;
    let mut file: Option<FileUpload> = None;

    let malformed = || {
        (
            StatusCode::BAD_REQUEST,
            Json(MessageResponse {
                message: "Malformed multipart form data.".to_string(),
            }),
        )
    };

    while let Some(field) = multipart.next_field().await.map_err(|_| malformed())? {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload.pdf").to_string();
                let bytes = field.bytes().await.map_err(|_| malformed())?;
                file = Some(FileUpload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            "userEmail" => user_email = Some(field.text().await.map_err(|_| malformed())?),
            "caseName" => case_name = Some(field.text().await.map_err(|_| malformed())?),
            "originalFileName" => {
                original_file_name = Some(field.text().await.map_err(|_| malformed())?)
            }
            "summaryFileName" => {
                summary_file_name = Some(field.text().await.map_err(|_| malformed())?)
            }
            "summaryData" => summary_data_text = Some(field.text().await.map_err(|_| malformed())?),
            // Unknown parts are ignored, not rejected.
            _ => {}
        }
    }

    debug!(
        user_email = ?user_email,
        case_name = ?case_name,
        has_file = file.is_some(),
        "save summary with file request"
    );

    let summary_data = match summary_data_text {
        Some(text) => SummaryPayload::from_text(&text),
        None => SummaryPayload::from_value(None),
    };

    let record = state
        .summaries
        .submit(SummarySubmission {
            owner_email: user_email.unwrap_or_default(),
            case_name: case_name.unwrap_or_default(),
            original_file_name,
            summary_file_name: summary_file_name.unwrap_or_default(),
            summary_data,
            blob_path: None,
            file,
        })
        .await
        .map_err(|e| {
            core_error_response(
                "save_summary_with_file",
                "Server error while saving summary with file.",
                e,
            )
        })?;

    Ok((
        StatusCode::CREATED,
        Json(SaveSummaryResponse {
            message: "Summary and file saved successfully.".to_string(),
            summary: record.into(),
        }),
    ))
}

/// GET /summaries/user/{email} - All summaries belonging to one user
///
/// Returns the complete owner-scoped sequence, most recent first; any paging
/// is the client's concern.
#[utoipa::path(
    get,
    path = "/summaries/user/{email}",
    params(("email" = String, Path, description = "Owner email address")),
    responses(
        (status = 200, description = "Owner's summaries", body = SummaryListResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn list_user_summaries_handler(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<SummaryListResponse>, HandlerError> {
    let summaries = state
        .summaries
        .list_by_owner(&email)
        .await
        .map_err(|e| {
            core_error_response("list_summaries", "Server error while fetching summaries.", e)
        })?
        .into_iter()
        .map(SummaryResponse::from)
        .collect::<Vec<_>>();

    Ok(Json(SummaryListResponse {
        count: summaries.len(),
        summaries,
    }))
}

/// GET /summaries/{id} - Fetch one summary by id
///
/// No ownership check: anyone holding a valid id may fetch the record
/// (shareable-by-id).
#[utoipa::path(
    get,
    path = "/summaries/{id}",
    params(("id" = Uuid, Path, description = "Summary id")),
    responses(
        (status = 200, description = "The summary", body = SummaryEnvelope),
        (status = 404, description = "No such summary", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn get_summary_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<SummaryEnvelope>, HandlerError> {
    let record = state
        .summaries
        .get_by_id(id)
        .await
        .map_err(|e| core_error_response("get_summary", "Server error while fetching summary.", e))?;

    Ok(Json(SummaryEnvelope {
        summary: record.into(),
    }))
}

/// DELETE /summaries/{id} - Delete a summary and clean up its stored file
///
/// The record delete is authoritative; removing the uploaded file is
/// best-effort and a missing file never fails the request.
#[utoipa::path(
    delete,
    path = "/summaries/{id}",
    params(("id" = Uuid, Path, description = "Summary id")),
    responses(
        (status = 200, description = "Summary deleted", body = MessageResponse),
        (status = 404, description = "No such summary", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn delete_summary_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, HandlerError> {
    state
        .summaries
        .delete_by_id(id)
        .await
        .map_err(|e| {
            core_error_response("delete_summary", "Server error while deleting summary.", e)
        })?;

    Ok(Json(MessageResponse {
        message: "Summary deleted successfully.".to_string(),
    }))
}
