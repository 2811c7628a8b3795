//! Complaint handlers for authenticated users.
//!
//! The caller's secret travels as `Authorization: Bearer <secret>` or the
//! `secretCode` query parameter.
//!
//! ```text
//! POST /api/v1/complaints {"title":"Leak","summary":"pipe","severity":2}
//! GET /api/v1/complaints
//! GET /api/v1/complaints/{id}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Complaint, ComplaintDraft, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::SecretCode;
use crate::inbound::http::state::HttpState;

/// Complaint submission body. Missing text fields count as empty.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitComplaintRequest {
    #[serde(default)]
    #[schema(example = "Leak")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "pipe")]
    pub summary: String,
    #[serde(default)]
    #[schema(example = 2)]
    pub severity: i32,
}

impl From<SubmitComplaintRequest> for ComplaintDraft {
    fn from(value: SubmitComplaintRequest) -> Self {
        Self {
            title: value.title,
            summary: value.summary,
            severity: value.severity,
        }
    }
}

/// File a complaint as the caller.
#[utoipa::path(
    post,
    path = "/api/v1/complaints",
    request_body = SubmitComplaintRequest,
    params(("secretCode" = Option<String>, Query, description = "Fallback for the bearer secret")),
    responses(
        (status = 201, description = "Complaint stored", body = Complaint),
        (status = 401, description = "Invalid secret code", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "submitComplaint",
    security(("SecretCode" = []))
)]
#[post("/complaints")]
pub async fn submit_complaint(
    state: web::Data<HttpState>,
    secret: SecretCode,
    payload: web::Json<SubmitComplaintRequest>,
) -> ApiResult<HttpResponse> {
    let complaint = state
        .complaints
        .submit(secret.expose(), payload.into_inner().into())
        .await?;
    Ok(HttpResponse::Created().json(complaint))
}

/// List the caller's complaints in submission order.
#[utoipa::path(
    get,
    path = "/api/v1/complaints",
    params(("secretCode" = Option<String>, Query, description = "Fallback for the bearer secret")),
    responses(
        (status = 200, description = "Caller's complaints", body = [Complaint]),
        (status = 401, description = "Invalid secret code", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "listComplaints",
    security(("SecretCode" = []))
)]
#[get("/complaints")]
pub async fn list_complaints(
    state: web::Data<HttpState>,
    secret: SecretCode,
) -> ApiResult<web::Json<Vec<Complaint>>> {
    let complaints = state
        .complaints_query
        .user_complaints(secret.expose())
        .await?;
    Ok(web::Json(complaints))
}

/// Fetch one of the caller's complaints.
///
/// An unknown id yields 404 before the secret is checked.
#[utoipa::path(
    get,
    path = "/api/v1/complaints/{id}",
    params(
        ("id" = String, Path, description = "Complaint identifier"),
        ("secretCode" = Option<String>, Query, description = "Fallback for the bearer secret")
    ),
    responses(
        (status = 200, description = "Complaint", body = Complaint),
        (status = 401, description = "Invalid secret code", body = Error),
        (status = 403, description = "Caller does not own the complaint", body = Error),
        (status = 404, description = "Complaint not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "viewComplaint",
    security(("SecretCode" = []))
)]
#[get("/complaints/{id}")]
pub async fn view_complaint(
    state: web::Data<HttpState>,
    secret: SecretCode,
    path: web::Path<String>,
) -> ApiResult<web::Json<Complaint>> {
    let complaint = state
        .complaints_query
        .view(secret.expose(), &path.into_inner())
        .await?;
    Ok(web::Json(complaint))
}
