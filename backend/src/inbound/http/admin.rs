//! Admin handlers.
//!
//! Guarded by [`AdminAccess`]: when an admin token is configured, callers
//! present it in the `X-Admin-Token` header.
//!
//! ```text
//! GET /api/v1/admin/complaints
//! POST /api/v1/admin/complaints/{id}/resolve
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AdminComplaintSummary, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AdminAccess;
use crate::inbound::http::state::HttpState;

/// Confirmation payload for resolve requests.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ResolveResponse {
    #[schema(example = "Complaint marked as resolved")]
    pub message: String,
}

/// List every complaint with its owner's name.
#[utoipa::path(
    get,
    path = "/api/v1/admin/complaints",
    responses(
        (status = 200, description = "All complaints", body = [AdminComplaintSummary]),
        (status = 401, description = "Admin token missing", body = Error),
        (status = 403, description = "Admin token rejected", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "listAllComplaints",
    security(("AdminToken" = []))
)]
#[get("/admin/complaints")]
pub async fn list_all_complaints(
    state: web::Data<HttpState>,
    _admin: AdminAccess,
) -> ApiResult<web::Json<Vec<AdminComplaintSummary>>> {
    let summaries = state.complaints_query.admin_complaints().await?;
    Ok(web::Json(summaries))
}

/// Mark a complaint resolved. Repeating the call is harmless.
#[utoipa::path(
    post,
    path = "/api/v1/admin/complaints/{id}/resolve",
    params(("id" = String, Path, description = "Complaint identifier")),
    responses(
        (status = 200, description = "Complaint resolved", body = ResolveResponse),
        (status = 401, description = "Admin token missing", body = Error),
        (status = 403, description = "Admin token rejected", body = Error),
        (status = 404, description = "Complaint not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["admin"],
    operation_id = "resolveComplaint",
    security(("AdminToken" = []))
)]
#[post("/admin/complaints/{id}/resolve")]
pub async fn resolve_complaint(
    state: web::Data<HttpState>,
    _admin: AdminAccess,
    path: web::Path<String>,
) -> ApiResult<web::Json<ResolveResponse>> {
    let message = state.complaints.resolve(&path.into_inner()).await?;
    Ok(web::Json(ResolveResponse { message }))
}
