//! HTTP inbound adapter exposing the portal's REST endpoints.

pub mod admin;
pub mod auth;
pub mod complaints;
pub mod error;
pub mod health;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

use actix_web::{HttpRequest, error::JsonPayloadError, web};
use tracing::debug;

use crate::domain::Error;

pub use error::ApiResult;

/// Prefix shared by every API route.
pub const API_PREFIX: &str = "/api/v1";

fn json_error_handler(err: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, path = req.path(), "rejected request body");
    Error::invalid_request("Request body must be valid JSON")
        .with_details(serde_json::json!({ "reason": err.to_string() }))
        .into()
}

/// JSON extractor settings mapping body errors to `invalid_request`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Register the `/api/v1` scope with every portal endpoint.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use complaint_portal::inbound::http::configure_api;
///
/// let app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(API_PREFIX)
            .app_data(json_config())
            .service(users::register)
            .service(users::login)
            .service(complaints::submit_complaint)
            .service(complaints::list_complaints)
            .service(complaints::view_complaint)
            .service(admin::list_all_complaints)
            .service(admin::resolve_complaint),
    );
}
