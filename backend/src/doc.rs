//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint, the domain schemas they return,
//! and the two security schemes: the caller's secret code as a bearer token
//! and the admin token header. Served by Swagger UI in debug builds and
//! printed by the `openapi-dump` binary.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{AdminComplaintSummary, Complaint, Error, ErrorCode, User};
use crate::inbound::http::admin::ResolveResponse;
use crate::inbound::http::complaints::SubmitComplaintRequest;
use crate::inbound::http::users::{LoginRequest, RegisterRequest};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SecretCode",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .description(Some(
                        "Secret code issued by POST /api/v1/register. The secretCode query \
                         parameter is accepted as a fallback.",
                    ))
                    .build(),
            ),
        );
        components.add_security_scheme(
            "AdminToken",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "X-Admin-Token",
                "Required on admin routes when the server has an admin token configured.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Complaint portal API",
        description = "Register, log in with a secret code, file and track complaints."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::complaints::submit_complaint,
        crate::inbound::http::complaints::list_complaints,
        crate::inbound::http::complaints::view_complaint,
        crate::inbound::http::admin::list_all_complaints,
        crate::inbound::http::admin::resolve_complaint,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        User,
        Complaint,
        AdminComplaintSummary,
        Error,
        ErrorCode,
        RegisterRequest,
        LoginRequest,
        SubmitComplaintRequest,
        ResolveResponse,
    )),
    tags(
        (name = "users", description = "Registration and login"),
        (name = "complaints", description = "Complaints owned by the caller"),
        (name = "admin", description = "Portal-wide complaint management"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn object_has_field(schema: &RefOr<Schema>, field: &str) -> bool {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj.properties.contains_key(field),
            _ => false,
        }
    }

    #[rstest]
    #[case("User", "secretCode")]
    #[case("User", "complaintIds")]
    #[case("Complaint", "userId")]
    #[case("AdminComplaintSummary", "ownerName")]
    #[case("Error", "traceId")]
    fn schemas_use_camel_case_fields(#[case] schema: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let found = schemas
            .get(schema)
            .unwrap_or_else(|| panic!("{schema} schema registered"));
        assert!(object_has_field(found, field), "{schema} lacks {field}");
    }

    #[rstest]
    #[case("/api/v1/register")]
    #[case("/api/v1/login")]
    #[case("/api/v1/complaints")]
    #[case("/api/v1/complaints/{id}")]
    #[case("/api/v1/admin/complaints")]
    #[case("/api/v1/admin/complaints/{id}/resolve")]
    #[case("/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "{path} missing");
    }

    #[test]
    fn security_schemes_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SecretCode"));
        assert!(components.security_schemes.contains_key("AdminToken"));
    }
}
