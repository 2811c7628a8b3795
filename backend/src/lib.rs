//! Complaint portal backend.
//!
//! Users register and receive a secret code, submit complaints under it, and
//! an operator lists and resolves complaints across all users. The domain
//! lives in [`domain`]; [`inbound`] and [`outbound`] hold the adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
