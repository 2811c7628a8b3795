//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed entities used by the inbound and outbound
//! adapters, and the portal service that owns the authorization rules. Types
//! document their invariants and serialisation contracts in their Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Complaint, AdminComplaintSummary: records and projections.
//! - ComplaintPortalService: implementation of every driving port.

pub mod complaint;
pub mod complaint_portal_service;
pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::complaint::{
    AdminComplaintSummary, Complaint, ComplaintDraft, ComplaintId, ComplaintValidationError,
};
pub use self::complaint_portal_service::{ComplaintPortalService, MAX_ALLOCATION_ATTEMPTS};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;
pub use self::user::{EmailAddress, SecretCode, User, UserId, UserName, UserValidationError};
