//! Driving port for complaint mutations.

use async_trait::async_trait;

use crate::domain::{Complaint, ComplaintDraft, Error};

/// Confirmation returned by [`ComplaintCommand::resolve`].
pub const COMPLAINT_RESOLVED_MESSAGE: &str = "Complaint marked as resolved";

/// Domain use-case port for submitting and resolving complaints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintCommand: Send + Sync {
    /// File a complaint on behalf of the user holding `secret_code`.
    async fn submit(&self, secret_code: &str, draft: ComplaintDraft) -> Result<Complaint, Error>;

    /// Mark a complaint resolved. Repeating the call succeeds unchanged.
    ///
    /// Performs no caller check; admin gating belongs to the transport.
    async fn resolve(&self, complaint_id: &str) -> Result<String, Error>;
}
