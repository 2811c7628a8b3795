//! Driving port for complaint reads.

use async_trait::async_trait;

use crate::domain::{AdminComplaintSummary, Complaint, Error};

/// Domain use-case port for listing and viewing complaints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintQuery: Send + Sync {
    /// Complaints owned by the caller, in submission order.
    async fn user_complaints(&self, secret_code: &str) -> Result<Vec<Complaint>, Error>;

    /// Every complaint whose owner still resolves, with the owner's name.
    async fn admin_complaints(&self) -> Result<Vec<AdminComplaintSummary>, Error>;

    /// A single complaint owned by the caller.
    ///
    /// Checks run in a fixed order: unknown complaint id first, then an
    /// unknown secret, then ownership.
    async fn view(&self, secret_code: &str, complaint_id: &str) -> Result<Complaint, Error>;
}
