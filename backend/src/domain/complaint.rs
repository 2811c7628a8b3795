//! Complaint data model and the admin listing projection.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::user::{UserId, UserName};

/// Validation errors raised by complaint types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplaintValidationError {
    EmptyId,
    InvalidId,
}

impl fmt::Display for ComplaintValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "complaint id must not be empty"),
            Self::InvalidId => write!(f, "complaint id must not contain whitespace"),
        }
    }
}

impl std::error::Error for ComplaintValidationError {}

/// Opaque complaint identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComplaintId(String);

impl ComplaintId {
    /// Validate a complaint identifier: non-empty, no whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, ComplaintValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ComplaintValidationError::EmptyId);
        }
        if id.chars().any(char::is_whitespace) {
            return Err(ComplaintValidationError::InvalidId);
        }
        Ok(Self(id))
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for ComplaintId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ComplaintId> for String {
    fn from(value: ComplaintId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ComplaintId {
    type Error = ComplaintValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Caller-supplied complaint content prior to submission.
///
/// Title and summary are free text; empty values are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplaintDraft {
    pub title: String,
    pub summary: String,
    pub severity: i32,
}

/// A submitted complaint.
///
/// ## Invariants
/// - `user_id` referenced an existing user when the complaint was created.
/// - `resolved` only ever transitions from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    #[schema(value_type = String, example = "c0ffee00")]
    id: ComplaintId,
    #[schema(example = "Leak")]
    title: String,
    #[schema(example = "pipe")]
    summary: String,
    #[schema(example = 2)]
    severity: i32,
    resolved: bool,
    #[schema(value_type = String, example = "1f3a9c0e")]
    user_id: UserId,
}

impl Complaint {
    /// New unresolved complaint owned by `user_id`.
    pub fn submit(id: ComplaintId, user_id: UserId, draft: ComplaintDraft) -> Self {
        let ComplaintDraft {
            title,
            summary,
            severity,
        } = draft;
        Self {
            id,
            title,
            summary,
            severity,
            resolved: false,
            user_id,
        }
    }

    /// Rehydrate a complaint from storage.
    pub fn from_parts(
        id: ComplaintId,
        user_id: UserId,
        draft: ComplaintDraft,
        resolved: bool,
    ) -> Self {
        let mut complaint = Self::submit(id, user_id, draft);
        complaint.resolved = resolved;
        complaint
    }

    pub fn id(&self) -> &ComplaintId {
        &self.id
    }

    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    pub fn summary(&self) -> &str {
        self.summary.as_str()
    }

    /// Severity as submitted; the range is not validated.
    pub fn severity(&self) -> i32 {
        self.severity
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Whether `user_id` submitted this complaint.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }

    /// Mark resolved. Calling this on a resolved complaint is a no-op.
    pub fn resolve(&mut self) {
        self.resolved = true;
    }
}

/// Row of the admin listing: the complaint title and its owner's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminComplaintSummary {
    #[schema(example = "Leak")]
    pub title: String,
    #[schema(value_type = String, example = "Alice")]
    pub owner_name: UserName,
}
