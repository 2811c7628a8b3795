//! Driven port for the shared record set.
//!
//! The [`RecordStore`] holds users and complaints keyed by identifier. It is
//! the only shared mutable resource in the system; the portal service is
//! responsible for composing its calls into atomic read-decide-write units.
//! Adapters only promise that each individual call is atomic.

use std::fmt;

use async_trait::async_trait;

use crate::domain::{Complaint, ComplaintId, EmailAddress, SecretCode, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by record store adapters.
    pub enum RecordStoreError {
        /// Backing store could not be reached.
        Connection { message: String } =>
            "record store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "record store query failed: {message}",
        /// A uniqueness constraint rejected the write.
        Conflict { field: UniqueField, message: String } =>
            "record store conflict on {field}: {message}",
        /// Field update addressed a key with no record.
        MissingRecord { collection: String, key: String } =>
            "no {collection} record with key {key}",
    }
}

/// Record field guarded by a uniqueness constraint.
///
/// # Examples
/// ```
/// use complaint_portal::domain::ports::{RecordStoreError, UniqueField};
///
/// let err = RecordStoreError::conflict(UniqueField::Email, "users_email_key violated");
/// assert_eq!(
///     err.to_string(),
///     "record store conflict on email: users_email_key violated"
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    /// Primary key of either collection.
    Id,
    Email,
    SecretCode,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Id => "id",
            Self::Email => "email",
            Self::SecretCode => "secret_code",
        })
    }
}

/// Filter applied when scanning users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserPredicate {
    All,
    /// Exact, case-sensitive email match.
    Email(EmailAddress),
    SecretCode(SecretCode),
}

impl UserPredicate {
    /// Evaluate the predicate in-process.
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::All => true,
            Self::Email(email) => user.email() == email,
            Self::SecretCode(secret) => user.secret_code() == secret,
        }
    }
}

/// Filter applied when scanning complaints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplaintPredicate {
    All,
    /// Complaints whose id is in the set. Result order is adapter-defined.
    Ids(Vec<ComplaintId>),
}

impl ComplaintPredicate {
    /// Evaluate the predicate in-process.
    pub fn matches(&self, complaint: &Complaint) -> bool {
        match self {
            Self::All => true,
            Self::Ids(ids) => ids.contains(complaint.id()),
        }
    }
}

/// Single-field mutation on a stored user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFieldUpdate {
    /// Append to `complaintIds`; an id already present is left in place.
    AppendComplaintId(ComplaintId),
}

impl UserFieldUpdate {
    /// Apply the mutation to an in-memory copy of the user.
    pub fn apply(&self, user: &mut User) {
        match self {
            Self::AppendComplaintId(id) => user.push_complaint(id.clone()),
        }
    }
}

/// Single-field mutation on a stored complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplaintFieldUpdate {
    /// Set `resolved = true`.
    Resolved,
}

impl ComplaintFieldUpdate {
    /// Apply the mutation to an in-memory copy of the complaint.
    pub fn apply(&self, complaint: &mut Complaint) {
        match self {
            Self::Resolved => complaint.resolve(),
        }
    }
}

/// Keyed storage for users and complaints.
///
/// Scans return records in insertion order. `put_*` only inserts: it reports
/// [`RecordStoreError::Conflict`] when a record with the same key exists, or
/// when another user already holds the same email or secret code. Existing
/// records change only through the `update_*` calls.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, RecordStoreError>;

    async fn put_user(&self, user: &User) -> Result<(), RecordStoreError>;

    async fn scan_users(&self, predicate: &UserPredicate) -> Result<Vec<User>, RecordStoreError>;

    async fn update_user(
        &self,
        id: &UserId,
        update: &UserFieldUpdate,
    ) -> Result<(), RecordStoreError>;

    async fn find_complaint(&self, id: &ComplaintId)
    -> Result<Option<Complaint>, RecordStoreError>;

    async fn put_complaint(&self, complaint: &Complaint) -> Result<(), RecordStoreError>;

    async fn scan_complaints(
        &self,
        predicate: &ComplaintPredicate,
    ) -> Result<Vec<Complaint>, RecordStoreError>;

    async fn update_complaint(
        &self,
        id: &ComplaintId,
        update: &ComplaintFieldUpdate,
    ) -> Result<(), RecordStoreError>;
}
