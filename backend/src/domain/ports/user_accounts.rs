//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Register a new user and issue a fresh id and secret code.
    ///
    /// Blank `name` or `email` yields `invalid_request`; an email already in
    /// use yields `already_exists`. Concurrent registrations for one email
    /// never both succeed.
    async fn register(&self, name: &str, email: &str) -> Result<User, Error>;
}
