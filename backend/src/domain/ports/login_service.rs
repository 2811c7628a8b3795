//! Driving port for secret-code login.
//!
//! Inbound adapters call this port to exchange a secret code for the owning
//! user record without knowing which record store backs it.

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Return the user holding `secret_code`.
    ///
    /// Fails with [`crate::domain::ErrorCode::Unauthorized`] when no user
    /// holds that secret. There is no lockout or rate limiting.
    async fn login(&self, secret_code: &str) -> Result<User, Error>;
}
