//! HTTP server configuration object.

use crate::inbound::http::state::AdminToken;
use crate::outbound::persistence::DbPool;

/// Builder-style configuration for [`create_server`](super::create_server).
pub struct ServerConfig {
    pub(crate) bind_addr: (String, u16),
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) admin_token: Option<AdminToken>,
}

impl ServerConfig {
    /// In-memory storage with an open admin gate until configured otherwise.
    #[must_use]
    pub fn new(bind_addr: (String, u16)) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            admin_token: None,
        }
    }

    /// Persist records in PostgreSQL instead of process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Require `X-Admin-Token` on admin routes.
    #[must_use]
    pub fn with_admin_token(mut self, token: Option<AdminToken>) -> Self {
        self.admin_token = token;
        self
    }

    /// Host and port the listener binds to.
    #[must_use]
    pub fn bind_addr(&self) -> (&str, u16) {
        (&self.bind_addr.0, self.bind_addr.1)
    }

    /// Whether a database pool has been supplied.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.db_pool.is_some()
    }
}
