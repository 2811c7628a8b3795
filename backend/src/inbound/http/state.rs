//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend only on
//! domain ports and stay testable without I/O.

use std::fmt;
use std::sync::Arc;

use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::domain::ports::{ComplaintCommand, ComplaintQuery, LoginService, UserAccounts};

/// Parameter object bundling the driving ports used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub accounts: Arc<dyn UserAccounts>,
    pub login: Arc<dyn LoginService>,
    pub complaints: Arc<dyn ComplaintCommand>,
    pub complaints_query: Arc<dyn ComplaintQuery>,
}

impl HttpStatePorts {
    /// Use one value for every port, typically the portal service.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use complaint_portal::domain::ComplaintPortalService;
    /// use complaint_portal::domain::ports::FixtureIdentityGenerator;
    /// use complaint_portal::inbound::http::state::{HttpState, HttpStatePorts};
    /// use complaint_portal::outbound::memory::InMemoryRecordStore;
    ///
    /// let service = Arc::new(ComplaintPortalService::new(
    ///     Arc::new(InMemoryRecordStore::new()),
    ///     Arc::new(FixtureIdentityGenerator::new()),
    /// ));
    /// let state = HttpState::new(HttpStatePorts::from_service(service), None);
    /// assert!(state.admin_token.is_none());
    /// ```
    pub fn from_service<T>(service: Arc<T>) -> Self
    where
        T: UserAccounts + LoginService + ComplaintCommand + ComplaintQuery + 'static,
    {
        Self {
            accounts: service.clone(),
            login: service.clone(),
            complaints: service.clone(),
            complaints_query: service,
        }
    }
}

/// Shared secret guarding the admin routes.
#[derive(Clone)]
pub struct AdminToken(Zeroizing<String>);

impl AdminToken {
    /// Wrap a configured token; blank values disable the gate.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = Zeroizing::new(token.into());
        if token.trim().is_empty() {
            None
        } else {
            Some(Self(token))
        }
    }

    /// Compare a presented token without short-circuiting on the first
    /// differing byte. Only the length can leak through timing.
    ///
    /// # Examples
    /// ```
    /// use complaint_portal::inbound::http::state::AdminToken;
    ///
    /// let token = AdminToken::new("s3cret").expect("non-blank token");
    /// assert!(token.matches("s3cret"));
    /// assert!(!token.matches("s3creT"));
    /// ```
    pub fn matches(&self, candidate: &str) -> bool {
        self.0.as_bytes().ct_eq(candidate.as_bytes()).into()
    }
}

impl PartialEq for AdminToken {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other.0.as_str())
    }
}

impl Eq for AdminToken {}

impl fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AdminToken(<redacted>)")
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn UserAccounts>,
    pub login: Arc<dyn LoginService>,
    pub complaints: Arc<dyn ComplaintCommand>,
    pub complaints_query: Arc<dyn ComplaintQuery>,
    /// `None` leaves the admin routes open.
    pub admin_token: Option<AdminToken>,
}

impl HttpState {
    /// Split the port bundle into handler-facing fields.
    pub fn new(ports: HttpStatePorts, admin_token: Option<AdminToken>) -> Self {
        let HttpStatePorts {
            accounts,
            login,
            complaints,
            complaints_query,
        } = ports;
        Self {
            accounts,
            login,
            complaints,
            complaints_query,
            admin_token,
        }
    }
}
