//! Request extractors for caller credentials.
//!
//! [`SecretCode`] pulls the caller's secret from `Authorization: Bearer` or,
//! failing that, the `secretCode` query parameter. It never rejects a
//! request: a missing secret reaches the domain as an empty string so the
//! portal service decides the outcome and its check ordering holds.
//!
//! [`AdminAccess`] enforces the optional admin token on admin routes.

use actix_web::dev::Payload;
use actix_web::http::header::{AUTHORIZATION, HeaderMap};
use actix_web::{FromRequest, HttpRequest, web};
use futures_util::future::{Ready, ready};
use serde::Deserialize;
use tracing::warn;
use zeroize::Zeroizing;

use crate::domain::Error;

use super::state::HttpState;

/// Header carrying the admin token.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SecretCodeQuery {
    secret_code: Option<String>,
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_owned())
}

/// Caller secret extracted from the request.
pub struct SecretCode(Zeroizing<String>);

impl SecretCode {
    /// The presented secret, possibly empty. Never log it.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    fn from_request_parts(req: &HttpRequest) -> Self {
        let secret = bearer_token(req.headers())
            .or_else(|| {
                web::Query::<SecretCodeQuery>::from_query(req.query_string())
                    .ok()
                    .and_then(|query| query.into_inner().secret_code)
            })
            .unwrap_or_default();
        Self(Zeroizing::new(secret))
    }
}

impl FromRequest for SecretCode {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(Self::from_request_parts(req)))
    }
}

/// Proof that the caller passed the admin gate.
#[derive(Debug)]
pub struct AdminAccess;

impl AdminAccess {
    fn check(req: &HttpRequest) -> Result<Self, Error> {
        let Some(state) = req.app_data::<web::Data<HttpState>>() else {
            return Err(Error::internal("http state missing from app data"));
        };
        let Some(expected) = state.admin_token.as_ref() else {
            return Ok(Self);
        };
        let Some(presented) = req
            .headers()
            .get(ADMIN_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok())
        else {
            return Err(Error::unauthorized("Admin token required"));
        };
        if expected.matches(presented) {
            Ok(Self)
        } else {
            warn!(path = req.path(), "rejected admin request with wrong token");
            Err(Error::permission_denied("Invalid admin token"))
        }
    }
}

impl FromRequest for AdminAccess {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::check(req))
    }
}
