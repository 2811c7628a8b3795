//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use actix_http::Request;
use serde::de::DeserializeOwned;

use crate::domain::ComplaintPortalService;
use crate::domain::ports::FixtureIdentityGenerator;
use crate::inbound::http::configure_api;
use crate::inbound::http::state::{AdminToken, HttpState, HttpStatePorts};
use crate::outbound::memory::InMemoryRecordStore;

/// HTTP state over a fresh in-memory portal.
pub fn memory_state(admin_token: Option<AdminToken>) -> HttpState {
    let service = Arc::new(ComplaintPortalService::new(
        Arc::new(InMemoryRecordStore::new()),
        Arc::new(FixtureIdentityGenerator::new()),
    ));
    HttpState::new(HttpStatePorts::from_service(service), admin_token)
}

/// Initialise the API scope over `state`.
pub async fn init_api(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure_api),
    )
    .await
}

/// Call the service and decode the JSON body.
pub async fn call_json<S, T>(app: &S, request: Request) -> (actix_web::http::StatusCode, T)
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    T: DeserializeOwned,
{
    let response = actix_test::call_service(app, request).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&body).expect("response body is JSON");
    (status, value)
}
