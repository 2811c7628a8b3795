//! Tests for HTTP error mapping.

use super::*;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn partial_submission_case(expected_trace_id: String) -> Error {
    Error::internal("complaint 00000001 was stored but the owner's list was not updated")
        .with_trace_id(expected_trace_id)
        .with_details(json!({ "stage": "append_complaint_id", "complaintId": "00000001" }))
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("who"), StatusCode::UNAUTHORIZED)]
#[case(Error::permission_denied("nope"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::already_exists("dup"), StatusCode::CONFLICT)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

async fn decode_response(error: &Error, expected_trace_id: Option<&str>) -> Error {
    let response = ResponseError::error_response(error);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("header is ASCII").to_owned());
    assert_eq!(header.as_deref(), expected_trace_id);

    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error JSON deserialises")
}

#[rstest]
#[actix_web::test]
async fn internal_errors_hide_message_but_keep_details(
    #[from(partial_submission_case)] error: Error,
    expected_trace_id: String,
) {
    let payload = decode_response(&error, Some(expected_trace_id.as_str())).await;
    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), REDACTED_INTERNAL_MESSAGE);
    assert_eq!(payload.trace_id(), Some(expected_trace_id.as_str()));
    assert_eq!(
        payload.details(),
        Some(&json!({ "stage": "append_complaint_id", "complaintId": "00000001" }))
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_pass_through(expected_trace_id: String) {
    let error = Error::permission_denied("You are not the owner of this complaint")
        .with_trace_id(expected_trace_id.clone());
    let payload = decode_response(&error, Some(expected_trace_id.as_str())).await;
    assert_eq!(payload, error);
}

#[rstest]
#[actix_web::test]
async fn error_without_trace_id_omits_header() {
    let error = Error::not_found("Complaint not found");
    let payload = decode_response(&error, None).await;
    assert_eq!(payload.trace_id(), None);
    assert_eq!(payload.message(), "Complaint not found");
}

#[test]
fn from_actix_error_is_redacted_internal_error() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();
    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), REDACTED_INTERNAL_MESSAGE);
    assert_eq!(err.details(), None);
}
