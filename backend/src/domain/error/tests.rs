//! Tests for domain error construction and serialisation.

use super::*;
use rstest::rstest;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[rstest]
#[case::invalid(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
#[case::unauthorized(Error::unauthorized("login required"), ErrorCode::Unauthorized)]
#[case::forbidden(Error::forbidden("nope"), ErrorCode::Forbidden)]
#[case::not_found(Error::not_found("missing"), ErrorCode::NotFound)]
#[case::conflict(Error::conflict("taken"), ErrorCode::Conflict)]
#[case::unavailable(Error::service_unavailable("db down"), ErrorCode::ServiceUnavailable)]
#[case::internal(Error::internal("boom"), ErrorCode::InternalError)]
fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
    assert_eq!(error.code(), expected);
}

#[rstest]
fn new_returns_none_when_trace_id_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id: TraceId = TRACE_ID.parse().expect("valid uuid");
    let error = TraceId::scope(trace_id, async { Error::not_found("missing") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn serialises_codes_in_snake_case() {
    let error = Error::service_unavailable("db down").with_trace_id("abc");
    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(value["code"], "service_unavailable");
    assert_eq!(value["traceId"], "abc");
    assert!(value.get("details").is_none());
}

#[rstest]
fn field_errors_become_invalid_requests_with_details() {
    let error: Error = FieldError::new("age", "out_of_range", "age must be at most 150").into();
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "age must be at most 150");
    let details = error.details().expect("details present");
    assert_eq!(details["field"], "age");
    assert_eq!(details["code"], "out_of_range");
}
