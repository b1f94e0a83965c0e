//! Tests for the error payload formatting and trace propagation.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;
use uuid::Uuid;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn base_error() -> Error {
    Error::invalid_request("bad")
}

#[rstest]
fn invalid_request_constructor_sets_code(base_error: Error) {
    assert_eq!(base_error.code(), ErrorCode::InvalidRequest);
    assert_eq!(base_error.message(), "bad");
}

#[rstest]
fn try_new_rejects_empty_messages() {
    let result = Error::try_new(ErrorCode::InvalidRequest, "   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyMessage)));
}

#[rstest]
fn new_substitutes_blank_messages() {
    let err = Error::new(ErrorCode::NotFound, "  ");
    assert_eq!(err.message(), "not found");
}

#[rstest]
fn try_with_trace_id_rejects_empty_values(base_error: Error) {
    let result = base_error.try_with_trace_id("   ");
    assert!(matches!(result, Err(ErrorValidationError::EmptyTraceId)));
}

#[rstest]
fn trace_id_is_none_out_of_scope() {
    let error = Error::internal("boom");
    assert!(error.trace_id().is_none());
}

#[tokio::test]
async fn new_captures_trace_id_in_scope() {
    let trace_id = TraceId::from_uuid(Uuid::nil());
    let error = TraceId::scope(trace_id, async { Error::conflict("duplicate sku") }).await;
    assert_eq!(error.trace_id(), Some(TRACE_ID));
}

#[rstest]
fn serialises_with_error_key() {
    let error = Error::invalid_request("insufficient stock")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"available": 2}));

    let value = serde_json::to_value(&error).expect("serialise error");
    assert_eq!(
        value,
        json!({
            "error": "insufficient stock",
            "code": "invalid_request",
            "details": {"available": 2},
            "traceId": TRACE_ID,
        })
    );
}

#[rstest]
fn deserialises_from_payload() {
    let payload = json!({"error": "product not found", "code": "not_found"});
    let error: Error = serde_json::from_value(payload).expect("deserialise error");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "product not found");
    assert!(error.trace_id().is_none());
}

#[rstest]
fn deserialise_rejects_blank_message() {
    let payload = json!({"error": " ", "code": "conflict"});
    let result = serde_json::from_value::<Error>(payload);
    assert!(result.is_err());
}
