//! Status and body assertions for handler responses.
//!
//! These panic like `assert_eq!`, pointing at the caller.

use reqwest::StatusCode;
use serde_json::Value;

#[track_caller]
pub fn assert_status(actual: StatusCode, expected: StatusCode) {
    assert_eq!(
        actual, expected,
        "unexpected status: wanted {expected} but got {actual}"
    );
}

/// Compares two JSON documents by value, ignoring whitespace and key order.
#[track_caller]
pub fn assert_json_eq(actual: impl AsRef<[u8]>, expected: impl AsRef<[u8]>) {
    let actual = parse(actual.as_ref(), "actual");
    let expected = parse(expected.as_ref(), "expected");
    assert_eq!(actual, expected, "JSON documents differ");
}

/// Compares a body against a JSON value built in the test.
#[track_caller]
pub fn assert_json_body(body: impl AsRef<[u8]>, expected: &Value) {
    let actual = parse(body.as_ref(), "body");
    assert_eq!(&actual, expected, "unexpected JSON body");
}

#[track_caller]
fn parse(bytes: &[u8], what: &str) -> Value {
    match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(err) => panic!(
            "{what} is not valid JSON ({err}): {}",
            String::from_utf8_lossy(bytes)
        ),
    }
}
