//! Response envelope unwrapping and status-to-error mapping.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value;

use filedeck_core::{AppError, AppResult, ErrorKind};

/// Message used when a failed response carries no `message` field.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Request failed";

/// Parse a raw body into JSON.
///
/// Empty bodies become `null`; bodies that are not JSON are kept as a
/// JSON string so error messages can still be surfaced.
pub fn parse_body(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}

/// Strip the `{ "data": ... }` envelope when present.
pub fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// Decode a successful body into `T`.
pub fn decode<T: DeserializeOwned>(body: &str) -> AppResult<T> {
    let value = unwrap_data(parse_body(body));
    serde_json::from_value(value).map_err(|e| {
        AppError::with_source(
            ErrorKind::Serialization,
            format!("Unexpected response shape: {e}"),
            e,
        )
    })
}

/// Map a non-success response to an [`AppError`].
pub fn status_error(status: StatusCode, body: &str) -> AppError {
    if status == StatusCode::UNAUTHORIZED {
        return AppError::authentication("Unauthorized");
    }

    let message = match parse_body(body) {
        Value::Object(map) => map
            .get("message")
            .and_then(Value::as_str)
            .filter(|m| !m.is_empty())
            .map(str::to_string),
        _ => None,
    }
    .unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());

    let kind = match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
        StatusCode::FORBIDDEN => ErrorKind::Authorization,
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::CONFLICT => ErrorKind::Conflict,
        _ => ErrorKind::Remote,
    };
    AppError::new(kind, message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwraps_data_envelope() {
        let folders: Vec<String> = decode(r#"{"data":["a","b"]}"#).expect("decode");
        assert_eq!(folders, vec!["a", "b"]);
        let bare: Vec<String> = decode(r#"["c"]"#).expect("decode");
        assert_eq!(bare, vec!["c"]);
    }

    #[test]
    fn test_empty_body_is_null() {
        let unit: Option<String> = decode("").expect("decode");
        assert!(unit.is_none());
    }

    #[test]
    fn test_status_mapping() {
        let err = status_error(StatusCode::UNAUTHORIZED, r#"{"message":"expired"}"#);
        assert_eq!(err.kind, ErrorKind::Authentication);

        let err = status_error(StatusCode::CONFLICT, r#"{"message":"Cannot move a folder into itself"}"#);
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "Cannot move a folder into itself");

        let err = status_error(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(err.kind, ErrorKind::Remote);
        assert_eq!(err.message, DEFAULT_FAILURE_MESSAGE);
    }
}
