//! Application-level error detection
//!
//! The upstream API reports bad keys, bad selections and its own rate
//! limiting as HTTP 200 with a body of `{"error": {"code": N, "error": "..."}}`.

use serde_json::Value;

use tornlink_core::{ApiError, Result};

/// Reject payloads that carry an embedded `error` object
pub fn check_envelope(value: Value) -> Result<Value> {
    if let Some(error) = value.get("error") {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(-1);
        let message = error
            .get("error")
            .and_then(Value::as_str)
            .or_else(|| error.as_str())
            .unwrap_or("unknown error")
            .to_string();
        return Err(ApiError::Upstream { code, message });
    }

    if !value.is_object() {
        return Err(ApiError::Malformed("expected a JSON object".to_string()));
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_passes_plain_object() {
        let value = json!({"player_id": 1});
        assert_eq!(check_envelope(value.clone()), Ok(value));
    }

    #[test]
    fn test_embedded_error() {
        let value = json!({"error": {"code": 2, "error": "Incorrect key"}});
        assert_eq!(
            check_envelope(value),
            Err(ApiError::Upstream {
                code: 2,
                message: "Incorrect key".to_string()
            })
        );
    }

    #[test]
    fn test_bare_string_error() {
        let value = json!({"error": "Too many requests"});
        assert_eq!(
            check_envelope(value),
            Err(ApiError::Upstream {
                code: -1,
                message: "Too many requests".to_string()
            })
        );
    }

    #[test]
    fn test_non_object_is_malformed() {
        assert!(matches!(
            check_envelope(json!([1, 2, 3])),
            Err(ApiError::Malformed(_))
        ));
    }
}
