// ABOUTME: User-facing messages for failed API responses
// ABOUTME: Pulls a message out of JSON or plain-text error bodies

use reqwest::StatusCode;
use serde_json::Value;

/// Longest plain-text body shown to users verbatim
const MAX_TEXT_MESSAGE: usize = 200;

/// Message for a non-2xx response
///
/// JSON bodies yield their `message`, `error` or `errorMessage` field (or the
/// body itself if it is a JSON string). Short plain-text bodies are used as
/// is. Anything else becomes `"{status}: {reason}"`.
pub fn error_message(status: StatusCode, content_type: Option<&str>, body: Option<&str>) -> String {
    let fallback = || {
        format!(
            "{}: {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown error")
        )
    };

    let Some(body) = body else {
        return fallback();
    };

    let is_json = content_type.is_some_and(|ct| ct.contains("application/json"));
    if is_json {
        return serde_json::from_str::<Value>(body)
            .ok()
            .and_then(|value| json_message(&value))
            .unwrap_or_else(fallback);
    }

    let text = body.trim();
    if !text.is_empty() && text.chars().count() < MAX_TEXT_MESSAGE {
        text.to_string()
    } else {
        fallback()
    }
}

fn json_message(value: &Value) -> Option<String> {
    if let Value::String(s) = value {
        return non_empty(s);
    }
    ["message", "error", "errorMessage"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str).and_then(non_empty))
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

/// Friendlier wording for reservation conflicts reported by the service
pub fn reservation_error_message(message: &str) -> String {
    if message.contains("Parking space is not available") {
        "This parking space is not available for the selected time.".to_string()
    } else if message.contains("overlapping") {
        "This space is already reserved for the selected time period.".to_string()
    } else {
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON: Option<&str> = Some("application/json; charset=utf-8");

    #[test]
    fn test_json_message_fields_in_order() {
        let status = StatusCode::BAD_REQUEST;
        assert_eq!(
            error_message(status, JSON, Some(r#"{"message":"Vehicle not found","error":"x"}"#)),
            "Vehicle not found"
        );
        assert_eq!(
            error_message(status, JSON, Some(r#"{"error":"Bad plate"}"#)),
            "Bad plate"
        );
        assert_eq!(
            error_message(status, JSON, Some(r#"{"errorMessage":"Nope"}"#)),
            "Nope"
        );
        assert_eq!(error_message(status, JSON, Some(r#""just a string""#)), "just a string");
    }

    #[test]
    fn test_json_without_message_falls_back_to_status() {
        assert_eq!(
            error_message(StatusCode::CONFLICT, JSON, Some(r#"{"code":17}"#)),
            "409: Conflict"
        );
        assert_eq!(
            error_message(StatusCode::CONFLICT, JSON, Some(r#"{"message":""}"#)),
            "409: Conflict"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, JSON, Some("{broken")),
            "500: Internal Server Error"
        );
    }

    #[test]
    fn test_plain_text_bodies() {
        let status = StatusCode::UNAUTHORIZED;
        assert_eq!(
            error_message(status, Some("text/plain"), Some("Invalid Credentials")),
            "Invalid Credentials"
        );
        assert_eq!(error_message(status, None, Some("")), "401: Unauthorized");
        let long = "x".repeat(MAX_TEXT_MESSAGE);
        assert_eq!(error_message(status, None, Some(&long)), "401: Unauthorized");
        assert_eq!(error_message(status, None, None), "401: Unauthorized");

        // Length is counted in characters, not bytes
        let norwegian = "ø".repeat(150);
        assert_eq!(error_message(status, None, Some(&norwegian)), norwegian);
    }

    #[test]
    fn test_reservation_conflicts() {
        assert_eq!(
            reservation_error_message("Parking space is not available at 14:00"),
            "This parking space is not available for the selected time."
        );
        assert_eq!(
            reservation_error_message("Reservation is overlapping with RSV-12"),
            "This space is already reserved for the selected time period."
        );
        assert_eq!(reservation_error_message("Vehicle not found"), "Vehicle not found");
    }
}
