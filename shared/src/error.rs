//! Normalised API failures.

use serde_json::Value;
use thiserror::Error;

pub const FALLBACK_MESSAGE: &str = "Operation failed, please try again later";
pub const SESSION_MESSAGE: &str = "Session expired or insufficient permission";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("not signed in")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("server error {status}: {message}")]
    Server { status: u16, message: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Build an error from a non-success status and the raw response body.
    ///
    /// Understands FastAPI-style bodies: `{"detail": "..."}`,
    /// `{"detail": [{"msg": "..."}, ...]}` and `{"message"|"error": "..."}`.
    pub fn from_response(status: u16, body: &str) -> Self {
        match status {
            401 => return ApiError::Unauthorized,
            403 => return ApiError::Forbidden,
            _ => {}
        }

        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let detail = parsed.as_ref().and_then(|v| v.get("detail"));

        if let Some(Value::Array(items)) = detail {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    other => other.get("msg").and_then(Value::as_str).map(str::to_string),
                })
                .collect();
            if !messages.is_empty() {
                return ApiError::Validation(messages);
            }
        }

        let message = detail
            .and_then(Value::as_str)
            .or_else(|| parsed.as_ref().and_then(|v| v.get("message")).and_then(Value::as_str))
            .or_else(|| parsed.as_ref().and_then(|v| v.get("error")).and_then(Value::as_str))
            .map(str::to_string)
            .filter(|m| !m.trim().is_empty());

        match (status, message) {
            (404, message) => ApiError::NotFound(message.unwrap_or_else(|| "resource".to_string())),
            (400 | 409 | 422, Some(message)) => ApiError::Validation(vec![message]),
            (status, message) => ApiError::Server {
                status,
                message: message.unwrap_or_default(),
            },
        }
    }

    /// The one line shown to the user for this failure
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Unauthorized | ApiError::Forbidden => SESSION_MESSAGE.to_string(),
            ApiError::Validation(messages) if !messages.is_empty() => messages.join("\n"),
            ApiError::NotFound(message) if message != "resource" => message.clone(),
            ApiError::Server { message, .. } if !message.is_empty() => message.clone(),
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }

    /// Errors that end the session
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_statuses_ignore_body() {
        assert_eq!(ApiError::from_response(401, "{\"detail\":\"x\"}"), ApiError::Unauthorized);
        assert_eq!(ApiError::from_response(403, ""), ApiError::Forbidden);
        assert_eq!(ApiError::Forbidden.user_message(), SESSION_MESSAGE);
        assert!(ApiError::Unauthorized.is_auth());
        assert!(!ApiError::Forbidden.is_auth());
    }

    #[test]
    fn test_detail_array_becomes_validation() {
        let body = r#"{"detail":[{"loc":["body","name"],"msg":"field required"},{"msg":"too long"}]}"#;
        let error = ApiError::from_response(422, body);
        assert_eq!(
            error,
            ApiError::Validation(vec!["field required".to_string(), "too long".to_string()])
        );
        assert_eq!(error.user_message(), "field required\ntoo long");
    }

    #[test]
    fn test_detail_string_on_bad_request() {
        let error = ApiError::from_response(400, r#"{"detail":"Category is not a leaf"}"#);
        assert_eq!(error, ApiError::Validation(vec!["Category is not a leaf".to_string()]));
        assert_eq!(error.user_message(), "Category is not a leaf");
    }

    #[test]
    fn test_message_and_error_fields() {
        let error = ApiError::from_response(500, r#"{"message":"db down"}"#);
        assert_eq!(
            error,
            ApiError::Server {
                status: 500,
                message: "db down".to_string()
            }
        );
        let error = ApiError::from_response(409, r#"{"error":"duplicate name"}"#);
        assert_eq!(error.user_message(), "duplicate name");
    }

    #[test]
    fn test_unparsable_body_falls_back() {
        let error = ApiError::from_response(502, "<html>Bad gateway</html>");
        assert_eq!(
            error,
            ApiError::Server {
                status: 502,
                message: String::new()
            }
        );
        assert_eq!(error.user_message(), FALLBACK_MESSAGE);
        assert_eq!(ApiError::Network("offline".into()).user_message(), FALLBACK_MESSAGE);
        assert_eq!(ApiError::Decode("eof".into()).user_message(), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_not_found() {
        assert_eq!(
            ApiError::from_response(404, ""),
            ApiError::NotFound("resource".to_string())
        );
        let error = ApiError::from_response(404, r#"{"detail":"Transaction not found"}"#);
        assert_eq!(error.user_message(), "Transaction not found");
    }
}
